//! Database models.

pub mod project;
pub mod user;

pub use project::{NewProject, Project, ProjectAccess, ProjectSummary};
pub use user::{CreateUser, User};
