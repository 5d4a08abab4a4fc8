//! API route handlers.

pub mod auth;
pub mod charts;
pub mod exports;
pub mod files;
pub mod health;
pub mod projects;
