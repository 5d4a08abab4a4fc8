//! # Chartlab Shared Library
//!
//! This crate contains the domain logic shared between the chartlab API
//! server and its tests: database access, models, authentication
//! primitives, and the table engine that powers chart generation.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, projects)
//! - `auth`: Password hashing, JWT tokens, and the Bearer middleware
//! - `db`: Connection pool and migration runner
//! - `table`: Ephemeral table loading, filtering, and series extraction

pub mod auth;
pub mod db;
pub mod models;
pub mod table;

/// Current version of the chartlab shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
