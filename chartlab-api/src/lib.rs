//! # Chartlab API Server Library
//!
//! Core functionality for the chartlab API server: upload a tabular data
//! file, preview it, filter it, generate x/y chart arrays, and save named
//! projects for later reload.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `storage`: Upload and export file stores
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod storage;
