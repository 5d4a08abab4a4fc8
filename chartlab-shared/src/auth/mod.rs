//! Authentication: password hashing, JWT tokens, and Axum middleware.

pub mod jwt;
pub mod middleware;
pub mod password;
