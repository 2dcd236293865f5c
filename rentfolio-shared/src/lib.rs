//! # Rentfolio Shared Library
//!
//! This crate contains the database layer, domain models, and business logic
//! shared by the Rentfolio API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD queries
//! - `auth`: Authentication and authorization (passwords, JWTs, ownership chain)
//! - `db`: Connection pooling and migrations
//! - `reports`: Financial report aggregation and CSV serialization

pub mod auth;
pub mod db;
pub mod models;
pub mod reports;

/// Current version of the Rentfolio shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
