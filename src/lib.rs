//! # TaskBoard Library
//!
//! A task tracking server exposing CRUD operations and a completion toggle
//! over a JSON HTTP API. This library provides the task model, the
//! PostgreSQL-backed store, and the HTTP surface.

pub mod args;
pub mod config;
pub mod db_persistence;
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod metrics;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use db_persistence::{DbError, DbPersistence};
pub use errors::{AppError, AppResult};
pub use http_server::{AppState, HttpServerError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library version
pub fn version() -> &'static str {
    VERSION
}

/// Get the library name
pub fn name() -> &'static str {
    NAME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(name(), "task-board");
    }
}
