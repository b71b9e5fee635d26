//! MariaDB Backup Core Library
//!
//! Shared types for the MariaDB service backup API: the records the API
//! returns, the paths it serves, and the error type every layer reports with.

pub mod api;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use error::*;
pub use model::*;

/// Substring that identifies the MariaDB service offering.
pub const MARIADB_OFFERING: &str = "mariadb";
