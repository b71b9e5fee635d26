//! cf-mariadb-backup Library
//!
//! This library provides the core functionality for the cf-mariadb-backup
//! tool: listing, creating and deleting backups of MariaDB service instances
//! through the `cf` CLI.
//!
//! # Public API
//!
//! The primary public API is the [`client::BackupClient`], which issues its
//! requests through any [`host::HostCli`]. [`host::CfCli`] is the
//! implementation backed by the `cf` executable.
//!
//! ```no_run
//! use cf_mariadb_backup::client::BackupClient;
//! use cf_mariadb_backup::host::CfCli;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let host = CfCli::new("cf");
//! let backup = BackupClient::new(&host).create_backup("0b7d5e1c-service-guid").await?;
//! println!("Requested backup {}", backup.guid());
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// Client for the backup REST API.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

/// Delegate to the host `cf` CLI.
pub mod host;

#[cfg(test)]
pub mod test_utils;
