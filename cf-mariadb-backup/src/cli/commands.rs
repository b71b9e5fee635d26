//! CLI command and subcommand definitions

use clap::{Args, Parser, Subcommand};
use mariadb_backup_core::{BackupError, Result};
use std::path::PathBuf;

use crate::format::format_flag;

/// Backups of MariaDB service instances through the cf CLI
#[derive(Parser, Debug)]
#[command(name = "cf-mariadb-backup")]
#[command(
    version,
    about = "List, create and delete backups of MariaDB service instances",
    long_about = None
)]
pub struct Cli {
    /// Path to the cf executable (overrides config file)
    #[arg(long, global = true)]
    pub cf_binary: Option<String>,

    /// Enable verbose logging (overrides config file)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output (overrides config file)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Don't load config file
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Config file to read and write instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all backups of a specific MariaDB service.
    #[command(name = "list-mariadb-backups")]
    ListBackups(ListArgs),

    /// Create a backup of a specific MariaDB service. You can specify the max
    /// amount of backups before rotation (delete the oldest).
    #[command(name = "create-mariadb-backup")]
    CreateBackup(CreateArgs),

    /// Delete the backup of a specific MariaDB service.
    #[command(name = "delete-mariadb-backup")]
    DeleteBackup(DeleteArgs),

    /// Notification sent by the host CLI when the plugin is uninstalled
    #[command(name = "CLI-MESSAGE-UNINSTALL", hide = true)]
    Uninstall,

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn missing_service_name() -> BackupError {
    BackupError::Argument(format!(
        "Error parsing the argument {}. Did you forget to specify it?",
        format_flag("--service-name (-s)")
    ))
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Service name, e.g., --service-name SERVICE_NAME
    #[arg(short, long)]
    pub service_name: Option<String>,
}

impl ListArgs {
    /// The service name, or an argument error if it is missing
    pub fn validate(&self) -> Result<&str> {
        required(&self.service_name).ok_or_else(missing_service_name)
    }
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Service name, e.g., --service-name SERVICE_NAME
    #[arg(short, long)]
    pub service_name: Option<String>,

    /// Delete the oldest backup when the max amount of backups is reached,
    /// e.g., --max-backups-rotation AMOUNT
    #[arg(short, long, allow_negative_numbers = true)]
    pub max_backups_rotation: Option<i64>,
}

impl CreateArgs {
    /// The service name and the rotation bound, if any
    pub fn validate(&self) -> Result<(&str, Option<u64>)> {
        let service_name = required(&self.service_name).ok_or_else(missing_service_name)?;

        let rotation = match self.max_backups_rotation {
            None => None,
            Some(max) if max >= 1 => Some(max as u64),
            Some(max) => {
                return Err(BackupError::Argument(format!(
                    "Error parsing the arguments: {} must be at least 1, got {}",
                    format_flag("--max-backups-rotation (-m)"),
                    max
                )))
            }
        };

        Ok((service_name, rotation))
    }
}

#[derive(Args, Debug, Default)]
pub struct DeleteArgs {
    /// Service name, e.g., --service-name SERVICE_NAME
    #[arg(short, long)]
    pub service_name: Option<String>,

    /// Backup GUID, e.g., --backup-guid BACKUP_GUID
    #[arg(short, long)]
    pub backup_guid: Option<String>,
}

impl DeleteArgs {
    /// The service name and the backup GUID
    pub fn validate(&self) -> Result<(&str, &str)> {
        match (required(&self.service_name), required(&self.backup_guid)) {
            (Some(service_name), Some(backup_guid)) => Ok((service_name, backup_guid)),
            _ => Err(BackupError::Argument(format!(
                "Error parsing the arguments {} and {}. Did you forget to specify it?",
                format_flag("--service-name (-s)"),
                format_flag("--backup-guid (-b)")
            ))),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key (cf_binary, verbose, color)
        key: String,
        /// Configuration value
        value: String,
    },

    /// Reset configuration to defaults
    Reset,
}
