//! Command execution handlers

use anyhow::{Context, Result};
use mariadb_backup_core::{BackupError, MARIADB_OFFERING};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::client::BackupClient;
use crate::config::CliConfig;
use crate::format::{
    format_backups_table, format_bold, format_config, format_goodbye_banner, format_ok,
    format_restores_table, format_service,
};
use crate::host::{HostCli, ServiceModel};

use super::commands::*;

/// Look up a service by name and check it is a MariaDB instance.
pub async fn resolve_service(host: &dyn HostCli, name: &str) -> Result<ServiceModel, BackupError> {
    let service = host
        .get_service(name)
        .await
        .map_err(|e| BackupError::Lookup(format!("Error getting service: {}", e)))?;

    if service.guid.is_empty() {
        return Err(BackupError::Lookup("Does the service exist?".to_string()));
    }

    if !service.offering_name.contains(MARIADB_OFFERING) {
        return Err(BackupError::Lookup(format!(
            "The service {} is not a MariaDB instance. This plugin does not yet support the backup of other service instances.",
            format_service(&service.name)
        )));
    }

    debug!(service = %service.name, guid = %service.guid, offering = %service.offering_name, "resolved service");
    Ok(service)
}

/// "org O / space S of service N", highlighted
async fn target_description(host: &dyn HostCli, service: &ServiceModel) -> Result<String> {
    let org = host
        .current_org()
        .await
        .context("Error getting the current organization.")?;
    let space = host
        .current_space()
        .await
        .context("Error getting the current space.")?;

    Ok(format!(
        "org {} / space {} of service {}",
        format_service(&org),
        format_service(&space),
        format_service(&service.name)
    ))
}

/// Handle list-mariadb-backups
pub async fn handle_list(host: &dyn HostCli, args: &ListArgs, out: &mut impl Write) -> Result<()> {
    let service_name = args.validate()?;
    let service = resolve_service(host, service_name).await?;

    writeln!(
        out,
        "Listing backups in {}...",
        target_description(host, &service).await?
    )?;

    let results = BackupClient::new(host)
        .list_backups(&service.guid)
        .await
        .with_context(|| {
            format!(
                "Error getting backups for service '{}'",
                format_service(&service.name)
            )
        })?;

    writeln!(out, "{}\n", format_ok())?;
    writeln!(out, "{}", format_backups_table(&service.name, &results))?;
    writeln!(out, "{}", format_restores_table(&service.name, &results))?;

    Ok(())
}

/// Delete the oldest backup if the service holds `max_backups` or more.
async fn rotate_backups(
    host: &dyn HostCli,
    service: &ServiceModel,
    max_backups: u64,
    out: &mut impl Write,
) -> Result<()> {
    let client = BackupClient::new(host);
    let results = client.list_backups(&service.guid).await.with_context(|| {
        format!(
            "Error getting backups for service '{}'",
            format_service(&service.name)
        )
    })?;

    let count = results.resources.len() as u64;
    if count < max_backups {
        debug!(count, max_backups, "below rotation bound, nothing to delete");
        return Ok(());
    }

    writeln!(
        out,
        "Currently there are {} backups in service {}. The max specified amount of backups is {}.\n",
        format_service(&count.to_string()),
        format_service(&service.name),
        format_service(&max_backups.to_string())
    )?;

    let oldest = results
        .oldest_backup()
        .and_then(|b| b.metadata.as_ref())
        .ok_or_else(|| {
            BackupError::Business(format!(
                "Cannot determine the oldest backup of service {}",
                format_service(&service.name)
            ))
        })?;

    info!(backup = %oldest.guid, created_at = ?oldest.created_at, "rotating out oldest backup");

    writeln!(
        out,
        "Deleting the oldest backup in {}...",
        target_description(host, service).await?
    )?;

    client
        .delete_backup(&service.guid, &oldest.guid)
        .await
        .with_context(|| {
            format!(
                "Error deleting the backup {} of service {}",
                format_bold(&oldest.guid),
                format_service(&service.name)
            )
        })?;

    writeln!(out, "{}\n", format_ok())?;
    Ok(())
}

/// Handle create-mariadb-backup
pub async fn handle_create(
    host: &dyn HostCli,
    args: &CreateArgs,
    out: &mut impl Write,
) -> Result<()> {
    let (service_name, rotation) = args.validate()?;
    let service = resolve_service(host, service_name).await?;

    if let Some(max_backups) = rotation {
        rotate_backups(host, &service, max_backups, out).await?;
    }

    writeln!(
        out,
        "Creating a backup in {}...",
        target_description(host, &service).await?
    )?;

    let backup = BackupClient::new(host)
        .create_backup(&service.guid)
        .await
        .with_context(|| {
            format!(
                "Error creating a backup for service '{}'",
                format_service(&service.name)
            )
        })?;

    info!(backup = backup.guid(), "backup requested");
    writeln!(out, "{}\n", format_ok())?;
    Ok(())
}

/// Handle delete-mariadb-backup
pub async fn handle_delete(
    host: &dyn HostCli,
    args: &DeleteArgs,
    out: &mut impl Write,
) -> Result<()> {
    let (service_name, backup_guid) = args.validate()?;
    let service = resolve_service(host, service_name).await?;
    let client = BackupClient::new(host);

    client
        .get_backup(&service.guid, backup_guid)
        .await
        .with_context(|| {
            format!(
                "Error finding the backup {} of service {}",
                format_bold(backup_guid),
                format_service(&service.name)
            )
        })?;

    writeln!(
        out,
        "Deleting a backup in {}...",
        target_description(host, &service).await?
    )?;

    client
        .delete_backup(&service.guid, backup_guid)
        .await
        .with_context(|| {
            format!(
                "Error deleting the backup {} of service {}",
                format_bold(backup_guid),
                format_service(&service.name)
            )
        })?;

    writeln!(out, "{}\n", format_ok())?;
    Ok(())
}

/// Handle the uninstall notification of the host CLI
pub fn handle_uninstall(out: &mut impl Write) -> Result<()> {
    write!(out, "{}", format_goodbye_banner())?;
    Ok(())
}

/// Handle config commands; `config_path` is the file `set` and `reset` write
pub fn handle_config(
    command: ConfigCommands,
    current_config: &CliConfig,
    config_path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            writeln!(out, "{}", format_config(current_config))?;
            writeln!(out, "Config file: {}", config_path.display())?;
        }
        ConfigCommands::Set { key, value } => {
            let mut config = current_config.clone();
            config.set(&key, &value)?;
            config.save_to(config_path)?;
            writeln!(out, "Set {} = {}", key, value)?;
            writeln!(out, "{}", format_ok())?;
        }
        ConfigCommands::Reset => {
            CliConfig::default().save_to(config_path)?;
            writeln!(out, "Configuration reset to defaults")?;
            writeln!(out, "{}", format_ok())?;
        }
    }

    Ok(())
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell, out: &mut impl Write) {
    use clap::CommandFactory;
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
}
