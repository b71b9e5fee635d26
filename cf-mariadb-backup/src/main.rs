//! cf-mariadb-backup
//!
//! Command-line interface for the backups of MariaDB service instances.

use cf_mariadb_backup::cli::{
    generate_completion, handle_config, handle_create, handle_delete, handle_list,
    handle_uninstall, Cli, Commands,
};
use cf_mariadb_backup::config::CliConfig;
use cf_mariadb_backup::format::format_failure;
use cf_mariadb_backup::host::CfCli;
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => exit_with_failure(e.to_string().trim_end()),
        },
    };

    // Build configuration using priority chain: defaults → file → env → CLI args
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => exit_with_failure(&format!("Configuration error: {:#}", e)),
    };

    if !config.color {
        colored::control::set_override(false);
    }
    init_tracing(config.verbose);
    tracing::debug!(cf_binary = %config.cf_binary, "configuration loaded");

    let host = CfCli::new(config.cf_binary.clone());
    let mut out = std::io::stdout();

    let result = match cli.command {
        Commands::ListBackups(args) => handle_list(&host, &args, &mut out).await,
        Commands::CreateBackup(args) => handle_create(&host, &args, &mut out).await,
        Commands::DeleteBackup(args) => handle_delete(&host, &args, &mut out).await,
        Commands::Uninstall => handle_uninstall(&mut out),
        Commands::Config { command } => config_path(&cli.config_file)
            .and_then(|path| handle_config(command, &config, &path, &mut out)),
        Commands::Completion { shell } => {
            generate_completion(shell, &mut out);
            Ok(())
        }
    };

    if let Err(e) = result {
        exit_with_failure(&format!("{:#}", e));
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<CliConfig> {
    let file = if cli.no_config {
        None
    } else {
        Some(config_path(&cli.config_file)?)
    };

    let mut builder = CliConfig::builder()
        .with_config_file(file.as_deref())?
        .with_env_overrides();

    if let Some(ref binary) = cli.cf_binary {
        builder = builder.with_cf_binary(binary)?;
    }
    if cli.verbose {
        builder = builder.with_verbose(true);
    }
    if cli.no_color {
        builder = builder.with_color(false);
    }

    builder.build()
}

fn config_path(explicit: &Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.clone()),
        None => CliConfig::config_path(),
    }
}

/// Print the failure banner and exit with status 1
fn exit_with_failure(message: &str) -> ! {
    println!("{}", format_failure(message));
    std::process::exit(1);
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
