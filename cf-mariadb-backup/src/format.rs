//! Output formatting utilities for the CLI
//!
//! Provides the backup and restore tables and the colored banners.

use chrono::{DateTime, FixedOffset};
use colored::*;
use mariadb_backup_core::{BackupStatus, RestoreStatus, ServiceInstanceResults};

use tabled::{settings::Style, Table, Tabled};

use crate::config::CliConfig;

/// Layout of every rendered timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const PROJECT_NAME: &str = "cf-mariadb-backup-plugin";
const AUTHOR_EMAIL: &str = "gsm@machados.org";
const PROJECT_URL: &str = "http://github.com/gsmachado/cf-mariadb-backup-plugin";

/// Highlight a service, org or space name
pub fn format_service(name: &str) -> String {
    name.bright_cyan().to_string()
}

/// Highlight a flag name in an error message
pub fn format_flag(flag: &str) -> String {
    flag.red().to_string()
}

pub fn format_bold(text: &str) -> String {
    text.bold().to_string()
}

/// The banner printed after a step succeeded
pub fn format_ok() -> String {
    "OK".bright_green().to_string()
}

/// The banner printed before exiting with a failure
pub fn format_failure(message: &str) -> String {
    format!("{}\n{}\n", "FAILED".red(), message)
}

pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// A timestamp, or `-` when the server sent none
pub fn format_optional_timestamp(ts: Option<&DateTime<FixedOffset>>) -> String {
    ts.map(format_timestamp).unwrap_or_else(|| "-".to_string())
}

pub fn format_backup_status(status: &BackupStatus) -> String {
    let text = status.as_str();
    match status {
        BackupStatus::CreateSucceeded => text.black().on_green().to_string(),
        BackupStatus::CreateInProgress => text.black().on_yellow().to_string(),
        _ => text.black().on_red().to_string(),
    }
}

pub fn format_restore_status(status: &RestoreStatus) -> String {
    let text = status.as_str();
    match status {
        RestoreStatus::Succeeded => text.black().on_green().to_string(),
        _ => text.black().on_red().to_string(),
    }
}

/// Format the backups of a service as a table
pub fn format_backups_table(service_name: &str, results: &ServiceInstanceResults) -> String {
    #[derive(Tabled)]
    struct BackupRow {
        #[tabled(rename = "Index")]
        index: usize,
        #[tabled(rename = "Backup GUID")]
        guid: String,
        #[tabled(rename = "Backup Date Created")]
        created: String,
        #[tabled(rename = "Backup Status")]
        status: String,
    }

    let rows: Vec<BackupRow> = results
        .resources
        .iter()
        .enumerate()
        .map(|(i, backup)| BackupRow {
            index: i + 1,
            guid: backup.guid().to_string(),
            created: format_optional_timestamp(
                backup.metadata.as_ref().and_then(|m| m.created_at.as_ref()),
            ),
            status: format_backup_status(
                &backup
                    .entity
                    .as_ref()
                    .map(|e| e.status.clone())
                    .unwrap_or_default(),
            ),
        })
        .collect();

    let table = Table::new(rows).with(Style::ascii()).to_string();
    format!("Backups of {}:\n{}\n", format_service(service_name), table)
}

/// Format the restores of every backup of a service as a table
///
/// The index column repeats the index of the backup the restore belongs to.
pub fn format_restores_table(service_name: &str, results: &ServiceInstanceResults) -> String {
    #[derive(Tabled)]
    struct RestoreRow {
        #[tabled(rename = "Index")]
        index: usize,
        #[tabled(rename = "Backup GUID")]
        backup_guid: String,
        #[tabled(rename = "Restore GUID")]
        restore_guid: String,
        #[tabled(rename = "Restore Date Created")]
        created: String,
        #[tabled(rename = "Restore Status")]
        status: String,
    }

    let mut rows = Vec::new();
    for (i, backup) in results.resources.iter().enumerate() {
        for restore in backup.restores() {
            rows.push(RestoreRow {
                index: i + 1,
                backup_guid: backup.guid().to_string(),
                restore_guid: restore.metadata.guid.clone(),
                created: format_optional_timestamp(restore.metadata.created_at.as_ref()),
                status: format_restore_status(&restore.entity.status),
            });
        }
    }

    let table = Table::new(rows).with(Style::ascii()).to_string();
    format!("Restores of {}:\n{}\n", format_service(service_name), table)
}

/// Format the effective CLI configuration
pub fn format_config(config: &CliConfig) -> String {
    #[derive(Tabled)]
    struct SettingRow {
        #[tabled(rename = "Setting")]
        key: &'static str,
        #[tabled(rename = "Value")]
        value: String,
    }

    let rows = vec![
        SettingRow {
            key: "cf_binary",
            value: config.cf_binary.clone(),
        },
        SettingRow {
            key: "verbose",
            value: config.verbose.to_string(),
        },
        SettingRow {
            key: "color",
            value: config.color.to_string(),
        },
    ];

    let table = Table::new(rows).with(Style::ascii()).to_string();
    format!("{}\n{}", "CLI Configuration:".bold(), table)
}

/// Format the message shown when the plugin is uninstalled
pub fn format_goodbye_banner() -> String {
    format!(
        "\n{}\nSend some feedback to: \n- {}\n- {}\n",
        format!("Thanks for using {}!", PROJECT_NAME).bold(),
        AUTHOR_EMAIL.red(),
        PROJECT_URL.red()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{backup_json, page_json};

    fn no_color() {
        colored::control::set_override(false);
    }

    fn results(resources: &[String]) -> ServiceInstanceResults {
        serde_json::from_str(&page_json(resources, None, resources.len() as u64, 1)).unwrap()
    }

    #[test]
    fn test_format_failure() {
        no_color();
        assert_eq!(format_failure("boom"), "FAILED\nboom\n");
    }

    #[test]
    fn test_format_timestamp_keeps_offset() {
        let ts = DateTime::parse_from_rfc3339("2017-03-01T10:15:30+02:00").unwrap();
        assert_eq!(format_timestamp(&ts), "2017-03-01 10:15:30");
    }

    #[test]
    fn test_format_status_text() {
        no_color();
        assert_eq!(
            format_backup_status(&BackupStatus::CreateSucceeded),
            "CREATE_SUCCEEDED"
        );
        assert_eq!(
            format_backup_status(&BackupStatus::Other("CREATE_FAILED".to_string())),
            "CREATE_FAILED"
        );
        assert_eq!(format_restore_status(&RestoreStatus::Succeeded), "SUCCEEDED");
    }

    #[test]
    fn test_format_backups_table() {
        no_color();
        let results = results(&[
            backup_json("b-1", "2017-01-01T08:30:00Z", "CREATE_SUCCEEDED", &[]),
            backup_json("b-2", "2017-01-02T09:45:10Z", "CREATE_IN_PROGRESS", &[]),
        ]);

        let output = format_backups_table("mydb", &results);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Backups of mydb:");
        assert!(output.contains("Backup Date Created"));
        assert!(output.contains("| 1     | b-1"));
        assert!(output.contains("2017-01-01 08:30:00"));
        assert!(output.contains("| 2     | b-2"));
        assert!(output.contains("CREATE_IN_PROGRESS"));
    }

    #[test]
    fn test_format_restores_table_index_follows_backup() {
        no_color();
        let results = results(&[
            backup_json(
                "b-1",
                "2017-01-01T00:00:00Z",
                "CREATE_SUCCEEDED",
                &[
                    ("r-1", "2017-01-05T00:00:00Z", "SUCCEEDED"),
                    ("r-2", "2017-01-06T00:00:00Z", "FAILED"),
                ],
            ),
            backup_json("b-2", "2017-01-02T00:00:00Z", "CREATE_SUCCEEDED", &[]),
            backup_json(
                "b-3",
                "2017-01-03T00:00:00Z",
                "CREATE_SUCCEEDED",
                &[("r-3", "2017-01-07T00:00:00Z", "SUCCEEDED")],
            ),
        ]);

        let output = format_restores_table("mydb", &results);
        let rows: Vec<&str> = output.lines().filter(|l| l.contains("| r-")).collect();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("| 1 ") && rows[0].contains("r-1"));
        assert!(rows[1].starts_with("| 1 ") && rows[1].contains("FAILED"));
        assert!(rows[2].starts_with("| 3 ") && rows[2].contains("b-3"));
    }

    #[test]
    fn test_format_tables_without_dates() {
        no_color();
        let results: ServiceInstanceResults = serde_json::from_str(
            r#"{"resources": [{
                "metadata": {"guid": "b-1", "created_at": null},
                "entity": {"status": "CREATE_SUCCEEDED", "restores": [
                    {"entity": {"backup_id": "b-1", "status": "SUCCEEDED"}}
                ]}
            }]}"#,
        )
        .unwrap();

        let backups = format_backups_table("mydb", &results);
        let row = backups.lines().find(|l| l.contains("| b-1")).unwrap();
        assert!(row.contains("| -"));

        let restores = format_restores_table("mydb", &results);
        let row = restores.lines().find(|l| l.contains("SUCCEEDED")).unwrap();
        assert!(row.starts_with("| 1 ") && row.contains("| -"));
    }

    #[test]
    fn test_format_empty_tables() {
        no_color();
        let results = ServiceInstanceResults::default();

        let backups = format_backups_table("mydb", &results);
        assert!(backups.contains("Backup GUID"));

        let restores = format_restores_table("mydb", &results);
        assert!(restores.contains("Restore GUID"));
    }

    #[test]
    fn test_format_config() {
        no_color();
        let output = format_config(&CliConfig::default());
        assert!(output.contains("cf_binary"));
        assert!(output.contains("| cf "));
    }

    #[test]
    fn test_format_goodbye_banner() {
        no_color();
        let banner = format_goodbye_banner();
        assert!(banner.contains("Thanks for using cf-mariadb-backup-plugin!"));
        assert!(banner.contains(AUTHOR_EMAIL));
        assert!(banner.contains(PROJECT_URL));
    }
}
