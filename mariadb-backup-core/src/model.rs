//! Records returned by the backup REST API
//!
//! These mirror the JSON shapes of the API. Every field the server may leave
//! out decodes to an empty value, so a partial answer still parses and the
//! caller decides whether it is usable.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a backup.
///
/// Unknown values are kept verbatim in [`BackupStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackupStatus {
    CreateSucceeded,
    CreateInProgress,
    DeleteInProgress,
    Other(String),
}

impl BackupStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BackupStatus::CreateSucceeded => "CREATE_SUCCEEDED",
            BackupStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            BackupStatus::DeleteInProgress => "DELETE_IN_PROGRESS",
            BackupStatus::Other(s) => s,
        }
    }
}

impl Default for BackupStatus {
    fn default() -> Self {
        BackupStatus::Other(String::new())
    }
}

impl From<String> for BackupStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CREATE_SUCCEEDED" => BackupStatus::CreateSucceeded,
            "CREATE_IN_PROGRESS" => BackupStatus::CreateInProgress,
            "DELETE_IN_PROGRESS" => BackupStatus::DeleteInProgress,
            _ => BackupStatus::Other(value),
        }
    }
}

impl From<BackupStatus> for String {
    fn from(status: BackupStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BackupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a restore attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RestoreStatus {
    Succeeded,
    Other(String),
}

impl RestoreStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RestoreStatus::Succeeded => "SUCCEEDED",
            RestoreStatus::Other(s) => s,
        }
    }
}

impl Default for RestoreStatus {
    fn default() -> Self {
        RestoreStatus::Other(String::new())
    }
}

impl From<String> for RestoreStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "SUCCEEDED" => RestoreStatus::Succeeded,
            _ => RestoreStatus::Other(value),
        }
    }
}

impl From<RestoreStatus> for String {
    fn from(status: RestoreStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RestoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and timestamps of a backup or restore record.
///
/// A null or missing timestamp decodes to `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RestoreEntity {
    #[serde(default)]
    pub backup_id: String,
    #[serde(default)]
    pub status: RestoreStatus,
}

/// A restore attempt of a backup onto its service instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackupRestore {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub entity: RestoreEntity,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackupEntity {
    #[serde(default)]
    pub service_instance_id: String,
    #[serde(default)]
    pub status: BackupStatus,
    #[serde(default)]
    pub restores: Vec<BackupRestore>,
}

/// A backup as returned by the API.
///
/// Both halves are optional: a response without `entity` means the server did
/// not produce a backup (for example a failed create).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceInstanceBackup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<BackupEntity>,
}

impl ServiceInstanceBackup {
    /// GUID of the backup, empty when the metadata is missing.
    pub fn guid(&self) -> &str {
        self.metadata.as_ref().map(|m| m.guid.as_str()).unwrap_or("")
    }

    /// Restores of the backup, empty when the entity is missing.
    pub fn restores(&self) -> &[BackupRestore] {
        self.entity
            .as_ref()
            .map(|e| e.restores.as_slice())
            .unwrap_or(&[])
    }
}

/// One page of backups, or several pages accumulated into one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceInstanceResults {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub prev_url: Option<String>,
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default)]
    pub resources: Vec<ServiceInstanceBackup>,
}

impl ServiceInstanceResults {
    /// Append a fetched page.
    ///
    /// Resources are appended in page order and the totals are taken from the
    /// page, so after the last page they reflect what the server reported last.
    pub fn absorb_page(&mut self, page: ServiceInstanceResults) {
        self.resources.extend(page.resources);
        self.total_results = page.total_results;
        self.total_pages = page.total_pages;
    }

    /// The backup with the earliest `created_at`.
    ///
    /// While the current candidate has no metadata the next backup replaces it.
    /// Comparison is strict, so ties keep the first backup seen. Backups without
    /// metadata never displace a candidate that has one. A missing `created_at`
    /// sorts before any date.
    pub fn oldest_backup(&self) -> Option<&ServiceInstanceBackup> {
        let mut oldest: Option<&ServiceInstanceBackup> = None;

        for backup in &self.resources {
            match oldest.and_then(|o| o.metadata.as_ref()) {
                None => oldest = Some(backup),
                Some(current) => {
                    if let Some(metadata) = &backup.metadata {
                        if metadata.created_at < current.created_at {
                            oldest = Some(backup);
                        }
                    }
                }
            }
        }

        oldest
    }
}
