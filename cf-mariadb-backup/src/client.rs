//! Client for the backup REST API.
//!
//! Requests go through the [`HostCli`] delegate; this module only shapes the
//! paths and decodes the bodies.

use mariadb_backup_core::{
    api, BackupError, Result, ServiceInstanceBackup, ServiceInstanceResults,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::host::{HostCli, Method};

/// Client for the backups of MariaDB service instances.
///
/// # Examples
///
/// ```no_run
/// use cf_mariadb_backup::client::BackupClient;
/// use cf_mariadb_backup::host::CfCli;
///
/// # async fn example() -> anyhow::Result<()> {
/// let host = CfCli::new("cf");
/// let client = BackupClient::new(&host);
///
/// let backups = client.list_backups("0b7d5e1c-service-guid").await?;
/// println!("{} backups", backups.resources.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy)]
pub struct BackupClient<'a> {
    host: &'a dyn HostCli,
}

impl<'a> BackupClient<'a> {
    pub fn new(host: &'a dyn HostCli) -> Self {
        Self { host }
    }

    /// Issue a request and join the returned lines into one body.
    async fn fetch(&self, method: Method, path: &str) -> Result<String> {
        let lines = self.host.curl(method, path).await?;
        Ok(lines.join(""))
    }

    fn decode<T: DeserializeOwned>(body: &str, path: &str) -> Result<T> {
        serde_json::from_str(body).map_err(|e| BackupError::Decode(format!("{}: {}", path, e)))
    }

    /// Fetch every backup of a service instance.
    ///
    /// Follows `next_url` from page to page until a page has none. Resources
    /// are accumulated in page order; the totals are those of the last page.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any page request fails (`Transport`)
    /// - Any page body is not a valid results envelope (`Decode`)
    pub async fn list_backups(&self, service_instance_id: &str) -> Result<ServiceInstanceResults> {
        let mut results = ServiceInstanceResults::default();
        let mut next_url = Some(api::backups_path(service_instance_id));

        while let Some(url) = next_url.take() {
            let body = self.fetch(Method::Get, &url).await?;
            let page: ServiceInstanceResults = Self::decode(&body, &url)?;

            debug!(
                url = %url,
                resources = page.resources.len(),
                total_pages = page.total_pages,
                "fetched backups page"
            );

            next_url = page.next_url.clone().filter(|u| !u.is_empty());
            results.absorb_page(page);
        }

        Ok(results)
    }

    /// Request a new backup of a service instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, or a `Business` error carrying
    /// the raw response body if the body does not decode or lacks `entity`.
    pub async fn create_backup(&self, service_instance_id: &str) -> Result<ServiceInstanceBackup> {
        let path = api::backups_path(service_instance_id);
        let body = self.fetch(Method::Post, &path).await?;

        match serde_json::from_str::<ServiceInstanceBackup>(&body) {
            Ok(backup) if backup.entity.is_some() => {
                debug!(backup = backup.guid(), "backup creation accepted");
                Ok(backup)
            }
            _ => Err(BackupError::Business(format!(
                "Create backup command was not successful.\nDetails:\n{}",
                body
            ))),
        }
    }

    /// Fetch a single backup.
    pub async fn get_backup(
        &self,
        service_instance_id: &str,
        backup_id: &str,
    ) -> Result<ServiceInstanceBackup> {
        let path = api::backup_path(service_instance_id, backup_id);
        let body = self.fetch(Method::Get, &path).await?;
        Self::decode(&body, &path)
    }

    /// Delete a backup.
    ///
    /// Succeeds whenever the request itself succeeds; the response body is not
    /// inspected.
    pub async fn delete_backup(&self, service_instance_id: &str, backup_id: &str) -> Result<()> {
        let path = api::backup_path(service_instance_id, backup_id);
        self.fetch(Method::Delete, &path).await.map(|_| ())
    }
}
