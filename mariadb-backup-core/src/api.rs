//! Paths served by the backup REST API
//!
//! All paths are relative to the platform API endpoint; the host CLI resolves
//! them and attaches credentials.

/// Collection path for the backups of a service instance.
///
/// `GET` returns a paginated [`crate::ServiceInstanceResults`], `POST` creates
/// a new backup.
pub fn backups_path(service_instance_id: &str) -> String {
    format!("/custom/service_instances/{}/backups", service_instance_id)
}

/// Path of a single backup.
pub fn backup_path(service_instance_id: &str, backup_id: &str) -> String {
    format!("{}/{}", backups_path(service_instance_id), backup_id)
}
