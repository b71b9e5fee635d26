//! Test utilities for handler and client testing
//!
//! Provides a scripted [`HostCli`] and JSON builders for API responses.

use crate::host::{HostCli, Method, ServiceModel};
use async_trait::async_trait;
use mariadb_backup_core::{BackupError, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// A scripted reply of the fake host
#[derive(Debug, Clone)]
enum Reply {
    Lines(Vec<String>),
    Fail(String),
}

/// Fake host CLI returning scripted replies per request.
///
/// Replies for the same request are consumed in the order they were queued.
/// Unscripted requests fail with a transport error. Every request is recorded.
#[derive(Debug)]
pub struct ScriptedHost {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<(Method, String)>>,
    service: Mutex<std::result::Result<ServiceModel, String>>,
    org: String,
    space: String,
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedHost {
    /// Host targeting `acme` / `dev` with a MariaDB instance `mydb` (`si-1`)
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            service: Mutex::new(Ok(ServiceModel {
                guid: "si-1".to_string(),
                name: "mydb".to_string(),
                offering_name: "mariadb".to_string(),
            })),
            org: "acme".to_string(),
            space: "dev".to_string(),
        }
    }

    /// Replace the service returned by every lookup
    pub fn with_service(self, service: ServiceModel) -> Self {
        *self.service.lock().unwrap() = Ok(service);
        self
    }

    /// Make every service lookup fail
    pub fn with_failing_service_lookup(self, message: &str) -> Self {
        *self.service.lock().unwrap() = Err(message.to_string());
        self
    }

    /// Queue a body for a request; it is returned split into lines
    pub fn respond(&self, method: Method, path: &str, body: &str) -> &Self {
        self.push(method, path, Reply::Lines(body.lines().map(str::to_string).collect()));
        self
    }

    /// Queue a transport failure for a request
    pub fn fail(&self, method: Method, path: &str, message: &str) -> &Self {
        self.push(method, path, Reply::Fail(message.to_string()));
        self
    }

    /// Requests issued so far, in order
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }
}

#[async_trait]
impl HostCli for ScriptedHost {
    async fn curl(&self, method: Method, path: &str) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push((method, path.to_string()));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&(method, path.to_string()))
            .and_then(|queue| queue.pop_front());

        match reply {
            Some(Reply::Lines(lines)) => Ok(lines),
            Some(Reply::Fail(message)) => Err(BackupError::Transport(message)),
            None => Err(BackupError::Transport(format!(
                "no reply scripted for {} {}",
                method, path
            ))),
        }
    }

    async fn get_service(&self, _name: &str) -> Result<ServiceModel> {
        self.service
            .lock()
            .unwrap()
            .clone()
            .map_err(BackupError::Transport)
    }

    async fn current_org(&self) -> Result<String> {
        Ok(self.org.clone())
    }

    async fn current_space(&self) -> Result<String> {
        Ok(self.space.clone())
    }
}

/// JSON of a backup; `restores` are `(guid, created_at, status)`
pub fn backup_json(guid: &str, created_at: &str, status: &str, restores: &[(&str, &str, &str)]) -> String {
    let restores: Vec<serde_json::Value> = restores
        .iter()
        .map(|(restore_guid, restore_created, restore_status)| {
            serde_json::json!({
                "metadata": {
                    "guid": restore_guid,
                    "url": format!("/custom/restores/{}", restore_guid),
                    "created_at": restore_created,
                    "updated_at": restore_created,
                },
                "entity": {"backup_id": guid, "status": restore_status},
            })
        })
        .collect();

    serde_json::json!({
        "metadata": {
            "guid": guid,
            "url": format!("/custom/service_instances/si-1/backups/{}", guid),
            "created_at": created_at,
            "updated_at": created_at,
        },
        "entity": {
            "service_instance_id": "si-1",
            "status": status,
            "restores": restores,
        },
    })
    .to_string()
}

/// JSON of a results page built from [`backup_json`] strings
pub fn page_json(resources: &[String], next_url: Option<&str>, total_results: u64, total_pages: u64) -> String {
    let resources: Vec<serde_json::Value> = resources
        .iter()
        .map(|r| serde_json::from_str(r).unwrap())
        .collect();

    serde_json::to_string_pretty(&serde_json::json!({
        "total_results": total_results,
        "total_pages": total_pages,
        "prev_url": null,
        "next_url": next_url,
        "resources": resources,
    }))
    .unwrap()
}
