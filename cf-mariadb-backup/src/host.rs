//! Delegate to the host `cf` CLI.
//!
//! The plugin never talks to the network itself. Every request goes through
//! [`HostCli`], which the production binary backs with the `cf` executable
//! (`cf curl`, `cf service`) and tests back with a scripted fake.

use async_trait::async_trait;
use mariadb_backup_core::{BackupError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// HTTP verb of a delegated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service instance as seen by the host CLI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceModel {
    /// Instance GUID, empty if the host could not resolve one
    pub guid: String,
    /// Instance name
    pub name: String,
    /// Name of the service offering the instance was created from
    pub offering_name: String,
}

/// Capabilities the host CLI provides to the plugin.
#[async_trait]
pub trait HostCli: Send + Sync {
    /// Issue an authenticated request and return the response body lines.
    async fn curl(&self, method: Method, path: &str) -> Result<Vec<String>>;

    /// Look up a service instance of the targeted space by name.
    async fn get_service(&self, name: &str) -> Result<ServiceModel>;

    /// Name of the targeted organization.
    async fn current_org(&self) -> Result<String>;

    /// Name of the targeted space.
    async fn current_space(&self) -> Result<String>;
}

/// [`HostCli`] backed by the `cf` executable.
#[derive(Debug, Clone)]
pub struct CfCli {
    binary: String,
    cf_home: Option<PathBuf>,
}

impl CfCli {
    /// Create a delegate that runs `binary` (a path or a name on `PATH`).
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            cf_home: None,
        }
    }

    /// Read the targeted org and space from `cf_home` instead of `$CF_HOME`.
    pub fn with_cf_home(mut self, cf_home: impl Into<PathBuf>) -> Self {
        self.cf_home = Some(cf_home.into());
        self
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<String>> {
        debug!(binary = %self.binary, ?args, "running host command");

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| BackupError::Transport(format!("cannot run {}: {}", self.binary, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(BackupError::Transport(format!(
                "{} {} failed ({}): {}",
                self.binary,
                args.join(" "),
                output.status,
                detail
            )));
        }

        Ok(stdout.lines().map(str::to_string).collect())
    }

    async fn curl_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.curl(Method::Get, path).await?.join("");
        serde_json::from_str(&body)
            .map_err(|e| BackupError::Decode(format!("{}: {}", path, e)))
    }

    fn config_file(&self) -> Result<PathBuf> {
        let home = match &self.cf_home {
            Some(home) => home.clone(),
            None => match std::env::var_os("CF_HOME") {
                Some(home) => PathBuf::from(home),
                None => dirs::home_dir().ok_or_else(|| {
                    BackupError::Config("Cannot determine the cf home directory".to_string())
                })?,
            },
        };

        Ok(home.join(".cf").join("config.json"))
    }

    async fn target(&self) -> Result<CfTarget> {
        let path = self.config_file()?;
        let content = tokio::fs::read_to_string(&path).await?;
        serde_json::from_str(&content)
            .map_err(|e| BackupError::Decode(format!("{}: {}", path.display(), e)))
    }
}

#[async_trait]
impl HostCli for CfCli {
    async fn curl(&self, method: Method, path: &str) -> Result<Vec<String>> {
        let mut args = vec!["curl"];
        if method != Method::Get {
            args.push("-X");
            args.push(method.as_str());
        }
        args.push(path);

        let lines = self.run(&args).await?;
        debug!(%method, path, lines = lines.len(), "cf curl finished");
        Ok(lines)
    }

    async fn get_service(&self, name: &str) -> Result<ServiceModel> {
        let guid = self
            .run(&["service", name, "--guid"])
            .await?
            .iter()
            .map(|line| line.trim())
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string();

        if guid.is_empty() {
            return Ok(ServiceModel {
                name: name.to_string(),
                ..Default::default()
            });
        }

        let instance: V3ServiceInstance = self
            .curl_json(&format!("/v3/service_instances/{}", guid))
            .await?;

        // User-provided instances have no plan and therefore no offering
        let offering_name = match instance.relationships.service_plan.and_then(|r| r.data) {
            Some(plan) => {
                let plan: V3ServicePlan = self
                    .curl_json(&format!(
                        "/v3/service_plans/{}?include=service_offering",
                        plan.guid
                    ))
                    .await?;
                plan.included
                    .service_offerings
                    .into_iter()
                    .next()
                    .map(|o| o.name)
                    .unwrap_or_default()
            }
            None => String::new(),
        };

        Ok(ServiceModel {
            guid,
            name: if instance.name.is_empty() {
                name.to_string()
            } else {
                instance.name
            },
            offering_name,
        })
    }

    async fn current_org(&self) -> Result<String> {
        let name = self.target().await?.organization.name;
        if name.is_empty() {
            return Err(BackupError::Config("No org targeted".to_string()));
        }
        Ok(name)
    }

    async fn current_space(&self) -> Result<String> {
        let name = self.target().await?.space.name;
        if name.is_empty() {
            return Err(BackupError::Config("No space targeted".to_string()));
        }
        Ok(name)
    }
}

/// Targeted org and space, as stored in `~/.cf/config.json`.
#[derive(Debug, Default, Deserialize)]
struct CfTarget {
    #[serde(rename = "OrganizationFields", default)]
    organization: CfNamed,
    #[serde(rename = "SpaceFields", default)]
    space: CfNamed,
}

#[derive(Debug, Default, Deserialize)]
struct CfNamed {
    #[serde(rename = "Name", default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct V3ServiceInstance {
    #[serde(default)]
    name: String,
    #[serde(default)]
    relationships: V3Relationships,
}

#[derive(Debug, Default, Deserialize)]
struct V3Relationships {
    #[serde(default)]
    service_plan: Option<V3ToOne>,
}

#[derive(Debug, Default, Deserialize)]
struct V3ToOne {
    #[serde(default)]
    data: Option<V3Guid>,
}

#[derive(Debug, Default, Deserialize)]
struct V3Guid {
    guid: String,
}

#[derive(Debug, Default, Deserialize)]
struct V3ServicePlan {
    #[serde(default)]
    included: V3Included,
}

#[derive(Debug, Default, Deserialize)]
struct V3Included {
    #[serde(default)]
    service_offerings: Vec<V3Named>,
}

#[derive(Debug, Default, Deserialize)]
struct V3Named {
    #[serde(default)]
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_cf_config(dir: &std::path::Path, content: &str) {
        std::fs::create_dir_all(dir.join(".cf")).unwrap();
        std::fs::write(dir.join(".cf").join("config.json"), content).unwrap();
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }

    #[tokio::test]
    async fn test_target_from_cf_config() {
        let dir = tempfile::tempdir().unwrap();
        write_cf_config(
            dir.path(),
            r#"{
                "ConfigVersion": 3,
                "Target": "https://api.example.com",
                "OrganizationFields": {"GUID": "o-1", "Name": "acme"},
                "SpaceFields": {"GUID": "s-1", "Name": "production", "AllowSSH": true}
            }"#,
        );

        let cf = CfCli::new("cf").with_cf_home(dir.path());
        assert_eq!(cf.current_org().await.unwrap(), "acme");
        assert_eq!(cf.current_space().await.unwrap(), "production");
    }

    #[tokio::test]
    async fn test_target_not_set() {
        let dir = tempfile::tempdir().unwrap();
        write_cf_config(dir.path(), r#"{"OrganizationFields": {"Name": ""}}"#);

        let cf = CfCli::new("cf").with_cf_home(dir.path());
        assert!(matches!(
            cf.current_org().await,
            Err(BackupError::Config(_))
        ));
        assert!(matches!(
            cf.current_space().await,
            Err(BackupError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_cf_config() {
        let dir = tempfile::tempdir().unwrap();
        let cf = CfCli::new("cf").with_cf_home(dir.path());

        assert!(matches!(cf.current_org().await, Err(BackupError::Io(_))));
    }

    #[tokio::test]
    async fn test_missing_binary_is_transport_error() {
        let cf = CfCli::new("/nonexistent/cf-binary-for-tests");
        let result = cf.curl(Method::Get, "/v2/info").await;

        match result {
            Err(BackupError::Transport(msg)) => {
                assert!(msg.contains("/nonexistent/cf-binary-for-tests"));
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_v3_plan_decoding() {
        let instance: V3ServiceInstance = serde_json::from_str(
            r#"{"guid":"si-1","name":"db","relationships":{"space":{"data":{"guid":"s-1"}},"service_plan":{"data":{"guid":"p-1"}}}}"#,
        )
        .unwrap();
        let plan = instance.relationships.service_plan.and_then(|r| r.data).unwrap();
        assert_eq!(plan.guid, "p-1");

        let upsi: V3ServiceInstance =
            serde_json::from_str(r#"{"guid":"si-2","name":"ups","relationships":{}}"#).unwrap();
        assert!(upsi.relationships.service_plan.is_none());

        let plan: V3ServicePlan = serde_json::from_str(
            r#"{"guid":"p-1","included":{"service_offerings":[{"guid":"o-1","name":"mariadb-galera"}]}}"#,
        )
        .unwrap();
        assert_eq!(plan.included.service_offerings[0].name, "mariadb-galera");
    }
}
