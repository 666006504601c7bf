//! Kubectl - kubectl を呼び出す本番用アダプタ
//!
//! # 実装詳細
//! - 読み取りは `kubectl get <resource> --namespace <ns> --selector <sel> --output json`
//! - 書き込みは `kubectl apply --namespace <ns> -f <path>`
//! - `--kubeconfig` / `--context` は全コマンドに付与
//! - すべて同期実行（プロセス終了まで待つ）

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

use crate::domain::{ComponentInstance, ContainerLaunch, RestoreError, StoredObject};
use crate::ports::{ApplyOutput, ClusterClient, ManifestApplier};

#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: PathBuf,
    kubeconfig: Option<PathBuf>,
    context: Option<String>,
}

impl Kubectl {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("kubectl"),
            kubeconfig: None,
            context: None,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_kubeconfig(mut self, kubeconfig: impl Into<PathBuf>) -> Self {
        self.kubeconfig = Some(kubeconfig.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn kubeconfig(&self) -> Option<&Path> {
        self.kubeconfig.as_deref()
    }

    fn tool(&self) -> String {
        self.binary.display().to_string()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        if let Some(kubeconfig) = &self.kubeconfig {
            cmd.arg("--kubeconfig").arg(kubeconfig);
        }
        if let Some(context) = &self.context {
            cmd.arg("--context").arg(context);
        }
        cmd
    }

    fn get<T>(
        &self,
        resource: &str,
        namespace: &str,
        selector: &str,
        parse: impl FnOnce(&[u8]) -> Result<Vec<T>, serde_json::Error>,
    ) -> Result<Vec<T>, RestoreError> {
        let failed = |message: String| RestoreError::StoreQueryFailed {
            resource: resource.to_string(),
            namespace: namespace.to_string(),
            message,
        };

        debug!(resource, namespace, selector, "kubectl get");
        let output = self
            .command()
            .args(["get", resource, "--namespace", namespace])
            .args(["--selector", selector, "--output", "json"])
            .output()
            .map_err(|e| failed(format!("failed to execute {}: {e}", self.tool())))?;

        if !output.status.success() {
            return Err(failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        parse(&output.stdout).map_err(|e| failed(format!("invalid JSON from kubectl: {e}")))
    }
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterClient for Kubectl {
    fn list_instances(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<ComponentInstance>, RestoreError> {
        let pods: Vec<PodJson> = self.get("pods", namespace, selector, parse_list)?;
        Ok(pods.into_iter().map(ComponentInstance::from).collect())
    }

    fn list_secrets(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<StoredObject>, RestoreError> {
        self.get("secrets", namespace, selector, parse_secret_list)
    }

    fn list_config_maps(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<StoredObject>, RestoreError> {
        let config_maps: Vec<DataObjectJson> =
            self.get("configmaps", namespace, selector, parse_list)?;
        Ok(config_maps.into_iter().map(StoredObject::from).collect())
    }
}

impl ManifestApplier for Kubectl {
    fn apply(&self, namespace: &str, manifest: &Path) -> Result<ApplyOutput, RestoreError> {
        debug!(namespace, manifest = %manifest.display(), "kubectl apply");
        let output = self
            .command()
            .args(["apply", "--namespace", namespace, "-f"])
            .arg(manifest)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => RestoreError::ApplyToolNotFound { tool: self.tool() },
                _ => RestoreError::ApplyToolFailed {
                    tool: self.tool(),
                    status: e.to_string(),
                    output: String::new(),
                },
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(RestoreError::ApplyToolFailed {
                tool: self.tool(),
                status: output.status.to_string(),
                output: text,
            });
        }
        Ok(ApplyOutput::new(text))
    }
}

// ========================================
// kubectl -o json の形
// ========================================

#[derive(Debug, Deserialize)]
struct ObjectList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataJson {
    #[serde(default)]
    name: String,
    #[serde(default)]
    labels: BTreeMap<String, String>,
}

/// Secret and ConfigMap share this shape; Secret values are base64.
#[derive(Debug, Deserialize)]
struct DataObjectJson {
    #[serde(default)]
    metadata: MetadataJson,
    #[serde(default)]
    data: BTreeMap<String, String>,
}

fn parse_list<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, serde_json::Error> {
    let list: ObjectList<T> = serde_json::from_slice(body)?;
    Ok(list.items)
}

/// Secrets from a `kubectl get secrets -o json` body.
///
/// A value that does not decode is dropped from that object only; the lister
/// then skips the object like any other broken release.
pub(crate) fn parse_secret_list(body: &[u8]) -> Result<Vec<StoredObject>, serde_json::Error> {
    let secrets: Vec<DataObjectJson> = parse_list(body)?;
    Ok(secrets
        .into_iter()
        .map(DataObjectJson::into_secret_object)
        .collect())
}

impl DataObjectJson {
    fn into_secret_object(self) -> StoredObject {
        let name = self.metadata.name;
        let mut data = BTreeMap::new();
        for (key, value) in self.data {
            let decoded = BASE64
                .decode(&value)
                .map_err(|e| e.to_string())
                .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()));
            match decoded {
                Ok(value) => {
                    data.insert(key, value);
                }
                Err(e) => warn!(secret = %name, key = %key, error = %e, "dropping undecodable secret value"),
            }
        }
        StoredObject {
            name,
            labels: self.metadata.labels,
            data,
        }
    }
}

impl From<DataObjectJson> for StoredObject {
    fn from(object: DataObjectJson) -> Self {
        StoredObject {
            name: object.metadata.name,
            labels: object.metadata.labels,
            data: object.data,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PodJson {
    #[serde(default)]
    metadata: MetadataJson,
    #[serde(default)]
    spec: PodSpecJson,
}

#[derive(Debug, Default, Deserialize)]
struct PodSpecJson {
    #[serde(default)]
    containers: Vec<ContainerJson>,
}

#[derive(Debug, Deserialize)]
struct ContainerJson {
    #[serde(default)]
    name: String,
    #[serde(default)]
    command: Vec<String>,
    #[serde(default)]
    args: Vec<String>,
}

impl From<PodJson> for ComponentInstance {
    fn from(pod: PodJson) -> Self {
        ComponentInstance {
            name: pod.metadata.name,
            labels: pod.metadata.labels,
            containers: pod
                .spec
                .containers
                .into_iter()
                .map(|c| ContainerLaunch {
                    name: c.name,
                    command: c.command,
                    args: c.args,
                })
                .collect(),
        }
    }
}
