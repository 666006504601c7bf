//! Storage-backend selector
//!
//! Tiller は `--storage=secret` で起動されたときだけ Secret に保存します。
//! 設定として保存されている値ではないので、実行ごとに Pod を見て判断します
//! （キャッシュしない）。

use tracing::debug;

use crate::config::RestoreConfig;
use crate::domain::{RestoreError, StorageBackendKind};
use crate::ports::{ClusterClient, ConfigMapReleaseStore, ReleaseStore, SecretReleaseStore};

/// Inspect the first Tiller pod and decide where releases live.
///
/// Only the first container of the first pod is inspected. A pod with no
/// containers counts as empty launch arguments.
pub fn select_backend(
    client: &dyn ClusterClient,
    namespace: &str,
    component_selector: &str,
) -> Result<StorageBackendKind, RestoreError> {
    let instances = client.list_instances(namespace, component_selector)?;
    let Some(instance) = instances.first() else {
        return Err(RestoreError::NoBackendInstancesFound {
            namespace: namespace.to_string(),
            selector: component_selector.to_string(),
        });
    };

    let kind = StorageBackendKind::from_launch_args(
        instance
            .containers
            .first()
            .into_iter()
            .flat_map(|container| container.launch_arguments()),
    );
    debug!(pod = %instance.name, backend = %kind, "selected storage backend");
    Ok(kind)
}

/// Factory: select the backend once and hand back the matching store.
pub fn select_store<'a>(
    client: &'a dyn ClusterClient,
    config: &RestoreConfig,
) -> Result<Box<dyn ReleaseStore + 'a>, RestoreError> {
    let kind = select_backend(client, &config.tiller_namespace, &config.component_selector)?;
    Ok(match kind {
        StorageBackendKind::SecretBacked => Box::new(SecretReleaseStore::new(client)),
        StorageBackendKind::ConfigMapBacked => Box::new(ConfigMapReleaseStore::new(client)),
    })
}
