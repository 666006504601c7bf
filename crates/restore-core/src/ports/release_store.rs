//! ReleaseStore port - release を保持するストア
//!
//! Tiller のストレージドライバ（Secret / ConfigMap）ごとの実装を持ちます。
//! どちらを使うかは `app::selector::select_store` が実行ごとに決めます。

use crate::domain::{ListQuery, RestoreError, StorageBackendKind, StoredObject};

use super::ClusterClient;

/// A store of release objects.
pub trait ReleaseStore {
    fn kind(&self) -> StorageBackendKind;

    /// Objects matching the query, in the order the store returned them.
    fn list(&self, query: &ListQuery) -> Result<Vec<StoredObject>, RestoreError>;
}

/// Releases stored as Secrets (`--storage=secret`).
pub struct SecretReleaseStore<'a> {
    client: &'a dyn ClusterClient,
}

impl<'a> SecretReleaseStore<'a> {
    pub fn new(client: &'a dyn ClusterClient) -> Self {
        Self { client }
    }
}

impl ReleaseStore for SecretReleaseStore<'_> {
    fn kind(&self) -> StorageBackendKind {
        StorageBackendKind::SecretBacked
    }

    fn list(&self, query: &ListQuery) -> Result<Vec<StoredObject>, RestoreError> {
        self.client.list_secrets(&query.namespace, &query.selector())
    }
}

/// Releases stored as ConfigMaps (Tiller's default driver).
pub struct ConfigMapReleaseStore<'a> {
    client: &'a dyn ClusterClient,
}

impl<'a> ConfigMapReleaseStore<'a> {
    pub fn new(client: &'a dyn ClusterClient) -> Self {
        Self { client }
    }
}

impl ReleaseStore for ConfigMapReleaseStore<'_> {
    fn kind(&self) -> StorageBackendKind {
        StorageBackendKind::ConfigMapBacked
    }

    fn list(&self, query: &ListQuery) -> Result<Vec<StoredObject>, RestoreError> {
        self.client.list_config_maps(&query.namespace, &query.selector())
    }
}
