//! ClusterClient port - クラスタへの読み取りクエリ

use crate::domain::{ComponentInstance, RestoreError, StoredObject};

/// Read-only queries against the cluster.
///
/// Every call blocks until the cluster answers. Failures are reported as
/// [`RestoreError::StoreQueryFailed`]; nothing here retries.
pub trait ClusterClient {
    /// Running instances (pods) in `namespace` matching `selector`.
    fn list_instances(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<ComponentInstance>, RestoreError>;

    fn list_secrets(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<StoredObject>, RestoreError>;

    fn list_config_maps(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<StoredObject>, RestoreError>;
}
