//! StorageBackendKind - Tiller のストレージドライバ
//!
//! Tiller は release を Secret か ConfigMap のどちらかに保存します。
//! どちらを使っているかは起動引数（`--storage=secret`）からしか分かりません。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which object kind holds release records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackendKind {
    SecretBacked,
    ConfigMapBacked,
}

impl StorageBackendKind {
    /// Substring of a launch argument that marks the secret driver.
    pub const SECRET_MARKER: &'static str = "secret";

    /// Decide the backend from launch arguments.
    ///
    /// Any argument containing [`Self::SECRET_MARKER`] wins; everything else,
    /// including an empty list, falls back to ConfigMaps.
    pub fn from_launch_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if args
            .into_iter()
            .any(|arg| arg.as_ref().contains(Self::SECRET_MARKER))
        {
            StorageBackendKind::SecretBacked
        } else {
            StorageBackendKind::ConfigMapBacked
        }
    }

    /// kubectl resource name for this backend.
    pub fn resource(&self) -> &'static str {
        match self {
            StorageBackendKind::SecretBacked => "secrets",
            StorageBackendKind::ConfigMapBacked => "configmaps",
        }
    }
}

impl fmt::Display for StorageBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::storage_flag(&["/tiller", "--storage=secret"])]
    #[case::plural(&["/tiller", "--storage=secrets"])]
    #[case::anywhere(&["secret-driver"])]
    fn secret_marker_selects_secrets(#[case] args: &[&str]) {
        assert_eq!(
            StorageBackendKind::from_launch_args(args),
            StorageBackendKind::SecretBacked
        );
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::default_tiller(&["/tiller"])]
    #[case::configmap_flag(&["/tiller", "--storage=configmap"])]
    #[case::case_sensitive(&["--storage=SECRET"])]
    fn everything_else_selects_configmaps(#[case] args: &[&str]) {
        assert_eq!(
            StorageBackendKind::from_launch_args(args),
            StorageBackendKind::ConfigMapBacked
        );
    }

    #[test]
    fn display_uses_kubectl_resource_names() {
        assert_eq!(StorageBackendKind::SecretBacked.to_string(), "secrets");
        assert_eq!(StorageBackendKind::ConfigMapBacked.to_string(), "configmaps");
    }
}
