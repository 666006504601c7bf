//! Errors - エラー型と分類
//!
//! # 分類
//! - DecodeError: 1 件の payload のデコード失敗（lister がスキップする）
//! - RestoreError: 実行全体を止める致命的エラー（main まで伝播）

use std::path::PathBuf;
use thiserror::Error;

use super::selector::SelectorError;
use super::StorageBackendKind;

/// Failure to decode one stored release payload.
///
/// Recoverable: the lister logs it and moves on to the next object.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid payload encoding: {0}")]
    InvalidEncoding(String),

    #[error("corrupt gzip stream: {0}")]
    CorruptCompression(#[source] std::io::Error),

    #[error("malformed release record: {0}")]
    MalformedRecord(String),
}

/// Fatal errors for one restore invocation.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("no backend instances found in namespace {namespace} (selector {selector})")]
    NoBackendInstancesFound { namespace: String, selector: String },

    #[error("failed to query {resource} in namespace {namespace}: {message}")]
    StoreQueryFailed {
        resource: String,
        namespace: String,
        message: String,
    },

    #[error("apply tool '{tool}' not found on PATH")]
    ApplyToolNotFound { tool: String },

    #[error("apply tool '{tool}' failed ({status}):\n{output}")]
    ApplyToolFailed {
        tool: String,
        status: String,
        output: String,
    },

    #[error("{release} has no single deployed release (found {count})")]
    NoSingleDeployedRelease { release: String, count: usize },

    #[error("failed to write manifest file {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid label selector: {0}")]
    InvalidSelector(#[from] SelectorError),
}

impl RestoreError {
    pub fn store_query(
        kind: StorageBackendKind,
        namespace: &str,
        message: impl Into<String>,
    ) -> Self {
        RestoreError::StoreQueryFailed {
            resource: kind.resource().to_string(),
            namespace: namespace.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_single_release_names_release_and_count() {
        let err = RestoreError::NoSingleDeployedRelease {
            release: "myapp".to_string(),
            count: 2,
        };
        assert_eq!(err.to_string(), "myapp has no single deployed release (found 2)");
    }

    #[test]
    fn apply_failure_carries_output() {
        let err = RestoreError::ApplyToolFailed {
            tool: "kubectl".to_string(),
            status: "exit status: 1".to_string(),
            output: "error: unable to recognize".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("(exit status: 1)"));
        assert!(msg.contains("unable to recognize"));
    }

    #[test]
    fn store_query_uses_resource_name() {
        let err = RestoreError::store_query(
            StorageBackendKind::SecretBacked,
            "kube-system",
            "forbidden",
        );
        assert_eq!(
            err.to_string(),
            "failed to query secrets in namespace kube-system: forbidden"
        );
    }
}
