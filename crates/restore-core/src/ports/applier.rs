//! ManifestApplier port - manifest をクラスタに適用する外部ツール

use std::path::Path;

use crate::domain::RestoreError;

/// Combined stdout + stderr of one apply run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutput {
    pub text: String,
}

impl ApplyOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Applies a manifest file to a namespace (`kubectl apply --namespace <ns> -f <path>`).
///
/// A missing tool is [`RestoreError::ApplyToolNotFound`]; a non-zero exit is
/// [`RestoreError::ApplyToolFailed`] with the captured output attached.
pub trait ManifestApplier {
    fn apply(&self, namespace: &str, manifest: &Path) -> Result<ApplyOutput, RestoreError>;
}
