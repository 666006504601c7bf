//! ListQuery - 候補 release の検索条件

use serde::{Deserialize, Serialize};

/// Label key Tiller stamps with the release name.
pub const RELEASE_NAME_LABEL: &str = "NAME";

/// Filter used to enumerate candidate store objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub release_name: String,
    pub namespace: String,
    pub label_selector: String,
}

impl ListQuery {
    pub fn new(
        release_name: impl Into<String>,
        namespace: impl Into<String>,
        label_selector: impl Into<String>,
    ) -> Self {
        Self {
            release_name: release_name.into(),
            namespace: namespace.into(),
            label_selector: label_selector.into(),
        }
    }

    /// The selector actually sent to the store: base label AND `NAME=<release>`.
    pub fn selector(&self) -> String {
        let base = self.label_selector.trim().trim_end_matches(',');
        if base.is_empty() {
            format!("{RELEASE_NAME_LABEL}={}", self.release_name)
        } else {
            format!("{base},{RELEASE_NAME_LABEL}={}", self.release_name)
        }
    }
}
