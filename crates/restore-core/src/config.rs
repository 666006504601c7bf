//! RestoreConfig - 実行設定
//!
//! CLI が flags から組み立て、Restorer / ReleaseLister / selector に値で渡します。
//! プロセス全体で共有する可変状態はありません。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::ListQuery;

/// Presentation policy for apply output: which line prefixes are hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFilter {
    pub suppressed_prefixes: Vec<String>,
}

impl OutputFilter {
    /// Show every non-empty line.
    pub fn show_all() -> Self {
        Self {
            suppressed_prefixes: Vec::new(),
        }
    }

    pub fn is_suppressed(&self, line: &str) -> bool {
        self.suppressed_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
    }

    /// Non-empty lines that survive the filter, in order.
    pub fn visible_lines<'a>(&'a self, output: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter(move |line| !self.is_suppressed(line))
    }
}

impl Default for OutputFilter {
    /// kubectl の非致命的な警告は隠す
    fn default() -> Self {
        Self {
            suppressed_prefixes: vec!["Warning:".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreConfig {
    /// Namespace holding the Tiller pods and the release objects.
    pub tiller_namespace: String,

    /// Base label selector, combined with `NAME=<release>` at query time.
    pub label: String,

    /// Selector that finds the Tiller pods.
    pub component_selector: String,

    /// Data key holding the encoded release.
    pub data_key: String,

    /// Fixed-name file the manifest is written to during apply.
    pub manifest_path: PathBuf,

    #[serde(default)]
    pub output_filter: OutputFilter,
}

impl RestoreConfig {
    pub fn query(&self, release_name: &str) -> ListQuery {
        ListQuery::new(release_name, &self.tiller_namespace, &self.label)
    }
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            tiller_namespace: "kube-system".to_string(),
            label: "OWNER=TILLER,STATUS=DEPLOYED".to_string(),
            component_selector: "name=tiller".to_string(),
            data_key: "release".to_string(),
            manifest_path: PathBuf::from("manifests.yaml"),
            output_filter: OutputFilter::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tiller_conventions() {
        let config = RestoreConfig::default();
        assert_eq!(config.tiller_namespace, "kube-system");
        assert_eq!(config.label, "OWNER=TILLER,STATUS=DEPLOYED");
        assert_eq!(config.data_key, "release");
        assert_eq!(config.manifest_path, PathBuf::from("manifests.yaml"));
    }

    #[test]
    fn query_uses_configured_namespace_and_label() {
        let query = RestoreConfig::default().query("myapp");
        assert_eq!(query.namespace, "kube-system");
        assert_eq!(query.selector(), "OWNER=TILLER,STATUS=DEPLOYED,NAME=myapp");
    }

    #[test]
    fn default_filter_hides_warnings_and_blank_lines() {
        let output = "configmap/myapp configured\n\nWarning: resource is deprecated\nservice/myapp unchanged\n";
        let filter = OutputFilter::default();
        let lines: Vec<&str> = filter.visible_lines(output).collect();
        assert_eq!(lines, vec!["configmap/myapp configured", "service/myapp unchanged"]);
    }

    #[test]
    fn show_all_keeps_warnings() {
        let output = "Warning: resource is deprecated\nconfigmap/myapp configured\n";
        let filter = OutputFilter::show_all();
        let lines: Vec<&str> = filter.visible_lines(output).collect();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn config_deserializes_without_output_filter() {
        let json = serde_json::json!({
            "tiller_namespace": "tiller",
            "label": "OWNER=TILLER",
            "component_selector": "app=helm",
            "data_key": "release",
            "manifest_path": "out.yaml",
        });
        let config: RestoreConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.tiller_namespace, "tiller");
        assert_eq!(config.output_filter, OutputFilter::default());
    }
}
