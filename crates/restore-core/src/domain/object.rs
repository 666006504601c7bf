//! Cluster objects as seen by the core.
//!
//! Adapters translate whatever the cluster returns into these shapes, so the
//! app layer never touches kubectl JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A Secret or ConfigMap reduced to what the lister needs.
///
/// Secret values are already decoded from the Kubernetes base64 layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl StoredObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

#[cfg(test)]
impl StoredObject {
    /// Fixture shorthand for `with_label` over a `k=v,k2=v2` string.
    ///
    /// Panics on a term that is not `key=value` so a typo cannot leave an
    /// object unlabelled.
    pub(crate) fn with_labels(mut self, labels: &str) -> Self {
        for term in labels.split(',') {
            let (key, value) = term
                .split_once('=')
                .unwrap_or_else(|| panic!("label term '{term}' is not key=value"));
            let key = key.trim();
            assert!(!key.is_empty(), "label term '{term}' has an empty key");
            self.labels.insert(key.to_string(), value.trim().to_string());
        }
        self
    }
}

/// One container's launch configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerLaunch {
    pub name: String,
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ContainerLaunch {
    /// command followed by args, the way the kubelet builds argv.
    pub fn launch_arguments(&self) -> impl Iterator<Item = &str> {
        self.command
            .iter()
            .chain(self.args.iter())
            .map(String::as_str)
    }
}

/// A running instance (pod) of a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInstance {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub containers: Vec<ContainerLaunch>,
}

impl ComponentInstance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_container<I, S>(mut self, name: impl Into<String>, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.containers.push(ContainerLaunch {
            name: name.into(),
            command: command.into_iter().map(Into::into).collect(),
            args: Vec::new(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_arguments_chain_command_then_args() {
        let container = ContainerLaunch {
            name: "tiller".to_string(),
            command: vec!["/tiller".to_string()],
            args: vec!["--storage=secret".to_string()],
        };
        let args: Vec<&str> = container.launch_arguments().collect();
        assert_eq!(args, vec!["/tiller", "--storage=secret"]);
    }

    #[test]
    fn with_labels_parses_pairs() {
        let object = StoredObject::new("myapp.v1").with_labels("NAME=myapp, OWNER=TILLER");
        assert_eq!(object.labels.get("NAME").map(String::as_str), Some("myapp"));
        assert_eq!(object.labels.get("OWNER").map(String::as_str), Some("TILLER"));
    }

    #[rstest::rstest]
    #[case::missing_operator("NAME=myapp,DEPLOYED")]
    #[case::empty_key("=TILLER")]
    #[case::trailing_comma("NAME=myapp,")]
    #[should_panic(expected = "label term")]
    fn with_labels_rejects_malformed_terms(#[case] labels: &str) {
        StoredObject::new("myapp.v1").with_labels(labels);
    }
}
