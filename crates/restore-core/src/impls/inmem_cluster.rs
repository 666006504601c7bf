//! InMemoryCluster - 開発用のクラスタ
//!
//! # 実装詳細
//! - namespace ごとに Pod / Secret / ConfigMap を Vec で保持（挿入順を保つ）
//! - LabelSelector で絞り込み
//! - 呼び出し履歴を記録（backend 判定の回数などをテストで確認する）

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use crate::domain::{ComponentInstance, LabelSelector, RestoreError, StoredObject};
use crate::ports::ClusterClient;

const PODS: &str = "pods";
const SECRETS: &str = "secrets";
const CONFIG_MAPS: &str = "configmaps";

#[derive(Default)]
pub struct InMemoryCluster {
    instances: HashMap<String, Vec<ComponentInstance>>,
    secrets: HashMap<String, Vec<StoredObject>>,
    config_maps: HashMap<String, Vec<StoredObject>>,
    /// resources whose queries fail
    failing: HashSet<&'static str>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(mut self, namespace: &str, instance: ComponentInstance) -> Self {
        self.instances
            .entry(namespace.to_string())
            .or_default()
            .push(instance);
        self
    }

    pub fn with_secret(mut self, namespace: &str, object: StoredObject) -> Self {
        self.secrets
            .entry(namespace.to_string())
            .or_default()
            .push(object);
        self
    }

    pub fn with_config_map(mut self, namespace: &str, object: StoredObject) -> Self {
        self.config_maps
            .entry(namespace.to_string())
            .or_default()
            .push(object);
        self
    }

    /// Make every secret query fail, as if RBAC denied it.
    pub fn failing_secrets(mut self) -> Self {
        self.failing.insert(SECRETS);
        self
    }

    pub fn failing_config_maps(mut self) -> Self {
        self.failing.insert(CONFIG_MAPS);
        self
    }

    pub fn failing_pods(mut self) -> Self {
        self.failing.insert(PODS);
        self
    }

    /// Queries made so far, as `<resource> <namespace> <selector>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, resource: &str, namespace: &str, selector: &str) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{resource} {namespace} {selector}"));
    }

    fn check(&self, resource: &'static str, namespace: &str) -> Result<(), RestoreError> {
        if self.failing.contains(resource) {
            return Err(RestoreError::StoreQueryFailed {
                resource: resource.to_string(),
                namespace: namespace.to_string(),
                message: format!("{resource} is forbidden"),
            });
        }
        Ok(())
    }

    fn select<'a, T: Clone + 'a>(
        items: Option<&'a Vec<T>>,
        selector: &LabelSelector,
        labels: impl Fn(&T) -> &BTreeMap<String, String>,
    ) -> Vec<T> {
        items
            .into_iter()
            .flatten()
            .filter(|item| selector.matches(labels(*item)))
            .cloned()
            .collect()
    }

    fn list_objects(
        &self,
        resource: &'static str,
        store: &HashMap<String, Vec<StoredObject>>,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<StoredObject>, RestoreError> {
        self.record(resource, namespace, selector);
        self.check(resource, namespace)?;
        let selector = LabelSelector::parse(selector)?;
        Ok(Self::select(store.get(namespace), &selector, |o| &o.labels))
    }
}

impl ClusterClient for InMemoryCluster {
    fn list_instances(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<ComponentInstance>, RestoreError> {
        self.record(PODS, namespace, selector);
        self.check(PODS, namespace)?;
        let selector = LabelSelector::parse(selector)?;
        Ok(Self::select(self.instances.get(namespace), &selector, |i| &i.labels))
    }

    fn list_secrets(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<StoredObject>, RestoreError> {
        self.list_objects(SECRETS, &self.secrets, namespace, selector)
    }

    fn list_config_maps(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<StoredObject>, RestoreError> {
        self.list_objects(CONFIG_MAPS, &self.config_maps, namespace, selector)
    }
}
