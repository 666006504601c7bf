//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **Kubectl**: 本番用。`kubectl get ... -o json` と `kubectl apply` を呼び出す
//! - **InMemoryCluster**: 開発用・テスト用のクラスタ

pub mod inmem_cluster;
pub mod kubectl;

pub use self::inmem_cluster::InMemoryCluster;
pub use self::kubectl::Kubectl;
