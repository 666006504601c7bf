//! Ports - 抽象化レイヤー
//!
//! クラスタへのアクセス（オブジェクト一覧、Pod 一覧、manifest の apply）を
//! trait として定義し、kubectl 実装と InMemory 実装を差し替え可能にします。

pub mod applier;
pub mod cluster;
pub mod release_store;

pub use self::applier::{ApplyOutput, ManifestApplier};
pub use self::cluster::ClusterClient;
pub use self::release_store::{ConfigMapReleaseStore, ReleaseStore, SecretReleaseStore};
