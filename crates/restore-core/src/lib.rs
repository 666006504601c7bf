//! restore-core
//!
//! Core building blocks for restoring a Tiller (Helm v2) release.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ReleaseRecord, ListQuery, StorageBackendKind, LabelSelector, errors）
//! - **codec**: release payload のデコード（base64 → gzip → protobuf）
//! - **ports**: 抽象化レイヤー（ClusterClient, ReleaseStore, ManifestApplier）
//! - **impls**: 実装（kubectl アダプタ、開発用の InMemoryCluster）
//! - **app**: アプリケーションロジック（selector, lister, restore）
//! - **config**: 実行設定（RestoreConfig）

pub mod app;
pub mod codec;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{ReleaseLister, RestoreReport, Restorer};
pub use config::RestoreConfig;
pub use domain::{DecodeError, ListQuery, ReleaseRecord, RestoreError, StorageBackendKind};
