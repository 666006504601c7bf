//! Restorer - restore の全体フロー
//!
//! # フロー
//! 1. ReleaseLister で候補を一覧
//! 2. ちょうど 1 件でなければ NoSingleDeployedRelease
//! 3. manifest を固定名ファイルに書き出し（ManifestFile guard）
//! 4. ManifestApplier で apply、出力を OutputFilter で整形
//! 5. guard の Drop でファイル削除（成功・失敗どちらでも）
//!
//! リトライはしません。失敗はすべて呼び出し側に返します。

use tracing::info;

use crate::config::RestoreConfig;
use crate::domain::RestoreError;
use crate::ports::{ClusterClient, ManifestApplier};

use super::lister::ReleaseLister;
use super::manifest_file::ManifestFile;

/// What a successful restore did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub release: String,
    pub namespace: String,
    pub revision: i32,
    /// Apply output lines left after the output filter.
    pub lines: Vec<String>,
}

pub struct Restorer<'a> {
    client: &'a dyn ClusterClient,
    applier: &'a dyn ManifestApplier,
    config: RestoreConfig,
}

impl<'a> Restorer<'a> {
    pub fn new(
        client: &'a dyn ClusterClient,
        applier: &'a dyn ManifestApplier,
        config: RestoreConfig,
    ) -> Self {
        Self {
            client,
            applier,
            config,
        }
    }

    pub fn config(&self) -> &RestoreConfig {
        &self.config
    }

    /// Reapply the single deployed release named `release_name`.
    pub fn restore(&self, release_name: &str) -> Result<RestoreReport, RestoreError> {
        let query = self.config.query(release_name);
        let releases = ReleaseLister::new(self.client, self.config.clone()).list(&query)?;
        let [release] = <[_; 1]>::try_from(releases).map_err(|releases: Vec<_>| {
            RestoreError::NoSingleDeployedRelease {
                release: release_name.to_string(),
                count: releases.len(),
            }
        })?;
        info!(
            release = release_name,
            namespace = %release.namespace,
            revision = release.version,
            "restoring release"
        );

        let file = ManifestFile::create(&self.config.manifest_path, &release.manifest).map_err(
            |source| RestoreError::ManifestWrite {
                path: self.config.manifest_path.clone(),
                source,
            },
        )?;
        let output = self.applier.apply(&release.namespace, file.path())?;
        drop(file);

        let lines: Vec<String> = self
            .config
            .output_filter
            .visible_lines(&output.text)
            .map(str::to_string)
            .collect();
        info!(release = release_name, "release restored");

        Ok(RestoreReport {
            release: release_name.to_string(),
            namespace: release.namespace,
            revision: release.version,
            lines,
        })
    }
}
