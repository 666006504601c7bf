//! ReleaseLister - 候補 release の一覧
//!
//! # 方針
//! - backend の選択は list() ごとに 1 回だけ
//! - 1 件のデコード失敗で全体を止めない（古い壊れた release があっても
//!   正常な release を restore できるように、スキップして続行）
//! - ストアへのクエリ失敗は致命的エラー
//! - 順序はストアが返した順のまま（ソート・重複排除はしない）

use tracing::{debug, warn};

use crate::codec;
use crate::config::RestoreConfig;
use crate::domain::{ListQuery, ReleaseRecord, RestoreError};
use crate::ports::ClusterClient;

use super::selector::select_store;

pub struct ReleaseLister<'a> {
    client: &'a dyn ClusterClient,
    config: RestoreConfig,
}

impl<'a> ReleaseLister<'a> {
    pub fn new(client: &'a dyn ClusterClient, config: RestoreConfig) -> Self {
        Self { client, config }
    }

    pub fn list(&self, query: &ListQuery) -> Result<Vec<ReleaseRecord>, RestoreError> {
        let store = select_store(self.client, &self.config)?;
        let objects = store.list(query)?;
        debug!(
            backend = %store.kind(),
            selector = %query.selector(),
            objects = objects.len(),
            "listed release objects"
        );

        let mut records = Vec::with_capacity(objects.len());
        for object in objects {
            let Some(raw) = object.data(&self.config.data_key) else {
                warn!(object = %object.name, key = %self.config.data_key, "skipping object without release data");
                continue;
            };
            match codec::decode(raw) {
                Ok(record) => records.push(record),
                Err(e) => warn!(object = %object.name, error = %e, "skipping undecodable release"),
            }
        }
        Ok(records)
    }
}
