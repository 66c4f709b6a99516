use anyhow::Result;
use std::sync::Arc;
use stellest_common::prediction::ModelInfo;

use crate::api_underlying::Underlying;

pub struct ModelApi {
    pub underlying: Arc<Underlying>,
}

impl ModelApi {
    /// モデル情報を取得する（失敗時のフォールバックは呼び出し側が持つ）
    pub async fn model_info(&self) -> Result<ModelInfo> {
        self.underlying.get("model_info").await
    }
}
