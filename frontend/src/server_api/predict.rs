use anyhow::Result;
use std::sync::Arc;
use stellest_common::patient::PatientInput;
use stellest_common::prediction::PredictionResult;

use crate::api_underlying::Underlying;

pub struct PredictApi {
    pub underlying: Arc<Underlying>,
}

impl PredictApi {
    /// 検証済みの患者データを送信して予測結果を受け取る
    pub async fn predict(&self, patient: &PatientInput) -> Result<PredictionResult> {
        self.underlying.post("predict", patient).await
    }
}
