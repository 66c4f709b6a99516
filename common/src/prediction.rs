use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analytics::EnhancedAnalytics;

/// アンサンブル全体の判定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsemblePrediction {
    /// Stellestレンズ治療が有効と予測されるか
    pub will_benefit: bool,
    /// 治療成功確率（0.0〜1.0）
    pub probability: f64,
    /// 信頼度ラベル（"High" / "Medium" / "Low"）
    pub confidence: String,
}

/// メンバーモデル単体の予測
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub probability: f64,
    /// 2値判定（1=有効, 0=無効）。旧レスポンスには存在しない場合がある
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<i32>,
    pub confidence: String,
}

/// リスク要因ブロック
///
/// 正準形は3分類リスト。旧実装が返すフラットな影響度マップも
/// 互換のため受け付ける。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RiskFactors {
    /// 分類済みリスク要因（high/medium/protectiveの3キーが揃った形）
    Categorized {
        high_risk: Vec<String>,
        medium_risk: Vec<String>,
        protective: Vec<String>,
    },
    /// 要因名 → 符号付き影響度（正=悪化要因、負=保護要因）
    Impacts(BTreeMap<String, f64>),
}

/// `POST /predict` のレスポンス本体
///
/// `ensemble_prediction` 以外のフィールドはすべて任意で、欠けていても
/// クライアントは該当セクションを描画しないだけで失敗しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    pub ensemble_prediction: EnsemblePrediction,
    /// モデル識別子 → 個別予測
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub individual_models: BTreeMap<String, ModelPrediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_factors: Option<RiskFactors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// 予測処理時間（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_analytics: Option<EnhancedAnalytics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_analysis: Option<NarrativeAnalysis>,
}

/// ナラティブ分析ブロック
///
/// 各セクションは整形済みテキストで、クライアントは構造を解釈せず
/// そのまま表示する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_narrative: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_assessment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_treatments: Option<String>,
}

/// `GET /model_info` のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub accuracy: f64,
    pub features_count: u32,
    pub training_samples: u32,
    pub last_updated: String,
    pub description: String,
}

/// `GET /health` のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub model_loaded: bool,
    pub version: String,
}
