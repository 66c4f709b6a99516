use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 予測レスポンスに付加される補足分析データ
///
/// すべてのサブブロックは任意。欠けているブロックは単に表示されない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedAnalytics {
    /// 指標名 → 母集団比較
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population_comparison: Option<BTreeMap<String, PopulationComparison>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_profile: Option<RiskProfile>,
    /// 臨床的知見（表示順のまま）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_insights: Option<Vec<String>>,
}

/// 単一指標の母集団比較
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationComparison {
    /// 患者の値
    pub value: f64,
    /// 母集団平均
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population_mean: Option<f64>,
    /// 母集団内パーセンタイル（0〜100）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
    /// 比較結果の説明文
    pub interpretation: String,
}

/// 加点方式のリスクプロファイル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub risk_score: i32,
    /// "Low Risk" / "Medium Risk" / "High Risk"
    pub risk_category: String,
    /// 表示用カラーコード（例: "#dc3545"）
    pub risk_color: String,
    pub risk_factors: Vec<String>,
    pub protective_factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_factors: Option<usize>,
}

/// 分析タブのダッシュボード集計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub total_patients: u32,
    pub success_rate: f64,
    pub average_age: f64,
    pub common_risk_factors: Vec<String>,
    pub treatment_recommendations: TreatmentMix,
}

/// 治療成功見込みの内訳（比率の合計はおよそ1.0）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentMix {
    pub high_success: f64,
    pub medium_success: f64,
    pub low_success: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analytics_subblocks_are_optional() {
        // どのサブブロックが欠けてもデシリアライズできる
        let analytics: EnhancedAnalytics = serde_json::from_str("{}").unwrap();
        assert!(analytics.population_comparison.is_none());
        assert!(analytics.risk_profile.is_none());
        assert!(analytics.clinical_insights.is_none());
    }

    #[test]
    fn test_population_comparison_roundtrip() {
        let json = r#"{"value":10.0,"population_mean":11.334,"percentile":43.7,"interpretation":"Patient is younger than 43.7% of the population"}"#;
        let comparison: PopulationComparison = serde_json::from_str(json).unwrap();
        assert_eq!(comparison.value, 10.0);
        assert_eq!(serde_json::to_string(&comparison).unwrap(), json);
    }

    #[test]
    fn test_risk_profile_without_total_factors() {
        // total_factorsは省略可能（旧レスポンスとの互換）
        let json = r##"{"risk_score":-2,"risk_category":"Low Risk","risk_color":"#28a745","risk_factors":[],"protective_factors":["Optimal age for myopia control"]}"##;
        let profile: RiskProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.risk_category, "Low Risk");
        assert!(profile.total_factors.is_none());
    }
}
