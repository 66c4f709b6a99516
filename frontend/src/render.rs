use std::cmp::Ordering;

use stellest_common::analytics::EnhancedAnalytics;
use stellest_common::prediction::{NarrativeAnalysis, PredictionResult, RiskFactors};

/// フラットな影響度マップから表示する最大件数
const TOP_IMPACTS: usize = 5;

/// 信頼度ラベルの表示スタイル区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceStyle {
    High,
    Medium,
    Low,
}

impl ConfidenceStyle {
    /// ラベル文字列から区分を決める
    ///
    /// 大文字小文字は区別しない。未知のラベルはMediumに落とす（失敗しない）。
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => ConfidenceStyle::High,
            "low" => ConfidenceStyle::Low,
            _ => ConfidenceStyle::Medium,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ConfidenceStyle::High => "confidence-high",
            ConfidenceStyle::Medium => "confidence-medium",
            ConfidenceStyle::Low => "confidence-low",
        }
    }
}

/// 予測レスポンスの表示用中間表現
///
/// DOMに依存しない純粋なツリー。rsxアダプタはこれをそのまま描画する。
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub verdict: VerdictView,
    pub models: Vec<ModelRow>,
    pub risk_panel: Option<RiskPanelView>,
    pub analytics: Option<AnalyticsView>,
    pub narrative: Option<NarrativeView>,
}

/// 主要判定ブロック
#[derive(Debug, Clone, PartialEq)]
pub struct VerdictView {
    pub patient_name: String,
    /// 小数1桁のパーセント表記（例: "72.5%"）
    pub probability: String,
    pub confidence_label: String,
    pub style: ConfidenceStyle,
    pub will_benefit: bool,
    pub benefit_glyph: &'static str,
    pub recommendation: String,
    /// 処理時間（秒）。レスポンスに無ければ0
    pub processing_time: f64,
}

/// 個別モデルテーブルの1行
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRow {
    /// レスポンス上のモデル識別子（例: "gradient_boosting"）
    pub id: String,
    pub name: String,
    pub probability: String,
    pub confidence_label: String,
    pub style: ConfidenceStyle,
}

/// リスク要因パネル（レスポンスの形に応じて2系統）
#[derive(Debug, Clone, PartialEq)]
pub enum RiskPanelView {
    /// 3分類リスト。空の分類は描画しない
    Categorized {
        high_risk: Vec<String>,
        medium_risk: Vec<String>,
        protective: Vec<String>,
    },
    /// 影響度の大きい順に上位N件
    Impacts(Vec<ImpactRow>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactRow {
    pub label: String,
    pub impact: f64,
    /// 正の影響は悪化要因、負は保護要因
    pub adverse: bool,
}

/// 補足分析パネル
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsView {
    pub comparisons: Vec<ComparisonRow>,
    pub risk_profile: Option<RiskProfileView>,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub label: String,
    pub value: f64,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskProfileView {
    pub category: String,
    pub color: String,
    pub score: i32,
    pub risk_factors: Vec<String>,
    pub protective_factors: Vec<String>,
}

/// ナラティブパネル（整形済みテキストをそのまま表示する）
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeView {
    pub clinical_narrative: Option<String>,
    pub treatment_plan: Option<String>,
}

/// 識別子を表示名へ変換する
///
/// アンダースコアを空白に置き換え、各単語の先頭を大文字化する。
/// モデル識別子にも分析キーにも同じ規則を適用する。
pub fn humanize(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 確率を小数1桁のパーセント表記へ
fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// 予測レスポンスから表示用ビューを構築する
///
/// 任意セクションが欠けていても失敗せず、該当パネルを省くだけ。
pub fn build_result_view(result: &PredictionResult) -> ResultView {
    let ensemble = &result.ensemble_prediction;

    let verdict = VerdictView {
        patient_name: result
            .patient_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "Patient".to_string()),
        probability: format_percent(ensemble.probability),
        confidence_label: ensemble.confidence.clone(),
        style: ConfidenceStyle::from_label(&ensemble.confidence),
        will_benefit: ensemble.will_benefit,
        benefit_glyph: if ensemble.will_benefit { "✓" } else { "✗" },
        recommendation: result.recommendation.clone().unwrap_or_default(),
        processing_time: result.processing_time.unwrap_or(0.0),
    };

    let models = result
        .individual_models
        .iter()
        .map(|(id, prediction)| ModelRow {
            id: id.clone(),
            name: humanize(id),
            probability: format_percent(prediction.probability),
            confidence_label: prediction.confidence.clone(),
            style: ConfidenceStyle::from_label(&prediction.confidence),
        })
        .collect();

    ResultView {
        verdict,
        models,
        risk_panel: result.risk_factors.as_ref().map(build_risk_panel),
        analytics: result.enhanced_analytics.as_ref().map(build_analytics_view),
        narrative: result.openai_analysis.as_ref().map(build_narrative_view),
    }
}

fn build_risk_panel(factors: &RiskFactors) -> RiskPanelView {
    match factors {
        RiskFactors::Categorized {
            high_risk,
            medium_risk,
            protective,
        } => RiskPanelView::Categorized {
            high_risk: high_risk.clone(),
            medium_risk: medium_risk.clone(),
            protective: protective.clone(),
        },
        RiskFactors::Impacts(impacts) => {
            let mut rows: Vec<ImpactRow> = impacts
                .iter()
                .map(|(key, impact)| ImpactRow {
                    label: humanize(key),
                    impact: *impact,
                    adverse: *impact > 0.0,
                })
                .collect();
            // 影響度の絶対値が大きい順
            rows.sort_by(|a, b| {
                b.impact
                    .abs()
                    .partial_cmp(&a.impact.abs())
                    .unwrap_or(Ordering::Equal)
            });
            rows.truncate(TOP_IMPACTS);
            RiskPanelView::Impacts(rows)
        }
    }
}

fn build_analytics_view(analytics: &EnhancedAnalytics) -> AnalyticsView {
    let comparisons = analytics
        .population_comparison
        .as_ref()
        .map(|comparison| {
            comparison
                .iter()
                .map(|(key, entry)| ComparisonRow {
                    label: humanize(key),
                    value: entry.value,
                    interpretation: entry.interpretation.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    let risk_profile = analytics.risk_profile.as_ref().map(|profile| RiskProfileView {
        category: profile.risk_category.clone(),
        color: profile.risk_color.clone(),
        score: profile.risk_score,
        risk_factors: profile.risk_factors.clone(),
        protective_factors: profile.protective_factors.clone(),
    });

    AnalyticsView {
        comparisons,
        risk_profile,
        insights: analytics.clinical_insights.clone().unwrap_or_default(),
    }
}

fn build_narrative_view(narrative: &NarrativeAnalysis) -> NarrativeView {
    NarrativeView {
        clinical_narrative: narrative.clinical_narrative.clone(),
        treatment_plan: narrative.treatment_plan.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use stellest_common::analytics::{PopulationComparison, RiskProfile};
    use stellest_common::prediction::{EnsemblePrediction, ModelPrediction};

    fn minimal_result(confidence: &str) -> PredictionResult {
        PredictionResult {
            patient_name: None,
            ensemble_prediction: EnsemblePrediction {
                will_benefit: true,
                probability: 0.725,
                confidence: confidence.to_string(),
            },
            individual_models: BTreeMap::new(),
            risk_factors: None,
            recommendation: None,
            patient_id: None,
            timestamp: None,
            processing_time: None,
            enhanced_analytics: None,
            openai_analysis: None,
        }
    }

    #[test]
    fn test_humanize_identifiers() {
        assert_eq!(humanize("gradient_boosting"), "Gradient Boosting");
        assert_eq!(humanize("svm"), "Svm");
        assert_eq!(humanize("myopia_severity"), "Myopia Severity");
        assert_eq!(humanize("screen_time"), "Screen Time");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_confidence_style_is_case_insensitive() {
        assert_eq!(ConfidenceStyle::from_label("HIGH"), ConfidenceStyle::High);
        assert_eq!(ConfidenceStyle::from_label("high"), ConfidenceStyle::High);
        assert_eq!(ConfidenceStyle::from_label("Low"), ConfidenceStyle::Low);
        assert_eq!(ConfidenceStyle::from_label(" medium "), ConfidenceStyle::Medium);
    }

    #[test]
    fn test_unknown_confidence_falls_back_to_medium() {
        // 未知のラベルでもエラーにせずMedium扱い
        assert_eq!(ConfidenceStyle::from_label("Unknown"), ConfidenceStyle::Medium);
        assert_eq!(ConfidenceStyle::from_label(""), ConfidenceStyle::Medium);
        let view = build_result_view(&minimal_result("Unknown"));
        assert_eq!(view.verdict.style, ConfidenceStyle::Medium);
    }

    #[test]
    fn test_verdict_defaults_for_absent_fields() {
        let view = build_result_view(&minimal_result("HIGH"));
        assert_eq!(view.verdict.patient_name, "Patient");
        assert_eq!(view.verdict.probability, "72.5%");
        assert_eq!(view.verdict.style, ConfidenceStyle::High);
        assert_eq!(view.verdict.benefit_glyph, "✓");
        assert_eq!(view.verdict.recommendation, "");
        assert_eq!(view.verdict.processing_time, 0.0);
    }

    #[test]
    fn test_model_rows_use_humanized_names() {
        let mut result = minimal_result("High");
        result.individual_models.insert(
            "gradient_boosting".to_string(),
            ModelPrediction {
                probability: 0.87,
                prediction: Some(1),
                confidence: "high".to_string(),
            },
        );
        result.individual_models.insert(
            "random_forest".to_string(),
            ModelPrediction {
                probability: 0.83,
                prediction: Some(1),
                confidence: "Medium".to_string(),
            },
        );

        let view = build_result_view(&result);
        assert_eq!(view.models.len(), 2);
        assert_eq!(view.models[0].id, "gradient_boosting");
        assert_eq!(view.models[0].name, "Gradient Boosting");
        assert_eq!(view.models[0].probability, "87.0%");
        assert_eq!(view.models[0].style, ConfidenceStyle::High);
        assert_eq!(view.models[1].name, "Random Forest");
        assert_eq!(view.models[1].style, ConfidenceStyle::Medium);
    }

    #[test]
    fn test_absent_sections_produce_no_panels() {
        let view = build_result_view(&minimal_result("Low"));
        assert!(view.models.is_empty());
        assert!(view.risk_panel.is_none());
        assert!(view.analytics.is_none());
        assert!(view.narrative.is_none());
    }

    #[test]
    fn test_categorized_risk_factors_are_preserved_in_order() {
        let mut result = minimal_result("High");
        result.risk_factors = Some(RiskFactors::Categorized {
            high_risk: vec!["High myopia (>4D)".to_string()],
            medium_risk: vec![],
            protective: vec![
                "Optimal age for myopia control".to_string(),
                "Good outdoor time (≥2 hours/day)".to_string(),
            ],
        });

        let view = build_result_view(&result);
        match view.risk_panel.unwrap() {
            RiskPanelView::Categorized {
                high_risk,
                medium_risk,
                protective,
            } => {
                assert_eq!(high_risk, vec!["High myopia (>4D)"]);
                assert!(medium_risk.is_empty());
                assert_eq!(protective.len(), 2);
            }
            RiskPanelView::Impacts(_) => panic!("分類パネルが選ばれるべき"),
        }
    }

    #[test]
    fn test_flat_impacts_are_sorted_and_truncated() {
        let mut impacts = BTreeMap::new();
        impacts.insert("screen_time".to_string(), 0.18);
        impacts.insert("outdoor_time".to_string(), -0.22);
        impacts.insert("age".to_string(), 0.05);
        impacts.insert("family_history_myopia".to_string(), 0.09);
        impacts.insert("stellest_wearing_time".to_string(), -0.02);
        impacts.insert("gender".to_string(), 0.01);

        let mut result = minimal_result("High");
        result.risk_factors = Some(RiskFactors::Impacts(impacts));

        let view = build_result_view(&result);
        match view.risk_panel.unwrap() {
            RiskPanelView::Impacts(rows) => {
                // 絶対値の降順で上位5件のみ
                assert_eq!(rows.len(), 5);
                let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
                assert_eq!(
                    labels,
                    vec![
                        "Outdoor Time",
                        "Screen Time",
                        "Family History Myopia",
                        "Age",
                        "Stellest Wearing Time",
                    ]
                );
                assert!(!rows[0].adverse);
                assert!(rows[1].adverse);
            }
            RiskPanelView::Categorized { .. } => panic!("影響度パネルが選ばれるべき"),
        }
    }

    #[test]
    fn test_analytics_panel_builds_each_subblock() {
        let mut comparison = BTreeMap::new();
        comparison.insert(
            "myopia_severity".to_string(),
            PopulationComparison {
                value: 1.375,
                population_mean: Some(3.3585),
                percentile: Some(33.5),
                interpretation: "Myopia is less severe than 33.5% of patients".to_string(),
            },
        );

        let mut result = minimal_result("High");
        result.enhanced_analytics = Some(EnhancedAnalytics {
            population_comparison: Some(comparison),
            risk_profile: Some(RiskProfile {
                risk_score: -4,
                risk_category: "Low Risk".to_string(),
                risk_color: "#28a745".to_string(),
                risk_factors: vec![],
                protective_factors: vec!["Optimal age for myopia control".to_string()],
                total_factors: Some(1),
            }),
            clinical_insights: Some(vec!["Young age provides excellent opportunity".to_string()]),
        });

        let view = build_result_view(&result);
        let analytics = view.analytics.unwrap();
        assert_eq!(analytics.comparisons.len(), 1);
        assert_eq!(analytics.comparisons[0].label, "Myopia Severity");
        let profile = analytics.risk_profile.unwrap();
        assert_eq!(profile.category, "Low Risk");
        assert_eq!(profile.score, -4);
        assert_eq!(analytics.insights.len(), 1);
    }

    #[test]
    fn test_empty_analytics_object_still_renders_panel() {
        // enhanced_analyticsが存在する限りパネルは出す（中身は空でよい）
        let mut result = minimal_result("High");
        result.enhanced_analytics = Some(EnhancedAnalytics {
            population_comparison: None,
            risk_profile: None,
            clinical_insights: None,
        });
        let view = build_result_view(&result);
        let analytics = view.analytics.unwrap();
        assert!(analytics.comparisons.is_empty());
        assert!(analytics.risk_profile.is_none());
        assert!(analytics.insights.is_empty());
    }

    #[test]
    fn test_narrative_panel_carries_opaque_text() {
        let mut result = minimal_result("High");
        result.openai_analysis = Some(NarrativeAnalysis {
            clinical_narrative: Some("Emma Johnson is a 10-year-old patient...".to_string()),
            treatment_plan: None,
            ..NarrativeAnalysis::default()
        });
        let view = build_result_view(&result);
        let narrative = view.narrative.unwrap();
        assert!(narrative.clinical_narrative.unwrap().starts_with("Emma Johnson"));
        assert!(narrative.treatment_plan.is_none());
    }

    #[test]
    fn test_probability_is_formatted_to_one_decimal() {
        let mut result = minimal_result("High");
        result.ensemble_prediction.probability = 0.8;
        assert_eq!(build_result_view(&result).verdict.probability, "80.0%");
        result.ensemble_prediction.probability = 0.333;
        assert_eq!(build_result_view(&result).verdict.probability, "33.3%");
    }
}
