use std::collections::BTreeMap;

use stellest_common::analytics::{
    DashboardData, EnhancedAnalytics, PopulationComparison, RiskProfile, TreatmentMix,
};
use stellest_common::patient::PatientInput;
use stellest_common::prediction::EnsemblePrediction;

/// 母集団の基準統計（臨床データベース由来の参照値）
struct PopulationStat {
    mean: f64,
    std: f64,
}

const AGE: PopulationStat = PopulationStat {
    mean: 11.334,
    std: 3.2,
};
const MYOPIA_SEVERITY: PopulationStat = PopulationStat {
    mean: 3.3585,
    std: 1.8,
};
const SCREEN_TIME: PopulationStat = PopulationStat {
    mean: 2.757,
    std: 1.5,
};
const OUTDOOR_TIME: PopulationStat = PopulationStat {
    mean: 1.228,
    std: 0.8,
};

/// 患者の補足分析（母集団比較・リスクプロファイル・臨床的知見）を生成する
pub fn generate(patient: &PatientInput, ensemble: &EnsemblePrediction) -> EnhancedAnalytics {
    EnhancedAnalytics {
        population_comparison: Some(population_comparison(patient)),
        risk_profile: Some(risk_profile(patient)),
        clinical_insights: Some(clinical_insights(patient, ensemble)),
    }
}

/// 正規分布近似によるパーセンタイル（50 + z×15、0〜100に制限）
fn percentile(value: f64, stat: &PopulationStat) -> f64 {
    let z_score = (value - stat.mean) / stat.std;
    (50.0 + z_score * 15.0).clamp(0.0, 100.0)
}

fn comparison(
    value: f64,
    stat: &PopulationStat,
    interpretation: String,
) -> PopulationComparison {
    PopulationComparison {
        value,
        population_mean: Some(stat.mean),
        percentile: Some(percentile(value, stat)),
        interpretation,
    }
}

/// 患者の各指標を母集団統計と比較する
fn population_comparison(patient: &PatientInput) -> BTreeMap<String, PopulationComparison> {
    let mut result = BTreeMap::new();

    let age_pct = percentile(patient.age, &AGE);
    result.insert(
        "age".to_string(),
        comparison(
            patient.age,
            &AGE,
            format!(
                "Patient is {} than {:.1}% of the population",
                if patient.age < AGE.mean { "younger" } else { "older" },
                age_pct
            ),
        ),
    );

    let avg_power = patient.average_power();
    let severity_pct = percentile(avg_power, &MYOPIA_SEVERITY);
    result.insert(
        "myopia_severity".to_string(),
        comparison(
            avg_power,
            &MYOPIA_SEVERITY,
            format!(
                "Myopia is {} severe than {:.1}% of patients",
                if avg_power > MYOPIA_SEVERITY.mean { "more" } else { "less" },
                severity_pct
            ),
        ),
    );

    let screen_pct = percentile(patient.screen_time, &SCREEN_TIME);
    result.insert(
        "screen_time".to_string(),
        comparison(
            patient.screen_time,
            &SCREEN_TIME,
            format!(
                "Screen time {} than {:.1}% of patients",
                if patient.screen_time > SCREEN_TIME.mean { "higher" } else { "lower" },
                screen_pct
            ),
        ),
    );

    let outdoor_pct = percentile(patient.outdoor_time, &OUTDOOR_TIME);
    result.insert(
        "outdoor_time".to_string(),
        comparison(
            patient.outdoor_time,
            &OUTDOOR_TIME,
            format!(
                "Outdoor time {} than {:.1}% of patients",
                if patient.outdoor_time < OUTDOOR_TIME.mean { "less" } else { "more" },
                100.0 - outdoor_pct
            ),
        ),
    );

    result
}

/// 加点方式のリスクプロファイルを算出する
///
/// スコア-2以下でLow、1以下でMedium、それ以外はHigh。
fn risk_profile(patient: &PatientInput) -> RiskProfile {
    let mut risk_score = 0;
    let mut risk_factors = Vec::new();
    let mut protective_factors = Vec::new();

    if patient.age > 15.0 {
        risk_score += 2;
        risk_factors.push("Advanced age (>15 years)".to_string());
    } else if patient.age < 12.0 {
        risk_score -= 1;
        protective_factors.push("Optimal age for myopia control".to_string());
    }

    let avg_power = patient.average_power();
    if avg_power > 4.0 {
        risk_score += 2;
        risk_factors.push("High myopia (>4D)".to_string());
    } else if avg_power < 2.0 {
        risk_score -= 1;
        protective_factors.push("Low myopia has better prognosis".to_string());
    }

    if patient.screen_time > 6.0 {
        risk_score += 2;
        risk_factors.push("Excessive screen time".to_string());
    } else if patient.screen_time < 3.0 {
        risk_score -= 1;
        protective_factors.push("Limited screen time".to_string());
    }

    if patient.outdoor_time >= 2.0 {
        risk_score -= 1;
        protective_factors.push("Good outdoor time is protective".to_string());
    } else if patient.outdoor_time < 1.0 {
        risk_score += 1;
        risk_factors.push("Limited outdoor time".to_string());
    }

    if patient.family_history_myopia == 1 {
        risk_score += 1;
        risk_factors.push("Family history of myopia".to_string());
    }

    let (risk_category, risk_color) = if risk_score <= -2 {
        ("Low Risk", "#28a745")
    } else if risk_score <= 1 {
        ("Medium Risk", "#ffc107")
    } else {
        ("High Risk", "#dc3545")
    };

    let total_factors = risk_factors.len() + protective_factors.len();
    RiskProfile {
        risk_score,
        risk_category: risk_category.to_string(),
        risk_color: risk_color.to_string(),
        risk_factors,
        protective_factors,
        total_factors: Some(total_factors),
    }
}

/// 予測結果と患者背景から臨床的知見を列挙する
fn clinical_insights(patient: &PatientInput, ensemble: &EnsemblePrediction) -> Vec<String> {
    let mut insights = Vec::new();

    if ensemble.probability > 0.7 {
        insights.push(
            "High probability of treatment success suggests Stellest lens as optimal choice"
                .to_string(),
        );
    } else if ensemble.probability > 0.5 {
        insights.push(
            "Moderate probability suggests careful monitoring and lifestyle modifications"
                .to_string(),
        );
    } else {
        insights.push(
            "Lower probability suggests considering alternative or combination treatments"
                .to_string(),
        );
    }

    if patient.age < 12.0 {
        insights.push("Young age provides excellent opportunity for myopia control".to_string());
    } else if patient.age > 15.0 {
        insights.push("Older age may require more aggressive treatment approach".to_string());
    }

    let avg_power = patient.average_power();
    if avg_power < 2.0 {
        insights.push(
            "Low myopia severity is associated with better treatment outcomes".to_string(),
        );
    } else if avg_power > 4.0 {
        insights.push("High myopia severity may require additional interventions".to_string());
    }

    insights
}

/// 分析タブ向けのダッシュボード集計を返す
pub fn dashboard() -> DashboardData {
    DashboardData {
        total_patients: 250,
        success_rate: 0.68,
        average_age: 11.3,
        common_risk_factors: vec![
            "High screen time".to_string(),
            "Limited outdoor time".to_string(),
            "Family history".to_string(),
        ],
        treatment_recommendations: TreatmentMix {
            high_success: 0.45,
            medium_success: 0.35,
            low_success: 0.20,
        },
    }
}
