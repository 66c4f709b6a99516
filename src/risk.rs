use stellest_common::patient::PatientInput;
use stellest_common::prediction::RiskFactors;

/// 患者データからリスク要因を3分類で抽出する
pub fn analyze(patient: &PatientInput) -> RiskFactors {
    let mut high_risk = Vec::new();
    let mut medium_risk = Vec::new();
    let mut protective = Vec::new();

    // 年齢
    if patient.age > 15.0 {
        high_risk.push("Advanced age (>15 years)".to_string());
    } else if patient.age < 12.0 {
        protective.push("Optimal age for myopia control".to_string());
    }

    // 近視強度
    let avg_power = patient.average_power();
    if avg_power > 4.0 {
        high_risk.push("High myopia (>4D)".to_string());
    } else if avg_power < 2.0 {
        protective.push("Low myopia has better prognosis".to_string());
    }

    // スクリーンタイム
    if patient.screen_time > 6.0 {
        high_risk.push("Excessive screen time (>6 hours/day)".to_string());
    } else if patient.screen_time > 3.0 {
        medium_risk.push("High screen time (3-6 hours/day)".to_string());
    }

    // 屋外活動時間
    if patient.outdoor_time >= 2.0 {
        protective.push("Good outdoor time (≥2 hours/day)".to_string());
    } else if patient.outdoor_time < 1.0 {
        medium_risk.push("Limited outdoor time (<1 hour/day)".to_string());
    }

    // 家族歴
    if patient.family_history_myopia == 1 {
        medium_risk.push("Family history of myopia".to_string());
    }

    // 装用コンプライアンス
    if patient.stellest_wearing_time >= 12.0 {
        protective.push("Good compliance potential (≥12 hours/day)".to_string());
    } else if patient.stellest_wearing_time < 10.0 {
        medium_risk.push("Limited compliance potential (<10 hours/day)".to_string());
    }

    RiskFactors::Categorized {
        high_risk,
        medium_risk,
        protective,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(age: f64, power: f64, screen: f64, outdoor: f64, family: u8, wear: f64) -> PatientInput {
        PatientInput {
            patient_name: "Test Patient".to_string(),
            age,
            age_myopia_diagnosis: (age - 2.0).max(2.0),
            gender: 1,
            family_history_myopia: family,
            outdoor_time: outdoor,
            screen_time: screen,
            previous_myopia_control: 0,
            initial_power_re: power,
            initial_power_le: power,
            initial_axial_length_re: 23.5,
            initial_axial_length_le: 23.5,
            stellest_wearing_time: wear,
        }
    }

    fn unpack(factors: RiskFactors) -> (Vec<String>, Vec<String>, Vec<String>) {
        match factors {
            RiskFactors::Categorized {
                high_risk,
                medium_risk,
                protective,
            } => (high_risk, medium_risk, protective),
            RiskFactors::Impacts(_) => panic!("分類済みの形で返されるべき"),
        }
    }

    #[test]
    fn test_favorable_patient_collects_protective_factors() {
        let (high, medium, protective) =
            unpack(analyze(&patient(10.0, -1.5, 2.0, 3.0, 0, 14.0)));
        assert!(high.is_empty());
        assert!(medium.is_empty());
        assert_eq!(
            protective,
            vec![
                "Optimal age for myopia control",
                "Low myopia has better prognosis",
                "Good outdoor time (≥2 hours/day)",
                "Good compliance potential (≥12 hours/day)",
            ]
        );
    }

    #[test]
    fn test_unfavorable_patient_collects_high_risk_factors() {
        let (high, medium, protective) =
            unpack(analyze(&patient(17.0, -5.0, 8.0, 0.5, 1, 9.0)));
        assert_eq!(
            high,
            vec![
                "Advanced age (>15 years)",
                "High myopia (>4D)",
                "Excessive screen time (>6 hours/day)",
            ]
        );
        assert_eq!(
            medium,
            vec![
                "Limited outdoor time (<1 hour/day)",
                "Family history of myopia",
                "Limited compliance potential (<10 hours/day)",
            ]
        );
        assert!(protective.is_empty());
    }

    #[test]
    fn test_moderate_screen_time_is_medium_risk() {
        let (high, medium, _) = unpack(analyze(&patient(13.0, -3.0, 4.0, 1.5, 0, 11.0)));
        assert!(high.is_empty());
        assert_eq!(medium, vec!["High screen time (3-6 hours/day)"]);
    }
}
