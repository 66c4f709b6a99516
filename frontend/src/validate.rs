use stellest_common::patient::{FIELDS, PatientInput};

use crate::errors::PredictionError;
use crate::form::{FieldValue, PatientDraft};

/// 患者データ候補を検証し、通過すれば送信用の`PatientInput`を構築する
///
/// 規則は次の順に評価し、最初の違反だけを返す（複数エラーの蓄積はしない）:
/// 1. 全13フィールドの存在（数値フィールドはNaN不可）
/// 2. 患者名がトリム後1文字以上
/// 3. `age` ∈ [4, 25]
/// 4. `age_myopia_diagnosis` ∈ [2, 20]
/// 5. `age_myopia_diagnosis` < `age`
pub fn validate(draft: &PatientDraft) -> Result<PatientInput, PredictionError> {
    for field in FIELDS {
        match draft.get(field) {
            None => return Err(PredictionError::MissingField(field)),
            Some(FieldValue::Number(value)) if value.is_nan() => {
                return Err(PredictionError::NotNumeric(field));
            }
            Some(_) => {}
        }
    }

    let patient_name = match draft.get("patient_name") {
        Some(FieldValue::Text(name)) => name.trim().to_string(),
        _ => return Err(PredictionError::MissingField("patient_name")),
    };
    if patient_name.is_empty() {
        return Err(PredictionError::EmptyPatientName);
    }

    let age = number(draft, "age")?;
    if !(4.0..=25.0).contains(&age) {
        return Err(PredictionError::AgeOutOfRange(age));
    }

    let age_myopia_diagnosis = number(draft, "age_myopia_diagnosis")?;
    if !(2.0..=20.0).contains(&age_myopia_diagnosis) {
        return Err(PredictionError::DiagnosisAgeOutOfRange(age_myopia_diagnosis));
    }

    if age_myopia_diagnosis >= age {
        return Err(PredictionError::DiagnosisNotBeforeAge {
            diagnosis: age_myopia_diagnosis,
            age,
        });
    }

    Ok(PatientInput {
        patient_name,
        age,
        age_myopia_diagnosis,
        gender: number(draft, "gender")? as u8,
        family_history_myopia: number(draft, "family_history_myopia")? as u8,
        outdoor_time: number(draft, "outdoor_time")?,
        screen_time: number(draft, "screen_time")?,
        previous_myopia_control: number(draft, "previous_myopia_control")? as u8,
        initial_power_re: number(draft, "initial_power_re")?,
        initial_power_le: number(draft, "initial_power_le")?,
        initial_axial_length_re: number(draft, "initial_axial_length_re")?,
        initial_axial_length_le: number(draft, "initial_axial_length_le")?,
        stellest_wearing_time: number(draft, "stellest_wearing_time")?,
    })
}

fn number(draft: &PatientDraft, field: &'static str) -> Result<f64, PredictionError> {
    draft.number(field).ok_or(PredictionError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::collect;
    use proptest::prelude::*;

    fn raw_fields() -> Vec<(&'static str, String)> {
        vec![
            ("patient_name", "Emma Johnson".to_string()),
            ("age", "10".to_string()),
            ("age_myopia_diagnosis", "7".to_string()),
            ("gender", "2".to_string()),
            ("family_history_myopia", "0".to_string()),
            ("outdoor_time", "3.5".to_string()),
            ("screen_time", "2.0".to_string()),
            ("previous_myopia_control", "0".to_string()),
            ("initial_power_re", "-1.5".to_string()),
            ("initial_power_le", "-1.25".to_string()),
            ("initial_axial_length_re", "22.8".to_string()),
            ("initial_axial_length_le", "22.7".to_string()),
            ("stellest_wearing_time", "14.0".to_string()),
        ]
    }

    fn draft_without(field: &str) -> PatientDraft {
        let raw: Vec<_> = raw_fields().into_iter().filter(|(id, _)| *id != field).collect();
        collect(&raw)
    }

    fn draft_with(field: &str, value: &str) -> PatientDraft {
        let raw: Vec<_> = raw_fields()
            .into_iter()
            .map(|(id, v)| if id == field { (id, value.to_string()) } else { (id, v) })
            .collect();
        collect(&raw)
    }

    #[test]
    fn test_valid_submission_builds_exact_payload() {
        let patient = validate(&collect(&raw_fields())).unwrap();
        // 検証通過後のペイロードはこのJSONそのままで送信される
        let expected = serde_json::json!({
            "patient_name": "Emma Johnson",
            "age": 10.0,
            "age_myopia_diagnosis": 7.0,
            "gender": 2,
            "family_history_myopia": 0,
            "outdoor_time": 3.5,
            "screen_time": 2.0,
            "previous_myopia_control": 0,
            "initial_power_re": -1.5,
            "initial_power_le": -1.25,
            "initial_axial_length_re": 22.8,
            "initial_axial_length_le": 22.7,
            "stellest_wearing_time": 14.0,
        });
        assert_eq!(serde_json::to_value(&patient).unwrap(), expected);
    }

    #[test]
    fn test_each_missing_field_is_named() {
        for field in FIELDS {
            let err = validate(&draft_without(field)).unwrap_err();
            assert_eq!(err, PredictionError::MissingField(field));
            assert!(err.to_string().contains(field));
        }
    }

    #[test]
    fn test_non_numeric_field_is_reported_before_ranges() {
        let err = validate(&draft_with("screen_time", "lots")).unwrap_err();
        assert_eq!(err, PredictionError::NotNumeric("screen_time"));
    }

    #[test]
    fn test_diagnosis_after_current_age_is_rejected() {
        // 診断年齢が現在の年齢以上なら他のフィールドが正しくても失敗する
        let err = validate(&draft_with("age_myopia_diagnosis", "12")).unwrap_err();
        assert_eq!(
            err,
            PredictionError::DiagnosisNotBeforeAge {
                diagnosis: 12.0,
                age: 10.0
            }
        );
        assert!(err.to_string().contains("less than the current age"));
    }

    #[test]
    fn test_diagnosis_equal_to_age_is_rejected() {
        let err = validate(&draft_with("age_myopia_diagnosis", "10")).unwrap_err();
        assert!(matches!(err, PredictionError::DiagnosisNotBeforeAge { .. }));
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        // 下限値では診断年齢も併せて下げる（診断年齢 < 年齢 の制約があるため）
        let lower: Vec<_> = raw_fields()
            .into_iter()
            .map(|(id, v)| match id {
                "age" => (id, "4".to_string()),
                "age_myopia_diagnosis" => (id, "3".to_string()),
                _ => (id, v),
            })
            .collect();
        assert!(validate(&collect(&lower)).is_ok());
        // 診断年齢7 < 25 なので上限値でも通る
        assert!(validate(&draft_with("age", "25")).is_ok());
        assert!(matches!(
            validate(&draft_with("age", "3.9")).unwrap_err(),
            PredictionError::AgeOutOfRange(_)
        ));
        assert!(matches!(
            validate(&draft_with("age", "25.1")).unwrap_err(),
            PredictionError::AgeOutOfRange(_)
        ));
    }

    #[test]
    fn test_presence_check_precedes_range_check() {
        // ageが範囲外でも、先に欠落フィールドが報告される
        let raw: Vec<_> = raw_fields()
            .into_iter()
            .filter(|(id, _)| *id != "gender")
            .map(|(id, v)| if id == "age" { (id, "99".to_string()) } else { (id, v) })
            .collect();
        let err = validate(&collect(&raw)).unwrap_err();
        assert_eq!(err, PredictionError::MissingField("gender"));
    }

    proptest! {
        #[test]
        fn prop_age_outside_range_never_validates(age in prop_oneof![-100.0..3.99f64, 25.01..200.0f64]) {
            let err = validate(&draft_with("age", &age.to_string())).unwrap_err();
            prop_assert!(matches!(err, PredictionError::AgeOutOfRange(_)));
        }

        #[test]
        fn prop_diagnosis_outside_range_never_validates(diagnosis in prop_oneof![-50.0..1.99f64, 20.01..100.0f64]) {
            let err = validate(&draft_with("age_myopia_diagnosis", &diagnosis.to_string())).unwrap_err();
            let matched = matches!(
                err,
                PredictionError::DiagnosisAgeOutOfRange(_) | PredictionError::DiagnosisNotBeforeAge { .. }
            );
            prop_assert!(matched);
        }

        #[test]
        fn prop_diagnosis_not_before_age_never_validates(
            age in 4.0..25.0f64,
            offset in 0.0..10.0f64,
        ) {
            let diagnosis = age + offset;
            prop_assume!((2.0..=20.0).contains(&diagnosis));
            let raw: Vec<_> = raw_fields()
                .into_iter()
                .map(|(id, v)| match id {
                    "age" => (id, age.to_string()),
                    "age_myopia_diagnosis" => (id, diagnosis.to_string()),
                    _ => (id, v),
                })
                .collect();
            let err = validate(&collect(&raw)).unwrap_err();
            let matched = matches!(err, PredictionError::DiagnosisNotBeforeAge { .. });
            prop_assert!(matched);
        }
    }
}
