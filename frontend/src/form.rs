use std::collections::BTreeMap;
use stellest_common::patient::FIELDS;

/// フォームから収集した1フィールドの値
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 患者名（トリム済み）
    Text(String),
    /// 数値フィールド（数値変換に失敗した場合はNaNを保持する。
    /// 黙って0などに置き換えず、検証段階で入力エラーとして扱う）
    Number(f64),
}

/// 検証前の患者データ候補
///
/// 空・未入力のフィールドはキーごと存在しない。「キーがない」と
/// 「値が不正」は区別される別個の失敗モード。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientDraft {
    fields: BTreeMap<&'static str, FieldValue>,
}

impl PatientDraft {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// 数値フィールドの値を取り出す（NaNもそのまま返す）
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.fields.get(field) {
            Some(FieldValue::Number(value)) => Some(*value),
            _ => None,
        }
    }
}

/// フォームの生入力から患者データ候補を構築する
///
/// 認識対象の13フィールドだけを定義順に走査する。名前フィールドは
/// トリムした文字列のまま、その他は浮動小数点数に変換して保持する。
pub fn collect(raw: &[(&'static str, String)]) -> PatientDraft {
    let mut fields = BTreeMap::new();
    for field in FIELDS {
        let Some((_, value)) = raw.iter().find(|(id, _)| *id == field) else {
            continue;
        };
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        let entry = if field == "patient_name" {
            FieldValue::Text(trimmed.to_string())
        } else {
            FieldValue::Number(trimmed.parse::<f64>().unwrap_or(f64::NAN))
        };
        fields.insert(field, entry);
    }
    PatientDraft { fields }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_fields() -> Vec<(&'static str, String)> {
        vec![
            ("patient_name", "  Emma Johnson  ".to_string()),
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

    #[test]
    fn test_collect_retains_all_filled_fields() {
        let draft = collect(&raw_fields());
        assert_eq!(draft.fields.len(), 13);
        assert_eq!(
            draft.get("patient_name"),
            Some(&FieldValue::Text("Emma Johnson".to_string()))
        );
        assert_eq!(draft.number("outdoor_time"), Some(3.5));
        assert_eq!(draft.number("initial_power_le"), Some(-1.25));
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        // 空文字・空白のみのフィールドはキーごと存在しない
        let mut raw = raw_fields();
        raw[1].1 = String::new();
        raw[5].1 = "   ".to_string();
        let draft = collect(&raw);
        assert_eq!(draft.fields.len(), 11);
        assert!(draft.get("age").is_none());
        assert!(draft.get("outdoor_time").is_none());
    }

    #[test]
    fn test_non_numeric_input_is_kept_as_nan() {
        // 数値に変換できない入力は欠落ではなく不正値として残る
        let mut raw = raw_fields();
        raw[1].1 = "ten".to_string();
        let draft = collect(&raw);
        assert_eq!(draft.fields.len(), 13);
        let age = draft.number("age").unwrap();
        assert!(age.is_nan());
    }

    #[test]
    fn test_unrecognized_fields_are_ignored() {
        let mut raw = raw_fields();
        raw.push(("favorite_color", "blue".to_string()));
        let draft = collect(&raw);
        assert_eq!(draft.fields.len(), 13);
        assert!(draft.get("favorite_color").is_none());
    }

    #[test]
    fn test_collect_from_nothing_is_empty() {
        assert!(collect(&[]).fields.is_empty());
    }
}
