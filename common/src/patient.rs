use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 予測リクエストの患者データ
///
/// フィールドの定義順は入力フォームの収集順（`FIELDS`）と一致する。
/// コード値フィールド（性別・家族歴・既往治療）は整数コードで送信する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    /// 患者名（1〜100文字）
    pub patient_name: String,
    /// 現在の年齢（歳）
    pub age: f64,
    /// 近視と診断された年齢（歳）。現在の年齢より小さいこと
    pub age_myopia_diagnosis: f64,
    /// 性別（1=男性, 2=女性）
    pub gender: u8,
    /// 近視の家族歴（0=なし, 1=あり）
    pub family_history_myopia: u8,
    /// 屋外活動時間（時間/日）
    pub outdoor_time: f64,
    /// スクリーンタイム（時間/日）
    pub screen_time: f64,
    /// 過去の近視抑制治療（0=なし, 1=あり）
    pub previous_myopia_control: u8,
    /// 初期屈折力 右眼（ディオプター、通常は負値）
    pub initial_power_re: f64,
    /// 初期屈折力 左眼（ディオプター、通常は負値）
    pub initial_power_le: f64,
    /// 初期眼軸長 右眼（mm）
    pub initial_axial_length_re: f64,
    /// 初期眼軸長 左眼（mm）
    pub initial_axial_length_le: f64,
    /// Stellestレンズの1日あたり装用時間（時間/日）
    pub stellest_wearing_time: f64,
}

/// フォームが認識する13フィールド（収集・検証の評価順）
pub const FIELDS: [&str; 13] = [
    "patient_name",
    "age",
    "age_myopia_diagnosis",
    "gender",
    "family_history_myopia",
    "outdoor_time",
    "screen_time",
    "previous_myopia_control",
    "initial_power_re",
    "initial_power_le",
    "initial_axial_length_re",
    "initial_axial_length_le",
    "stellest_wearing_time",
];

impl PatientInput {
    /// 近視の罹病期間（年）
    pub fn myopia_duration(&self) -> f64 {
        self.age - self.age_myopia_diagnosis
    }

    /// 左右眼の平均屈折力（絶対値ディオプター）
    pub fn average_power(&self) -> f64 {
        (self.initial_power_re.abs() + self.initial_power_le.abs()) / 2.0
    }
}

/// サーバー側で検出したフィールド制約違反
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct BoundsError {
    pub field: &'static str,
    pub message: String,
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), BoundsError> {
    if value.is_nan() || value < min || value > max {
        return Err(BoundsError {
            field,
            message: format!("must be between {min} and {max}"),
        });
    }
    Ok(())
}

fn check_code(field: &'static str, value: u8, min: u8, max: u8) -> Result<(), BoundsError> {
    if value < min || value > max {
        return Err(BoundsError {
            field,
            message: format!("must be between {min} and {max}"),
        });
    }
    Ok(())
}

/// 受信した患者データをAPIのフィールド制約に照らして検証する
///
/// クライアント側の検証とは独立で、サーバーは違反を 422 として拒否する。
pub fn validate_bounds(input: &PatientInput) -> Result<(), BoundsError> {
    let name = input.patient_name.trim();
    if name.is_empty() || name.len() > 100 {
        return Err(BoundsError {
            field: "patient_name",
            message: "must be between 1 and 100 characters".to_string(),
        });
    }
    check_range("age", input.age, 4.0, 25.0)?;
    check_range("age_myopia_diagnosis", input.age_myopia_diagnosis, 2.0, 20.0)?;
    check_code("gender", input.gender, 1, 2)?;
    check_code("family_history_myopia", input.family_history_myopia, 0, 1)?;
    check_range("outdoor_time", input.outdoor_time, 0.0, 12.0)?;
    check_range("screen_time", input.screen_time, 0.0, 16.0)?;
    check_code("previous_myopia_control", input.previous_myopia_control, 0, 1)?;
    for (field, power) in [
        ("initial_power_re", input.initial_power_re),
        ("initial_power_le", input.initial_power_le),
    ] {
        if power.is_nan() || power > 0.0 {
            return Err(BoundsError {
                field,
                message: "must be less than or equal to 0".to_string(),
            });
        }
    }
    check_range(
        "initial_axial_length_re",
        input.initial_axial_length_re,
        20.0,
        30.0,
    )?;
    check_range(
        "initial_axial_length_le",
        input.initial_axial_length_le,
        20.0,
        30.0,
    )?;
    check_range("stellest_wearing_time", input.stellest_wearing_time, 8.0, 18.0)?;
    Ok(())
}
