/// エラーメッセージの統一管理
use std::fmt::Display;

/// 入力検証と予測リクエストのエラー種別
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionError {
    // 入力検証
    MissingField(&'static str),
    NotNumeric(&'static str),
    EmptyPatientName,
    AgeOutOfRange(f64),
    DiagnosisAgeOutOfRange(f64),
    DiagnosisNotBeforeAge { diagnosis: f64, age: f64 },

    // 通信
    RequestFailed(String),
}

impl Display for PredictionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // 検証エラーは違反したフィールド・規則を名指しする
            PredictionError::MissingField(field) => {
                write!(f, "Missing required field: {}", field)
            }
            PredictionError::NotNumeric(field) => {
                write!(f, "Invalid numeric value for field: {}", field)
            }
            PredictionError::EmptyPatientName => {
                write!(f, "Patient name must not be empty")
            }
            PredictionError::AgeOutOfRange(_) => {
                write!(f, "Age must be between 4 and 25 years")
            }
            PredictionError::DiagnosisAgeOutOfRange(_) => {
                write!(f, "Age at myopia diagnosis must be between 2 and 20 years")
            }
            PredictionError::DiagnosisNotBeforeAge { .. } => {
                write!(f, "Age at myopia diagnosis must be less than the current age")
            }

            // 通信エラーの内訳はコンソールに記録し、ユーザーには定型文のみ見せる
            PredictionError::RequestFailed(_) => {
                write!(f, "Failed to get prediction. Please try again.")
            }
        }
    }
}

impl PredictionError {
    /// 診断ログ向けの詳細（ユーザー表示には使わない）
    pub fn detail(&self) -> String {
        match self {
            PredictionError::RequestFailed(detail) => format!("prediction request failed: {detail}"),
            other => other.to_string(),
        }
    }
}

impl From<PredictionError> for String {
    fn from(error: PredictionError) -> Self {
        error.to_string()
    }
}
