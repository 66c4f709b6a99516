use stellest_common::prediction::ModelInfo;

/// アンサンブルメンバーの表示メタデータ
#[derive(Debug, Clone)]
pub struct MemberModel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// アンサンブルを構成する4モデル
pub const MEMBER_MODELS: &[MemberModel] = &[
    MemberModel {
        id: "random_forest",
        name: "Random Forest",
        description: "Bagged decision trees, robust to noisy clinical features",
    },
    MemberModel {
        id: "gradient_boosting",
        name: "Gradient Boosting",
        description: "Boosted trees, strongest single member of the ensemble",
    },
    MemberModel {
        id: "logistic_regression",
        name: "Logistic Regression",
        description: "Linear baseline, keeps the ensemble calibrated",
    },
    MemberModel {
        id: "svm",
        name: "SVM",
        description: "Support vector machine with probability estimates",
    },
];

/// モデルIDからメタデータを引く
pub fn get_member_model(id: &str) -> Option<&'static MemberModel> {
    MEMBER_MODELS.iter().find(|model| model.id == id)
}

/// `GET /model_info` が失敗したときに使う固定のフォールバック
pub fn fallback_model_info() -> ModelInfo {
    ModelInfo {
        model_name: "Stellest AI Ensemble".to_string(),
        accuracy: 0.85,
        features_count: 12,
        training_samples: 250,
        last_updated: "2024-01-01".to_string(),
        description: "Ensemble of four classifiers predicting Stellest lens treatment benefit."
            .to_string(),
    }
}
