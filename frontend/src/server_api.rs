mod analytics;
mod model;
mod predict;

use crate::api_underlying::Underlying;
use std::sync::Arc;
use stellest_common::config;

/// 予測サービスのベースURLを取得する
pub fn server_base_url() -> String {
    config::get("SERVER_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// 予測サービスへのAPIクライアント
///
/// 起動時に一度だけ構築し、各ビューへ明示的に渡して使う。
pub struct ApiClient {
    pub predict: predict::PredictApi,
    pub model: model::ModelApi,
    pub analytics: analytics::AnalyticsApi,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        let underlying = Underlying::new_shared(base_url);
        ApiClient {
            predict: predict::PredictApi {
                underlying: Arc::clone(&underlying),
            },
            model: model::ModelApi {
                underlying: Arc::clone(&underlying),
            },
            analytics: analytics::AnalyticsApi {
                underlying: Arc::clone(&underlying),
            },
        }
    }

    pub fn new_shared(base_url: String) -> Arc<Self> {
        Arc::new(Self::new(base_url))
    }
}
