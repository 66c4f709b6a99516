use anyhow::Result;
use std::sync::Arc;
use stellest_common::ApiResponse;
use stellest_common::analytics::DashboardData;

use crate::api_underlying::Underlying;

pub struct AnalyticsApi {
    pub underlying: Arc<Underlying>,
}

impl AnalyticsApi {
    /// 分析タブ用のダッシュボード集計を取得する
    pub async fn dashboard(&self) -> Result<ApiResponse<DashboardData, String>> {
        self.underlying.get("analytics/dashboard").await
    }
}
