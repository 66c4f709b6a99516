pub mod analytics;
pub mod config;
pub mod patient;
pub mod prediction;

use serde::{Deserialize, Serialize};

type Result<T> = anyhow::Result<T>;

/// サーバー内部APIの成否を運ぶ共通エンベロープ
///
/// 予測コントラクト（`POST /predict`）の本体には使わない。形が固定された
/// コントラクト以外の補助エンドポイント用。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum ApiResponse<T, E>
where
    T: std::fmt::Debug + Clone,
    E: std::fmt::Debug + Clone,
    E: std::fmt::Display,
{
    Success(T),
    Error(E),
}
