use anyhow::Result;
use reqwest;
use std::sync::Arc;

/// HTTP APIリクエストの基盤となる構造体
///
/// 2xx以外のステータスはすべてエラーとして呼び出し側へ返す。
pub struct Underlying {
    base_url: String,
    client: reqwest::Client,
}

impl Underlying {
    /// 新しいUnderlyingインスタンスを作成
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// 新しいUnderlying共有インスタンスを作成
    pub fn new_shared(base_url: String) -> Arc<Self> {
        Arc::new(Self::new(base_url))
    }

    /// GETリクエストを送信してJSONレスポンスをデシリアライズ
    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        Ok(self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    /// POSTリクエストを送信してJSONレスポンスをデシリアライズ
    pub async fn post<A, B>(&self, path: &str, body: &A) -> Result<B>
    where
        A: serde::Serialize,
        B: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        Ok(self
            .client
            .post(&url)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}
