//! バックエンドHTTPクライアント
//!
//! - POST /upload  : 画像を multipart で送信し、保存名を受け取る
//! - POST /analyze : 保存名と補足テキストを送信し、推論結果を受け取る
//! - POST /chat    : 解析結果を文脈にしたフォローアップ質問
//! - GET  /health  : 疎通確認
//!
//! どの呼び出しも再試行しない。失敗したら呼び出し元が利用者に再操作を促す。

mod analyze;
mod chat;
mod types;
mod upload;

pub use types::{HealthStatus, UploadReference};

use crate::config::Config;
use crate::error::Result;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder().build()?;
        debug!(base_url = %base_url, "backend client created");
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// 疎通確認
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .http
            .get(self.endpoint("health"))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<HealthStatus>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = BackendClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.endpoint("analyze"), "http://localhost:5000/analyze");
    }
}
