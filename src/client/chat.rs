use super::types::{server_error_message, ChatRequest, ChatResponse};
use super::BackendClient;
use crate::error::{ClientError, Result};
use skin_scan_common::{ConversationTurn, NormalizedResult};
use tracing::{debug, error};

impl BackendClient {
    /// 解析結果を文脈としてフォローアップ質問を送る
    ///
    /// `response` をそのまま返す。失敗は全て ClientError::Chat。
    pub async fn chat(
        &self,
        message: &str,
        history: &[ConversationTurn],
        result: &NormalizedResult,
    ) -> Result<String> {
        let request = ChatRequest::new(message, history, result);
        debug!(history = history.len(), "sending chat message");

        let response = self
            .http
            .post(self.endpoint("chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Chat(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Chat(e.to_string()))?;

        if !status.is_success() {
            let message = server_error_message(&body).unwrap_or_else(|| format!("status {}", status));
            error!(status = %status, error = %message, "chat rejected");
            return Err(ClientError::Chat(message));
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "chat response is not valid JSON");
            ClientError::Chat(e.to_string())
        })?;

        if !parsed.success {
            let message = parsed.error.unwrap_or_else(|| "Chat failed".to_string());
            error!(error = %message, "chat returned success=false");
            return Err(ClientError::Chat(message));
        }

        parsed
            .response
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| ClientError::Chat("empty response".to_string()))
    }
}
