use super::types::{server_error_message, AnalyzeRequest, AnalyzeResponse};
use super::BackendClient;
use crate::error::{ClientError, Result};
use skin_scan_common::RawPrediction;
use tracing::{error, info, warn};

const ANALYSIS_FAILED: &str = "Analysis failed";

impl BackendClient {
    /// 保存名と補足テキストを送り、推論結果を受け取る
    ///
    /// # Arguments
    /// * `stored_name` - upload で得た保存名（空ならエラー）
    /// * `user_context` - 利用者の補足説明（なければ空文字を送る）
    pub async fn analyze(&self, stored_name: &str, user_context: Option<&str>) -> Result<RawPrediction> {
        if stored_name.trim().is_empty() {
            return Err(ClientError::MissingReference);
        }

        let request = AnalyzeRequest {
            filename: stored_name,
            user_context: user_context.unwrap_or(""),
        };

        let response = self
            .http
            .post(self.endpoint("analyze"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = server_error_message(&body).unwrap_or_else(|| ANALYSIS_FAILED.to_string());
            error!(status = %status, error = %message, stored = %stored_name, "analysis rejected");
            return Err(ClientError::Analysis(message));
        }

        // 2xx でも本文が読めなければ「結果なし」と同じ扱い
        let parsed: AnalyzeResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(stored = %stored_name, error = %e, "analysis response is not valid JSON");
            ClientError::AnalysisUnavailable
        })?;
        let raw = parsed.into_raw_prediction().ok_or_else(|| {
            warn!(stored = %stored_name, "analysis response has no detection result");
            ClientError::AnalysisUnavailable
        })?;

        if raw.simulated {
            warn!(stored = %stored_name, "backend returned simulated (mock) predictions");
        }
        info!(
            stored = %stored_name,
            condition = %raw.primary_condition,
            confidence = raw.confidence,
            "analysis received"
        );

        Ok(raw)
    }
}
