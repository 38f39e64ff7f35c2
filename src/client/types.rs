//! バックエンドとの送受信データ

use serde::{Deserialize, Serialize};
use skin_scan_common::{ConversationTurn, NormalizedResult, Prediction, RawPrediction, Role};
use std::path::PathBuf;

/// アップロード結果
///
/// `local_path` は手元でのプレビュー用。サーバへは送らない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReference {
    pub stored_name: String,
    pub local_path: PathBuf,
}

/// 失敗時のボディ `{"error": "..."}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

/// サーバのエラーメッセージを取り出す（JSONでなければNone）
pub(crate) fn server_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UploadResponse {
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub filename: &'a str,
    pub user_context: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AnalyzeResponse {
    pub success: bool,
    pub primary_condition: Option<String>,
    pub confidence: Option<f64>,
    pub predictions: Option<Vec<Prediction>>,
    pub ai_explanation: Option<String>,
    pub explanation_available: bool,
    pub mock: bool,
}

impl AnalyzeResponse {
    /// 成功フラグと主ラベルがそろっていれば RawPrediction に変換
    pub fn into_raw_prediction(self) -> Option<RawPrediction> {
        if !self.success {
            return None;
        }
        let primary_condition = self.primary_condition.filter(|c| !c.trim().is_empty())?;

        Some(RawPrediction {
            primary_condition,
            confidence: self.confidence.unwrap_or(0.0),
            predictions: self.predictions.unwrap_or_default(),
            explanation: self.ai_explanation.unwrap_or_default(),
            explanation_available: self.explanation_available,
            simulated: self.mock,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct HistoryEntry<'a> {
    pub role: Role,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalysisContext<'a> {
    pub condition: &'a str,
    pub severity: &'static str,
    pub confidence: f64,
    pub predictions: &'a [Prediction],
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
    pub conversation_history: Vec<HistoryEntry<'a>>,
    pub analysis_context: AnalysisContext<'a>,
}

impl<'a> ChatRequest<'a> {
    pub fn new(message: &'a str, history: &'a [ConversationTurn], result: &'a NormalizedResult) -> Self {
        Self {
            message,
            conversation_history: history
                .iter()
                .map(|t| HistoryEntry {
                    role: t.role,
                    content: &t.content,
                })
                .collect(),
            analysis_context: AnalysisContext {
                condition: &result.condition_name,
                severity: result.severity.as_str(),
                confidence: result.raw_context.confidence,
                predictions: &result.raw_context.predictions,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ChatResponse {
    pub success: bool,
    pub response: Option<String>,
    pub error: Option<String>,
}

/// /health の応答
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
