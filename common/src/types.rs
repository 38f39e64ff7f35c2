//! 解析結果の型定義
//!
//! CLIと他のフロントエンドで共有される型:
//! - RawPrediction: バックエンド /analyze の生の推論結果
//! - NormalizedResult: 画面表示用に正規化した結果
//! - ConversationTurn: フォローアップ会話の1ターン

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 候補の1件（ラベル + スコア）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prediction {
    #[serde(alias = "label")]
    pub condition: String,
    pub score: f64,
}

impl Prediction {
    pub fn new(condition: impl Into<String>, score: f64) -> Self {
        Self {
            condition: condition.into(),
            score,
        }
    }
}

/// /analyze の生の推論結果
///
/// `predictions` は確度の高い順。先頭に主ラベルが含まれていてもよい。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPrediction {
    /// アンダースコア区切りのラベル（例: "atopic_dermatitis"）
    pub primary_condition: String,
    /// 0〜100
    pub confidence: f64,
    pub predictions: Vec<Prediction>,
    pub explanation: String,
    pub explanation_available: bool,
    /// バックエンドがモデル推論ではなくモックを返した
    pub simulated: bool,
}

impl RawPrediction {
    /// 主ラベル以外の候補（順序維持）
    pub fn alternates(&self) -> impl Iterator<Item = &Prediction> {
        let primary = self.primary_condition.as_str();
        self.predictions
            .iter()
            .filter(move |p| p.condition != primary)
    }
}

/// 重症度（確信度から機械的に決まる3段階）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityTier {
    Mild,
    Moderate,
    Severe,
}

impl SeverityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Mild => "Mild",
            SeverityTier::Moderate => "Moderate",
            SeverityTier::Severe => "Severe",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 正規化時に保持しておく生データ（フォローアップ応答で再利用）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawContext {
    pub confidence: f64,
    pub predictions: Vec<Prediction>,
    pub explanation: String,
    pub explanation_available: bool,
    pub simulated: bool,
}

/// 画面表示用の正規化結果
///
/// 一度生成したら変更しない。新しい解析は新しいインスタンスを作る。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub condition_name: String,
    pub severity: SeverityTier,
    pub seek_professional_help: bool,
    pub key_observations: Vec<String>,
    pub recommendations: Vec<String>,
    pub disclaimer: String,
    #[serde(default)]
    pub raw_context: RawContext,
}

/// 会話の話者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// 会話の1ターン
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// ラベルを表示用に変換（アンダースコア → スペース）
pub fn humanize_label(label: &str) -> String {
    label.replace('_', " ")
}
