//! Skin Scan Common Library
//!
//! CLIと他のフロントエンドで共有される型と純粋ロジック
//! （正規化・説明文パース・ローカル応答・会話状態）

pub mod types;
pub mod error;
pub mod parser;
pub mod normalizer;
pub mod responder;
pub mod conversation;

pub use types::{
    humanize_label, ConversationTurn, NormalizedResult, Prediction, RawContext, RawPrediction,
    Role, SeverityTier,
};
pub use error::{Error, Result};
pub use parser::{extract_section, Section};
pub use normalizer::{normalize, needs_professional_help, severity_for, DISCLAIMER};
pub use responder::{classify_question, respond_locally, QuestionCategory, CHAT_APOLOGY};
pub use conversation::{ChatState, Conversation};
