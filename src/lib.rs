//! skin-scan
//!
//! 皮膚画像のAIスクリーニング用バックエンドクライアント。
//! アップロード・解析・結果の正規化・フォローアップ質問への応答を提供する。

pub mod analyzer;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod responder;
pub mod scanner;
pub mod session;
