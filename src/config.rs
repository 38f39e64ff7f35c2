use crate::error::{ClientError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const BASE_URL_ENV: &str = "SKIN_SCAN_API_URL";
pub const CHAT_STRATEGY_ENV: &str = "SKIN_SCAN_CHAT";

/// フォローアップ質問の応答方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChatStrategy {
    /// バックエンドの /chat に転送
    #[default]
    Remote,
    /// 解析結果からキーワード判定で回答
    Local,
}

impl ChatStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "remote" => Some(ChatStrategy::Remote),
            "local" => Some(ChatStrategy::Local),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub base_url: Option<String>,
    pub chat_strategy: ChatStrategy,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ClientError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("skin-scan").join("config.json"))
    }

    /// バックエンドのベースURL（環境変数 > 設定ファイル > 既定値）
    pub fn base_url(&self) -> String {
        let env_value = std::env::var(BASE_URL_ENV).ok();
        resolve_base_url(env_value.as_deref(), self.base_url.as_deref())
    }

    /// 応答方式（環境変数 > 設定ファイル）
    pub fn chat_strategy(&self) -> ChatStrategy {
        std::env::var(CHAT_STRATEGY_ENV)
            .ok()
            .and_then(|v| ChatStrategy::parse(&v))
            .unwrap_or(self.chat_strategy)
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::Config(format!("URLはhttp(s)で指定してください: {}", url)));
        }
        self.base_url = Some(url);
        self.save()
    }

    pub fn set_chat_strategy(&mut self, strategy: ChatStrategy) -> Result<()> {
        self.chat_strategy = strategy;
        self.save()
    }
}

fn resolve_base_url(env_value: Option<&str>, configured: Option<&str>) -> String {
    let url = [env_value, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(DEFAULT_BASE_URL);
    url.trim_end_matches('/').to_string()
}
