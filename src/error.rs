use thiserror::Error;

/// 利用者に見せる解析失敗メッセージ
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Unable to analyze the image. Please try again with a clear photo of the affected area.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("No filename available. Please upload an image first.")]
    MissingReference,

    #[error("Analysis failed: {0}")]
    Analysis(String),

    #[error("No detection results available")]
    AnalysisUnavailable,

    #[error("Chat failed: {0}")]
    Chat(String),

    #[error("ファイルが画像ではありません: {0}")]
    InvalidImage(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] skin_scan_common::Error),
}

impl ClientError {
    /// 利用者向けの短いメッセージ（詳細はログにのみ出す）
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Chat(_) | ClientError::Common(skin_scan_common::Error::NotSending) => {
                skin_scan_common::CHAT_APOLOGY.to_string()
            }
            ClientError::MissingReference => "Please upload an image first.".to_string(),
            ClientError::InvalidImage(_) => "Please choose an image file (JPG, PNG or GIF).".to_string(),
            ClientError::FileNotFound(_) | ClientError::FolderNotFound(_) | ClientError::Config(_) => {
                self.to_string()
            }
            ClientError::Common(skin_scan_common::Error::ChatBusy) => {
                "Please wait for the current answer before asking again.".to_string()
            }
            ClientError::Common(skin_scan_common::Error::EmptyMessage) => {
                "Please type a question.".to_string()
            }
            _ => ANALYSIS_FAILED_MESSAGE.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
