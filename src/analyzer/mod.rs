//! 解析パイプライン
//!
//! 画像読み込み → アップロード → 解析 → 正規化
//!
//! セッション付きの実行では、各段階の応答を反映する前にチケットを確認し、
//! 途中で新しい解析が始まっていれば古い応答を捨てる。

use crate::client::BackendClient;
use crate::error::{ClientError, Result};
use crate::scanner::{self, ImageFile};
use crate::session::{AnalysisSession, SessionTicket};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use skin_scan_common::{normalize, NormalizedResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// 1枚の画像を解析（セッションなし）
pub async fn analyze_image(
    client: &BackendClient,
    path: &Path,
    user_context: Option<&str>,
) -> Result<NormalizedResult> {
    let image = ImageFile::load(path)?;
    let upload = client.upload(&image).await?;
    let raw = client.analyze(&upload.stored_name, user_context).await?;
    Ok(normalize(raw))
}

/// セッション内で新しい解析を実行
///
/// # Returns
/// * `Ok(Some(result))` - 反映された結果
/// * `Ok(None)` - 途中で新しい解析が始まったため破棄
pub async fn analyze_in_session(
    client: &BackendClient,
    session: &Mutex<AnalysisSession>,
    path: &Path,
    user_context: Option<&str>,
) -> Result<Option<Arc<NormalizedResult>>> {
    let ticket = session.lock().await.begin();

    let outcome = upload_and_analyze(client, session, ticket, path, user_context).await;
    finish(session, ticket, outcome).await
}

/// 直前のアップロードを使って再解析（アップロードがなければ MissingReference）
pub async fn analyze_latest(
    client: &BackendClient,
    session: &Mutex<AnalysisSession>,
    user_context: Option<&str>,
) -> Result<Option<Arc<NormalizedResult>>> {
    let (ticket, stored_name) = {
        let mut guard = session.lock().await;
        let stored_name = guard
            .last_upload()
            .map(|u| u.stored_name.clone())
            .ok_or(ClientError::MissingReference)?;
        (guard.begin_retry(), stored_name)
    };

    let outcome = client
        .analyze(&stored_name, user_context)
        .await
        .map(|raw| Some(normalize(raw)));
    finish(session, ticket, outcome).await
}

async fn upload_and_analyze(
    client: &BackendClient,
    session: &Mutex<AnalysisSession>,
    ticket: SessionTicket,
    path: &Path,
    user_context: Option<&str>,
) -> Result<Option<NormalizedResult>> {
    let image = ImageFile::load(path)?;
    let upload = client.upload(&image).await?;
    let stored_name = upload.stored_name.clone();

    if !session.lock().await.apply_upload(ticket, upload) {
        return Ok(None);
    }

    let raw = client.analyze(&stored_name, user_context).await?;
    Ok(Some(normalize(raw)))
}

async fn finish(
    session: &Mutex<AnalysisSession>,
    ticket: SessionTicket,
    outcome: Result<Option<NormalizedResult>>,
) -> Result<Option<Arc<NormalizedResult>>> {
    let mut guard = session.lock().await;
    match outcome {
        Ok(Some(result)) => {
            if guard.apply_result(ticket, result) {
                Ok(guard.result())
            } else {
                Ok(None)
            }
        }
        Ok(None) => Ok(None),
        Err(e) => {
            guard.apply_failure(ticket);
            Err(e)
        }
    }
}

/// フォルダ一括解析の1件分
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub file_name: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<NormalizedResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// フォルダ直下の画像を順番に解析
///
/// 1枚の失敗で全体は止めない（失敗は error に記録）。
pub async fn analyze_folder(
    client: &BackendClient,
    folder: &Path,
    user_context: Option<&str>,
    show_progress: bool,
) -> Result<Vec<BatchOutcome>> {
    let images = scanner::scan_folder(folder)?;
    info!(folder = %folder.display(), count = images.len(), "batch analysis started");

    let progress = if show_progress {
        let pb = ProgressBar::new(images.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}") {
            pb.set_style(style);
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut outcomes = Vec::with_capacity(images.len());

    for path in images {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        progress.set_message(file_name.clone());

        let outcome = match analyze_image(client, &path, user_context).await {
            Ok(result) => BatchOutcome {
                file_name,
                path,
                result: Some(result),
                error: None,
            },
            Err(e) => {
                error!(file = %file_name, error = %e, "image analysis failed");
                BatchOutcome {
                    file_name,
                    path,
                    result: None,
                    error: Some(e.user_message()),
                }
            }
        };
        outcomes.push(outcome);
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(outcomes)
}
