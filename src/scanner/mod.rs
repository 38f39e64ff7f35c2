use crate::error::{ClientError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 画面上で案内しているサイズ上限（ローカルでは拒否しない。判定はサーバ側）
pub const ADVERTISED_MAX_BYTES: u64 = 10 * 1024 * 1024;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// アップロード対象の画像
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// 画像ファイルを読み込み、画像のMIMEタイプであることを確認する
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ClientError::FileNotFound(path.display().to_string()));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let bytes = std::fs::read(path)?;
        let mime_type = detect_mime_type(&bytes, path)
            .ok_or_else(|| ClientError::InvalidImage(file_name.clone()))?;

        if bytes.len() as u64 > ADVERTISED_MAX_BYTES {
            warn!(
                file = %file_name,
                size = bytes.len(),
                "image exceeds the advertised 10MB limit; the server may reject it"
            );
        }
        debug!(file = %file_name, mime = %mime_type, size = bytes.len(), "image loaded");

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime_type,
            bytes,
        })
    }
}

/// 内容から画像形式を判定し、判定できなければ拡張子で判定
pub fn detect_mime_type(bytes: &[u8], path: &Path) -> Option<String> {
    if let Ok(format) = image::guess_format(bytes) {
        let mime = format.to_mime_type();
        if mime.starts_with("image/") {
            return Some(mime.to_string());
        }
    }

    let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg".to_string()),
        "png" => Some("image/png".to_string()),
        "gif" => Some("image/gif".to_string()),
        _ => None,
    }
}

/// フォルダ直下の画像を列挙（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(ClientError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .map(|ext| is_image_extension(&ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(images)
}

fn is_image_extension(ext: &str) -> bool {
    let lower = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&lower.as_str())
}
