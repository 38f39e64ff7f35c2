//! テスト用の疑似バックエンド

#![allow(dead_code)]

use axum::Router;
use std::path::{Path, PathBuf};

/// PNGのマジックバイト（内容判定用）
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

/// 127.0.0.1 の空きポートでルーターを起動し、ベースURLを返す
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });
    format!("http://{}", addr)
}

/// PNG画像を書き出す
pub fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, PNG_BYTES).expect("write failed");
    path
}
