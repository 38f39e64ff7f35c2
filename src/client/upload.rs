use super::types::{server_error_message, UploadResponse, UploadReference};
use super::BackendClient;
use crate::error::{ClientError, Result};
use crate::scanner::ImageFile;
use reqwest::multipart::{Form, Part};
use tracing::{error, info};

const UPLOAD_FAILED: &str = "Upload failed";

impl BackendClient {
    /// 画像をアップロードし、サーバ側の保存名を返す
    pub async fn upload(&self, image: &ImageFile) -> Result<UploadReference> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| ClientError::Upload(format!("invalid mime type: {}", e)))?;
        let form = Form::new().part("image", part);

        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = server_error_message(&body).unwrap_or_else(|| UPLOAD_FAILED.to_string());
            error!(status = %status, error = %message, file = %image.file_name, "upload rejected");
            return Err(ClientError::Upload(message));
        }

        let stored_name = serde_json::from_str::<UploadResponse>(&body)
            .ok()
            .and_then(|r| r.filename)
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                error!(file = %image.file_name, "upload response has no filename");
                ClientError::Upload(UPLOAD_FAILED.to_string())
            })?;

        info!(file = %image.file_name, stored = %stored_name, "image uploaded");

        Ok(UploadReference {
            stored_name,
            local_path: image.path.clone(),
        })
    }
}
