//! multipart CSV 上传

use axum::extract::{FromRequest, Multipart, Request};
use pagepulse_errors::AppError;

/// 表单中 `file` 字段携带的 CSV 文件
#[derive(Debug)]
pub struct CsvUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl<S> FromRequest<S> for CsvUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart body: {}", e)))?
        {
            if field.name() != Some("file") {
                continue;
            }
            let filename = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| AppError::validation("Uploaded file has no name"))?;
            if !filename.to_lowercase().ends_with(".csv") {
                return Err(AppError::validation("File must be a CSV"));
            }
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Failed to read upload: {}", e)))?;
            return Ok(Self {
                filename,
                bytes: bytes.to_vec(),
            });
        }

        Err(AppError::validation("Missing 'file' field"))
    }
}
