use std::path::Path;

use axum::http::HeaderMap;
use bytes::Bytes;

use crate::error::AppError;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

pub struct UploadedImage {
    pub original_name: String,
    pub bytes: Bytes,
}

/// Extension allow-list check, case-insensitive.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Strip anything that could traverse out of the target directory.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Pull one image file field out of a multipart body.
pub async fn parse_image_field(
    headers: &HeaderMap,
    body: Bytes,
    field_name: &str,
) -> Result<UploadedImage, AppError> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| AppError::BadRequest("Missing multipart boundary".to_string()))?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let original_name = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::BadRequest("Upload has no filename".to_string()))?;

        if !allowed_file(&original_name) {
            return Err(AppError::BadRequest(
                "Only png, jpg, jpeg, and gif files are accepted".to_string(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Upload read error: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        return Ok(UploadedImage {
            original_name,
            bytes,
        });
    }

    Err(AppError::BadRequest(format!(
        "Missing file field '{field_name}'"
    )))
}

pub async fn save_to(dir: &Path, filename: &str, bytes: &[u8]) -> Result<(), AppError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(format!("Cannot create dir {}: {e}", dir.display())))?;
    tokio::fs::write(dir.join(filename), bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Cannot write {filename}: {e}")))?;
    Ok(())
}
