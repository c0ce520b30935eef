//! Disk-backed file uploads.
//!
//! Uploads land in `<upload_dir>/temp/` first and are renamed into the
//! type-specific directory once fully written; a failed move removes the
//! temp file so nothing half-written is ever served.

use axum::extract::Multipart;

use crate::{error::ApiError, slugify, state::AppState};

pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub struct StoredUpload {
    pub file_url: String,
    pub file_type: String,
}

pub async fn store_multipart(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<StoredUpload, ApiError> {
    let mut file_type: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        match field.name() {
            Some("file_type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid file_type field: {}", e)))?;
                file_type = Some(value);
            }
            Some("file") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid file field: {}", e)))?;
                file = Some((original_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let Some((original_name, bytes)) = file else {
        return Err(ApiError::bad_request("No file uploaded"));
    };
    let file_type = sanitize_file_type(file_type.as_deref())?;
    let file_name = unique_filename(&original_name);

    let temp_dir = state.upload_dir.join("temp");
    tokio::fs::create_dir_all(&temp_dir).await?;
    let temp_path = temp_dir.join(&file_name);
    tokio::fs::write(&temp_path, &bytes).await?;

    let dest_dir = state.upload_dir.join(&file_type);
    let final_path = dest_dir.join(&file_name);
    let moved = async {
        tokio::fs::create_dir_all(&dest_dir).await?;
        tokio::fs::rename(&temp_path, &final_path).await
    }
    .await;

    if let Err(err) = moved {
        if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
            tracing::warn!("Failed to remove temp upload {:?}: {}", temp_path, cleanup);
        }
        return Err(err.into());
    }

    Ok(StoredUpload {
        file_url: state.public_file_url(&file_type, &file_name),
        file_type,
    })
}

/// `<millis>-<random><ext>` keeps uploads collision-free while preserving
/// the original extension for content-type sniffing by the file server.
pub(crate) fn unique_filename(original: &str) -> String {
    let ext = std::path::Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    format!(
        "{}-{}{}",
        chrono::Utc::now().timestamp_millis(),
        slugify::random_token(10),
        ext
    )
}

/// The type names a directory under the upload root; anything that could
/// escape it is rejected.
fn sanitize_file_type(raw: Option<&str>) -> Result<String, ApiError> {
    let value = raw.unwrap_or("general").trim();
    let value = if value.is_empty() { "general" } else { value };
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(value.to_string())
    } else {
        Err(ApiError::bad_request("Invalid file_type"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_keep_extension_and_differ() {
        let a = unique_filename("cover.png");
        let b = unique_filename("cover.png");
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[test]
    fn filenames_without_extension() {
        assert!(!unique_filename("README").contains('.'));
    }

    #[test]
    fn file_type_defaults_and_rejects_traversal() {
        assert_eq!(sanitize_file_type(None).unwrap(), "general");
        assert_eq!(sanitize_file_type(Some("  ")).unwrap(), "general");
        assert_eq!(sanitize_file_type(Some("video")).unwrap(), "video");
        assert!(sanitize_file_type(Some("../etc")).is_err());
        assert!(sanitize_file_type(Some("a/b")).is_err());
    }
}
