//! Upload → plain text. The matching core only ever sees the output of this.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
}

/// Decides the document kind from the declared content type, falling back to
/// the file extension for generic types such as `application/octet-stream`.
pub fn detect_kind(content_type: Option<&str>, file_name: &str) -> Result<DocumentKind, AppError> {
    let mime = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .unwrap_or_default();

    match mime.as_str() {
        "text/plain" => return Ok(DocumentKind::PlainText),
        "application/pdf" => return Ok(DocumentKind::Pdf),
        _ => {}
    }

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => Ok(DocumentKind::PlainText),
        "pdf" => Ok(DocumentKind::Pdf),
        _ => Err(AppError::UnsupportedMediaType(format!(
            "'{file_name}' ({}) is not supported; upload a PDF or plain-text resume",
            if mime.is_empty() { "unknown type" } else { mime.as_str() }
        ))),
    }
}

/// Extracts the text of an uploaded resume.
///
/// Empty uploads yield an empty string; scoring handles that as zero coverage.
/// PDF parsing runs on the blocking pool.
pub async fn extract_text(
    data: &Bytes,
    content_type: Option<&str>,
    file_name: &str,
    max_bytes: usize,
) -> Result<String, AppError> {
    if data.len() > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "'{file_name}' is {} bytes; the limit is {max_bytes}",
            data.len()
        )));
    }

    let kind = detect_kind(content_type, file_name)?;
    debug!("Extracting {kind:?} text from '{file_name}' ({} bytes)", data.len());

    if data.is_empty() {
        return Ok(String::new());
    }

    match kind {
        DocumentKind::PlainText => String::from_utf8(data.to_vec()).map_err(|e| {
            AppError::UnprocessableEntity(format!("'{file_name}' is not valid UTF-8: {e}"))
        }),
        DocumentKind::Pdf => {
            let bytes = data.clone();
            let parsed = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}"))
                })?;
            parsed.map_err(|e| {
                warn!("PDF extraction failed for '{file_name}': {e}");
                AppError::UnprocessableEntity(format!("Could not read text from '{file_name}'"))
            })
        }
    }
}
