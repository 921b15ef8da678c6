use crate::AcquireError;

/// Extract the text of an in-memory PDF.
///
/// Extraction runs on the blocking pool since `pdf-extract` is CPU-bound.
/// Failures come back as a `[Error reading PDF ...]` sentinel string, never
/// as an `Err`.
pub async fn extract_pdf_text(name: &str, bytes: Vec<u8>) -> String {
    match extract_inner(bytes).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(file = name, error = %e, "PDF extraction failed");
            format!("[Error reading PDF {name}]: {e}")
        }
    }
}

async fn extract_inner(bytes: Vec<u8>) -> Result<String, AcquireError> {
    tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| AcquireError::Pdf(e.to_string()))
    })
    .await
    .map_err(|e| AcquireError::Task(e.to_string()))?
}
