//! Client-side upload validation. Rejections here never reach the network.

use std::path::Path;

use crate::errors::AppError;

/// Extensions the backend can extract text from.
const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx"];

/// Validates an upload path locally and returns the bare filename to send.
///
/// Rejects a missing selection and anything that is not `.pdf` or `.docx`
/// (case-insensitive), before any file or network I/O happens.
pub fn validate_upload(path: &str) -> Result<String, AppError> {
    let path = path.trim();
    if path.is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }

    let filename = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AppError::Validation(format!("Invalid file path '{path}'")))?;

    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported file format '{filename}' (accepted: .pdf, .docx)"
        )));
    }

    Ok(filename.to_string())
}
