//! Storage of client document uploads.
//!
//! Files land in the uploads directory as `{label}_{filename}` and are served
//! back by the static file service. A second upload with the same label and
//! filename replaces the first.

use std::path::Path;

use crate::errors::{AppError, ResultExt};

/// URL prefix the uploads directory is served under.
pub const PUBLIC_PREFIX: &str = "/static/uploads";

/// A file received in a multipart submission.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Copies `file` into `dir` and returns the public path of the copy.
///
/// Returns an empty string when no file was sent or its filename is blank.
pub async fn save_upload(
    dir: &Path,
    public_prefix: &str,
    label: &str,
    file: Option<&UploadedFile>,
) -> Result<String, AppError> {
    let Some(file) = file else {
        return Ok(String::new());
    };
    let Some(filename) = base_name(&file.filename) else {
        return Ok(String::new());
    };

    let stored_name = format!("{}_{}", label, filename);
    let destination = dir.join(&stored_name);

    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating uploads directory {}", dir.display()))?;
    tokio::fs::write(&destination, &file.bytes)
        .await
        .with_context(|| format!("writing upload {}", destination.display()))?;

    tracing::info!(
        "Stored upload {} ({} bytes)",
        destination.display(),
        file.bytes.len()
    );

    Ok(format!(
        "{}/{}",
        public_prefix.trim_end_matches('/'),
        stored_name
    ))
}

/// Final component of a client-supplied filename, with either separator.
fn base_name(filename: &str) -> Option<&str> {
    let name = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or("")
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name)
    }
}
