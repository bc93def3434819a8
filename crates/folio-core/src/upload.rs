//! Policy for image attachments on contact submissions.
//!
//! Everything here is pure: the server collects the multipart part into an
//! [`ImageUpload`], the service validates it, derives a stored name, writes
//! it to the content directory and records [`ImageUpload::public_path`].

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::FolioError;

/// Multipart field carrying the attachment.
pub const IMAGE_FIELD: &str = "image";

/// Largest accepted attachment, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// URL prefix under which the content directory is served.
pub const PUBLIC_PREFIX: &str = "/uploads";

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];

const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

const REJECTED_TYPE: &str = "Only image files are allowed!";

#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Filename as sent by the client.
    pub filename: String,
    /// Declared `Content-Type` of the part, if any.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// Browsers submit an empty file part when no file was chosen.
    pub fn is_empty(&self) -> bool {
        self.filename.is_empty() && self.data.is_empty()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Both the declared MIME type and the extension must name an image type.
    pub fn validate(&self) -> Result<(), FolioError> {
        if self.size() > MAX_IMAGE_BYTES {
            return Err(FolioError::InvalidUpload(format!(
                "File too large: {} bytes exceeds the {} byte limit",
                self.size(),
                MAX_IMAGE_BYTES
            )));
        }
        let mime_ok = self
            .content_type
            .as_deref()
            .map(essence)
            .is_some_and(|m| ALLOWED_MIME_TYPES.contains(&m.as_str()));
        let ext_ok = extension(&self.filename)
            .is_some_and(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()));
        if mime_ok && ext_ok {
            Ok(())
        } else {
            Err(FolioError::InvalidUpload(REJECTED_TYPE.into()))
        }
    }

    /// Name under which the file is written: `<unix-millis>-<sanitized name>`.
    pub fn stored_name(&self, now: DateTime<Utc>) -> String {
        format!("{}-{}", now.timestamp_millis(), sanitize_filename(&self.filename))
    }

    pub fn public_path(stored_name: &str) -> String {
        format!("{PUBLIC_PREFIX}/{stored_name}")
    }
}

/// `image/PNG; charset=binary` -> `image/png`
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Keep only the last path component and replace anything outside
/// `[A-Za-z0-9._-]`, so the stored name can never escape the content dir.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}
