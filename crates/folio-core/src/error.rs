use thiserror::Error;

#[derive(Debug, Error)]
pub enum FolioError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    InvalidUpload(String),
}

/// Fail with `InvalidInput` when `value` has no non-whitespace content.
pub(crate) fn require(field: &str, value: &str) -> Result<(), FolioError> {
    if value.trim().is_empty() {
        return Err(FolioError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}
