use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{require, FolioError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Submission as collected from the form. `image_path` is only ever set by
/// the service after the attachment has been stored.
#[derive(Debug, Clone, Default)]
pub struct CreateContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub image_path: Option<String>,
}

impl CreateContact {
    /// Trim `name`, `subject` and `email`, lowercase `email`, then check that
    /// every required field is present. `message` is kept verbatim.
    pub fn normalize(self) -> Result<Self, FolioError> {
        let normalized = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            subject: self.subject.trim().to_string(),
            message: self.message,
            image_path: self.image_path,
        };
        require("name", &normalized.name)?;
        require("email", &normalized.email)?;
        require("subject", &normalized.subject)?;
        require("message", &normalized.message)?;
        Ok(normalized)
    }
}
