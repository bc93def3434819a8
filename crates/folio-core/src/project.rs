use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{require, FolioError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Frontend,
    Backend,
    Fullstack,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Frontend => "frontend",
            Category::Backend => "backend",
            Category::Fullstack => "fullstack",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "frontend" => Some(Category::Frontend),
            "backend" => Some(Category::Backend),
            "fullstack" => Some(Category::Fullstack),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub technologies: Vec<String>,
    pub category: Category,
    pub live_url: String,
    pub github_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub technologies: Vec<String>,
    pub category: Category,
    pub live_url: String,
    pub github_url: String,
}

impl CreateProject {
    pub fn normalize(self) -> Result<Self, FolioError> {
        let normalized = Self {
            title: self.title.trim().to_string(),
            ..self
        };
        require("title", &normalized.title)?;
        require("description", &normalized.description)?;
        require("imageUrl", &normalized.image_url)?;
        require("liveUrl", &normalized.live_url)?;
        require("githubUrl", &normalized.github_url)?;
        Ok(normalized)
    }
}

/// Sparse patch: `None` leaves the column alone. A provided value must still
/// pass the same checks as on create, so a patch can never blank a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub category: Option<Category>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
}

impl UpdateProject {
    pub fn normalize(self) -> Result<Self, FolioError> {
        let normalized = Self {
            title: self.title.map(|t| t.trim().to_string()),
            ..self
        };
        let text_fields = [
            ("title", &normalized.title),
            ("description", &normalized.description),
            ("imageUrl", &normalized.image_url),
            ("liveUrl", &normalized.live_url),
            ("githubUrl", &normalized.github_url),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                require(field, value)?;
            }
        }
        Ok(normalized)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
