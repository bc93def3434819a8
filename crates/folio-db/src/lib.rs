#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub use postgres::PostgresDatabase;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use folio_core::contact::{Contact, CreateContact};
use folio_core::project::{CreateProject, Project, UpdateProject};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Internal(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Record store for contact submissions and project listings.
///
/// Implementations assign the record id and creation timestamp. Both list
/// operations return newest records first.
#[async_trait]
pub trait Database: Send + Sync {
    // -- Contacts --
    async fn create_contact(&self, input: &CreateContact) -> Result<Contact, DbError>;
    async fn list_contacts(&self) -> Result<Vec<Contact>, DbError>;

    // -- Projects --
    async fn create_project(&self, input: &CreateProject) -> Result<Project, DbError>;
    async fn get_project(&self, id: &str) -> Result<Project, DbError>;
    async fn list_projects(&self) -> Result<Vec<Project>, DbError>;
    async fn update_project(&self, id: &str, update: &UpdateProject)
        -> Result<Project, DbError>;
    async fn delete_project(&self, id: &str) -> Result<(), DbError>;
}

/// Backend selection. A `database_url` wins over `sqlite_path`.
#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    /// `postgres://...` connection string.
    pub database_url: Option<String>,
    /// SQLite file. Defaults to `<data dir>/folio.db`.
    pub sqlite_path: Option<String>,
}

impl DbConfig {
    pub fn is_postgres(&self) -> bool {
        self.database_url
            .as_deref()
            .is_some_and(|u| u.starts_with("postgres://") || u.starts_with("postgresql://"))
    }

    pub fn backend_name(&self) -> &'static str {
        if self.is_postgres() {
            "postgres"
        } else {
            "sqlite"
        }
    }
}

/// Open the configured backend and run its migrations.
pub async fn open(config: &DbConfig) -> Result<Arc<dyn Database>, DbError> {
    if config.is_postgres() {
        #[cfg(feature = "postgres")]
        {
            let url = config.database_url.as_deref().unwrap_or_default();
            Ok(Arc::new(PostgresDatabase::connect(url).await?))
        }
        #[cfg(not(feature = "postgres"))]
        {
            Err(DbError::Internal(
                "postgres url configured but the 'postgres' feature is not enabled".into(),
            ))
        }
    } else {
        #[cfg(feature = "sqlite")]
        {
            Ok(Arc::new(SqliteDatabase::open(config)?))
        }
        #[cfg(not(feature = "sqlite"))]
        {
            Err(DbError::Internal(
                "no database url configured and the 'sqlite' feature is not enabled".into(),
            ))
        }
    }
}

/// `$XDG_DATA_HOME/folio`, else `$HOME/.local/share/folio`, else `./folio`.
pub fn data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("folio")
}
