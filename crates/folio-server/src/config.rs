use std::path::PathBuf;

use clap::Parser;
use folio_db::DbConfig;
use folio_store::{StoreConfig, DEFAULT_CONTENT_DIR};

/// Portfolio backend: contact submissions and project listings over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "folio-server", version)]
pub struct Config {
    /// Listen address
    #[arg(long, env = "FOLIO_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Listen port
    #[arg(long, env = "FOLIO_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Postgres connection string; selects the Postgres backend when set
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// SQLite database file (defaults to <data dir>/folio.db)
    #[arg(long, env = "FOLIO_SQLITE_PATH")]
    pub sqlite_path: Option<String>,

    /// Directory uploaded images are written to and served from
    #[arg(long, env = "FOLIO_UPLOAD_DIR", default_value = DEFAULT_CONTENT_DIR)]
    pub upload_dir: PathBuf,
}

impl Config {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            database_url: self.database_url.clone(),
            sqlite_path: self.sqlite_path.clone(),
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            content_dir: self.upload_dir.clone(),
        }
    }
}
