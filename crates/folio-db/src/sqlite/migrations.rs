use rusqlite::Connection;

use super::SqliteResultExt;
use crate::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )
    .to_db()?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .to_db()?;

    if current_version < 1 {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS contacts (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                email       TEXT NOT NULL,
                subject     TEXT NOT NULL,
                message     TEXT NOT NULL,
                image_path  TEXT,
                created_at  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_contacts_created ON contacts(created_at);

            CREATE TABLE IF NOT EXISTS projects (
                id           TEXT PRIMARY KEY,
                title        TEXT NOT NULL,
                description  TEXT NOT NULL,
                image_url    TEXT NOT NULL,
                technologies TEXT NOT NULL DEFAULT '[]',
                category     TEXT NOT NULL
                                 CHECK(category IN ('frontend', 'backend', 'fullstack')),
                live_url     TEXT NOT NULL,
                github_url   TEXT NOT NULL,
                created_at   TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_projects_created ON projects(created_at);

            INSERT INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
            ",
        )
        .to_db()?;
    }

    Ok(())
}
