use chrono::Utc;
use rusqlite::{params, Row};

use folio_core::contact::{Contact, CreateContact};

use super::super::{SqliteDatabase, SqliteResultExt};
use crate::DbError;

fn row_to_contact(row: &Row) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        subject: row.get("subject")?,
        message: row.get("message")?,
        image_path: row.get("image_path")?,
        created_at: row.get("created_at")?,
    })
}

impl SqliteDatabase {
    pub fn create_contact_sync(&self, input: &CreateContact) -> Result<Contact, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO contacts (id, name, email, subject, message, image_path, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    input.name,
                    input.email,
                    input.subject,
                    input.message,
                    input.image_path,
                    now
                ],
            )
            .to_db()?;
            conn.query_row(
                "SELECT * FROM contacts WHERE id = ?1",
                params![id],
                row_to_contact,
            )
            .to_db()
        })
    }

    pub fn list_contacts_sync(&self) -> Result<Vec<Contact>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM contacts ORDER BY created_at DESC, rowid DESC")
                .to_db()?;
            let contacts = stmt
                .query_map([], row_to_contact)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(contacts)
        })
    }
}
