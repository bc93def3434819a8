use chrono::{DateTime, Utc};

use folio_core::contact::{Contact, CreateContact};

use crate::DbError;
use super::super::{pg_err, PostgresDatabase};

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: String,
    name: String,
    email: String,
    subject: String,
    message: String,
    image_path: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ContactRow> for Contact {
    fn from(r: ContactRow) -> Self {
        Contact {
            id: r.id,
            name: r.name,
            email: r.email,
            subject: r.subject,
            message: r.message,
            image_path: r.image_path,
            created_at: r.created_at,
        }
    }
}

impl PostgresDatabase {
    pub(crate) async fn pg_create_contact(
        &self,
        input: &CreateContact,
    ) -> Result<Contact, DbError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        let row = sqlx::query_as::<_, ContactRow>(
            "INSERT INTO contacts (id, name, email, subject, message, image_path, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.subject)
        .bind(&input.message)
        .bind(&input.image_path)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(row.into())
    }

    pub(crate) async fn pg_list_contacts(&self) -> Result<Vec<Contact>, DbError> {
        let rows = sqlx::query_as::<_, ContactRow>(
            "SELECT * FROM contacts ORDER BY created_at DESC, seq DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}
