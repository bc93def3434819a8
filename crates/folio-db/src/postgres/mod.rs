pub(crate) mod migrations;
pub mod queries;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use folio_core::contact::{Contact, CreateContact};
use folio_core::project::{CreateProject, Project, UpdateProject};

use crate::{Database, DbError};

/// Map a sqlx::Error into a DbError::Internal.
pub(crate) fn pg_err(e: sqlx::Error) -> DbError {
    DbError::Internal(e.to_string())
}

/// Create a DbError::NotFound with the given entity description.
pub(crate) fn pg_not_found(entity: &str) -> DbError {
    DbError::NotFound(entity.to_string())
}

#[derive(Clone)]
pub struct PostgresDatabase {
    pub(crate) pool: PgPool,
}

impl PostgresDatabase {
    /// Connect to a Postgres database and run migrations.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(pg_err)?;

        let db = Self { pool };
        migrations::run(&db.pool).await?;
        tracing::debug!("connected to postgres");
        Ok(db)
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    // -- Contacts --
    async fn create_contact(&self, input: &CreateContact) -> Result<Contact, DbError> {
        self.pg_create_contact(input).await
    }
    async fn list_contacts(&self) -> Result<Vec<Contact>, DbError> {
        self.pg_list_contacts().await
    }

    // -- Projects --
    async fn create_project(&self, input: &CreateProject) -> Result<Project, DbError> {
        self.pg_create_project(input).await
    }
    async fn get_project(&self, id: &str) -> Result<Project, DbError> {
        self.pg_get_project(id).await
    }
    async fn list_projects(&self) -> Result<Vec<Project>, DbError> {
        self.pg_list_projects().await
    }
    async fn update_project(&self, id: &str, update: &UpdateProject) -> Result<Project, DbError> {
        self.pg_update_project(id, update).await
    }
    async fn delete_project(&self, id: &str) -> Result<(), DbError> {
        self.pg_delete_project(id).await
    }
}
