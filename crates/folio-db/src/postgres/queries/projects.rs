use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use folio_core::project::{Category, CreateProject, Project, UpdateProject};

use crate::DbError;
use super::super::{pg_err, pg_not_found, PostgresDatabase};

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: String,
    title: String,
    description: String,
    image_url: String,
    technologies: Vec<String>,
    category: String,
    live_url: String,
    github_url: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = DbError;

    fn try_from(r: ProjectRow) -> Result<Self, DbError> {
        let category = Category::parse_str(&r.category)
            .ok_or_else(|| DbError::Internal(format!("unknown category '{}'", r.category)))?;
        Ok(Project {
            id: r.id,
            title: r.title,
            description: r.description,
            image_url: r.image_url,
            technologies: r.technologies,
            category,
            live_url: r.live_url,
            github_url: r.github_url,
            created_at: r.created_at,
        })
    }
}

impl PostgresDatabase {
    pub(crate) async fn pg_create_project(
        &self,
        input: &CreateProject,
    ) -> Result<Project, DbError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        let row = sqlx::query_as::<_, ProjectRow>(
            "INSERT INTO projects (id, title, description, image_url, technologies, category,
                                   live_url, github_url, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(&id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(&input.technologies)
        .bind(input.category.as_str())
        .bind(&input.live_url)
        .bind(&input.github_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(pg_err)?;

        row.try_into()
    }

    pub(crate) async fn pg_get_project(&self, id: &str) -> Result<Project, DbError> {
        let row = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(pg_err)?
            .ok_or_else(|| pg_not_found(&format!("project {id}")))?;

        row.try_into()
    }

    pub(crate) async fn pg_list_projects(&self) -> Result<Vec<Project>, DbError> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT * FROM projects ORDER BY created_at DESC, seq DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;

        rows.into_iter().map(Project::try_from).collect()
    }

    pub(crate) async fn pg_update_project(
        &self,
        id: &str,
        update: &UpdateProject,
    ) -> Result<Project, DbError> {
        if update.is_empty() {
            return self.pg_get_project(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE projects SET ");
        {
            let mut sets = qb.separated(", ");
            if let Some(ref title) = update.title {
                sets.push("title = ").push_bind_unseparated(title.clone());
            }
            if let Some(ref description) = update.description {
                sets.push("description = ").push_bind_unseparated(description.clone());
            }
            if let Some(ref image_url) = update.image_url {
                sets.push("image_url = ").push_bind_unseparated(image_url.clone());
            }
            if let Some(ref technologies) = update.technologies {
                sets.push("technologies = ").push_bind_unseparated(technologies.clone());
            }
            if let Some(category) = update.category {
                sets.push("category = ").push_bind_unseparated(category.as_str());
            }
            if let Some(ref live_url) = update.live_url {
                sets.push("live_url = ").push_bind_unseparated(live_url.clone());
            }
            if let Some(ref github_url) = update.github_url {
                sets.push("github_url = ").push_bind_unseparated(github_url.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let row = qb
            .build_query_as::<ProjectRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(pg_err)?
            .ok_or_else(|| pg_not_found(&format!("project {id}")))?;

        row.try_into()
    }

    pub(crate) async fn pg_delete_project(&self, id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(pg_err)?;

        if result.rows_affected() == 0 {
            return Err(pg_not_found(&format!("project {id}")));
        }
        Ok(())
    }
}
