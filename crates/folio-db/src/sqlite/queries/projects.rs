use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Row};

use folio_core::project::{Category, CreateProject, Project, UpdateProject};

use super::super::{SqliteDatabase, SqliteResultExt};
use crate::DbError;

fn row_to_project(row: &Row) -> rusqlite::Result<Project> {
    let technologies: String = row.get("technologies")?;
    let technologies: Vec<String> = serde_json::from_str(&technologies).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            row.as_ref().column_index("technologies").unwrap_or(0),
            Type::Text,
            Box::new(e),
        )
    })?;
    let category: String = row.get("category")?;
    let category = Category::parse_str(&category).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(
            row.as_ref().column_index("category").unwrap_or(0),
            format!("category '{category}'"),
            Type::Text,
        )
    })?;
    Ok(Project {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        image_url: row.get("image_url")?,
        technologies,
        category,
        live_url: row.get("live_url")?,
        github_url: row.get("github_url")?,
        created_at: row.get("created_at")?,
    })
}

fn technologies_json(technologies: &[String]) -> Result<String, DbError> {
    serde_json::to_string(technologies).map_err(|e| DbError::Internal(e.to_string()))
}

fn not_found(id: &str) -> DbError {
    DbError::NotFound(format!("project {id}"))
}

impl SqliteDatabase {
    pub fn create_project_sync(&self, input: &CreateProject) -> Result<Project, DbError> {
        let technologies = technologies_json(&input.technologies)?;
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO projects (id, title, description, image_url, technologies, category,
                                       live_url, github_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    input.title,
                    input.description,
                    input.image_url,
                    technologies,
                    input.category.as_str(),
                    input.live_url,
                    input.github_url,
                    now
                ],
            )
            .to_db()?;
            conn.query_row(
                "SELECT * FROM projects WHERE id = ?1",
                params![id],
                row_to_project,
            )
            .to_db()
        })
    }

    pub fn get_project_sync(&self, id: &str) -> Result<Project, DbError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM projects WHERE id = ?1",
                params![id],
                row_to_project,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => not_found(id),
                other => DbError::Internal(other.to_string()),
            })
        })
    }

    pub fn list_projects_sync(&self) -> Result<Vec<Project>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM projects ORDER BY created_at DESC, rowid DESC")
                .to_db()?;
            let projects = stmt
                .query_map([], row_to_project)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(projects)
        })
    }

    pub fn update_project_sync(
        &self,
        id: &str,
        update: &UpdateProject,
    ) -> Result<Project, DbError> {
        let technologies = update
            .technologies
            .as_deref()
            .map(technologies_json)
            .transpose()?;
        self.with_conn(|conn| {
            let mut sets = Vec::new();
            let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            if let Some(ref title) = update.title {
                sets.push("title = ?");
                values.push(Box::new(title.clone()));
            }
            if let Some(ref description) = update.description {
                sets.push("description = ?");
                values.push(Box::new(description.clone()));
            }
            if let Some(ref image_url) = update.image_url {
                sets.push("image_url = ?");
                values.push(Box::new(image_url.clone()));
            }
            if let Some(technologies) = technologies {
                sets.push("technologies = ?");
                values.push(Box::new(technologies));
            }
            if let Some(category) = update.category {
                sets.push("category = ?");
                values.push(Box::new(category.as_str().to_string()));
            }
            if let Some(ref live_url) = update.live_url {
                sets.push("live_url = ?");
                values.push(Box::new(live_url.clone()));
            }
            if let Some(ref github_url) = update.github_url {
                sets.push("github_url = ?");
                values.push(Box::new(github_url.clone()));
            }

            if !sets.is_empty() {
                values.push(Box::new(id.to_string()));
                let sql = format!("UPDATE projects SET {} WHERE id = ?", sets.join(", "));
                let params: Vec<&dyn rusqlite::ToSql> =
                    values.iter().map(|v| v.as_ref()).collect();
                let changed = conn.execute(&sql, params.as_slice()).to_db()?;
                if changed == 0 {
                    return Err(not_found(id));
                }
            }

            conn.query_row(
                "SELECT * FROM projects WHERE id = ?1",
                params![id],
                row_to_project,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => not_found(id),
                other => DbError::Internal(other.to_string()),
            })
        })
    }

    pub fn delete_project_sync(&self, id: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let changed = conn
                .execute("DELETE FROM projects WHERE id = ?1", params![id])
                .to_db()?;
            if changed == 0 {
                return Err(not_found(id));
            }
            Ok(())
        })
    }
}
