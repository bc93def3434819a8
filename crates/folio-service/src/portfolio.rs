use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};

use folio_core::contact::{Contact, CreateContact};
use folio_core::project::{CreateProject, Project, UpdateProject};
use folio_core::{is_record_id, ImageUpload};
use folio_db::Database;
use folio_store::ObjectStore;

use crate::ServiceError;

/// Contact and project operations over an injected record store and
/// content directory.
#[derive(Clone)]
pub struct PortfolioService {
    db: Arc<dyn Database>,
    store: Arc<dyn ObjectStore>,
}

impl PortfolioService {
    pub fn new(db: Arc<dyn Database>, store: Arc<dyn ObjectStore>) -> Self {
        Self { db, store }
    }

    // -- Contacts --

    /// Validate the fields and the optional image, write the image, then
    /// insert the record. A failed insert removes the written image.
    pub async fn submit_contact(
        &self,
        input: CreateContact,
        image: Option<ImageUpload>,
    ) -> Result<Contact, ServiceError> {
        let mut input = input.normalize()?;
        let image = image.filter(|i| !i.is_empty());

        if let Some(ref image) = image {
            if let Err(e) = image.validate() {
                warn!(
                    "rejected upload '{}' ({} bytes, {:?}): {e}",
                    image.filename,
                    image.size(),
                    image.content_type
                );
                return Err(e.into());
            }
        }

        let stored = match image {
            Some(image) => {
                let wanted = image.stored_name(Utc::now());
                let name = self.store.insert(&wanted, Bytes::from(image.data)).await?;
                input.image_path = Some(ImageUpload::public_path(&name));
                Some(name)
            }
            None => None,
        };

        match self.db.create_contact(&input).await {
            Ok(contact) => {
                info!(
                    "contact {} submitted (attachment: {})",
                    contact.id,
                    contact.image_path.as_deref().unwrap_or("none")
                );
                Ok(contact)
            }
            Err(e) => {
                if let Some(name) = stored {
                    if let Err(del) = self.store.delete(&name).await {
                        warn!("failed to remove orphaned upload {name}: {del}");
                    } else {
                        warn!("removed orphaned upload {name} after failed insert");
                    }
                }
                Err(e.into())
            }
        }
    }

    pub async fn list_contacts(&self) -> Result<Vec<Contact>, ServiceError> {
        Ok(self.db.list_contacts().await?)
    }

    // -- Projects --

    pub async fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        Ok(self.db.list_projects().await?)
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, ServiceError> {
        ensure_record_id(id)?;
        Ok(self.db.get_project(id).await?)
    }

    pub async fn create_project(&self, input: CreateProject) -> Result<Project, ServiceError> {
        let input = input.normalize()?;
        Ok(self.db.create_project(&input).await?)
    }

    pub async fn update_project(
        &self,
        id: &str,
        update: UpdateProject,
    ) -> Result<Project, ServiceError> {
        ensure_record_id(id)?;
        let existing = self.db.get_project(id).await?;
        let update = update.normalize()?;
        if update.is_empty() {
            return Ok(existing);
        }
        Ok(self.db.update_project(id, &update).await?)
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ServiceError> {
        ensure_record_id(id)?;
        self.db.get_project(id).await?;
        self.db.delete_project(id).await?;
        info!("project {id} removed");
        Ok(())
    }
}

/// Malformed ids cannot exist in the store; report them as not found.
fn ensure_record_id(id: &str) -> Result<(), ServiceError> {
    if is_record_id(id) {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("project {id}")))
    }
}
