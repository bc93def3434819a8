pub mod contact;
pub mod error;
pub mod project;
pub mod upload;

pub use contact::Contact;
pub use error::FolioError;
pub use project::{Category, Project};
pub use upload::ImageUpload;

/// Record ids are server-assigned UUIDv4 strings. Anything that does not
/// parse as a UUID can never name a stored record.
pub fn is_record_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}
