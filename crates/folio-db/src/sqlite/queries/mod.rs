pub mod contacts;
pub mod projects;
