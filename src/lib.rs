//! Library catalog client
//!
//! Lists, searches, creates, edits and deletes books, magazines and DVDs
//! held by a remote REST store. One generic gateway, list view and record
//! form are instantiated per kind from its entity descriptor.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod transport;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::Catalog;
