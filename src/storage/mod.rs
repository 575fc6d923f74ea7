//! Storage layer - single-table SQLite blob store

pub mod error;
pub mod schema;
pub mod sqlite;

pub use error::DbErrorKind;
pub use sqlite::{BlobStore, StorageItem, validate_name};
