//! # Blobstash - embedded base64 blob store
//!
//! Blobstash persists small files (text or image) as base64-encoded rows in a
//! single SQLite table, keyed by file name.
//!
//! Blobstash provides:
//! - A content codec with extension-based type classification (`TEXT`/`IMAGE`)
//! - A single-table SQLite store with parameterized statements
//! - Serialized access through a permit-of-one connection guard
//! - A closed taxonomy for classified backend failures
//! - Positional (index) addressing against the current listing

pub mod config;
pub mod content;
pub mod resolve;
pub mod storage;
pub mod ui;

// Re-exports for convenient access
pub use content::ContentType;
pub use resolve::ItemRef;
pub use storage::{BlobStore, DbErrorKind, StorageItem};

/// Result type alias for Blobstash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Blobstash operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported extension: {0}")]
    UnsupportedExtension(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("Stored content is not valid base64: {0}")]
    Codec(#[from] base64::DecodeError),

    #[error("Image re-encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Index {index} out of range ({len} items stored)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Type mismatch for '{name}': stored as {stored}, requested {requested}")]
    TypeMismatch {
        name: String,
        stored: ContentType,
        requested: ContentType,
    },

    #[error("Invalid item name: {0}")]
    InvalidName(String),

    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    #[error("Database failure ({kind}): {source}")]
    Db {
        kind: DbErrorKind,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Storage guard poisoned; the store can no longer be used safely")]
    GuardPoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
