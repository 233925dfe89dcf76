//! # StudyDesk - persistence-backed API for a study companion app
//!
//! StudyDesk provides:
//! - Five independent SQLite record stores (messages, files, folders,
//!   chapters, questions), one database file each
//! - A generic `RecordStore` parameterized by a per-collection schema
//! - A chapter/question coordinator keeping `totalQuestions` in sync and
//!   cascading chapter deletes to their questions
//! - An HTTP/JSON surface over all of the above

pub mod record;
pub mod storage;
pub mod coordinator;
pub mod server;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use record::{Chapter, File, Folder, Message, Question};
pub use storage::{RecordStore, StoreLayout, StoreName, Stores};
pub use coordinator::Coordinator;

/// Result type alias for StudyDesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for StudyDesk operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input field is missing or empty
    #[error("{0}")]
    Validation(String),

    /// The write would violate a uniqueness rule
    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the caller is at fault (as opposed to the storage layer)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Conflict(_))
    }
}
