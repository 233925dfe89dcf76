//! Store names and their on-disk layout

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Logical name of each record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreName {
    Messages,
    Files,
    Folders,
    Chapters,
    Questions,
}

impl StoreName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreName::Messages => "messages",
            StoreName::Files => "files",
            StoreName::Folders => "folders",
            StoreName::Chapters => "chapters",
            StoreName::Questions => "questions",
        }
    }

    /// Database file backing the store, relative to the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            StoreName::Messages => "chat_messages.db",
            StoreName::Files => "files_storage.db",
            StoreName::Folders => "folders_storage.db",
            StoreName::Chapters => "chapters_storage.db",
            StoreName::Questions => "questions_storage.db",
        }
    }

    pub fn all() -> &'static [StoreName] {
        &[
            StoreName::Messages,
            StoreName::Files,
            StoreName::Folders,
            StoreName::Chapters,
            StoreName::Questions,
        ]
    }
}

impl std::fmt::Display for StoreName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolves every logical store to its database file.
#[derive(Debug, Clone)]
pub struct StoreLayout {
    data_dir: PathBuf,
}

impl StoreLayout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path(&self, name: StoreName) -> PathBuf {
        self.data_dir.join(name.file_name())
    }

    /// Create the data directory if needed
    pub fn ensure_dir(&self) -> Result<()> {
        if !self.data_dir.as_os_str().is_empty() && !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }
}
