//! Storage Layer - SQLite-backed record stores
//!
//! Each collection lives in its own database file with a single table:
//! - messages(id, text, sender, timestamp)
//! - files(id, name, type, size, path, timestamp)
//! - folders(id, name, path, timestamp)
//! - chapters(id, title, description, subjectId, difficulty, progress, totalQuestions, timestamp)
//! - questions(id, chapterId, question, optionA..optionD, correctAnswer, explanation, difficulty, timestamp)

pub mod layout;
pub mod record_store;
pub mod schema;

pub use layout::{StoreLayout, StoreName};
pub use record_store::{ChildSchema, Deletable, RecordSchema, RecordStore, SortOrder};

use crate::Result;

pub type MessageStore = RecordStore<schema::Messages>;
pub type FileStore = RecordStore<schema::Files>;
pub type FolderStore = RecordStore<schema::Folders>;
pub type ChapterStore = RecordStore<schema::Chapters>;
pub type QuestionStore = RecordStore<schema::Questions>;

/// Handles on all five stores, built once from a layout
#[derive(Debug, Clone)]
pub struct Stores {
    pub messages: MessageStore,
    pub files: FileStore,
    pub folders: FolderStore,
    pub chapters: ChapterStore,
    pub questions: QuestionStore,
}

impl Stores {
    /// Open every store under the layout's data directory, creating files and tables as needed
    pub fn open(layout: &StoreLayout) -> Result<Self> {
        layout.ensure_dir()?;
        Ok(Self {
            messages: RecordStore::open(layout.path(StoreName::Messages))?,
            files: RecordStore::open(layout.path(StoreName::Files))?,
            folders: RecordStore::open(layout.path(StoreName::Folders))?,
            chapters: RecordStore::open(layout.path(StoreName::Chapters))?,
            questions: RecordStore::open(layout.path(StoreName::Questions))?,
        })
    }

    /// Row count of every store
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            messages: self.messages.count()?,
            files: self.files.count()?,
            folders: self.folders.count()?,
            chapters: self.chapters.count()?,
            questions: self.questions.count()?,
        })
    }
}

/// Store statistics
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct StoreStats {
    pub messages: usize,
    pub files: usize,
    pub folders: usize,
    pub chapters: usize,
    pub questions: usize,
}

impl StoreStats {
    pub fn get(&self, name: StoreName) -> usize {
        match name {
            StoreName::Messages => self.messages,
            StoreName::Files => self.files,
            StoreName::Folders => self.folders,
            StoreName::Chapters => self.chapters,
            StoreName::Questions => self.questions,
        }
    }

    pub fn rows(&self) -> Vec<(StoreName, usize)> {
        StoreName::all().iter().map(|&name| (name, self.get(name))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewFolder;
    use tempfile::TempDir;

    #[test]
    fn test_stats_counts_each_store() {
        let dir = TempDir::new().unwrap();
        let stores = Stores::open(&StoreLayout::new(dir.path())).unwrap();
        stores
            .folders
            .insert(&NewFolder {
                name: Some("Notes".into()),
                path: Some("/notes".into()),
            })
            .unwrap();

        let stats = stores.stats().unwrap();
        assert_eq!(stats.get(StoreName::Folders), 1);
        assert_eq!(
            stats.rows(),
            vec![
                (StoreName::Messages, 0),
                (StoreName::Files, 0),
                (StoreName::Folders, 1),
                (StoreName::Chapters, 0),
                (StoreName::Questions, 0),
            ]
        );
    }
}
