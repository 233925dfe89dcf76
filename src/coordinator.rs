//! Chapter/question coordinator
//!
//! The only component touching two stores. It keeps `Chapter.totalQuestions`
//! equal to the number of stored questions for the chapter and cascades
//! chapter deletes to their questions.
//!
//! Both multi-store operations run on a questions connection with the
//! chapters database attached, inside a single SQLite transaction, so either
//! every step lands or none does.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::record::{Chapter, NewChapter, NewQuestion, Question, QuestionInput, present};
use crate::storage::schema::{Chapters, Questions};
use crate::storage::{ChapterStore, QuestionStore, RecordSchema};
use crate::{Error, Result};

/// Schema name the chapters database is attached under
const CHAPTERS_ALIAS: &str = "chapters_db";

#[derive(Debug, Clone)]
pub struct Coordinator {
    chapters: ChapterStore,
    questions: QuestionStore,
}

impl Coordinator {
    pub fn new(chapters: ChapterStore, questions: QuestionStore) -> Self {
        Self { chapters, questions }
    }

    pub fn chapters(&self) -> &ChapterStore {
        &self.chapters
    }

    pub fn questions(&self) -> &QuestionStore {
        &self.questions
    }

    /// Create a chapter with a title no other chapter uses (exact, case-sensitive match)
    pub fn create_chapter(&self, input: &NewChapter) -> Result<Chapter> {
        Chapters::validate(input)?;

        if let Some(title) = present(&input.title) {
            if self.find_chapter_by_title(title)?.is_some() {
                return Err(Error::Conflict(Chapters::CONFLICT_MESSAGE.to_string()));
            }
        }

        // A concurrent insert of the same title still hits the UNIQUE constraint
        self.chapters.insert(input)
    }

    pub fn find_chapter_by_title(&self, title: &str) -> Result<Option<Chapter>> {
        let conn = self.chapters.connect()?;
        let chapter = conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE title = ?1",
                    Chapters::SELECT_COLUMNS,
                    Chapters::TABLE
                ),
                [title],
                |row| Chapters::from_row(row),
            )
            .optional()?;
        Ok(chapter)
    }

    /// Insert a batch of questions for a chapter, then recount the chapter's total.
    ///
    /// Every question is validated before anything is written. The chapter is
    /// not required to exist: the questions are stored and the recount simply
    /// matches no chapter row.
    pub fn bulk_insert_questions(
        &self,
        chapter_id: Option<i64>,
        inputs: Vec<QuestionInput>,
    ) -> Result<Vec<Question>> {
        let chapter_id = match chapter_id {
            Some(id) if id != 0 && !inputs.is_empty() => id,
            _ => {
                return Err(Error::Validation(
                    "chapterId and questions are required".to_string(),
                ));
            }
        };

        let batch: Vec<NewQuestion> = inputs
            .into_iter()
            .map(|input| NewQuestion { chapter_id, input })
            .collect();

        for (index, question) in batch.iter().enumerate() {
            question.validate().map_err(|e| match e {
                Error::Validation(msg) => {
                    Error::Validation(format!("Question {}: {}", index + 1, msg))
                }
                other => other,
            })?;
        }

        let mut conn = self.attached_connection()?;
        let tx = conn.transaction()?;

        let mut created = Vec::with_capacity(batch.len());
        for question in &batch {
            created.push(QuestionStore::insert_on(&tx, question, Utc::now())?);
        }

        let updated = Self::recount_on(&tx, chapter_id)?;
        tx.commit()?;

        if updated == 0 {
            tracing::warn!(
                "Stored {} question(s) for chapter {} which does not exist",
                created.len(),
                chapter_id
            );
        } else {
            tracing::info!("Stored {} question(s) for chapter {}", created.len(), chapter_id);
        }

        Ok(created)
    }

    /// Recompute a chapter's `totalQuestions` from the questions store.
    /// Returns the number of chapter rows updated (0 if the chapter is absent).
    pub fn recount(&self, chapter_id: i64) -> Result<usize> {
        let conn = self.attached_connection()?;
        Self::recount_on(&conn, chapter_id)
    }

    /// Delete a chapter and all of its questions. Absent ids are not an error.
    pub fn delete_chapter(&self, chapter_id: i64) -> Result<()> {
        let mut conn = self.attached_connection()?;
        let tx = conn.transaction()?;

        let questions = tx.execute(
            &format!("DELETE FROM main.{} WHERE chapterId = ?1", Questions::TABLE),
            [chapter_id],
        )?;
        let chapters = tx.execute(
            &format!("DELETE FROM {}.{} WHERE id = ?1", CHAPTERS_ALIAS, Chapters::TABLE),
            [chapter_id],
        )?;
        tx.commit()?;

        tracing::info!(
            "Deleted chapter {} ({} row(s)) and {} question(s)",
            chapter_id,
            chapters,
            questions
        );
        Ok(())
    }

    /// Questions connection with the chapters database attached
    fn attached_connection(&self) -> Result<Connection> {
        let conn = self.questions.connect()?;
        self.chapters.attach_to(&conn, CHAPTERS_ALIAS)?;
        Ok(conn)
    }

    fn recount_on(conn: &Connection, chapter_id: i64) -> Result<usize> {
        let updated = conn.execute(
            &format!(
                "UPDATE {alias}.{chapters} SET totalQuestions = \
                 (SELECT COUNT(*) FROM main.{questions} WHERE chapterId = ?1) \
                 WHERE id = ?1",
                alias = CHAPTERS_ALIAS,
                chapters = Chapters::TABLE,
                questions = Questions::TABLE,
            ),
            [chapter_id],
        )?;
        Ok(updated)
    }
}
