//! Database schema definitions, one table per store

use rusqlite::Row;
use rusqlite::types::Value;

use super::layout::StoreName;
use super::record_store::{ChildSchema, Deletable, RecordSchema, SortOrder};
use crate::Result;
use crate::record::{
    Chapter, File, Folder, Message, NewChapter, NewFile, NewFolder, NewMessage, NewQuestion,
    Question, DEFAULT_DIFFICULTY, DEFAULT_EXPLANATION, DEFAULT_SENDER, present, require,
};

/// SQL to create the messages table
pub const CREATE_MESSAGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    sender TEXT NOT NULL,
    timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// SQL to create the files table
pub const CREATE_FILES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    size TEXT,
    path TEXT NOT NULL,
    timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// SQL to create the folders table
pub const CREATE_FOLDERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS folders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    path TEXT NOT NULL,
    timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// SQL to create the chapters table
pub const CREATE_CHAPTERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS chapters (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    description TEXT,
    subjectId INTEGER NOT NULL,
    difficulty TEXT DEFAULT 'medium',
    progress INTEGER DEFAULT 0,
    totalQuestions INTEGER DEFAULT 0,
    timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// SQL to create the questions table
pub const CREATE_QUESTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chapterId INTEGER NOT NULL,
    question TEXT NOT NULL,
    optionA TEXT NOT NULL,
    optionB TEXT NOT NULL,
    optionC TEXT NOT NULL,
    optionD TEXT NOT NULL,
    correctAnswer TEXT NOT NULL,
    explanation TEXT,
    difficulty TEXT DEFAULT 'medium',
    timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

/// Default only applies when the field was left out, an empty string is kept
fn text_or(value: &Option<String>, default: &str) -> Value {
    text(value.as_deref().unwrap_or(default))
}

fn required(value: &Option<String>) -> Value {
    value.clone().map(Value::Text).unwrap_or(Value::Null)
}

// ========== Messages ==========

pub struct Messages;

impl RecordSchema for Messages {
    const STORE: StoreName = StoreName::Messages;
    const TABLE: &'static str = "messages";
    const CREATE_TABLE: &'static str = CREATE_MESSAGES_TABLE;
    const INDEXES: &'static [&'static str] =
        &["CREATE INDEX IF NOT EXISTS idx_messages_timestamp ON messages(timestamp)"];
    const INSERT_COLUMNS: &'static [&'static str] = &["text", "sender"];
    const SELECT_COLUMNS: &'static str = "id, text, sender, timestamp";
    const ORDER: SortOrder = SortOrder::Ascending;

    type Record = Message;
    type Input = NewMessage;

    fn validate(input: &NewMessage) -> Result<()> {
        require(&[("text", present(&input.text).is_some())])
    }

    fn bind(input: &NewMessage) -> Vec<Value> {
        vec![required(&input.text), text_or(&input.sender, DEFAULT_SENDER)]
    }

    fn from_row(row: &Row) -> rusqlite::Result<Message> {
        Ok(Message {
            id: row.get(0)?,
            text: row.get(1)?,
            sender: row.get(2)?,
            timestamp: row.get(3)?,
        })
    }
}

// ========== Files ==========

pub struct Files;

impl RecordSchema for Files {
    const STORE: StoreName = StoreName::Files;
    const TABLE: &'static str = "files";
    const CREATE_TABLE: &'static str = CREATE_FILES_TABLE;
    const INDEXES: &'static [&'static str] =
        &["CREATE INDEX IF NOT EXISTS idx_files_timestamp ON files(timestamp)"];
    const INSERT_COLUMNS: &'static [&'static str] = &["name", "type", "size", "path"];
    const SELECT_COLUMNS: &'static str = "id, name, type, size, path, timestamp";
    const ORDER: SortOrder = SortOrder::Descending;

    type Record = File;
    type Input = NewFile;

    fn validate(input: &NewFile) -> Result<()> {
        require(&[
            ("name", present(&input.name).is_some()),
            ("type", present(&input.file_type).is_some()),
            ("path", present(&input.path).is_some()),
        ])
    }

    fn bind(input: &NewFile) -> Vec<Value> {
        vec![
            required(&input.name),
            required(&input.file_type),
            text(input.size.as_deref().unwrap_or("")),
            required(&input.path),
        ]
    }

    fn from_row(row: &Row) -> rusqlite::Result<File> {
        Ok(File {
            id: row.get(0)?,
            name: row.get(1)?,
            file_type: row.get(2)?,
            size: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            path: row.get(4)?,
            timestamp: row.get(5)?,
        })
    }
}

impl Deletable for Files {}

// ========== Folders ==========

pub struct Folders;

impl RecordSchema for Folders {
    const STORE: StoreName = StoreName::Folders;
    const TABLE: &'static str = "folders";
    const CREATE_TABLE: &'static str = CREATE_FOLDERS_TABLE;
    const INDEXES: &'static [&'static str] =
        &["CREATE INDEX IF NOT EXISTS idx_folders_timestamp ON folders(timestamp)"];
    const INSERT_COLUMNS: &'static [&'static str] = &["name", "path"];
    const SELECT_COLUMNS: &'static str = "id, name, path, timestamp";
    const ORDER: SortOrder = SortOrder::Descending;

    type Record = Folder;
    type Input = NewFolder;

    fn validate(input: &NewFolder) -> Result<()> {
        require(&[
            ("name", present(&input.name).is_some()),
            ("path", present(&input.path).is_some()),
        ])
    }

    fn bind(input: &NewFolder) -> Vec<Value> {
        vec![required(&input.name), required(&input.path)]
    }

    fn from_row(row: &Row) -> rusqlite::Result<Folder> {
        Ok(Folder {
            id: row.get(0)?,
            name: row.get(1)?,
            path: row.get(2)?,
            timestamp: row.get(3)?,
        })
    }
}

impl Deletable for Folders {}

// ========== Chapters ==========

pub struct Chapters;

impl RecordSchema for Chapters {
    const STORE: StoreName = StoreName::Chapters;
    const TABLE: &'static str = "chapters";
    const CREATE_TABLE: &'static str = CREATE_CHAPTERS_TABLE;
    const INDEXES: &'static [&'static str] = &[
        "CREATE INDEX IF NOT EXISTS idx_chapters_timestamp ON chapters(timestamp)",
        "CREATE INDEX IF NOT EXISTS idx_chapters_subject ON chapters(subjectId)",
    ];
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "title",
        "description",
        "subjectId",
        "difficulty",
        "progress",
        "totalQuestions",
    ];
    const SELECT_COLUMNS: &'static str =
        "id, title, description, subjectId, difficulty, progress, totalQuestions, timestamp";
    const ORDER: SortOrder = SortOrder::Descending;
    const CONFLICT_MESSAGE: &'static str = "Chapter with this title already exists";

    type Record = Chapter;
    type Input = NewChapter;

    fn validate(input: &NewChapter) -> Result<()> {
        require(&[
            ("title", present(&input.title).is_some()),
            ("subjectId", input.subject_id.is_some_and(|id| id != 0)),
        ])
    }

    fn bind(input: &NewChapter) -> Vec<Value> {
        vec![
            required(&input.title),
            text(input.description.as_deref().unwrap_or("")),
            input.subject_id.map(Value::Integer).unwrap_or(Value::Null),
            text_or(&input.difficulty, DEFAULT_DIFFICULTY),
            Value::Integer(0),
            Value::Integer(0),
        ]
    }

    fn from_row(row: &Row) -> rusqlite::Result<Chapter> {
        Ok(Chapter {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            subject_id: row.get(3)?,
            difficulty: row
                .get::<_, Option<String>>(4)?
                .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
            progress: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
            total_questions: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
            timestamp: row.get(7)?,
        })
    }
}

impl ChildSchema for Chapters {
    const PARENT_COLUMN: &'static str = "subjectId";
}

impl Deletable for Chapters {}

// ========== Questions ==========

pub struct Questions;

impl RecordSchema for Questions {
    const STORE: StoreName = StoreName::Questions;
    const TABLE: &'static str = "questions";
    const CREATE_TABLE: &'static str = CREATE_QUESTIONS_TABLE;
    const INDEXES: &'static [&'static str] = &[
        "CREATE INDEX IF NOT EXISTS idx_questions_timestamp ON questions(timestamp)",
        "CREATE INDEX IF NOT EXISTS idx_questions_chapter ON questions(chapterId)",
    ];
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "chapterId",
        "question",
        "optionA",
        "optionB",
        "optionC",
        "optionD",
        "correctAnswer",
        "explanation",
        "difficulty",
    ];
    const SELECT_COLUMNS: &'static str = "id, chapterId, question, optionA, optionB, optionC, optionD, correctAnswer, explanation, difficulty, timestamp";
    const ORDER: SortOrder = SortOrder::Ascending;

    type Record = Question;
    type Input = NewQuestion;

    fn validate(input: &NewQuestion) -> Result<()> {
        input.validate()
    }

    fn bind(input: &NewQuestion) -> Vec<Value> {
        let q = &input.input;
        vec![
            Value::Integer(input.chapter_id),
            required(&q.question),
            required(&q.option_a),
            required(&q.option_b),
            required(&q.option_c),
            required(&q.option_d),
            required(&q.correct_answer),
            text_or(&q.explanation, DEFAULT_EXPLANATION),
            text_or(&q.difficulty, DEFAULT_DIFFICULTY),
        ]
    }

    fn from_row(row: &Row) -> rusqlite::Result<Question> {
        Ok(Question {
            id: row.get(0)?,
            chapter_id: row.get(1)?,
            question: row.get(2)?,
            option_a: row.get(3)?,
            option_b: row.get(4)?,
            option_c: row.get(5)?,
            option_d: row.get(6)?,
            correct_answer: row.get(7)?,
            explanation: row
                .get::<_, Option<String>>(8)?
                .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string()),
            difficulty: row
                .get::<_, Option<String>>(9)?
                .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
            timestamp: row.get(10)?,
        })
    }
}

impl ChildSchema for Questions {
    const PARENT_COLUMN: &'static str = "chapterId";
}
