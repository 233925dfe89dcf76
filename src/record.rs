//! Record types - the five collections served by the study desk
//!
//! Every collection follows the same shape:
//! - a stored record (`Message`, `File`, ...) carrying the server-assigned
//!   `id` and creation timestamp
//! - an input (`NewMessage`, `NewFile`, ...) as received from a client, where
//!   required fields are optional so that a missing field surfaces as a
//!   validation error rather than a decode failure

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Default sender for chat messages
pub const DEFAULT_SENDER: &str = "user";

/// Default difficulty for chapters and questions
pub const DEFAULT_DIFFICULTY: &str = "medium";

/// Explanation stored for questions uploaded without one
pub const DEFAULT_EXPLANATION: &str = "No explanation provided";

/// A chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub text: String,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
}

/// A stored file entry (metadata only, the content lives at `path`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub size: String,
    pub path: String,
    #[serde(rename = "createdAt")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub file_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub size: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub path: String,
    #[serde(rename = "createdAt")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFolder {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// A study chapter.
///
/// `total_questions` is derived: it is recomputed from the questions store
/// whenever questions are bulk-inserted for the chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub subject_id: i64,
    pub difficulty: String,
    pub progress: i64,
    pub total_questions: i64,
    #[serde(rename = "createdAt")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChapter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// A multiple-choice quiz question belonging to a chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub chapter_id: i64,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
    pub explanation: String,
    pub difficulty: String,
    #[serde(rename = "createdAt")]
    pub timestamp: DateTime<Utc>,
}

/// One question of a bulk upload. The chapter comes from the enclosing request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub option_a: Option<String>,
    #[serde(default)]
    pub option_b: Option<String>,
    #[serde(default)]
    pub option_c: Option<String>,
    #[serde(default)]
    pub option_d: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// A question bound to its chapter, ready to be stored
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub chapter_id: i64,
    pub input: QuestionInput,
}

/// Returns the trimmed-non-empty value of an optional field
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Fails with a validation error naming every field that is missing or blank.
pub fn require(fields: &[(&str, bool)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Missing required field(s): {}",
            missing.join(", ")
        )))
    }
}

/// Accepts `"B"` as well as `1` for fields clients send either way
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

impl NewQuestion {
    pub fn validate(&self) -> Result<()> {
        let q = &self.input;
        require(&[
            ("chapterId", self.chapter_id != 0),
            ("question", present(&q.question).is_some()),
            ("optionA", present(&q.option_a).is_some()),
            ("optionB", present(&q.option_b).is_some()),
            ("optionC", present(&q.option_c).is_some()),
            ("optionD", present(&q.option_d).is_some()),
            ("correctAnswer", present(&q.correct_answer).is_some()),
        ])
    }
}
