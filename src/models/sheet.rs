//! Sheet document model as stored and exchanged over the API.

use serde::{Deserialize, Serialize};

use crate::sheet::{QuestionId, SubtopicId, TopicId};

/// Difficulty label assigned when none is known.
pub const DEFAULT_DIFFICULTY: &str = "Unknown";

/// Link assigned when a question has no reference.
pub const DEFAULT_LINK: &str = "#";

fn default_difficulty() -> String {
    DEFAULT_DIFFICULTY.to_string()
}

fn default_link() -> String {
    DEFAULT_LINK.to_string()
}

/// A user's whole topic tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDocument {
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
}

impl SheetDocument {
    pub fn new(topics: Vec<Topic>) -> Self {
        Self {
            topics,
            updated_at: None,
            revision: None,
        }
    }

    /// Total number of questions in the document.
    pub fn question_count(&self) -> usize {
        self.topics
            .iter()
            .flat_map(|t| &t.subtopics)
            .map(|s| s.questions.len())
            .sum()
    }
}

/// Records without an id get one minted on ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(default = "TopicId::new")]
    pub id: TopicId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtopics: Vec<Subtopic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtopic {
    #[serde(default = "SubtopicId::new")]
    pub id: SubtopicId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default = "QuestionId::new")]
    pub id: QuestionId,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_link")]
    pub link: String,
    #[serde(default)]
    pub completed: bool,
}
