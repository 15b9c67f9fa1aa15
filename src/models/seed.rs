//! Import format for flat question seed documents.
//!
//! Every field is optional; the defaulting rules live on [`SeedRecord`] and nowhere else.

use serde::{Deserialize, Serialize};

use super::{DEFAULT_DIFFICULTY, DEFAULT_LINK};

/// Topic label used when a record has none.
pub const DEFAULT_TOPIC: &str = "Untitled Topic";

/// Subtopic label used when a record has none.
pub const DEFAULT_SUBTOPIC: &str = "General";

/// Question title used when a record has none.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Nested question metadata as exported by the question bank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedQuestionMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub problem_url: Option<String>,
}

/// One flat question record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecord {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub sub_topic: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub question_id: Option<SeedQuestionMeta>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl SeedRecord {
    pub fn new(topic: &str, sub_topic: &str, title: &str) -> Self {
        Self {
            topic: Some(topic.to_string()),
            sub_topic: Some(sub_topic.to_string()),
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: &str) -> Self {
        self.difficulty = Some(difficulty.to_string());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    fn meta(&self) -> Option<&SeedQuestionMeta> {
        self.question_id.as_ref()
    }

    pub fn topic_label(&self) -> &str {
        present(&self.topic).unwrap_or(DEFAULT_TOPIC)
    }

    pub fn subtopic_label(&self) -> &str {
        present(&self.sub_topic).unwrap_or(DEFAULT_SUBTOPIC)
    }

    pub fn title_label(&self) -> &str {
        present(&self.title)
            .or_else(|| self.meta().and_then(|m| present(&m.name)))
            .unwrap_or(DEFAULT_TITLE)
    }

    pub fn difficulty_label(&self) -> &str {
        present(&self.difficulty)
            .or_else(|| self.meta().and_then(|m| present(&m.difficulty)))
            .unwrap_or(DEFAULT_DIFFICULTY)
    }

    pub fn link_target(&self) -> &str {
        present(&self.link)
            .or_else(|| self.meta().and_then(|m| present(&m.problem_url)))
            .or_else(|| present(&self.resource))
            .unwrap_or(DEFAULT_LINK)
    }

    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub questions: Vec<SeedRecord>,
}

/// Accepted seed document shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeedDocument {
    Wrapped { data: SeedData },
    Questions { questions: Vec<SeedRecord> },
    Records(Vec<SeedRecord>),
}

impl SeedDocument {
    pub fn into_records(self) -> Vec<SeedRecord> {
        match self {
            SeedDocument::Wrapped { data } => data.questions,
            SeedDocument::Questions { questions } => questions,
            SeedDocument::Records(records) => records,
        }
    }
}

/// Trimmed field value; blank counts as missing.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
