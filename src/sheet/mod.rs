//! In-memory sheet state: the Topic → Subtopic → Question tree plus the completion
//! and collapse maps that sit beside it.
//!
//! Every node is reference counted. Mutations rebuild only the path they touch, so
//! two states produced one from the other share all untouched branches.

mod collapse;
mod completion;
mod ids;
pub mod mutations;
mod normalize;
mod progress;
mod reducer;

pub use collapse::CollapseState;
pub use completion::CompletionMap;
pub use ids::{QuestionId, SubtopicId, TopicId};
pub use normalize::{flatten, normalize, FlatQuestion};
pub use progress::{sheet_progress, subtopic_progress, topic_progress, Progress};
pub use reducer::{check_title_conflict, reduce, SheetAction};

use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{Question, SheetDocument, Subtopic, Topic};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionNode {
    pub id: QuestionId,
    pub title: String,
    pub difficulty: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtopicNode {
    pub id: SubtopicId,
    pub title: String,
    pub questions: Vec<Arc<QuestionNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicNode {
    pub id: TopicId,
    pub title: String,
    pub subtopics: Vec<Arc<SubtopicNode>>,
}

impl TopicNode {
    pub fn subtopic(&self, id: SubtopicId) -> Option<&SubtopicNode> {
        self.subtopics.iter().find(|s| s.id == id).map(Arc::as_ref)
    }

    pub fn questions(&self) -> impl Iterator<Item = &QuestionNode> {
        self.subtopics
            .iter()
            .flat_map(|s| s.questions.iter().map(Arc::as_ref))
    }
}

impl SubtopicNode {
    pub fn question(&self, id: QuestionId) -> Option<&QuestionNode> {
        self.questions.iter().find(|q| q.id == id).map(Arc::as_ref)
    }
}

/// Tree, completion map and collapse flags bundled as one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetState {
    pub topics: Vec<Arc<TopicNode>>,
    pub completion: CompletionMap,
    pub collapse: CollapseState,
}

impl SheetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(&self, id: TopicId) -> Option<&TopicNode> {
        self.topics.iter().find(|t| t.id == id).map(Arc::as_ref)
    }

    pub fn topic_by_title(&self, title: &str) -> Option<&TopicNode> {
        self.topics
            .iter()
            .find(|t| t.title == title)
            .map(Arc::as_ref)
    }

    pub fn subtopic(&self, topic: TopicId, subtopic: SubtopicId) -> Option<&SubtopicNode> {
        self.topic(topic).and_then(|t| t.subtopic(subtopic))
    }

    pub fn questions(&self) -> impl Iterator<Item = &QuestionNode> {
        self.topics.iter().flat_map(|t| t.questions())
    }

    pub fn is_complete(&self, id: QuestionId) -> bool {
        self.completion.is_complete(id)
    }

    /// Build local state from a persisted document. Collapse flags start empty.
    pub fn from_document(doc: &SheetDocument) -> Self {
        let mut completion = CompletionMap::new();
        let topics = doc
            .topics
            .iter()
            .map(|topic| {
                let subtopics = topic
                    .subtopics
                    .iter()
                    .map(|sub| {
                        let questions = sub
                            .questions
                            .iter()
                            .map(|q| {
                                completion.set(q.id, q.completed);
                                Arc::new(QuestionNode {
                                    id: q.id,
                                    title: q.title.clone(),
                                    difficulty: q.difficulty.clone(),
                                    link: q.link.clone(),
                                })
                            })
                            .collect();
                        Arc::new(SubtopicNode {
                            id: sub.id,
                            title: sub.title.clone(),
                            questions,
                        })
                    })
                    .collect();
                Arc::new(TopicNode {
                    id: topic.id,
                    title: topic.title.clone(),
                    subtopics,
                })
            })
            .collect();

        Self {
            topics,
            completion,
            collapse: CollapseState::new(),
        }
    }

    /// Snapshot for persistence. Completion is folded into each question; collapse is dropped.
    pub fn to_document(&self) -> SheetDocument {
        let topics = self
            .topics
            .iter()
            .map(|topic| Topic {
                id: topic.id,
                title: topic.title.clone(),
                subtopics: topic
                    .subtopics
                    .iter()
                    .map(|sub| Subtopic {
                        id: sub.id,
                        title: sub.title.clone(),
                        questions: sub
                            .questions
                            .iter()
                            .map(|q| Question {
                                id: q.id,
                                title: q.title.clone(),
                                difficulty: q.difficulty.clone(),
                                link: q.link.clone(),
                                completed: self.completion.is_complete(q.id),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        SheetDocument::new(topics)
    }
}

/// Reject blank titles. Returns the trimmed title.
pub fn validate_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Check a whole document before it is stored.
///
/// Titles must be non-blank, topic titles unique within the sheet, subtopic titles
/// unique within their topic, and every node id unique.
pub fn validate_document(doc: &SheetDocument) -> Result<(), AppError> {
    let mut topic_titles = HashSet::new();
    let mut ids = HashSet::new();

    for topic in &doc.topics {
        validate_title(&topic.title)?;
        if !topic_titles.insert(topic.title.trim()) {
            return Err(AppError::Validation(format!(
                "Duplicate topic title: {}",
                topic.title
            )));
        }
        if !ids.insert(topic.id.as_uuid()) {
            return Err(AppError::Validation(format!("Duplicate id: {}", topic.id)));
        }

        let mut subtopic_titles = HashSet::new();
        for sub in &topic.subtopics {
            validate_title(&sub.title)?;
            if !subtopic_titles.insert(sub.title.trim()) {
                return Err(AppError::Validation(format!(
                    "Duplicate subtopic title in {}: {}",
                    topic.title, sub.title
                )));
            }
            if !ids.insert(sub.id.as_uuid()) {
                return Err(AppError::Validation(format!("Duplicate id: {}", sub.id)));
            }

            for q in &sub.questions {
                validate_title(&q.title)?;
                if !ids.insert(q.id.as_uuid()) {
                    return Err(AppError::Validation(format!("Duplicate id: {}", q.id)));
                }
            }
        }
    }

    Ok(())
}
