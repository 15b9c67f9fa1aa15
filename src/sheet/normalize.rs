//! Flat seed records to nested tree, and back.

use std::sync::Arc;

use super::{
    CollapseState, CompletionMap, QuestionId, QuestionNode, SheetState, SubtopicId,
    SubtopicNode, TopicId, TopicNode,
};
use crate::models::SeedRecord;

/// Build a sheet from flat records.
///
/// Topics and subtopics keep the order their labels are first seen in; questions keep
/// input order. Each question id is derived from its topic label, subtopic label and
/// zero-based position within that subtopic.
pub fn normalize(records: impl IntoIterator<Item = SeedRecord>) -> SheetState {
    let mut topics: Vec<TopicNode> = Vec::new();
    let mut completion = CompletionMap::new();

    for record in records {
        let topic_label = record.topic_label();
        let subtopic_label = record.subtopic_label();

        let topic_idx = match topics.iter().position(|t| t.title == topic_label) {
            Some(idx) => idx,
            None => {
                topics.push(TopicNode {
                    id: TopicId::seeded(topic_label),
                    title: topic_label.to_string(),
                    subtopics: Vec::new(),
                });
                topics.len() - 1
            }
        };
        let topic = &mut topics[topic_idx];

        let sub_idx = match topic
            .subtopics
            .iter()
            .position(|s| s.title == subtopic_label)
        {
            Some(idx) => idx,
            None => {
                topic.subtopics.push(Arc::new(SubtopicNode {
                    id: SubtopicId::seeded(topic_label, subtopic_label),
                    title: subtopic_label.to_string(),
                    questions: Vec::new(),
                }));
                topic.subtopics.len() - 1
            }
        };
        // Sole owner while building, so this never clones.
        let subtopic = Arc::make_mut(&mut topic.subtopics[sub_idx]);

        let id = QuestionId::seeded(topic_label, subtopic_label, subtopic.questions.len());
        completion.set(id, record.is_completed());
        subtopic.questions.push(Arc::new(QuestionNode {
            id,
            title: record.title_label().to_string(),
            difficulty: record.difficulty_label().to_string(),
            link: record.link_target().to_string(),
        }));
    }

    tracing::debug!(topics = topics.len(), "Normalized seed records");

    SheetState {
        topics: topics.into_iter().map(Arc::new).collect(),
        completion,
        collapse: CollapseState::new(),
    }
}

/// A question with its tree coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatQuestion {
    pub topic: String,
    pub subtopic: String,
    /// Zero-based position within its subtopic.
    pub index: usize,
    pub id: QuestionId,
    pub title: String,
    pub difficulty: String,
    pub link: String,
    pub completed: bool,
}

/// Walk the tree in order and emit one record per question.
pub fn flatten(state: &SheetState) -> Vec<FlatQuestion> {
    let mut out = Vec::new();
    for topic in &state.topics {
        for sub in &topic.subtopics {
            for (index, q) in sub.questions.iter().enumerate() {
                out.push(FlatQuestion {
                    topic: topic.title.clone(),
                    subtopic: sub.title.clone(),
                    index,
                    id: q.id,
                    title: q.title.clone(),
                    difficulty: q.difficulty.clone(),
                    link: q.link.clone(),
                    completed: state.completion.is_complete(q.id),
                });
            }
        }
    }
    out
}
