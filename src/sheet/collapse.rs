//! Expand/collapse flags. UI-only; never part of the persisted document.

use std::collections::HashMap;

use super::{SubtopicId, TopicId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    topics: HashMap<TopicId, bool>,
    subtopics: HashMap<(TopicId, SubtopicId), bool>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_topic(&mut self, topic: TopicId) -> bool {
        let entry = self.topics.entry(topic).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn toggle_subtopic(&mut self, topic: TopicId, subtopic: SubtopicId) -> bool {
        let entry = self.subtopics.entry((topic, subtopic)).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn is_topic_collapsed(&self, topic: TopicId) -> bool {
        self.topics.get(&topic).copied().unwrap_or(false)
    }

    pub fn is_subtopic_collapsed(&self, topic: TopicId, subtopic: SubtopicId) -> bool {
        self.subtopics
            .get(&(topic, subtopic))
            .copied()
            .unwrap_or(false)
    }

    /// Drop the topic flag and every subtopic flag under it.
    pub fn forget_topic(&mut self, topic: TopicId) {
        self.topics.remove(&topic);
        self.subtopics.retain(|(t, _), _| *t != topic);
    }

    pub fn forget_subtopic(&mut self, topic: TopicId, subtopic: SubtopicId) {
        self.subtopics.remove(&(topic, subtopic));
    }
}
