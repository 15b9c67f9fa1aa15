//! Question completion tracking, kept apart from the tree so toggling never copies it.

use std::collections::HashMap;

use super::QuestionId;

/// Question id to "done" flag. A missing entry means not complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionMap {
    entries: HashMap<QuestionId, bool>,
}

impl CompletionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag for `id`. An unknown id counts as previously false.
    pub fn toggle(&mut self, id: QuestionId) -> bool {
        let entry = self.entries.entry(id).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn is_complete(&self, id: QuestionId) -> bool {
        self.entries.get(&id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: QuestionId, completed: bool) {
        self.entries.insert(id, completed);
    }

    pub fn remove(&mut self, id: QuestionId) {
        self.entries.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
