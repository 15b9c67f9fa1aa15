//! Completed/total counts derived from the tree and the completion map.

use serde::Serialize;

use super::{CompletionMap, SheetState, SubtopicNode, TopicNode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Fraction complete; 0.0 for an empty subtree.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    /// Rounded percentage in 0..=100.
    pub fn percent(&self) -> u32 {
        (self.ratio() * 100.0).round() as u32
    }
}

impl std::ops::Add for Progress {
    type Output = Progress;

    fn add(self, rhs: Progress) -> Progress {
        Progress {
            completed: self.completed + rhs.completed,
            total: self.total + rhs.total,
        }
    }
}

impl std::iter::Sum for Progress {
    fn sum<I: Iterator<Item = Progress>>(iter: I) -> Progress {
        iter.fold(Progress::default(), |acc, p| acc + p)
    }
}

pub fn subtopic_progress(subtopic: &SubtopicNode, completion: &CompletionMap) -> Progress {
    Progress {
        completed: subtopic
            .questions
            .iter()
            .filter(|q| completion.is_complete(q.id))
            .count(),
        total: subtopic.questions.len(),
    }
}

pub fn topic_progress(topic: &TopicNode, completion: &CompletionMap) -> Progress {
    topic
        .subtopics
        .iter()
        .map(|s| subtopic_progress(s, completion))
        .sum()
}

pub fn sheet_progress(state: &SheetState) -> Progress {
    state
        .topics
        .iter()
        .map(|t| topic_progress(t, &state.completion))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeedRecord;
    use crate::sheet::normalize;

    #[test]
    fn test_empty_is_zero_percent() {
        let progress = sheet_progress(&SheetState::new());
        assert_eq!(progress, Progress::default());
        assert_eq!(progress.ratio(), 0.0);
        assert_eq!(progress.percent(), 0);
    }

    #[test]
    fn test_totals_sum_across_levels() {
        let mut state = normalize(vec![
            SeedRecord::new("Arrays", "Basics", "a").with_completed(true),
            SeedRecord::new("Arrays", "Basics", "b"),
            SeedRecord::new("Arrays", "Hashing", "c").with_completed(true),
            SeedRecord::new("Graphs", "BFS", "d"),
        ]);
        let question_count = state.questions().count();

        let by_subtopic: usize = state
            .topics
            .iter()
            .flat_map(|t| &t.subtopics)
            .map(|s| subtopic_progress(s, &state.completion).total)
            .sum();
        let sheet = sheet_progress(&state);
        assert_eq!(sheet.total, by_subtopic);
        assert_eq!(sheet.total, question_count);
        assert_eq!(sheet.completed, 2);
        assert_eq!(sheet.percent(), 50);

        let arrays = topic_progress(&state.topics[0], &state.completion);
        assert_eq!(arrays, Progress { completed: 2, total: 3 });

        let d = state.topics[1].subtopics[0].questions[0].id;
        state.completion.toggle(d);
        assert_eq!(sheet_progress(&state).completed, 3);
    }
}
