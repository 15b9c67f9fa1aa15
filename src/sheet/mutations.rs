//! Pure tree operations. Each takes the current state and returns the next one.
//!
//! The input state is never modified. Only nodes on the path to the change are
//! copied; everything else is shared with the input through its `Arc`.
//! Operations addressing an id that is not in the tree return an equal state.

use std::sync::Arc;

use super::{
    QuestionId, QuestionNode, SheetState, SubtopicId, SubtopicNode, TopicId, TopicNode,
};
use crate::models::{DEFAULT_DIFFICULTY, DEFAULT_LINK};

/// Partial update of a question's display fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPatch {
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub link: Option<String>,
}

/// One end of a question drag: the container and the slot within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropLocation {
    pub topic: TopicId,
    pub subtopic: SubtopicId,
    pub index: usize,
}

/// Move the element at `from` to `to`. Returns false when nothing moved.
///
/// `to` past the end means "last". A `from` outside the sequence is ignored.
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || from == to {
        return false;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    true
}

fn with_topic(
    state: &SheetState,
    topic: TopicId,
    f: impl FnOnce(&mut TopicNode),
) -> SheetState {
    let mut next = state.clone();
    if let Some(slot) = next.topics.iter_mut().find(|t| t.id == topic) {
        f(Arc::make_mut(slot));
    }
    next
}

fn with_subtopic(
    state: &SheetState,
    topic: TopicId,
    subtopic: SubtopicId,
    f: impl FnOnce(&mut SubtopicNode),
) -> SheetState {
    if state.subtopic(topic, subtopic).is_none() {
        return state.clone();
    }
    with_topic(state, topic, |t| {
        if let Some(slot) = t.subtopics.iter_mut().find(|s| s.id == subtopic) {
            f(Arc::make_mut(slot));
        }
    })
}

fn with_question(
    state: &SheetState,
    topic: TopicId,
    subtopic: SubtopicId,
    question: QuestionId,
    f: impl FnOnce(&mut QuestionNode),
) -> SheetState {
    let exists = state
        .subtopic(topic, subtopic)
        .and_then(|s| s.question(question))
        .is_some();
    if !exists {
        return state.clone();
    }
    with_subtopic(state, topic, subtopic, |s| {
        if let Some(slot) = s.questions.iter_mut().find(|q| q.id == question) {
            f(Arc::make_mut(slot));
        }
    })
}

// ==================== TOPICS ====================

pub fn add_topic(state: &SheetState, id: TopicId, title: &str) -> SheetState {
    let mut next = state.clone();
    next.topics.push(Arc::new(TopicNode {
        id,
        title: title.to_string(),
        subtopics: Vec::new(),
    }));
    next
}

pub fn rename_topic(state: &SheetState, topic: TopicId, title: &str) -> SheetState {
    if state.topic(topic).is_none() {
        return state.clone();
    }
    with_topic(state, topic, |t| t.title = title.to_string())
}

/// Remove a topic with all its subtopics and questions.
pub fn delete_topic(state: &SheetState, topic: TopicId) -> SheetState {
    let Some(removed) = state.topic(topic) else {
        return state.clone();
    };

    let mut next = state.clone();
    for q in removed.questions() {
        next.completion.remove(q.id);
    }
    next.collapse.forget_topic(topic);
    next.topics.retain(|t| t.id != topic);
    next
}

pub fn reorder_topics(state: &SheetState, from: usize, to: usize) -> SheetState {
    let mut next = state.clone();
    move_item(&mut next.topics, from, to);
    next
}

// ==================== SUBTOPICS ====================

pub fn add_subtopic(
    state: &SheetState,
    topic: TopicId,
    id: SubtopicId,
    title: &str,
) -> SheetState {
    if state.topic(topic).is_none() {
        return state.clone();
    }
    with_topic(state, topic, |t| {
        t.subtopics.push(Arc::new(SubtopicNode {
            id,
            title: title.to_string(),
            questions: Vec::new(),
        }))
    })
}

pub fn rename_subtopic(
    state: &SheetState,
    topic: TopicId,
    subtopic: SubtopicId,
    title: &str,
) -> SheetState {
    with_subtopic(state, topic, subtopic, |s| s.title = title.to_string())
}

/// Remove a subtopic with all its questions.
pub fn delete_subtopic(state: &SheetState, topic: TopicId, subtopic: SubtopicId) -> SheetState {
    let Some(removed) = state.subtopic(topic, subtopic) else {
        return state.clone();
    };
    let question_ids: Vec<QuestionId> = removed.questions.iter().map(|q| q.id).collect();

    let mut next = with_topic(state, topic, |t| t.subtopics.retain(|s| s.id != subtopic));
    for id in question_ids {
        next.completion.remove(id);
    }
    next.collapse.forget_subtopic(topic, subtopic);
    next
}

pub fn reorder_subtopics(state: &SheetState, topic: TopicId, from: usize, to: usize) -> SheetState {
    let movable = state
        .topic(topic)
        .is_some_and(|t| from < t.subtopics.len() && from != to);
    if !movable {
        return state.clone();
    }
    with_topic(state, topic, |t| {
        move_item(&mut t.subtopics, from, to);
    })
}

// ==================== QUESTIONS ====================

/// Append a question with default difficulty and link; it starts incomplete.
pub fn add_question(
    state: &SheetState,
    topic: TopicId,
    subtopic: SubtopicId,
    id: QuestionId,
    title: &str,
) -> SheetState {
    if state.subtopic(topic, subtopic).is_none() {
        return state.clone();
    }
    let mut next = with_subtopic(state, topic, subtopic, |s| {
        s.questions.push(Arc::new(QuestionNode {
            id,
            title: title.to_string(),
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            link: DEFAULT_LINK.to_string(),
        }))
    });
    next.completion.set(id, false);
    next
}

pub fn rename_question(
    state: &SheetState,
    topic: TopicId,
    subtopic: SubtopicId,
    question: QuestionId,
    title: &str,
) -> SheetState {
    with_question(state, topic, subtopic, question, |q| {
        q.title = title.to_string()
    })
}

pub fn update_question(
    state: &SheetState,
    topic: TopicId,
    subtopic: SubtopicId,
    question: QuestionId,
    patch: &QuestionPatch,
) -> SheetState {
    with_question(state, topic, subtopic, question, |q| {
        if let Some(title) = &patch.title {
            q.title = title.clone();
        }
        if let Some(difficulty) = &patch.difficulty {
            q.difficulty = difficulty.clone();
        }
        if let Some(link) = &patch.link {
            q.link = link.clone();
        }
    })
}

pub fn delete_question(
    state: &SheetState,
    topic: TopicId,
    subtopic: SubtopicId,
    question: QuestionId,
) -> SheetState {
    let exists = state
        .subtopic(topic, subtopic)
        .and_then(|s| s.question(question))
        .is_some();
    if !exists {
        return state.clone();
    }
    let mut next = with_subtopic(state, topic, subtopic, |s| {
        s.questions.retain(|q| q.id != question)
    });
    next.completion.remove(question);
    next
}

pub fn reorder_questions(
    state: &SheetState,
    topic: TopicId,
    subtopic: SubtopicId,
    from: usize,
    to: usize,
) -> SheetState {
    let movable = state
        .subtopic(topic, subtopic)
        .is_some_and(|s| from < s.questions.len() && from != to);
    if !movable {
        return state.clone();
    }
    with_subtopic(state, topic, subtopic, |s| {
        move_item(&mut s.questions, from, to);
    })
}

/// Apply a finished question drag. Moves between different containers are ignored.
pub fn drop_question(
    state: &SheetState,
    source: DropLocation,
    destination: DropLocation,
) -> SheetState {
    if source.topic != destination.topic || source.subtopic != destination.subtopic {
        return state.clone();
    }
    reorder_questions(
        state,
        source.topic,
        source.subtopic,
        source.index,
        destination.index,
    )
}

// ==================== COMPLETION & COLLAPSE ====================

pub fn toggle_complete(state: &SheetState, question: QuestionId) -> SheetState {
    let mut next = state.clone();
    next.completion.toggle(question);
    next
}

pub fn toggle_topic_collapse(state: &SheetState, topic: TopicId) -> SheetState {
    let mut next = state.clone();
    next.collapse.toggle_topic(topic);
    next
}

pub fn toggle_subtopic_collapse(
    state: &SheetState,
    topic: TopicId,
    subtopic: SubtopicId,
) -> SheetState {
    let mut next = state.clone();
    next.collapse.toggle_subtopic(topic, subtopic);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeedRecord;
    use crate::sheet::{normalize, sheet_progress};

    fn arrays_sheet() -> SheetState {
        normalize(vec![
            SeedRecord::new("Arrays", "Basics", "Two Sum").with_difficulty("Easy"),
            SeedRecord::new("Arrays", "Basics", "Max Subarray").with_difficulty("Medium"),
        ])
    }

    fn three_topics() -> SheetState {
        normalize(vec![
            SeedRecord::new("Arrays", "Basics", "a"),
            SeedRecord::new("Graphs", "BFS", "b"),
            SeedRecord::new("Graphs", "BFS", "c"),
            SeedRecord::new("Graphs", "BFS", "d"),
            SeedRecord::new("Graphs", "DFS", "e"),
            SeedRecord::new("Strings", "General", "f"),
        ])
    }

    fn question_titles(state: &SheetState, topic: usize, sub: usize) -> Vec<String> {
        state.topics[topic].subtopics[sub]
            .questions
            .iter()
            .map(|q| q.title.clone())
            .collect()
    }

    fn topic_ids(state: &SheetState) -> Vec<TopicId> {
        state.topics.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_add_topic_on_empty_sheet() {
        let state = add_topic(&SheetState::new(), TopicId::new(), "Graphs");
        assert_eq!(state.topics.len(), 1);
        assert_eq!(state.topics[0].title, "Graphs");
        assert!(state.topics[0].subtopics.is_empty());
        assert_eq!(sheet_progress(&state).total, 0);
    }

    #[test]
    fn test_input_state_is_untouched() {
        let before = three_topics();
        let snapshot = before.clone();
        let graphs = before.topics[1].id;
        let bfs = before.topics[1].subtopics[0].id;

        let _ = add_question(&before, graphs, bfs, QuestionId::new(), "new");
        let _ = rename_topic(&before, graphs, "Trees");
        let _ = delete_topic(&before, graphs);
        let _ = reorder_questions(&before, graphs, bfs, 0, 2);
        let _ = toggle_complete(&before, before.topics[0].subtopics[0].questions[0].id);

        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_untouched_branches_are_shared() {
        let before = three_topics();
        let graphs = before.topics[1].id;
        let bfs = before.topics[1].subtopics[0].id;

        let after = reorder_questions(&before, graphs, bfs, 0, 2);

        assert!(Arc::ptr_eq(&before.topics[0], &after.topics[0]));
        assert!(Arc::ptr_eq(&before.topics[2], &after.topics[2]));
        assert!(!Arc::ptr_eq(&before.topics[1], &after.topics[1]));
        // DFS sits beside the touched subtopic and is shared too.
        assert!(Arc::ptr_eq(
            &before.topics[1].subtopics[1],
            &after.topics[1].subtopics[1]
        ));
    }

    #[test]
    fn test_add_subtopic_unknown_topic_is_noop() {
        let before = three_topics();
        let after = add_subtopic(&before, TopicId::new(), SubtopicId::new(), "Heaps");
        assert_eq!(after, before);
    }

    #[test]
    fn test_add_question_defaults() {
        let before = arrays_sheet();
        let topic = before.topics[0].id;
        let sub = before.topics[0].subtopics[0].id;
        let id = QuestionId::new();

        let after = add_question(&before, topic, sub, id, "Three Sum");
        let q = after.subtopic(topic, sub).unwrap().question(id).unwrap();
        assert_eq!(q.title, "Three Sum");
        assert_eq!(q.difficulty, "Unknown");
        assert_eq!(q.link, "#");
        assert!(!after.is_complete(id));
        assert_eq!(question_titles(&after, 0, 0).len(), 3);
    }

    #[test]
    fn test_rename_keeps_identity_and_completion() {
        let mut before = arrays_sheet();
        let topic = before.topics[0].id;
        let sub = before.topics[0].subtopics[0].id;
        let q = before.topics[0].subtopics[0].questions[0].id;
        before.completion.toggle(q);

        let after = rename_topic(&before, topic, "Array Problems");
        let after = rename_subtopic(&after, topic, sub, "Warmup");
        let after = rename_question(&after, topic, sub, q, "2Sum");

        assert_eq!(after.topics[0].id, topic);
        assert_eq!(after.topics[0].title, "Array Problems");
        assert_eq!(after.topics[0].subtopics[0].title, "Warmup");
        assert_eq!(after.topics[0].subtopics[0].questions[0].id, q);
        assert_eq!(after.topics[0].subtopics[0].questions[0].title, "2Sum");
        assert!(after.is_complete(q));
    }

    #[test]
    fn test_update_question_patch() {
        let before = arrays_sheet();
        let topic = before.topics[0].id;
        let sub = before.topics[0].subtopics[0].id;
        let q = before.topics[0].subtopics[0].questions[1].id;

        let patch = QuestionPatch {
            difficulty: Some("Hard".to_string()),
            link: Some("https://example.com/kadane".to_string()),
            ..QuestionPatch::default()
        };
        let after = update_question(&before, topic, sub, q, &patch);
        let node = after.subtopic(topic, sub).unwrap().question(q).unwrap();
        assert_eq!(node.title, "Max Subarray");
        assert_eq!(node.difficulty, "Hard");
        assert_eq!(node.link, "https://example.com/kadane");
    }

    #[test]
    fn test_delete_topic_cascades_and_prunes_completion() {
        let mut before = arrays_sheet();
        let topic = before.topics[0].id;
        let ids: Vec<_> = before.questions().map(|q| q.id).collect();
        for id in &ids {
            before.completion.toggle(*id);
        }
        before.collapse.toggle_topic(topic);

        let after = delete_topic(&before, topic);
        assert!(after.topics.is_empty());
        for id in ids {
            assert!(!after.is_complete(id));
        }
        assert!(after.completion.is_empty());
        assert!(!after.collapse.is_topic_collapsed(topic));
    }

    #[test]
    fn test_delete_subtopic_and_question() {
        let before = three_topics();
        let graphs = before.topics[1].id;
        let bfs = before.topics[1].subtopics[0].id;
        let dfs = before.topics[1].subtopics[1].id;
        let c = before.topics[1].subtopics[0].questions[1].id;

        let after = delete_question(&before, graphs, bfs, c);
        assert_eq!(question_titles(&after, 1, 0), ["b", "d"]);

        let after = delete_subtopic(&after, graphs, bfs);
        assert_eq!(after.topics[1].subtopics.len(), 1);
        assert_eq!(after.topics[1].subtopics[0].id, dfs);
        assert_eq!(sheet_progress(&after).total, 3);
    }

    #[test]
    fn test_delete_unknown_ids_is_noop() {
        let before = three_topics();
        let graphs = before.topics[1].id;
        let bfs = before.topics[1].subtopics[0].id;

        assert_eq!(delete_topic(&before, TopicId::new()), before);
        assert_eq!(delete_subtopic(&before, graphs, SubtopicId::new()), before);
        assert_eq!(delete_question(&before, graphs, bfs, QuestionId::new()), before);
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let before = three_topics();
        let graphs = before.topics[1].id;
        let bfs = before.topics[1].subtopics[0].id;

        assert_eq!(reorder_topics(&before, 1, 1), before);
        assert_eq!(reorder_subtopics(&before, graphs, 0, 0), before);
        assert_eq!(reorder_questions(&before, graphs, bfs, 2, 2), before);
    }

    #[test]
    fn test_reorder_questions_moves_element() {
        let before = three_topics();
        let graphs = before.topics[1].id;
        let bfs = before.topics[1].subtopics[0].id;

        let after = reorder_questions(&before, graphs, bfs, 0, 2);
        assert_eq!(question_titles(&after, 1, 0), ["c", "d", "b"]);

        let back = reorder_questions(&after, graphs, bfs, 2, 0);
        assert_eq!(question_titles(&back, 1, 0), ["b", "c", "d"]);
    }

    #[test]
    fn test_reorder_is_permutation() {
        let before = three_topics();
        let mut expected = topic_ids(&before);
        expected.sort();

        for from in 0..4 {
            for to in 0..4 {
                let after = reorder_topics(&before, from, to);
                let mut ids = topic_ids(&after);
                assert_eq!(ids.len(), 3);
                ids.sort();
                assert_eq!(ids, expected);
            }
        }
    }

    #[test]
    fn test_reorder_out_of_range() {
        let before = three_topics();
        assert_eq!(reorder_topics(&before, 7, 0), before);

        let after = reorder_topics(&before, 0, 99);
        let titles: Vec<_> = after.topics.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Graphs", "Strings", "Arrays"]);
    }

    #[test]
    fn test_reorder_subtopics() {
        let before = three_topics();
        let graphs = before.topics[1].id;
        let after = reorder_subtopics(&before, graphs, 1, 0);
        let titles: Vec<_> = after.topics[1]
            .subtopics
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, ["DFS", "BFS"]);
    }

    #[test]
    fn test_drop_across_containers_is_noop() {
        let before = three_topics();
        let graphs = before.topics[1].id;
        let bfs = before.topics[1].subtopics[0].id;
        let dfs = before.topics[1].subtopics[1].id;

        let cross = drop_question(
            &before,
            DropLocation { topic: graphs, subtopic: bfs, index: 0 },
            DropLocation { topic: graphs, subtopic: dfs, index: 0 },
        );
        assert_eq!(cross, before);

        let same = drop_question(
            &before,
            DropLocation { topic: graphs, subtopic: bfs, index: 2 },
            DropLocation { topic: graphs, subtopic: bfs, index: 0 },
        );
        assert_eq!(question_titles(&same, 1, 0), ["d", "b", "c"]);
    }

    #[test]
    fn test_reorder_does_not_swap_completion() {
        let mut before = three_topics();
        let graphs = before.topics[1].id;
        let bfs = before.topics[1].subtopics[0].id;
        let b = before.topics[1].subtopics[0].questions[0].id;
        before.completion.toggle(b);

        let after = reorder_questions(&before, graphs, bfs, 0, 2);
        let moved = &after.topics[1].subtopics[0].questions[2];
        assert_eq!(moved.id, b);
        assert!(after.is_complete(moved.id));
        assert!(!after.is_complete(after.topics[1].subtopics[0].questions[0].id));
    }
}
