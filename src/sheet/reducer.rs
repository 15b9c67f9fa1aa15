//! Single dispatch point: every user action is a value reduced against the state.

use super::mutations::{self, DropLocation, QuestionPatch};
use super::{QuestionId, SheetState, SubtopicId, TopicId};
use crate::errors::AppError;

/// Everything a user can do to a sheet.
///
/// Actions that create nodes carry the new id, so reducing the same action twice gives
/// the same result. Use the `add_*` constructors to mint one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetAction {
    AddTopic {
        id: TopicId,
        title: String,
    },
    RenameTopic {
        topic: TopicId,
        title: String,
    },
    DeleteTopic {
        topic: TopicId,
    },
    ReorderTopics {
        from: usize,
        to: usize,
    },
    AddSubtopic {
        topic: TopicId,
        id: SubtopicId,
        title: String,
    },
    RenameSubtopic {
        topic: TopicId,
        subtopic: SubtopicId,
        title: String,
    },
    DeleteSubtopic {
        topic: TopicId,
        subtopic: SubtopicId,
    },
    ReorderSubtopics {
        topic: TopicId,
        from: usize,
        to: usize,
    },
    AddQuestion {
        topic: TopicId,
        subtopic: SubtopicId,
        id: QuestionId,
        title: String,
    },
    RenameQuestion {
        topic: TopicId,
        subtopic: SubtopicId,
        question: QuestionId,
        title: String,
    },
    UpdateQuestion {
        topic: TopicId,
        subtopic: SubtopicId,
        question: QuestionId,
        patch: QuestionPatch,
    },
    DeleteQuestion {
        topic: TopicId,
        subtopic: SubtopicId,
        question: QuestionId,
    },
    ReorderQuestions {
        topic: TopicId,
        subtopic: SubtopicId,
        from: usize,
        to: usize,
    },
    DropQuestion {
        source: DropLocation,
        destination: DropLocation,
    },
    ToggleComplete {
        question: QuestionId,
    },
    ToggleTopicCollapse {
        topic: TopicId,
    },
    ToggleSubtopicCollapse {
        topic: TopicId,
        subtopic: SubtopicId,
    },
}

impl SheetAction {
    pub fn add_topic(title: impl Into<String>) -> Self {
        SheetAction::AddTopic {
            id: TopicId::new(),
            title: title.into(),
        }
    }

    pub fn add_subtopic(topic: TopicId, title: impl Into<String>) -> Self {
        SheetAction::AddSubtopic {
            topic,
            id: SubtopicId::new(),
            title: title.into(),
        }
    }

    pub fn add_question(topic: TopicId, subtopic: SubtopicId, title: impl Into<String>) -> Self {
        SheetAction::AddQuestion {
            topic,
            subtopic,
            id: QuestionId::new(),
            title: title.into(),
        }
    }

    /// Title carried by the action, if it sets one.
    pub fn title(&self) -> Option<&str> {
        match self {
            SheetAction::AddTopic { title, .. }
            | SheetAction::RenameTopic { title, .. }
            | SheetAction::AddSubtopic { title, .. }
            | SheetAction::RenameSubtopic { title, .. }
            | SheetAction::AddQuestion { title, .. }
            | SheetAction::RenameQuestion { title, .. } => Some(title),
            SheetAction::UpdateQuestion { patch, .. } => patch.title.as_deref(),
            _ => None,
        }
    }

    /// Same action with its title replaced. Actions without a title are returned as-is.
    pub fn with_title(mut self, new_title: String) -> Self {
        match &mut self {
            SheetAction::AddTopic { title, .. }
            | SheetAction::RenameTopic { title, .. }
            | SheetAction::AddSubtopic { title, .. }
            | SheetAction::RenameSubtopic { title, .. }
            | SheetAction::AddQuestion { title, .. }
            | SheetAction::RenameQuestion { title, .. } => *title = new_title,
            SheetAction::UpdateQuestion { patch, .. } => {
                if patch.title.is_some() {
                    patch.title = Some(new_title);
                }
            }
            _ => {}
        }
        self
    }

    /// Whether the action changes what the server stores. Collapse flags never leave
    /// the client.
    pub fn is_persistent(&self) -> bool {
        !matches!(
            self,
            SheetAction::ToggleTopicCollapse { .. } | SheetAction::ToggleSubtopicCollapse { .. }
        )
    }
}

/// Reject an action whose title collides with a sibling's.
///
/// Topic titles are unique within the sheet and subtopic titles within their topic,
/// compared after trimming. Renaming a node to its own title is allowed.
pub fn check_title_conflict(state: &SheetState, action: &SheetAction) -> Result<(), AppError> {
    let conflict = match action {
        SheetAction::AddTopic { id, title }
        | SheetAction::RenameTopic { topic: id, title } => state
            .topics
            .iter()
            .any(|t| t.id != *id && t.title.trim() == title.trim()),
        SheetAction::AddSubtopic { topic, id, title }
        | SheetAction::RenameSubtopic {
            topic,
            subtopic: id,
            title,
        } => state.topic(*topic).is_some_and(|t| {
            t.subtopics
                .iter()
                .any(|s| s.id != *id && s.title.trim() == title.trim())
        }),
        _ => false,
    };

    if conflict {
        return Err(AppError::Validation(format!(
            "Title already in use: {}",
            action.title().unwrap_or_default().trim()
        )));
    }
    Ok(())
}

/// Apply `action` to `state`, returning the next state.
pub fn reduce(state: &SheetState, action: SheetAction) -> SheetState {
    tracing::debug!(?action, "Reducing sheet action");

    match action {
        SheetAction::AddTopic { id, title } => mutations::add_topic(state, id, &title),
        SheetAction::RenameTopic { topic, title } => {
            mutations::rename_topic(state, topic, &title)
        }
        SheetAction::DeleteTopic { topic } => mutations::delete_topic(state, topic),
        SheetAction::ReorderTopics { from, to } => mutations::reorder_topics(state, from, to),
        SheetAction::AddSubtopic { topic, id, title } => {
            mutations::add_subtopic(state, topic, id, &title)
        }
        SheetAction::RenameSubtopic {
            topic,
            subtopic,
            title,
        } => mutations::rename_subtopic(state, topic, subtopic, &title),
        SheetAction::DeleteSubtopic { topic, subtopic } => {
            mutations::delete_subtopic(state, topic, subtopic)
        }
        SheetAction::ReorderSubtopics { topic, from, to } => {
            mutations::reorder_subtopics(state, topic, from, to)
        }
        SheetAction::AddQuestion {
            topic,
            subtopic,
            id,
            title,
        } => mutations::add_question(state, topic, subtopic, id, &title),
        SheetAction::RenameQuestion {
            topic,
            subtopic,
            question,
            title,
        } => mutations::rename_question(state, topic, subtopic, question, &title),
        SheetAction::UpdateQuestion {
            topic,
            subtopic,
            question,
            patch,
        } => mutations::update_question(state, topic, subtopic, question, &patch),
        SheetAction::DeleteQuestion {
            topic,
            subtopic,
            question,
        } => mutations::delete_question(state, topic, subtopic, question),
        SheetAction::ReorderQuestions {
            topic,
            subtopic,
            from,
            to,
        } => mutations::reorder_questions(state, topic, subtopic, from, to),
        SheetAction::DropQuestion {
            source,
            destination,
        } => mutations::drop_question(state, source, destination),
        SheetAction::ToggleComplete { question } => mutations::toggle_complete(state, question),
        SheetAction::ToggleTopicCollapse { topic } => {
            mutations::toggle_topic_collapse(state, topic)
        }
        SheetAction::ToggleSubtopicCollapse { topic, subtopic } => {
            mutations::toggle_subtopic_collapse(state, topic, subtopic)
        }
    }
}
