//! Sync layer: local sheet state that forwards its changes to the server.
//!
//! Updates are optimistic. A dispatched action is applied locally at once; the
//! resulting snapshot is then sent with an independent `PUT /api/sheet` that nothing
//! waits on. A failed write is logged and left alone: local and remote stay divergent
//! until the next [`SyncedSheet::reload`], which overwrites local state with the
//! server's.

mod client;

pub use client::SheetClient;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::errors::AppError;
use crate::sheet::{
    check_title_conflict, reduce, sheet_progress, validate_title, Progress, SheetAction,
    SheetState,
};

/// Explicit state container with a single dispatcher.
#[derive(Debug)]
pub struct SyncedSheet {
    state: SheetState,
    remote: Option<SheetClient>,
}

impl SyncedSheet {
    /// State that never leaves this process.
    pub fn local(state: SheetState) -> Self {
        Self {
            state,
            remote: None,
        }
    }

    /// State mirrored to the server behind `client`.
    pub fn remote(state: SheetState, client: SheetClient) -> Self {
        Self {
            state,
            remote: Some(client),
        }
    }

    pub fn state(&self) -> &SheetState {
        &self.state
    }

    pub fn progress(&self) -> Progress {
        sheet_progress(&self.state)
    }

    /// Validate and apply `action`, then fire off the remote write if it changes
    /// persisted state.
    ///
    /// Returns the handle of the spawned write so callers may await it; local state is
    /// already updated when this returns. A blank title, or one already used by a sibling,
    /// is rejected with no state change.
    pub fn dispatch(&mut self, action: SheetAction) -> Result<Option<JoinHandle<()>>, AppError> {
        let mut action = action;
        if let Some(title) = action.title().map(validate_title).transpose()? {
            action = action.with_title(title);
        }
        check_title_conflict(&self.state, &action)?;

        let runtime = match (&self.remote, action.is_persistent()) {
            (Some(_), true) => Some(Handle::try_current().map_err(|_| {
                AppError::Internal("Remote sync requires a Tokio runtime".to_string())
            })?),
            _ => None,
        };

        self.state = reduce(&self.state, action);

        let (Some(runtime), Some(client)) = (runtime, self.remote.clone()) else {
            return Ok(None);
        };
        let snapshot = self.state.to_document();
        Ok(Some(runtime.spawn(async move {
            match client.put_sheet(&snapshot).await {
                Ok(stored) => {
                    tracing::debug!(revision = ?stored.revision, "Sheet synced");
                }
                Err(e) => {
                    tracing::warn!("Sheet sync failed, local state is ahead of server: {}", e);
                }
            }
        })))
    }

    /// Replace local state with the server's copy. Collapse flags are reset.
    pub async fn reload(&mut self) -> Result<(), AppError> {
        let Some(client) = &self.remote else {
            return Ok(());
        };
        let document = client.fetch_sheet().await?;
        self.state = SheetState::from_document(&document);
        tracing::debug!(topics = self.state.topics.len(), "Reloaded sheet from server");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::TopicId;

    #[test]
    fn test_local_dispatch_applies_immediately() {
        let mut sheet = SyncedSheet::local(SheetState::new());
        let handle = sheet.dispatch(SheetAction::add_topic("  Graphs  ")).unwrap();

        assert!(handle.is_none());
        assert_eq!(sheet.state().topics.len(), 1);
        assert_eq!(sheet.state().topics[0].title, "Graphs");
    }

    #[test]
    fn test_blank_title_is_rejected_without_change() {
        let mut sheet = SyncedSheet::local(SheetState::new());
        let err = sheet.dispatch(SheetAction::add_topic("   ")).unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(sheet.state().topics.is_empty());
    }

    #[test]
    fn test_duplicate_topic_title_is_rejected() {
        let mut sheet = SyncedSheet::local(SheetState::new());
        sheet.dispatch(SheetAction::add_topic("Graphs")).unwrap();
        sheet.dispatch(SheetAction::add_topic("Trees")).unwrap();
        let before = sheet.state().clone();

        let err = sheet.dispatch(SheetAction::add_topic(" Graphs ")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let trees = sheet.state().topics[1].id;
        let err = sheet
            .dispatch(SheetAction::RenameTopic {
                topic: trees,
                title: "Graphs".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(sheet.state(), &before);

        // Renaming to its own title is fine
        sheet
            .dispatch(SheetAction::RenameTopic {
                topic: trees,
                title: "Trees".to_string(),
            })
            .unwrap();
    }

    #[test]
    fn test_duplicate_subtopic_title_is_rejected_within_topic() {
        let mut sheet = SyncedSheet::local(SheetState::new());
        sheet.dispatch(SheetAction::add_topic("Graphs")).unwrap();
        sheet.dispatch(SheetAction::add_topic("Trees")).unwrap();
        let graphs = sheet.state().topics[0].id;
        let trees = sheet.state().topics[1].id;

        sheet.dispatch(SheetAction::add_subtopic(graphs, "BFS")).unwrap();
        sheet.dispatch(SheetAction::add_subtopic(graphs, "DFS")).unwrap();
        let before = sheet.state().clone();

        let err = sheet
            .dispatch(SheetAction::add_subtopic(graphs, "BFS"))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let dfs = sheet.state().topics[0].subtopics[1].id;
        let err = sheet
            .dispatch(SheetAction::RenameSubtopic {
                topic: graphs,
                subtopic: dfs,
                title: "BFS ".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(sheet.state(), &before);

        // Same name under another topic is allowed
        sheet.dispatch(SheetAction::add_subtopic(trees, "BFS")).unwrap();
        assert_eq!(sheet.state().topics[1].subtopics.len(), 1);
    }

    #[test]
    fn test_collapse_toggle_stays_local() {
        let mut sheet = SyncedSheet::local(SheetState::new());
        sheet.dispatch(SheetAction::add_topic("Graphs")).unwrap();
        let topic: TopicId = sheet.state().topics[0].id;

        sheet
            .dispatch(SheetAction::ToggleTopicCollapse { topic })
            .unwrap();
        assert!(sheet.state().collapse.is_topic_collapsed(topic));
        assert_eq!(sheet.progress().total, 0);
    }
}
