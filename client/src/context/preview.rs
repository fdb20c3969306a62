//! Ephemeral course-builder UI state: preview mode and the open modal.

use tokio::sync::watch;

/// Snapshot of the preview state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewState {
    /// Whether the course is shown as a student would see it.
    pub preview_mode: bool,
    /// Name of the modal currently open.
    pub active_modal: Option<String>,
}

/// Publishes [`PreviewState`] changes.
pub struct PreviewContext {
    state: watch::Sender<PreviewState>,
}

impl Default for PreviewContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewContext {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(PreviewState::default());
        Self { state }
    }

    #[must_use]
    pub fn state(&self) -> PreviewState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PreviewState> {
        self.state.subscribe()
    }

    pub fn set_preview_mode(&self, enabled: bool) {
        self.state.send_modify(|state| state.preview_mode = enabled);
    }

    /// Flip preview mode, returning the new value.
    pub fn toggle_preview_mode(&self) -> bool {
        let mut enabled = false;
        self.state.send_modify(|state| {
            state.preview_mode = !state.preview_mode;
            enabled = state.preview_mode;
        });
        enabled
    }

    /// Open `modal`, replacing any modal already open.
    pub fn open_modal(&self, modal: impl Into<String>) {
        let modal = modal.into();
        self.state.send_modify(|state| state.active_modal = Some(modal));
    }

    pub fn close_modal(&self) {
        self.state.send_modify(|state| state.active_modal = None);
    }

    /// Return to the initial state, e.g. when the builder is closed.
    pub fn reset(&self) {
        self.state.send_replace(PreviewState::default());
    }
}
