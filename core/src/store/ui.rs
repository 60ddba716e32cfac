//! UI slice: global loading flag, global error and the single toast

use std::time::Duration;

/// Default toast lifetime
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3_000);

/// Toast flavour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    /// Something worked
    Success,
    /// Something failed
    Error,
    /// Neutral notice
    Info,
}

/// A short-lived notice
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Identity checked by the expiry timer
    pub id: u64,
    /// Flavour
    pub kind: ToastKind,
    /// Text
    pub message: String,
    /// How long the toast stays up
    pub duration: Duration,
}

/// UI slice
#[derive(Debug)]
pub struct UiState {
    loading: bool,
    error: Option<String>,
    toast: Option<Toast>,
    next_toast_id: u64,
    toast_duration: Duration,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl UiState {
    /// Empty slice with the given default toast lifetime
    #[must_use]
    pub fn new(toast_duration: Duration) -> Self {
        Self {
            loading: false,
            error: None,
            toast: None,
            next_toast_id: 1,
            toast_duration,
        }
    }

    /// Global loading flag
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Set the global loading flag
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Global error
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Set or clear the global error
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Toast currently shown
    #[must_use]
    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Show a toast with the default lifetime, replacing any current one
    ///
    /// Returns the toast so the caller can schedule its expiry.
    pub fn show_toast(&mut self, kind: ToastKind, message: impl Into<String>) -> Toast {
        self.show_toast_for(kind, message, self.toast_duration)
    }

    /// Show a toast with an explicit lifetime
    pub fn show_toast_for(
        &mut self,
        kind: ToastKind,
        message: impl Into<String>,
        duration: Duration,
    ) -> Toast {
        let toast = Toast {
            id: self.next_toast_id,
            kind,
            message: message.into(),
            duration,
        };
        self.next_toast_id += 1;
        self.toast = Some(toast.clone());
        toast
    }

    /// Timer for toast `id` fired; clears it only if it is still shown
    ///
    /// Returns whether the toast was cleared.
    pub fn expire_toast(&mut self, id: u64) -> bool {
        if self.toast.as_ref().is_some_and(|t| t.id == id) {
            self.toast = None;
            true
        } else {
            false
        }
    }

    /// Clear the toast regardless of id
    pub fn clear_toast(&mut self) {
        self.toast = None;
    }

    /// Back to the initial state (toast ids keep increasing)
    pub fn reset(&mut self) {
        self.loading = false;
        self.error = None;
        self.toast = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_duration() {
        let mut ui = UiState::default();
        let toast = ui.show_toast(ToastKind::Info, "hello");
        assert_eq!(toast.duration, Duration::from_millis(3_000));
        assert_eq!(ui.toast(), Some(&toast));
    }

    #[test]
    fn test_stale_timer_does_not_clear_newer_toast() {
        let mut ui = UiState::default();
        let first = ui.show_toast(ToastKind::Info, "first");
        let second = ui.show_toast(ToastKind::Error, "second");

        assert!(!ui.expire_toast(first.id));
        assert_eq!(ui.toast().map(|t| t.message.as_str()), Some("second"));

        assert!(ui.expire_toast(second.id));
        assert!(ui.toast().is_none());
    }

    #[test]
    fn test_reset_keeps_ids_unique() {
        let mut ui = UiState::default();
        ui.set_loading(true);
        ui.set_error(Some("boom".to_string()));
        let before = ui.show_toast(ToastKind::Success, "ok");
        ui.reset();
        assert!(!ui.is_loading());
        assert_eq!(ui.error(), None);
        let after = ui.show_toast(ToastKind::Success, "ok");
        assert!(after.id > before.id);
    }
}
