//! Per-component error slot and loading flag

use crate::error::{AppError, ErrorKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    error: Option<String>,
    loading: bool,
}

impl Notification {
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replace any prior error
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn dismiss(&mut self) {
        self.error = None;
    }

    pub fn start_loading(&mut self) {
        self.loading = true;
    }

    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// Surface a failed `action` (e.g. "load books") as a user-facing message
    pub fn fail(&mut self, action: &str, error: &AppError) {
        tracing::error!("Failed to {}: {}", action, error);
        let message = match error.kind() {
            ErrorKind::Validation => format!("Could not {}: {}", action, error.message()),
            ErrorKind::NotFound => format!("Could not {}: the record no longer exists", action),
            ErrorKind::Transport | ErrorKind::Internal => format!("Failed to {}", action),
        };
        self.set_error(message);
    }
}
