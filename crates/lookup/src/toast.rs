use std::time::{Duration, Instant};

/// Single-slot transient message. A new message replaces the current one and
/// restarts the hide timer; nothing is queued.
#[derive(Clone, Debug, Default)]
pub struct Toast {
    message: Option<String>,
    hide_at: Option<Instant>,
}

impl Toast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, message: impl Into<String>, duration: Duration, now: Instant) {
        self.message = Some(message.into());
        self.hide_at = Some(now + duration);
    }

    /// Hide the message if its time is up. Returns `true` when it was hidden.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(at) if now >= at => {
                self.message = None;
                self.hide_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.hide_at
    }
}
