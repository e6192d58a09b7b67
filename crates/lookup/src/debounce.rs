use std::time::{Duration, Instant};

/// Trailing-edge debouncer driven by an explicit clock.
///
/// Every [`call`](Self::call) replaces the pending value and pushes the
/// deadline out to `now + delay`; [`poll`](Self::poll) hands the value back
/// once the deadline has passed. Only the last call in a burst fires.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn call(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.delay, value));
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    /// Drop the pending call. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
