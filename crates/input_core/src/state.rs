//! Per-element input state.

/// Internal state for a single input element.
///
/// Managed by [`InputValueStore`](crate::InputValueStore).
#[derive(Clone, Debug, Default)]
pub(crate) struct InputState {
    /// The current text value.
    pub value: String,

    /// Monotonic revision counter, incremented on any text change.
    pub value_rev: u64,
}

/// Who caused a value change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeSource {
    /// The host reported user editing.
    User,
    /// A widget assigned the value (selection, add, strict clearing).
    Programmatic,
}

/// A completed value mutation, as handed to change observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueChange {
    pub value: String,
    pub revision: u64,
    pub source: ChangeSource,
}
