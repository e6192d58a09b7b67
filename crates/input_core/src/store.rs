//! Central store for input values and focus.
//!
//! The store does not dispatch events itself. Callers receive a
//! [`ValueChange`] from every mutating call that actually changed something
//! and decide who to notify.

use crate::state::{ChangeSource, InputState, ValueChange};
use crate::text::filter_single_line;
use core_types::ElementId;
use std::collections::HashMap;

/// Values of every tracked input element.
///
/// # Example
///
/// ```
/// use core_types::ElementId;
/// use input_core::{ChangeSource, InputValueStore};
///
/// let mut store = InputValueStore::new();
/// let id = ElementId(1);
///
/// store.ensure_initial(id, "Hel".to_string());
/// let change = store.set(id, "Hello", ChangeSource::User).unwrap();
///
/// assert_eq!(store.get(id), Some("Hello"));
/// assert_eq!(change.revision, 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InputValueStore {
    values: HashMap<ElementId, InputState>,
    focused: Option<ElementId>,
}

impl InputValueStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            focused: None,
        }
    }

    /// Returns the stored value, if any.
    pub fn get(&self, id: ElementId) -> Option<&str> {
        self.values.get(&id).map(|s| s.value.as_str())
    }

    /// The stored value, or `""` for untracked elements.
    pub fn value(&self, id: ElementId) -> &str {
        self.get(id).unwrap_or("")
    }

    /// Monotonic revision counter for the element's value.
    pub fn value_revision(&self, id: ElementId) -> u64 {
        self.values.get(&id).map(|s| s.value_rev).unwrap_or(0)
    }

    /// Ensure an entry exists; if missing, inserts the provided initial value.
    pub fn ensure_initial(&mut self, id: ElementId, initial: String) {
        self.values.entry(id).or_insert(InputState {
            value: filter_single_line(&initial).into_owned(),
            value_rev: 0,
        });
    }

    /// Set/overwrite the value for this element.
    ///
    /// Newlines are stripped. Returns `None` when the value is unchanged.
    pub fn set(&mut self, id: ElementId, value: &str, source: ChangeSource) -> Option<ValueChange> {
        let value = filter_single_line(value);
        let st = self.values.entry(id).or_default();
        if st.value == value {
            return None;
        }
        st.value = value.into_owned();
        st.value_rev = st.value_rev.wrapping_add(1);
        Some(ValueChange {
            value: st.value.clone(),
            revision: st.value_rev,
            source,
        })
    }

    /// Called when an element gains focus.
    pub fn focus(&mut self, id: ElementId) {
        self.values.entry(id).or_default();
        self.focused = Some(id);
    }

    /// Called when an element loses focus. Blurring a non-focused element is a no-op.
    pub fn blur(&mut self, id: ElementId) {
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Forget an element entirely.
    pub fn remove(&mut self, id: ElementId) {
        self.values.remove(&id);
        self.blur(id);
    }
}
