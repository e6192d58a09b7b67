//! Element → widget bindings.

use std::collections::BTreeMap;

use core_types::ElementId;

use crate::widget::Widget;

/// Owns every widget, keyed by the input element it is bound to.
///
/// An element has at most one widget; presence in the map is the binding
/// marker.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    widgets: BTreeMap<ElementId, Widget>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self, element: ElementId) -> bool {
        self.widgets.contains_key(&element)
    }

    /// Bind `element` unless it already is. `make` only runs for new bindings.
    pub(crate) fn bind_with(&mut self, element: ElementId, make: impl FnOnce() -> Widget) -> bool {
        if self.is_bound(element) {
            return false;
        }
        self.widgets.insert(element, make());
        true
    }

    pub(crate) fn unbind(&mut self, element: ElementId) -> Option<Widget> {
        self.widgets.remove(&element)
    }

    pub fn get(&self, element: ElementId) -> Option<&Widget> {
        self.widgets.get(&element)
    }

    pub(crate) fn get_mut(&mut self, element: ElementId) -> Option<&mut Widget> {
        self.widgets.get_mut(&element)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Widget> {
        self.widgets.values_mut()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
