//! Interaction routing.
//!
//! Each widget owns a [`DispatchTable`] mapping an [`InteractionKind`] to the
//! handler for its mode. Events whose kind has no entry are ignored, which is
//! how single-value widgets ignore key handling and chip removal.

use std::collections::HashMap;

use crate::menu::MenuAction;
use crate::widget::{Ctx, Widget, multi, single};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Focus,
    Input,
    Blur,
    KeyDown,
    Activate,
    RemoveChip,
    OutsideClick,
}

/// Keys the widgets react to; everything else is [`Key::Other`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Comma,
    Backspace,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "," => Self::Comma,
            "Backspace" => Self::Backspace,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetEvent {
    Focus,
    /// The input's value after user editing.
    Input(String),
    Blur,
    KeyDown(Key),
    /// A menu button was clicked.
    Activate(MenuAction),
    /// A chip's remove control was clicked; carries the chip's normalized key.
    RemoveChip(String),
    /// A document click landed outside the widget's container.
    OutsideClick,
}

impl WidgetEvent {
    pub fn kind(&self) -> InteractionKind {
        match self {
            Self::Focus => InteractionKind::Focus,
            Self::Input(_) => InteractionKind::Input,
            Self::Blur => InteractionKind::Blur,
            Self::KeyDown(_) => InteractionKind::KeyDown,
            Self::Activate(_) => InteractionKind::Activate,
            Self::RemoveChip(_) => InteractionKind::RemoveChip,
            Self::OutsideClick => InteractionKind::OutsideClick,
        }
    }
}

/// What the host should do with the native event afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub prevent_default: bool,
}

impl EventOutcome {
    pub const PREVENT_DEFAULT: Self = Self {
        prevent_default: true,
    };
}

pub(crate) type Handler = fn(&mut Widget, &mut Ctx<'_>, WidgetEvent) -> EventOutcome;

#[derive(Clone)]
pub(crate) struct DispatchTable {
    handlers: HashMap<InteractionKind, Handler>,
}

impl DispatchTable {
    fn common() -> HashMap<InteractionKind, Handler> {
        let mut handlers: HashMap<InteractionKind, Handler> = HashMap::new();
        handlers.insert(InteractionKind::Focus, Widget::on_focus);
        handlers.insert(InteractionKind::Input, Widget::on_input);
        handlers.insert(InteractionKind::Blur, Widget::on_blur);
        handlers.insert(InteractionKind::OutsideClick, Widget::on_outside_click);
        handlers
    }

    pub(crate) fn single() -> Self {
        let mut handlers = Self::common();
        handlers.insert(InteractionKind::Activate, single::on_activate);
        Self { handlers }
    }

    pub(crate) fn multi() -> Self {
        let mut handlers = Self::common();
        handlers.insert(InteractionKind::Activate, multi::on_activate);
        handlers.insert(InteractionKind::KeyDown, multi::on_keydown);
        handlers.insert(InteractionKind::RemoveChip, multi::on_remove_chip);
        Self { handlers }
    }

    pub(crate) fn get(&self, kind: InteractionKind) -> Option<Handler> {
        self.handlers.get(&kind).copied()
    }

    #[cfg(test)]
    pub(crate) fn handles(&self, kind: InteractionKind) -> bool {
        self.handlers.contains_key(&kind)
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort_by_key(|k| format!("{k:?}"));
        f.debug_struct("DispatchTable").field("kinds", &kinds).finish()
    }
}
