//! Single-value behaviour: a menu choice becomes the input's value.

use input_core::trimmed;

use super::{Ctx, Phase, Widget};
use crate::dispatch::{EventOutcome, WidgetEvent};
use crate::menu::MenuAction;

pub(crate) fn on_activate(w: &mut Widget, ctx: &mut Ctx<'_>, event: WidgetEvent) -> EventOutcome {
    let WidgetEvent::Activate(action) = event else {
        return EventOutcome::default();
    };
    if !w.menu_visible || !w.menu.offers(&action) {
        log::debug!(target: "lookup.widget", "{}: ignoring {action:?}, not on the menu", w.element);
        return EventOutcome::default();
    }

    match action {
        MenuAction::Select(value) => select(w, ctx, &value),
        MenuAction::Add(value) => add_value(w, ctx, &value),
        MenuAction::Delete(value) => delete_value(w, ctx, &value),
        MenuAction::AddLocal(_) | MenuAction::AddToLookup(_) => {}
    }
    EventOutcome::default()
}

fn select(w: &mut Widget, ctx: &mut Ctx<'_>, value: &str) {
    w.assign_value(ctx, value);
    w.hide_menu();
    w.phase = Phase::Selected;
}

/// Optimistic add: the value is used right away and persisted in the
/// background; the outcome of the create request never changes the UI.
fn add_value(w: &mut Widget, ctx: &mut Ctx<'_>, value: &str) {
    if trimmed(value).is_none() {
        return;
    }
    let message = format!("Saved locally to '{}': '{value}' (DB sync async).", w.config.key);
    w.notify(ctx, message);
    w.create(ctx, value);
    select(w, ctx, value);
}

fn delete_value(w: &mut Widget, ctx: &mut Ctx<'_>, value: &str) {
    if trimmed(value).is_none() {
        return;
    }
    let message = format!("Removed locally from '{}': '{value}' (DB sync async).", w.config.key);
    w.notify(ctx, message);
    w.delete_from_source(ctx, value);
}
