//! Multi-value behaviour: choices accumulate as chips behind one hidden field.

use core_types::{RequestId, same_value};
use input_core::trimmed;

use super::{Ctx, Phase, Widget};
use crate::dispatch::{EventOutcome, Key, WidgetEvent};
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
        MenuAction::Select(value) | MenuAction::AddLocal(value) => add_chip_and_reset(w, ctx, &value),
        MenuAction::AddToLookup(value) => persist_and_add(w, ctx, &value),
        MenuAction::Delete(value) => {
            if trimmed(&value).is_some() {
                w.notify(ctx, format!("Removed from lookup: '{value}'"));
                w.delete_from_source(ctx, &value);
            }
        }
        MenuAction::Add(_) => {}
    }
    EventOutcome::default()
}

pub(crate) fn on_keydown(w: &mut Widget, ctx: &mut Ctx<'_>, event: WidgetEvent) -> EventOutcome {
    let WidgetEvent::KeyDown(key) = event else {
        return EventOutcome::default();
    };

    match key {
        Key::Enter | Key::Comma | Key::Tab => {
            let Some(typed) = trimmed(ctx.store.value(w.element)) else {
                return EventOutcome::default();
            };
            let value = if w.config.strict {
                // Only values the backend returned; blur validation handles the rest.
                match w.query.last_items.iter().find(|item| same_value(item, typed)) {
                    Some(known) => known.clone(),
                    None => {
                        log::debug!(target: "lookup.widget", "{}: {typed:?} is not a known value", w.element);
                        return EventOutcome::default();
                    }
                }
            } else {
                typed.to_string()
            };
            add_chip_and_reset(w, ctx, &value);
            EventOutcome::PREVENT_DEFAULT
        }
        Key::Backspace if ctx.store.value(w.element).is_empty() => {
            if let Some(chips) = w.chips_mut()
                && chips.selection.pop_last().is_some()
            {
                chips.hidden.value = chips.selection.serialized();
            }
            EventOutcome::default()
        }
        _ => EventOutcome::default(),
    }
}

/// Local-only removal; the backend value-set is untouched.
pub(crate) fn on_remove_chip(w: &mut Widget, _ctx: &mut Ctx<'_>, event: WidgetEvent) -> EventOutcome {
    let WidgetEvent::RemoveChip(norm) = event else {
        return EventOutcome::default();
    };
    if let Some(chips) = w.chips_mut()
        && chips.selection.remove(&norm).is_some()
    {
        chips.hidden.value = chips.selection.serialized();
    }
    EventOutcome::default()
}

/// A pending "add to lookup" finished; the chip is added whatever the outcome.
pub(crate) fn on_create_done(w: &mut Widget, ctx: &mut Ctx<'_>, request_id: RequestId, value: String, ok: bool) {
    let Some(chips) = w.chips_mut() else {
        return;
    };
    if chips.pending_adds.remove(&request_id).is_none() {
        return;
    }
    if ok {
        w.notify(ctx, format!("Saved to lookup and added: '{value}'"));
    }
    add_chip_and_reset(w, ctx, &value);
}

/// Add a chip (no-op when already selected), then clear the input and close the menu.
fn add_chip_and_reset(w: &mut Widget, ctx: &mut Ctx<'_>, value: &str) {
    if trimmed(value).is_none() {
        return;
    }
    if let Some(chips) = w.chips_mut()
        && chips.selection.insert(value).is_some()
    {
        chips.hidden.value = chips.selection.serialized();
    }
    w.assign_value(ctx, "");
    w.hide_menu();
    w.phase = Phase::Selected;
}

fn persist_and_add(w: &mut Widget, ctx: &mut Ctx<'_>, value: &str) {
    if trimmed(value).is_none() {
        return;
    }
    let request_id = w.create(ctx, value);
    if let Some(chips) = w.chips_mut() {
        chips.pending_adds.insert(request_id, value.to_string());
    }
}
