//! Per-element widget state and the handlers shared by both modes.

pub(crate) mod multi;
pub(crate) mod single;


use std::collections::{HashMap, HashSet};
use std::time::Instant;

use bus::{LookupCommand, LookupEvent};
use core_types::{ElementId, RequestId};
use input_core::{ChangeSource, InputValueStore, ValueChange, trimmed};

use crate::config::{LookupMode, LookupSettings, WidgetConfig};
use crate::debounce::Debouncer;
use crate::dispatch::{DispatchTable, EventOutcome, WidgetEvent};
use crate::menu::{Menu, RenderContext, render_menu};
use crate::selection::SelectionSet;
use crate::toast::Toast;

/// Side effects collected while handling one interaction.
///
/// The page flushes them afterwards: commands go to the network runtime,
/// value changes to the element's observers.
#[derive(Debug, Default)]
pub(crate) struct Effects {
    pub commands: Vec<LookupCommand>,
    pub changes: Vec<(ElementId, ValueChange)>,
    next_request_id: RequestId,
}

impl Effects {
    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.next_request_id = self.next_request_id.wrapping_add(1);
        self.next_request_id
    }
}

pub(crate) struct Ctx<'a> {
    pub store: &'a mut InputValueStore,
    pub effects: &'a mut Effects,
    pub settings: &'a LookupSettings,
    pub now: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Querying,
    Rendered,
    Selected,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryState {
    /// Most recently issued search query.
    pub last_query: String,
    /// Items of the last search that was rendered.
    pub last_items: Vec<String>,
    /// Swallow the input echo of the next programmatic assignment.
    pub suppress_next_open: bool,
}

/// Form field holding a multi-value widget's serialized selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HiddenField {
    pub name: String,
    pub value: String,
}

#[derive(Debug)]
pub(crate) struct Chips {
    pub selection: SelectionSet,
    pub hidden: HiddenField,
    /// "Add to lookup" requests waiting for the backend before the chip is added.
    pub pending_adds: HashMap<RequestId, String>,
}

#[derive(Debug)]
enum Variant {
    Single,
    Multi(Chips),
}

#[derive(Debug)]
pub struct Widget {
    element: ElementId,
    container: ElementId,
    config: WidgetConfig,
    variant: Variant,
    phase: Phase,
    query: QueryState,
    debouncer: Debouncer<String>,
    menu: Menu,
    menu_visible: bool,
    toast: Toast,
    outside_click_listener: bool,
    pending_validation: Option<(RequestId, String)>,
    pending_deletes: HashSet<RequestId>,
    table: DispatchTable,
}

impl Widget {
    pub(crate) fn new(
        element: ElementId,
        container: ElementId,
        config: WidgetConfig,
        mode: LookupMode,
        settings: &LookupSettings,
    ) -> Self {
        let (variant, table) = match mode {
            LookupMode::Single => (Variant::Single, DispatchTable::single()),
            LookupMode::Multi => (
                Variant::Multi(Chips {
                    selection: SelectionSet::new(),
                    hidden: HiddenField {
                        name: config.field_name.clone(),
                        value: String::new(),
                    },
                    pending_adds: HashMap::new(),
                }),
                DispatchTable::multi(),
            ),
        };

        Self {
            element,
            container,
            config,
            variant,
            phase: Phase::Idle,
            query: QueryState::default(),
            debouncer: Debouncer::new(settings.debounce()),
            menu: Menu::default(),
            menu_visible: false,
            toast: Toast::new(),
            outside_click_listener: false,
            pending_validation: None,
            pending_deletes: HashSet::new(),
            table,
        }
    }

    // --- read-only views ---

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn mode(&self) -> LookupMode {
        match self.variant {
            Variant::Single => LookupMode::Single,
            Variant::Multi(_) => LookupMode::Multi,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn query_state(&self) -> &QueryState {
        &self.query
    }

    /// The menu, when it is showing.
    pub fn menu(&self) -> Option<&Menu> {
        self.menu_visible.then_some(&self.menu)
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.message()
    }

    pub fn selection(&self) -> Option<&SelectionSet> {
        match &self.variant {
            Variant::Multi(chips) => Some(&chips.selection),
            Variant::Single => None,
        }
    }

    pub fn hidden_field(&self) -> Option<&HiddenField> {
        match &self.variant {
            Variant::Multi(chips) => Some(&chips.hidden),
            Variant::Single => None,
        }
    }

    /// Whether the document-level outside-click listener has been registered.
    pub fn listens_for_outside_clicks(&self) -> bool {
        self.outside_click_listener
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.debouncer.deadline(), self.toast.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // --- routing ---

    pub(crate) fn dispatch(&mut self, ctx: &mut Ctx<'_>, event: WidgetEvent) -> EventOutcome {
        match self.table.get(event.kind()) {
            Some(handler) => handler(self, ctx, event),
            None => {
                log::trace!(target: "lookup.widget", "{}: no handler for {:?}", self.element, event.kind());
                EventOutcome::default()
            }
        }
    }

    pub(crate) fn poll_timers(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(query) = self.debouncer.poll(ctx.now) {
            self.search(ctx, query);
        }
        self.toast.poll(ctx.now);
    }

    pub(crate) fn on_lookup_event(&mut self, ctx: &mut Ctx<'_>, evt: LookupEvent) {
        match evt {
            LookupEvent::SearchDone { query, result, .. } => {
                let items = result.unwrap_or_else(|err| {
                    log::debug!(target: "lookup.widget", "{}: search {query:?} failed, showing no matches: {err}", self.element);
                    Vec::new()
                });
                if query != ctx.store.value(self.element) {
                    log::trace!(target: "lookup.widget", "{}: dropping stale response for {query:?}", self.element);
                    return;
                }
                self.query.last_items = items;
                self.show_menu(&query);
            }

            LookupEvent::ValidateDone { request_id, value, result, .. } => {
                if self.pending_validation.as_ref().map(|(id, _)| *id) != Some(request_id) {
                    return;
                }
                self.pending_validation = None;
                match result {
                    Ok(false) if trimmed(ctx.store.value(self.element)) == Some(value.as_str()) => {
                        log::debug!(target: "lookup.widget", "{}: {value:?} is not a known value, clearing", self.element);
                        self.assign_value(ctx, "");
                    }
                    Ok(_) => {}
                    Err(err) => {
                        log::debug!(target: "lookup.widget", "{}: validation of {value:?} failed, keeping it: {err}", self.element);
                    }
                }
            }

            LookupEvent::CreateDone { request_id, value, result, .. } => {
                if let Err(err) = &result {
                    log::debug!(target: "lookup.widget", "{}: create {value:?} failed: {err}", self.element);
                }
                multi::on_create_done(self, ctx, request_id, value, result.is_ok());
            }

            LookupEvent::DeleteDone { request_id, value, result, .. } => {
                if let Err(err) = &result {
                    log::debug!(target: "lookup.widget", "{}: delete {value:?} failed: {err}", self.element);
                }
                if self.pending_deletes.remove(&request_id) {
                    let query = ctx.store.value(self.element).to_string();
                    self.search(ctx, query);
                }
            }
        }
    }

    // --- shared handlers ---

    pub(crate) fn on_focus(&mut self, ctx: &mut Ctx<'_>, _event: WidgetEvent) -> EventOutcome {
        ctx.store.focus(self.element);
        let query = ctx.store.value(self.element).to_string();
        self.search(ctx, query);
        EventOutcome::default()
    }

    pub(crate) fn on_input(&mut self, ctx: &mut Ctx<'_>, event: WidgetEvent) -> EventOutcome {
        let WidgetEvent::Input(value) = event else {
            return EventOutcome::default();
        };

        if std::mem::take(&mut self.query.suppress_next_open) && value == ctx.store.value(self.element) {
            log::trace!(target: "lookup.widget", "{}: swallowing echo of programmatic value", self.element);
            return EventOutcome::default();
        }

        ctx.store.set(self.element, &value, ChangeSource::User);
        let value = ctx.store.value(self.element).to_string();
        self.debouncer.call(value, ctx.now);
        EventOutcome::default()
    }

    pub(crate) fn on_blur(&mut self, ctx: &mut Ctx<'_>, _event: WidgetEvent) -> EventOutcome {
        ctx.store.blur(self.element);
        if !self.config.strict {
            return EventOutcome::default();
        }
        let Some(value) = trimmed(ctx.store.value(self.element)).map(str::to_string) else {
            return EventOutcome::default();
        };

        let request_id = ctx.effects.next_request_id();
        ctx.effects.commands.push(LookupCommand::Validate {
            element: self.element,
            request_id,
            key: self.config.key.clone(),
            value: value.clone(),
            limit: self.config.limit,
        });
        self.pending_validation = Some((request_id, value));
        EventOutcome::default()
    }

    pub(crate) fn on_outside_click(&mut self, _ctx: &mut Ctx<'_>, _event: WidgetEvent) -> EventOutcome {
        self.hide_menu();
        if self.phase == Phase::Rendered {
            self.phase = Phase::Idle;
        }
        EventOutcome::default()
    }

    // --- building blocks ---

    fn search(&mut self, ctx: &mut Ctx<'_>, query: String) {
        let request_id = ctx.effects.next_request_id();
        ctx.effects.commands.push(LookupCommand::Search {
            element: self.element,
            request_id,
            key: self.config.key.clone(),
            query: query.clone(),
            limit: self.config.limit,
        });
        self.query.last_query = query;
        self.phase = Phase::Querying;
    }

    fn show_menu(&mut self, query: &str) {
        let ctx = RenderContext {
            strict: self.config.strict,
            selection: self.selection(),
        };
        let menu = render_menu(query, &self.query.last_items, ctx);
        self.menu = menu;
        self.menu_visible = true;
        self.phase = Phase::Rendered;

        if !self.outside_click_listener {
            self.outside_click_listener = true;
            log::trace!(target: "lookup.widget", "{}: outside-click listener registered", self.element);
        }
    }

    fn hide_menu(&mut self) {
        self.menu_visible = false;
    }

    /// Set the input value on the widget's behalf.
    ///
    /// Observers are notified even when the value is unchanged, and the
    /// host's echo of the assignment will not reopen the menu.
    fn assign_value(&mut self, ctx: &mut Ctx<'_>, value: &str) {
        let change = ctx
            .store
            .set(self.element, value, ChangeSource::Programmatic)
            .unwrap_or_else(|| ValueChange {
                value: ctx.store.value(self.element).to_string(),
                revision: ctx.store.value_revision(self.element),
                source: ChangeSource::Programmatic,
            });
        ctx.effects.changes.push((self.element, change));
        self.query.suppress_next_open = true;
        self.debouncer.cancel();
    }

    fn notify(&mut self, ctx: &Ctx<'_>, message: String) {
        let duration = ctx.settings.toast_duration(self.mode());
        self.toast.notify(message, duration, ctx.now);
    }

    fn create(&mut self, ctx: &mut Ctx<'_>, value: &str) -> RequestId {
        let request_id = ctx.effects.next_request_id();
        ctx.effects.commands.push(LookupCommand::Create {
            element: self.element,
            request_id,
            key: self.config.key.clone(),
            value: value.to_string(),
        });
        request_id
    }

    /// Remove a value from the backend; the menu refreshes once it answers.
    fn delete_from_source(&mut self, ctx: &mut Ctx<'_>, value: &str) {
        let request_id = ctx.effects.next_request_id();
        ctx.effects.commands.push(LookupCommand::Delete {
            element: self.element,
            request_id,
            key: self.config.key.clone(),
            value: value.to_string(),
        });
        self.pending_deletes.insert(request_id);
    }

    fn chips_mut(&mut self) -> Option<&mut Chips> {
        match &mut self.variant {
            Variant::Multi(chips) => Some(chips),
            Variant::Single => None,
        }
    }
}
