//! One page worth of lookup widgets.
//!
//! [`LookupPage`] is the integration point for hosts: it binds elements,
//! routes their interactions, receives network completions from the bus and
//! fires timers. Everything runs on the thread that owns the page.

use std::collections::HashMap;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use bus::{Bus, LookupEvent};
use core_types::ElementId;
use input_core::{InputValueStore, ValueChange};

use crate::config::{ElementAttrs, LookupMode, LookupSettings, WidgetConfig};
use crate::dispatch::{EventOutcome, WidgetEvent};
use crate::menu::Menu;
use crate::registry::BindingRegistry;
use crate::widget::{Ctx, Effects, HiddenField, Widget};

pub type ValueObserver = Box<dyn FnMut(ElementId, &ValueChange)>;

/// An input element as the host sees it at bind time.
#[derive(Clone, Debug)]
pub struct LookupElement {
    pub input: ElementId,
    /// The wrapping container; clicks inside it do not close the menu.
    pub container: ElementId,
    pub attrs: ElementAttrs,
    pub value: String,
}

impl LookupElement {
    pub fn new(input: ElementId, container: ElementId, attrs: ElementAttrs) -> Self {
        Self {
            input,
            container,
            attrs,
            value: String::new(),
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }
}

pub struct LookupPage {
    settings: LookupSettings,
    store: InputValueStore,
    registry: BindingRegistry,
    effects: Effects,
    observers: HashMap<ElementId, Vec<ValueObserver>>,
    bus: Bus,
}

impl LookupPage {
    pub fn new(bus: Bus, settings: LookupSettings) -> Self {
        Self {
            settings,
            store: InputValueStore::new(),
            registry: BindingRegistry::new(),
            effects: Effects::default(),
            observers: HashMap::new(),
            bus,
        }
    }

    pub fn settings(&self) -> &LookupSettings {
        &self.settings
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    // --- binding ---

    /// Attach a widget to `element`.
    ///
    /// Returns `false` when the element carries no lookup marker or is
    /// already bound; binding twice never attaches a second widget.
    pub fn bind(&mut self, element: &LookupElement) -> bool {
        let Some(mode) = LookupMode::detect(&element.attrs) else {
            log::trace!(target: "lookup.page", "{}: no lookup marker", element.input);
            return false;
        };

        let settings = &self.settings;
        let bound = self.registry.bind_with(element.input, || {
            let config = WidgetConfig::from_attrs(&element.attrs);
            Widget::new(element.input, element.container, config, mode, settings)
        });

        if bound {
            self.store.ensure_initial(element.input, element.value.clone());
            log::debug!(target: "lookup.page", "{}: bound {mode:?} lookup", element.input);
        } else {
            log::debug!(target: "lookup.page", "{}: already bound", element.input);
        }
        bound
    }

    /// Bind every marked element. Returns how many new bindings were made.
    pub fn bind_all<'a>(&mut self, elements: impl IntoIterator<Item = &'a LookupElement>) -> usize {
        elements.into_iter().filter(|el| self.bind(el)).count()
    }

    /// Detach the widget and every listener registered for it.
    pub fn unbind(&mut self, element: ElementId) -> bool {
        let removed = self.registry.unbind(element).is_some();
        if removed {
            self.observers.remove(&element);
            self.store.remove(element);
            log::debug!(target: "lookup.page", "{element}: unbound");
        }
        removed
    }

    pub fn is_bound(&self, element: ElementId) -> bool {
        self.registry.is_bound(element)
    }

    /// Subscribe to programmatic value changes of a bound input.
    pub fn on_value_changed(
        &mut self,
        element: ElementId,
        observer: impl FnMut(ElementId, &ValueChange) + 'static,
    ) -> bool {
        if !self.registry.is_bound(element) {
            return false;
        }
        self.observers.entry(element).or_default().push(Box::new(observer));
        true
    }

    // --- interaction ---

    pub fn dispatch(&mut self, element: ElementId, event: WidgetEvent, now: Instant) -> EventOutcome {
        let outcome = {
            let Self {
                settings,
                store,
                registry,
                effects,
                ..
            } = self;
            let Some(widget) = registry.get_mut(element) else {
                log::trace!(target: "lookup.page", "{element}: event for unbound element");
                return EventOutcome::default();
            };
            let mut ctx = Ctx {
                store,
                effects,
                settings: &*settings,
                now,
            };
            widget.dispatch(&mut ctx, event)
        };
        self.flush();
        outcome
    }

    /// A click somewhere in the document. `container` is the lookup
    /// container the click landed in, if any.
    pub fn document_click(&mut self, container: Option<ElementId>, now: Instant) {
        {
            let Self {
                settings,
                store,
                registry,
                effects,
                ..
            } = self;
            for widget in registry.iter_mut() {
                if !widget.listens_for_outside_clicks() || container == Some(widget.container()) {
                    continue;
                }
                let mut ctx = Ctx {
                    store: &mut *store,
                    effects: &mut *effects,
                    settings: &*settings,
                    now,
                };
                widget.dispatch(&mut ctx, WidgetEvent::OutsideClick);
            }
        }
        self.flush();
    }

    /// Deliver one network completion.
    pub fn handle_event(&mut self, evt: LookupEvent, now: Instant) {
        {
            let Self {
                settings,
                store,
                registry,
                effects,
                ..
            } = self;
            let element = evt.element();
            let Some(widget) = registry.get_mut(element) else {
                log::trace!(target: "lookup.page", "{element}: completion for unbound element");
                return;
            };
            let mut ctx = Ctx {
                store,
                effects,
                settings: &*settings,
                now,
            };
            widget.on_lookup_event(&mut ctx, evt);
        }
        self.flush();
    }

    /// Drain pending network completions, then fire due debouncers and
    /// toast timers. Returns the number of completions handled.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        loop {
            match self.bus.evt_rx.try_recv() {
                Ok(evt) => {
                    self.handle_event(evt, now);
                    handled += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!(target: "lookup.page", "lookup event channel disconnected");
                    break;
                }
            }
        }
        self.poll_timers(now);
        handled
    }

    /// Block up to `timeout` for one network completion and handle it.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.bus.evt_rx.recv_timeout(timeout) {
            Ok(evt) => {
                self.handle_event(evt, Instant::now());
                true
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Earliest debounce or toast deadline across all widgets.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.registry.iter().filter_map(Widget::next_deadline).min()
    }

    fn poll_timers(&mut self, now: Instant) {
        {
            let Self {
                settings,
                store,
                registry,
                effects,
                ..
            } = self;
            for widget in registry.iter_mut() {
                let mut ctx = Ctx {
                    store: &mut *store,
                    effects: &mut *effects,
                    settings: &*settings,
                    now,
                };
                widget.poll_timers(&mut ctx);
            }
        }
        self.flush();
    }

    fn flush(&mut self) {
        for cmd in self.effects.commands.drain(..) {
            log::trace!(target: "lookup.page", "send {cmd:?}");
            if self.bus.cmd_tx.send(cmd).is_err() {
                log::warn!(target: "lookup.page", "lookup runtime is gone; request dropped");
            }
        }

        for (element, change) in self.effects.changes.drain(..) {
            if let Some(observers) = self.observers.get_mut(&element) {
                for observer in observers.iter_mut() {
                    observer(element, &change);
                }
            }
        }
    }

    // --- views ---

    pub fn widget(&self, element: ElementId) -> Option<&Widget> {
        self.registry.get(element)
    }

    pub fn value(&self, element: ElementId) -> &str {
        self.store.value(element)
    }

    pub fn menu(&self, element: ElementId) -> Option<&Menu> {
        self.widget(element).and_then(Widget::menu)
    }

    pub fn toast(&self, element: ElementId) -> Option<&str> {
        self.widget(element).and_then(Widget::toast)
    }

    pub fn hidden_field(&self, element: ElementId) -> Option<&HiddenField> {
        self.widget(element).and_then(Widget::hidden_field)
    }

    /// `(name, value)` of every multi-value hidden field, for form submission.
    pub fn hidden_fields(&self) -> Vec<(&str, &str)> {
        self.registry
            .iter()
            .filter_map(Widget::hidden_field)
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect()
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.store.focused()
    }
}
