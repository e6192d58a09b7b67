#![allow(dead_code)]

use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use bus::{Bus, LookupCommand, LookupEvent};
use core_types::ElementId;
use lookup::{ElementAttrs, EventOutcome, LookupElement, LookupPage, LookupSettings, WidgetEvent};

/// A page whose network side is played by the test.
pub struct Harness {
    pub page: LookupPage,
    pub cmd_rx: Receiver<LookupCommand>,
    pub evt_tx: Sender<LookupEvent>,
    pub now: Instant,
}

impl Harness {
    pub fn new() -> Self {
        let (bus, cmd_rx) = Bus::channel();
        let evt_tx = bus.evt_tx.clone();
        Self {
            page: LookupPage::new(bus, LookupSettings::default()),
            cmd_rx,
            evt_tx,
            now: Instant::now(),
        }
    }

    /// Bind input `id` inside container `id + 1000`.
    pub fn bind(&mut self, id: u64, attrs: ElementAttrs) -> ElementId {
        let input = ElementId(id);
        self.page
            .bind(&LookupElement::new(input, container_of(input), attrs));
        input
    }

    pub fn send(&mut self, el: ElementId, event: WidgetEvent) -> EventOutcome {
        self.page.dispatch(el, event, self.now)
    }

    pub fn type_text(&mut self, el: ElementId, text: &str) {
        self.send(el, WidgetEvent::Input(text.to_string()));
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
        self.page.pump(self.now);
    }

    pub fn commands(&self) -> Vec<LookupCommand> {
        self.cmd_rx.try_iter().collect()
    }

    pub fn reply(&mut self, evt: LookupEvent) {
        self.evt_tx.send(evt).expect("page owns the receiver");
        self.page.pump(self.now);
    }

    /// Complete `cmd`, which must be a search, with `items`.
    pub fn answer(&mut self, cmd: &LookupCommand, items: &[&str]) {
        let LookupCommand::Search {
            element,
            request_id,
            query,
            ..
        } = cmd
        else {
            panic!("not a search: {cmd:?}");
        };
        self.reply(LookupEvent::SearchDone {
            element: *element,
            request_id: *request_id,
            query: query.clone(),
            result: Ok(items.iter().map(|s| s.to_string()).collect()),
        });
    }

    pub fn hidden(&self, el: ElementId) -> String {
        self.page
            .hidden_field(el)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }
}

pub fn container_of(input: ElementId) -> ElementId {
    ElementId(input.0 + 1000)
}

pub fn search_query(cmd: &LookupCommand) -> &str {
    match cmd {
        LookupCommand::Search { query, .. } => query,
        other => panic!("not a search: {other:?}"),
    }
}
