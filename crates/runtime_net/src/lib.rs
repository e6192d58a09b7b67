// crates/runtime_net/src/lib.rs
use std::sync::{
    Arc,
    mpsc::{Receiver, Sender},
};
use std::thread::{self, JoinHandle};

use bus::{LookupCommand, LookupEvent};
use net::LookupSource;

/// Run one command against `source` and package the outcome as an event.
pub fn execute(source: &dyn LookupSource, cmd: LookupCommand) -> LookupEvent {
    match cmd {
        LookupCommand::Search { element, request_id, key, query, limit } => {
            let result = source.search(&key, &query, limit);
            LookupEvent::SearchDone { element, request_id, query, result }
        }
        LookupCommand::Validate { element, request_id, key, value, limit } => {
            let result = source.validate(&key, &value, limit);
            LookupEvent::ValidateDone { element, request_id, value, result }
        }
        LookupCommand::Create { element, request_id, key, value } => {
            let result = source.create(&key, &value);
            LookupEvent::CreateDone { element, request_id, value, result }
        }
        LookupCommand::Delete { element, request_id, key, value } => {
            let result = source.delete(&key, &value);
            LookupEvent::DeleteDone { element, request_id, value, result }
        }
    }
}

fn log_failure(evt: &LookupEvent) {
    let (request_id, err) = match evt {
        LookupEvent::SearchDone { request_id, result: Err(e), .. }
        | LookupEvent::ValidateDone { request_id, result: Err(e), .. } => (request_id, e),
        LookupEvent::CreateDone { request_id, result: Err(e), .. }
        | LookupEvent::DeleteDone { request_id, result: Err(e), .. } => (request_id, e),
        _ => return,
    };
    log::warn!(target: "lookup.runtime", "request {request_id} for {} failed: {err}", evt.element());
}

/// Serve lookup commands until every command sender is dropped.
///
/// Each command runs on its own thread, so completions may arrive out of
/// request order; consumers must tolerate that.
pub fn start_lookup_runtime(
    source: Arc<dyn LookupSource>,
    cmd_rx: Receiver<LookupCommand>,
    evt_tx: Sender<LookupEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            log::debug!(target: "lookup.runtime", "dispatch {cmd:?}");
            let source = Arc::clone(&source);
            let evt_tx = evt_tx.clone();
            thread::spawn(move || {
                let evt = execute(source.as_ref(), cmd);
                log_failure(&evt);
                // The page may be gone; nothing left to notify.
                let _ = evt_tx.send(evt);
            });
        }
        log::debug!(target: "lookup.runtime", "command channel closed");
    })
}
