use core_types::{ElementId, LookupKey, RequestId};
use net::FetchError;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupCommand {
    // Open (substring) search
    Search {
        element: ElementId,
        request_id: RequestId,
        key: LookupKey,
        query: String,
        limit: usize,
    },
    // Strict-mode prefix check
    Validate {
        element: ElementId,
        request_id: RequestId,
        key: LookupKey,
        value: String,
        limit: usize,
    },
    // Value-set mutations
    Create {
        element: ElementId,
        request_id: RequestId,
        key: LookupKey,
        value: String,
    },
    Delete {
        element: ElementId,
        request_id: RequestId,
        key: LookupKey,
        value: String,
    },
}

impl LookupCommand {
    pub fn element(&self) -> ElementId {
        match self {
            Self::Search { element, .. }
            | Self::Validate { element, .. }
            | Self::Create { element, .. }
            | Self::Delete { element, .. } => *element,
        }
    }

    pub fn request_id(&self) -> RequestId {
        match self {
            Self::Search { request_id, .. }
            | Self::Validate { request_id, .. }
            | Self::Create { request_id, .. }
            | Self::Delete { request_id, .. } => *request_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupEvent {
    SearchDone {
        element: ElementId,
        request_id: RequestId,
        query: String,
        result: Result<Vec<String>, FetchError>,
    },
    ValidateDone {
        element: ElementId,
        request_id: RequestId,
        value: String,
        result: Result<bool, FetchError>,
    },
    CreateDone {
        element: ElementId,
        request_id: RequestId,
        value: String,
        result: Result<(), FetchError>,
    },
    DeleteDone {
        element: ElementId,
        request_id: RequestId,
        value: String,
        result: Result<(), FetchError>,
    },
}

impl LookupEvent {
    pub fn element(&self) -> ElementId {
        match self {
            Self::SearchDone { element, .. }
            | Self::ValidateDone { element, .. }
            | Self::CreateDone { element, .. }
            | Self::DeleteDone { element, .. } => *element,
        }
    }
}

pub struct Bus {
    pub cmd_tx: Sender<LookupCommand>,
    pub evt_rx: Receiver<LookupEvent>,
    pub evt_tx: Sender<LookupEvent>, // shareable for runtimes
}

impl Bus {
    /// Create a bus plus the command receiver a runtime consumes.
    pub fn channel() -> (Self, Receiver<LookupCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (evt_tx, evt_rx) = mpsc::channel();
        (
            Self {
                cmd_tx,
                evt_rx,
                evt_tx,
            },
            cmd_rx,
        )
    }
}
