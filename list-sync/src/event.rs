//! Notifications emitted by a synchronization controller
//!
//! Events carry no list data. A consumer that receives `Reset` or
//! `CountChanged` re-reads the published list through the accessors.

use std::sync::mpsc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::SyncError;
use crate::iter::ListEvents;

/// Result of one load attempt
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// A snapshot of `items` rows is staged and ready to publish
    Loaded { items: usize },
    /// Nothing was staged; the published list is unchanged
    Failed(SyncError),
}

impl LoadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }

    pub fn error(&self) -> Option<&SyncError> {
        match self {
            LoadOutcome::Failed(err) => Some(err),
            LoadOutcome::Loaded { .. } => None,
        }
    }
}

/// Kinds of notification sent to listeners
#[derive(Debug, Clone, PartialEq)]
pub enum ListEventKind {
    /// The remote content may have changed; a reload is advised
    DataUpdated,
    /// The published list was replaced wholesale
    Reset,
    /// The published row count may differ
    CountChanged,
    /// A load attempt completed
    LoadFinished(LoadOutcome),
}

/// A notification with the instant it was emitted
#[derive(Debug, Clone)]
pub struct ListEvent {
    pub kind: ListEventKind,
    pub timestamp: Instant,
}

impl ListEvent {
    pub fn new(kind: ListEventKind) -> Self {
        Self {
            kind,
            timestamp: Instant::now(),
        }
    }
}

impl PartialEq for ListEvent {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp not included in equality
        self.kind == other.kind
    }
}

enum Listener {
    Unbounded(mpsc::Sender<ListEvent>),
    /// Events beyond `capacity` undrained ones are dropped for this listener
    Bounded(mpsc::SyncSender<ListEvent>),
}

impl Listener {
    /// Deliver `event`; `false` once the receiver is gone
    fn deliver(&self, event: &ListEvent) -> bool {
        match self {
            Listener::Unbounded(tx) => tx.send(event.clone()).is_ok(),
            Listener::Bounded(tx) => match tx.try_send(event.clone()) {
                Ok(()) => true,
                Err(mpsc::TrySendError::Full(_)) => {
                    trace!("Listener full, event dropped");
                    true
                }
                Err(mpsc::TrySendError::Disconnected(_)) => false,
            },
        }
    }
}

/// Fan-out registry of listener channels
///
/// Each subscriber owns a receiver; senders whose receiver was dropped are
/// pruned on the next emit.
#[derive(Default)]
pub(crate) struct Listeners {
    senders: Mutex<Vec<Listener>>,
}

impl Listeners {
    pub(crate) fn subscribe(&self) -> ListEvents {
        let (tx, rx) = mpsc::channel();
        self.senders.lock().push(Listener::Unbounded(tx));
        ListEvents::new(rx)
    }

    pub(crate) fn subscribe_bounded(&self, capacity: usize) -> ListEvents {
        let (tx, rx) = mpsc::sync_channel(capacity);
        self.senders.lock().push(Listener::Bounded(tx));
        ListEvents::new(rx)
    }

    pub(crate) fn emit(&self, kind: ListEventKind) {
        let event = ListEvent::new(kind);
        let mut senders = self.senders.lock();
        senders.retain(|listener| listener.deliver(&event));
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders.lock().len()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("count", &self.senders.lock().len()).finish()
    }
}
