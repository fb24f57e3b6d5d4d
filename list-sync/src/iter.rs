//! Blocking iterator over list notifications
//!
//! Provides various iteration patterns for consuming events:
//! - Blocking: `recv()`, `for event in events`
//! - Non-blocking: `try_recv()`, `try_iter()`
//! - Timeout: `recv_timeout()`, `timeout_iter()`

use std::sync::mpsc;
use std::time::Duration;

use crate::event::ListEvent;

/// One listener's view of a controller's notifications
///
/// Obtained from `SyncController::subscribe()`. Every subscriber sees every
/// event emitted after it subscribed, in emission order.
///
/// # Example
///
/// ```rust,ignore
/// let events = controller.subscribe();
/// controller.request_load();
///
/// for event in events.timeout_iter(Duration::from_secs(5)) {
///     if let ListEventKind::LoadFinished(outcome) = event.kind {
///         if outcome.is_success() {
///             controller.publish();
///         }
///         break;
///     }
/// }
/// ```
pub struct ListEvents {
    rx: mpsc::Receiver<ListEvent>,
}

impl ListEvents {
    pub(crate) fn new(rx: mpsc::Receiver<ListEvent>) -> Self {
        Self { rx }
    }

    /// Block until the next event is available
    ///
    /// Returns `None` once the controller is gone.
    pub fn recv(&self) -> Option<ListEvent> {
        self.rx.recv().ok()
    }

    /// Block until the next event or timeout expires
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ListEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<ListEvent> {
        self.rx.try_recv().ok()
    }

    /// Non-blocking iterator over currently queued events
    pub fn try_iter(&self) -> TryIter<'_> {
        TryIter { inner: self }
    }

    /// Iterator that waits up to `timeout` for each event
    ///
    /// Stops at the first timeout.
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIter<'_> {
        TimeoutIter {
            inner: self,
            timeout,
        }
    }
}

impl Iterator for ListEvents {
    type Item = ListEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

/// Non-blocking iterator over currently available events
pub struct TryIter<'a> {
    inner: &'a ListEvents,
}

impl<'a> Iterator for TryIter<'a> {
    type Item = ListEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with timeout
pub struct TimeoutIter<'a> {
    inner: &'a ListEvents,
    timeout: Duration,
}

impl<'a> Iterator for TimeoutIter<'a> {
    type Item = ListEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}
