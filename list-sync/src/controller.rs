//! Synchronization controller
//!
//! Mediates between fetches of a remote list and the list published to
//! consumers. A fetch only ever fills the staging buffer; `publish` swaps a
//! Loaded snapshot into the published list in one locked step, so readers
//! observe either the old rows or the new rows and never a mix.
//!
//! ```text
//! ContentProvider ──fetch──▶ staging: Option<Snapshot>
//!                                   │ publish()
//!                                   ▼
//!                            PublishedList ──▶ row_count / field_at / row_as_record
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::SyncConfig;
use crate::error::{FetchError, Result, SyncError};
use crate::event::{ListEventKind, Listeners, LoadOutcome};
use crate::item::{ContentItem, FieldKey, FieldValue, Record};
use crate::iter::ListEvents;
use crate::published::{PublishedList, SyncStatus};
use crate::snapshot::{ContentProvider, ContentRoot, Snapshot, SnapshotStatus, VersionToken};
use crate::worker::LoadWorker;

/// Lifecycle of one synchronized list
///
/// `Empty → Loading → {Loaded, Failed} → Synced`, re-entering `Loading` on
/// every new load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelState {
    Empty,
    Loading,
    Loaded,
    Failed,
    Synced,
}

/// Everything guarded by the controller's single lock
struct ListState {
    staging: Option<Snapshot>,
    published: PublishedList,
    /// Update ID of the last Loaded fetch
    baseline: Option<VersionToken>,
    model_state: ModelState,
    last_outcome: Option<LoadOutcome>,
}

impl ListState {
    fn new() -> Self {
        Self {
            staging: None,
            published: PublishedList::new(),
            baseline: None,
            model_state: ModelState::Empty,
            last_outcome: None,
        }
    }
}

/// State shared between the controller and its load worker
pub(crate) struct Inner {
    state: RwLock<ListState>,
    provider: RwLock<Option<Arc<dyn ContentProvider>>>,
    root: RwLock<ContentRoot>,
    update_signaled: AtomicBool,
    listeners: Listeners,
}

impl Inner {
    /// Fetch into the staging buffer and report the outcome
    ///
    /// The provider is called without holding the state lock. When two loads
    /// overlap, whichever completes last owns the staging buffer.
    pub(crate) fn load(&self) -> LoadOutcome {
        self.update_signaled.store(false, Ordering::Release);

        let provider = self.provider.read().clone();
        let Some(provider) = provider else {
            debug!("Load requested without a content provider");
            return self.finish(Err(SyncError::NoProvider), None);
        };
        let root = self.root.read().clone();

        {
            let mut state = self.state.write();
            state.staging = None;
            state.model_state = ModelState::Loading;
        }

        debug!(root = %root, "Fetching content");
        let result = panic::catch_unwind(AssertUnwindSafe(|| provider.fetch(&root)))
            .unwrap_or_else(|_| Err(FetchError::Failure("content provider panicked".to_string())));

        match result {
            Ok(list) => {
                debug!(
                    root = %root,
                    items = list.items.len(),
                    update_id = %list.update_id,
                    "Content fetched"
                );
                let items = list.items.len();
                self.finish(Ok(items), Some(Snapshot::loaded(list.items, list.update_id)))
            }
            Err(err) => {
                warn!(root = %root, "Content fetch failed: {}", err);
                let status = match err {
                    FetchError::NotFound(_) => SnapshotStatus::NotFound,
                    FetchError::Failure(_) => SnapshotStatus::Failure,
                };
                self.finish(Err(err.into()), Some(Snapshot::failed(status)))
            }
        }
    }

    fn finish(&self, result: Result<usize>, staged: Option<Snapshot>) -> LoadOutcome {
        let outcome = match result {
            Ok(items) => LoadOutcome::Loaded { items },
            Err(err) => LoadOutcome::Failed(err),
        };

        {
            let mut state = self.state.write();
            match staged {
                Some(snapshot) if snapshot.is_loaded() => {
                    state.baseline = snapshot.update_id().cloned();
                    state.model_state = ModelState::Loaded;
                    state.published.mark_stale();
                    state.staging = Some(snapshot);
                }
                Some(snapshot) => {
                    state.model_state = ModelState::Failed;
                    state.staging = Some(snapshot);
                }
                None => {}
            }
            state.last_outcome = Some(outcome.clone());
        }

        self.listeners.emit(ListEventKind::LoadFinished(outcome.clone()));
        outcome
    }
}

/// Synchronizes one remote content list (a playlist view, a queue view, ...)
///
/// All operations take `&self`; share the controller behind an `Arc` to read
/// it from several threads while one owner drives loads and publishes.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use list_sync::{ContentItem, ContentRoot, FetchError, FetchedList, SyncController};
///
/// let controller = SyncController::default();
/// controller.attach_provider(Arc::new(|_root: &ContentRoot| -> Result<FetchedList, FetchError> {
///     Ok(FetchedList::new(vec![ContentItem::new("Q:0/1", "Intro")], "v7"))
/// }));
///
/// assert!(controller.load_sync());
/// assert!(controller.publish());
/// assert_eq!(controller.row_count(), 1);
/// ```
pub struct SyncController {
    inner: Arc<Inner>,
    worker: LoadWorker,
    config: SyncConfig,
}

impl SyncController {
    /// Create a controller after validating `config`
    pub fn new(config: SyncConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create a controller with a provider already attached
    pub fn with_provider(provider: Arc<dyn ContentProvider>, config: SyncConfig) -> Result<Self> {
        let controller = Self::new(config)?;
        controller.attach_provider(provider);
        Ok(controller)
    }

    fn build(config: SyncConfig) -> Self {
        let inner = Inner {
            state: RwLock::new(ListState::new()),
            provider: RwLock::new(None),
            root: RwLock::new(config.default_root.clone()),
            update_signaled: AtomicBool::new(false),
            listeners: Listeners::default(),
        };
        Self {
            inner: Arc::new(inner),
            worker: LoadWorker::new(config.worker_thread_name.clone()),
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Provider and root
    // ------------------------------------------------------------------

    pub fn attach_provider(&self, provider: Arc<dyn ContentProvider>) {
        *self.inner.provider.write() = Some(provider);
    }

    pub fn detach_provider(&self) {
        *self.inner.provider.write() = None;
    }

    pub fn has_provider(&self) -> bool {
        self.inner.provider.read().is_some()
    }

    pub fn root(&self) -> ContentRoot {
        self.inner.root.read().clone()
    }

    pub fn set_root(&self, root: impl Into<ContentRoot>) {
        *self.inner.root.write() = root.into();
    }

    /// Attach `provider` and select `root` (the configured default when
    /// `None` or empty)
    ///
    /// With `fill`, loads inline and, when `publish_on_fill` is set,
    /// publishes the result. Returns the load outcome, or `true` without
    /// `fill`.
    pub fn configure(
        &self,
        provider: Arc<dyn ContentProvider>,
        root: Option<ContentRoot>,
        fill: bool,
    ) -> bool {
        let root = root
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| self.config.default_root.clone());
        debug!(root = %root, fill, "Configuring list");

        self.attach_provider(provider);
        self.set_root(root);

        if !fill {
            return true;
        }
        let loaded = self.load_sync();
        if loaded && self.config.publish_on_fill {
            self.publish();
        }
        loaded
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Start a fetch on the load worker
    ///
    /// Returns `false` when no provider is attached or the worker could not
    /// be started. Completion is reported as `ListEventKind::LoadFinished`.
    pub fn request_load(&self) -> bool {
        if !self.has_provider() {
            debug!("request_load ignored: {}", SyncError::NoProvider);
            return false;
        }
        self.inner.update_signaled.store(false, Ordering::Release);

        match self.worker.dispatch(&self.inner) {
            Ok(()) => true,
            Err(err) => {
                warn!("request_load failed: {}", err);
                false
            }
        }
    }

    /// Fetch inline, blocking for the duration of the remote call
    pub fn load_sync(&self) -> bool {
        self.inner.load().is_success()
    }

    /// Drop whatever sits in the staging buffer
    ///
    /// A discarded Loaded or Failed snapshot returns the lifecycle to
    /// `Synced` when rows were published before, or to `Empty`. A load in
    /// flight keeps `Loading`.
    pub fn clear_staging(&self) {
        let mut state = self.inner.state.write();
        if state.staging.take().is_none() {
            return;
        }
        if matches!(state.model_state, ModelState::Loaded | ModelState::Failed) {
            // Published rows always carry the update ID of their snapshot
            state.model_state = if state.published.update_id().is_some() {
                ModelState::Synced
            } else {
                ModelState::Empty
            };
        }
    }

    // ------------------------------------------------------------------
    // Change notification
    // ------------------------------------------------------------------

    /// Record that the remote content may have changed
    ///
    /// Emits a single `DataUpdated` until the next load starts; repeated
    /// calls in between are coalesced. Returns whether an event was emitted.
    pub fn notify_external_change(&self) -> bool {
        if self
            .inner
            .update_signaled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            trace!("Change notification coalesced");
            return false;
        }

        self.inner.state.write().published.mark_stale();
        self.inner.listeners.emit(ListEventKind::DataUpdated);
        true
    }

    /// Compare an update ID observed out-of-band with the loaded baseline
    ///
    /// Notifies a change and returns `true` when they differ.
    pub fn check_update_id(&self, observed: &VersionToken) -> bool {
        let stale = self.inner.state.read().baseline.as_ref() != Some(observed);
        if stale {
            debug!(observed = %observed, "Update ID differs from baseline");
            self.notify_external_change();
        }
        stale
    }

    pub fn is_update_signaled(&self) -> bool {
        self.inner.update_signaled.load(Ordering::Acquire)
    }

    // ------------------------------------------------------------------
    // Publishing
    // ------------------------------------------------------------------

    /// Swap a Loaded staging snapshot into the published list
    ///
    /// No-op (returns `false`) unless the staging buffer holds a Loaded
    /// snapshot. On a swap, emits `Reset` then `CountChanged`.
    pub fn publish(&self) -> bool {
        let rows = {
            let mut state = self.inner.state.write();
            let snapshot = match state.staging.take() {
                Some(snapshot) if snapshot.is_loaded() => snapshot,
                other => {
                    state.staging = other;
                    return false;
                }
            };
            let (items, update_id) = snapshot.into_parts();
            state.published.replace(items, update_id);
            state.model_state = ModelState::Synced;
            state.published.row_count()
        };

        debug!(rows, "Published snapshot");
        self.inner.listeners.emit(ListEventKind::Reset);
        self.inner.listeners.emit(ListEventKind::CountChanged);
        true
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn row_count(&self) -> usize {
        self.inner.state.read().published.row_count()
    }

    pub fn field_at(&self, row: usize, key: FieldKey) -> Option<FieldValue> {
        self.inner.state.read().published.field_at(row, key)
    }

    /// Field lookup by UI role name; unknown names are absent
    pub fn field_by_name(&self, row: usize, name: &str) -> Option<FieldValue> {
        self.field_at(row, FieldKey::from_name(name)?)
    }

    pub fn row_as_record(&self, row: usize) -> Record {
        self.inner.state.read().published.row_as_record(row)
    }

    pub fn item(&self, row: usize) -> Option<Arc<ContentItem>> {
        self.inner.state.read().published.item(row).cloned()
    }

    /// Every published row, captured in one locked step
    pub fn items(&self) -> Vec<Arc<ContentItem>> {
        self.inner.state.read().published.rows().to_vec()
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    pub fn state(&self) -> ModelState {
        self.inner.state.read().model_state
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.inner.state.read().published.status()
    }

    /// Status of the staged snapshot, `None` when nothing is staged
    pub fn staging_status(&self) -> Option<SnapshotStatus> {
        self.inner.state.read().staging.as_ref().map(Snapshot::status)
    }

    /// Update ID of the last Loaded fetch
    pub fn update_id(&self) -> Option<VersionToken> {
        self.inner.state.read().baseline.clone()
    }

    /// Update ID of the rows currently published
    pub fn published_update_id(&self) -> Option<VersionToken> {
        self.inner.state.read().published.update_id().cloned()
    }

    pub fn last_outcome(&self) -> Option<LoadOutcome> {
        self.inner.state.read().last_outcome.clone()
    }

    /// Register a listener for this controller's notifications
    ///
    /// The channel is unbounded: a listener that never drains keeps every
    /// event for the life of the controller. Drop the `ListEvents` to
    /// unsubscribe, or use `subscribe_bounded`.
    pub fn subscribe(&self) -> ListEvents {
        self.inner.listeners.subscribe()
    }

    /// Register a listener holding at most `capacity` undrained events
    ///
    /// Events emitted while it is full are dropped for this listener only.
    pub fn subscribe_bounded(&self, capacity: usize) -> ListEvents {
        self.inner.listeners.subscribe_bounded(capacity)
    }

    pub fn is_worker_running(&self) -> bool {
        self.worker.is_running()
    }
}

impl Default for SyncController {
    fn default() -> Self {
        Self::build(SyncConfig::default())
    }
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("SyncController")
            .field("root", &*self.inner.root.read())
            .field("state", &state.model_state)
            .field("rows", &state.published.row_count())
            .finish()
    }
}
