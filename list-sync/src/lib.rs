//! Snapshot/publish synchronization for remote content lists
//!
//! Keeps a UI-facing list (saved playlists, a zone queue, ...) consistent
//! with a remote content directory. Fetches land in a staging buffer; only
//! an explicit `publish` swaps them into the list consumers read, and only
//! when the fetch succeeded.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use list_sync::prelude::*;
//!
//! let queue = SyncController::new(SyncConfig::queue()).unwrap();
//! let events = queue.subscribe();
//!
//! queue.attach_provider(Arc::new(|_root: &ContentRoot| -> Result<FetchedList, FetchError> {
//!     Ok(FetchedList::new(
//!         vec![
//!             ContentItem::new("Q:0/1", "So What").with_author("Miles Davis"),
//!             ContentItem::new("Q:0/2", "Freddie Freeloader").with_author("Miles Davis"),
//!         ],
//!         "12",
//!     ))
//! }));
//!
//! assert!(queue.load_sync());
//! assert!(queue.publish());
//! assert_eq!(queue.row_count(), 2);
//! assert_eq!(queue.field_by_name(1, "author").unwrap().as_text(), Some("Miles Davis"));
//!
//! // LoadFinished, Reset, CountChanged
//! assert_eq!(events.try_iter().count(), 3);
//! ```
//!
//! # Architecture
//!
//! ```text
//! SyncController
//!     │
//!     ├── provider: Arc<dyn ContentProvider>     fetch(root) on worker or inline
//!     │
//!     ├── state: RwLock<ListState>
//!     │       ├── staging: Option<Snapshot>
//!     │       └── published: PublishedList       row_count / field_at / row_as_record
//!     │
//!     ├── update_signaled: AtomicBool           coalesces DataUpdated
//!     │
//!     └── listeners: Vec<mpsc::Sender<ListEvent>>
//!             │
//!             └── ListEvents (one per subscriber)
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod item;
pub mod iter;
pub mod logging;
pub mod normalize;
pub mod published;
pub mod snapshot;
mod worker;

pub use config::SyncConfig;
pub use controller::{ModelState, SyncController};
pub use error::{FetchError, Result, SyncError};
pub use event::{ListEvent, ListEventKind, LoadOutcome};
pub use item::{ContentItem, FieldKey, FieldValue, Payload, Record};
pub use iter::{ListEvents, TimeoutIter, TryIter};
pub use published::{PublishedList, SyncStatus};
pub use snapshot::{ContentProvider, ContentRoot, FetchedList, Snapshot, SnapshotStatus, VersionToken};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::SyncConfig;
    pub use crate::controller::{ModelState, SyncController};
    pub use crate::error::{FetchError, SyncError};
    pub use crate::event::{ListEventKind, LoadOutcome};
    pub use crate::item::{ContentItem, FieldKey, FieldValue, Payload};
    pub use crate::snapshot::{ContentProvider, ContentRoot, FetchedList, VersionToken};
}
