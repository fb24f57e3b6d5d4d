//! Noson list models
//!
//! Playlist and queue views built on `list_sync`. Each model owns one
//! `SyncController` and knows how to turn the objects of a Sonos content
//! directory into list rows.
//!
//! # Example
//!
//! ```rust
//! use list_sync::{ContentRoot, FetchError, VersionToken};
//! use noson_models::{BrowseResult, ContentDirectory, DigitalObject, MediaHost, QueueModel};
//!
//! struct FixedQueue;
//!
//! impl ContentDirectory for FixedQueue {
//!     fn browse(&self, _root: &ContentRoot) -> Result<BrowseResult, FetchError> {
//!         Ok(BrowseResult {
//!             objects: vec![DigitalObject::new("Q:0/1", "object.item.audioItem.musicTrack", "Blue in Green")],
//!             update_id: VersionToken::new("5"),
//!         })
//!     }
//! }
//!
//! let queue = QueueModel::new().unwrap();
//! assert!(queue.init(FixedQueue, MediaHost::new("192.168.1.20", 1400), None, true));
//! assert_eq!(queue.row_count(), 1);
//! ```

pub mod directory;
pub mod error;
pub mod filter;
pub mod host;
pub mod object;
pub mod playlists;
pub mod queue;

pub use list_sync::normalize;

pub use directory::{BrowseResult, ContentDirectory, DirectoryProvider, ItemBuilder};
pub use error::{ModelError, Result};
pub use filter::{FilterBehavior, FilterPattern, MatchMode};
pub use host::{MediaHost, DEFAULT_PORT};
pub use object::DigitalObject;
pub use playlists::{playlist_item, PlaylistsModel};
pub use queue::{track_item, QueueModel};
