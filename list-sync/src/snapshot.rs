//! Fetched-but-unpublished list snapshots and their provider seam

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::item::ContentItem;

/// Opaque version token reported by the content server ("update ID")
///
/// Only ever compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Server-side identifier of the collection to fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRoot(String);

impl ContentRoot {
    /// Saved Sonos playlists
    pub const SONOS_PLAYLISTS: &'static str = "SQ:";
    /// The current play queue of a zone
    pub const QUEUE: &'static str = "Q:0";

    pub fn new(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    pub fn sonos_playlists() -> Self {
        Self::new(Self::SONOS_PLAYLISTS)
    }

    pub fn queue() -> Self {
        Self::new(Self::QUEUE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContentRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentRoot {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// What a provider hands back from a successful fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedList {
    pub items: Vec<ContentItem>,
    pub update_id: VersionToken,
}

impl FetchedList {
    pub fn new(items: Vec<ContentItem>, update_id: impl Into<VersionToken>) -> Self {
        Self {
            items,
            update_id: update_id.into(),
        }
    }
}

impl From<String> for VersionToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Backing collaborator that materializes a content list
///
/// Implementations may block; the controller calls `fetch` either on a
/// dedicated worker thread or inline from `load_sync`, never while holding
/// its own lock.
pub trait ContentProvider: Send + Sync {
    fn fetch(&self, root: &ContentRoot) -> Result<FetchedList, FetchError>;
}

impl<F> ContentProvider for F
where
    F: Fn(&ContentRoot) -> Result<FetchedList, FetchError> + Send + Sync,
{
    fn fetch(&self, root: &ContentRoot) -> Result<FetchedList, FetchError> {
        self(root)
    }
}

/// Outcome classification of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotStatus {
    NotFound,
    Failure,
    Loaded,
}

/// A fetched list waiting in the staging buffer
///
/// Failed snapshots carry no items: nothing from a failed fetch can reach
/// the published list.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    items: Vec<ContentItem>,
    update_id: Option<VersionToken>,
    status: SnapshotStatus,
}

impl Snapshot {
    pub fn loaded(items: Vec<ContentItem>, update_id: VersionToken) -> Self {
        Self {
            items,
            update_id: Some(update_id),
            status: SnapshotStatus::Loaded,
        }
    }

    pub fn failed(status: SnapshotStatus) -> Self {
        debug_assert!(status != SnapshotStatus::Loaded);
        Self {
            items: Vec::new(),
            update_id: None,
            status,
        }
    }

    pub fn from_fetch(result: Result<FetchedList, FetchError>) -> Self {
        match result {
            Ok(list) => Self::loaded(list.items, list.update_id),
            Err(FetchError::NotFound(_)) => Self::failed(SnapshotStatus::NotFound),
            Err(FetchError::Failure(_)) => Self::failed(SnapshotStatus::Failure),
        }
    }

    pub fn status(&self) -> SnapshotStatus {
        self.status
    }

    pub fn is_loaded(&self) -> bool {
        self.status == SnapshotStatus::Loaded
    }

    pub fn update_id(&self) -> Option<&VersionToken> {
        self.update_id.as_ref()
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<ContentItem>, Option<VersionToken>) {
        (self.items, self.update_id)
    }
}
