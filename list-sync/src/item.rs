//! Content items and their role-based field surface
//!
//! A `ContentItem` is the immutable row record exposed by a published list.
//! Consumers never see the struct layout directly; they read fields through
//! a `FieldKey` (the UI "role") and get back a `FieldValue`.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::normalize::normalized_string;

// ============================================================================
// Payload - caller-opaque handle carried alongside each item
// ============================================================================

/// Opaque value stored next to an item and handed back unchanged
///
/// The controller never looks inside a payload. Callers typically store the
/// library object an item was built from so it can be queued or played later.
/// Two payloads are equal only when they share the same allocation.
#[derive(Clone, Default)]
pub struct Payload(Option<Arc<dyn Any + Send + Sync>>);

impl Payload {
    /// Wrap a value as a payload
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// A payload carrying nothing
    pub fn none() -> Self {
        Self(None)
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Borrow the wrapped value if it is a `T`
    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.0.as_ref()?.downcast_ref::<T>()
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Payload(..)"),
            None => f.write_str("Payload(none)"),
        }
    }
}

// ============================================================================
// FieldKey / FieldValue - role-based access
// ============================================================================

/// Field roles recognized by published lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    Payload,
    Id,
    Title,
    Author,
    Album,
    AlbumTrackNo,
    /// First artwork reference
    Art,
    /// Every artwork reference
    Arts,
    Normalized,
    IsService,
}

impl FieldKey {
    /// All roles, in the order records list them
    pub const ALL: [FieldKey; 10] = [
        FieldKey::Payload,
        FieldKey::Id,
        FieldKey::Title,
        FieldKey::Author,
        FieldKey::Album,
        FieldKey::AlbumTrackNo,
        FieldKey::Art,
        FieldKey::Arts,
        FieldKey::Normalized,
        FieldKey::IsService,
    ];

    /// Role name as seen by UI bindings
    pub fn name(self) -> &'static str {
        match self {
            FieldKey::Payload => "payload",
            FieldKey::Id => "id",
            FieldKey::Title => "title",
            FieldKey::Author => "author",
            FieldKey::Album => "album",
            FieldKey::AlbumTrackNo => "albumTrackNo",
            FieldKey::Art => "art",
            FieldKey::Arts => "arts",
            FieldKey::Normalized => "normalized",
            FieldKey::IsService => "isService",
        }
    }

    /// Resolve a UI role name, `None` for unknown names
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.name() == name)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single field value read from a row
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(u32),
    Flag(bool),
    List(Vec<String>),
    Payload(Payload),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<u32> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_payload(&self) -> Option<&Payload> {
        match self {
            FieldValue::Payload(p) => Some(p),
            _ => None,
        }
    }
}

/// All present fields of one row, keyed by role name
pub type Record = BTreeMap<&'static str, FieldValue>;

// ============================================================================
// ContentItem
// ============================================================================

/// One row of a content list (a playlist, a queued track, ...)
///
/// Built once with the `with_*` methods and never modified afterwards.
/// The normalized title is derived from the title at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    id: String,
    title: String,
    normalized: String,
    author: Option<String>,
    album: Option<String>,
    album_track_no: Option<u32>,
    arts: Vec<String>,
    is_service: bool,
    #[serde(skip)]
    payload: Payload,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            normalized: normalized_string(&title),
            title,
            author: None,
            album: None,
            album_track_no: None,
            arts: Vec::new(),
            is_service: false,
            payload: Payload::none(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_album_track_no(mut self, track_no: u32) -> Self {
        self.album_track_no = Some(track_no);
        self
    }

    pub fn with_art(mut self, art: impl Into<String>) -> Self {
        self.arts.push(art.into());
        self
    }

    pub fn with_arts<I, S>(mut self, arts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arts.extend(arts.into_iter().map(Into::into));
        self
    }

    pub fn with_service(mut self, is_service: bool) -> Self {
        self.is_service = is_service;
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn album_track_no(&self) -> Option<u32> {
        self.album_track_no
    }

    /// First artwork reference, if any
    pub fn art(&self) -> Option<&str> {
        self.arts.first().map(String::as_str)
    }

    pub fn arts(&self) -> &[String] {
        &self.arts
    }

    pub fn is_service(&self) -> bool {
        self.is_service
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Read one field by role
    ///
    /// Returns `None` when the item does not carry that field.
    pub fn field(&self, key: FieldKey) -> Option<FieldValue> {
        match key {
            FieldKey::Payload if self.payload.is_none() => None,
            FieldKey::Payload => Some(FieldValue::Payload(self.payload.clone())),
            FieldKey::Id => Some(FieldValue::Text(self.id.clone())),
            FieldKey::Title => Some(FieldValue::Text(self.title.clone())),
            FieldKey::Author => self.author.clone().map(FieldValue::Text),
            FieldKey::Album => self.album.clone().map(FieldValue::Text),
            FieldKey::AlbumTrackNo => self.album_track_no.map(FieldValue::Number),
            FieldKey::Art => self.art().map(|a| FieldValue::Text(a.to_string())),
            FieldKey::Arts if self.arts.is_empty() => None,
            FieldKey::Arts => Some(FieldValue::List(self.arts.clone())),
            FieldKey::Normalized => Some(FieldValue::Text(self.normalized.clone())),
            FieldKey::IsService => Some(FieldValue::Flag(self.is_service)),
        }
    }

    /// Every present field, keyed by role name
    pub fn record(&self) -> Record {
        FieldKey::ALL
            .iter()
            .filter_map(|key| self.field(*key).map(|value| (key.name(), value)))
            .collect()
    }
}
