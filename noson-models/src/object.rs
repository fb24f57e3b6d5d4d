//! Library records returned by a content directory browse

use serde::{Deserialize, Serialize};

/// UPnP class prefix of saved playlists
pub const PLAYLIST_CONTAINER_CLASS: &str = "object.container.playlistContainer";

/// Marker carried in `desc` by items that stream from a music service
pub const SERVICE_DESC_PREFIX: &str = "SA_RINCON";

/// One object of a DIDL-Lite browse result, already decoded
///
/// Stored as the opaque payload of the list rows built from it, so callers
/// can hand it back to the player (e.g. to queue or play the item).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DigitalObject {
    pub object_id: String,
    #[serde(default)]
    pub parent_id: String,
    pub class: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub original_track_number: Option<u32>,
    #[serde(default)]
    pub album_art_uris: Vec<String>,
    #[serde(default)]
    pub desc: Option<String>,
}

impl DigitalObject {
    pub fn new(object_id: impl Into<String>, class: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            class: class.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn is_playlist_container(&self) -> bool {
        self.class.starts_with(PLAYLIST_CONTAINER_CLASS)
    }

    /// Whether the object streams from a music service rather than the
    /// local library
    pub fn is_service_item(&self) -> bool {
        self.desc
            .as_deref()
            .is_some_and(|desc| desc.starts_with(SERVICE_DESC_PREFIX))
    }
}
