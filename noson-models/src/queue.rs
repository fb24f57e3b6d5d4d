//! Play queue of a zone

use std::ops::Deref;
use std::sync::Arc;

use list_sync::{ContentItem, ContentRoot, Payload, Result, SyncConfig, SyncController};

use crate::directory::{resolve_art, ContentDirectory, DirectoryProvider};
use crate::host::MediaHost;
use crate::object::DigitalObject;

/// Build a queue row from a track object
///
/// Every object is a valid queue entry. The artwork is the first album art
/// URI, made absolute against `base_url`.
pub fn track_item(object: &DigitalObject, base_url: &str) -> Option<ContentItem> {
    let mut item = ContentItem::new(object.object_id.clone(), object.title.clone())
        .with_service(object.is_service_item())
        .with_payload(Payload::new(object.clone()));

    if let Some(creator) = object.creator.as_deref() {
        item = item.with_author(creator);
    }
    if let Some(album) = object.album.as_deref() {
        item = item.with_album(album);
    }
    if let Some(track_no) = object.original_track_number {
        item = item.with_album_track_no(track_no);
    }
    if let Some(uri) = object.album_art_uris.first() {
        item = item.with_art(resolve_art(base_url, uri));
    }
    Some(item)
}

/// Tracks queued on a zone
#[derive(Debug)]
pub struct QueueModel {
    controller: SyncController,
}

impl QueueModel {
    pub fn new() -> Result<Self> {
        Self::with_config(SyncConfig::queue())
    }

    pub fn with_config(config: SyncConfig) -> Result<Self> {
        Ok(Self {
            controller: SyncController::new(config)?,
        })
    }

    /// Attach a directory and optionally fill the list right away
    ///
    /// `root` defaults to the zone queue `Q:0`.
    pub fn init<D>(&self, directory: D, host: MediaHost, root: Option<ContentRoot>, fill: bool) -> bool
    where
        D: ContentDirectory + 'static,
    {
        let provider = DirectoryProvider::new(directory, host, track_item);
        self.controller.configure(Arc::new(provider), root, fill)
    }

    pub fn controller(&self) -> &SyncController {
        &self.controller
    }
}

impl Deref for QueueModel {
    type Target = SyncController;

    fn deref(&self) -> &Self::Target {
        &self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use list_sync::{FieldKey, FieldValue};

    #[test]
    fn test_track_item_fields() {
        let object = DigitalObject {
            creator: Some("Nina Simone".into()),
            album: Some("Pastel Blues".into()),
            original_track_number: Some(3),
            album_art_uris: vec!["/getaa?s=1&u=x-file-cifs".into(), "/second".into()],
            ..DigitalObject::new("Q:0/7", "object.item.audioItem.musicTrack", "Be My Husband")
        };
        let item = track_item(&object, "http://10.0.0.2:1400").unwrap();
        let record = item.record();

        assert_eq!(record["author"], FieldValue::Text("Nina Simone".into()));
        assert_eq!(record["album"], FieldValue::Text("Pastel Blues".into()));
        assert_eq!(record["albumTrackNo"], FieldValue::Number(3));
        assert_eq!(record["art"], FieldValue::Text("http://10.0.0.2:1400/getaa?s=1&u=x-file-cifs".into()));
        assert_eq!(record["isService"], FieldValue::Flag(false));
        assert_eq!(item.arts().len(), 1);
    }

    #[test]
    fn test_service_track() {
        let object = DigitalObject {
            desc: Some("SA_RINCON52231_X_#Svc52231-0-Token".into()),
            album_art_uris: vec!["https://i.scdn.co/image/ab67".into()],
            ..DigitalObject::new("Q:0/1", "object.item.audioItem.musicTrack", "Radio Edit")
        };
        let item = track_item(&object, "http://h:1400").unwrap();

        assert!(item.is_service());
        assert_eq!(item.art(), Some("https://i.scdn.co/image/ab67"));
        assert!(item.field(FieldKey::Author).is_none());
    }

    #[test]
    fn test_model_defaults_to_queue_root() {
        let model = QueueModel::new().unwrap();
        assert_eq!(model.root(), ContentRoot::queue());
    }
}
