//! Saved Sonos playlists

use std::ops::Deref;
use std::sync::Arc;

use list_sync::{ContentItem, ContentRoot, Payload, Result, SyncConfig, SyncController};

use crate::directory::{ContentDirectory, DirectoryProvider};
use crate::host::MediaHost;
use crate::object::DigitalObject;

/// Build a playlist row; only playlist containers are valid
///
/// Every artwork URI is prefixed with `base_url`.
pub fn playlist_item(object: &DigitalObject, base_url: &str) -> Option<ContentItem> {
    if !object.is_playlist_container() {
        return None;
    }

    let arts = object
        .album_art_uris
        .iter()
        .map(|uri| format!("{}{}", base_url, uri));

    Some(
        ContentItem::new(object.object_id.clone(), object.title.clone())
            .with_arts(arts)
            .with_payload(Payload::new(object.clone())),
    )
}

/// List of saved playlists of a household
#[derive(Debug)]
pub struct PlaylistsModel {
    controller: SyncController,
}

impl PlaylistsModel {
    pub fn new() -> Result<Self> {
        Self::with_config(SyncConfig::playlists())
    }

    pub fn with_config(config: SyncConfig) -> Result<Self> {
        Ok(Self {
            controller: SyncController::new(config)?,
        })
    }

    /// Attach a directory and optionally fill the list right away
    ///
    /// `root` defaults to the saved-playlists container.
    pub fn init<D>(&self, directory: D, host: MediaHost, root: Option<ContentRoot>, fill: bool) -> bool
    where
        D: ContentDirectory + 'static,
    {
        let provider = DirectoryProvider::new(directory, host, playlist_item);
        self.controller.configure(Arc::new(provider), root, fill)
    }

    pub fn controller(&self) -> &SyncController {
        &self.controller
    }
}

impl Deref for PlaylistsModel {
    type Target = SyncController;

    fn deref(&self) -> &Self::Target {
        &self.controller
    }
}
