//! Configuration for synchronization controllers

use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::snapshot::ContentRoot;

/// Configuration for a `SyncController`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Root fetched when `configure` is called without one
    /// Default: `Q:0` (the zone queue)
    pub default_root: ContentRoot,

    /// Name given to the background load thread
    /// Default: "list-sync-loader"
    pub worker_thread_name: String,

    /// Publish right after a successful fill in `configure`
    /// Default: true
    pub publish_on_fill: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_root: ContentRoot::queue(),
            worker_thread_name: "list-sync-loader".to_string(),
            publish_on_fill: true,
        }
    }
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for a zone queue view
    pub fn queue() -> Self {
        Self {
            default_root: ContentRoot::queue(),
            worker_thread_name: "queue-loader".to_string(),
            ..Default::default()
        }
    }

    /// Configuration for a saved-playlists view
    pub fn playlists() -> Self {
        Self {
            default_root: ContentRoot::sonos_playlists(),
            worker_thread_name: "playlists-loader".to_string(),
            ..Default::default()
        }
    }

    pub fn with_default_root(mut self, root: impl Into<ContentRoot>) -> Self {
        self.default_root = root.into();
        self
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.default_root.is_empty() {
            return Err(SyncError::Configuration(
                "Default content root must not be empty".to_string(),
            ));
        }

        if self.worker_thread_name.trim().is_empty() {
            return Err(SyncError::Configuration(
                "Worker thread name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
