//! Content-directory backed provider
//!
//! Bridges a `ContentDirectory` (anything able to browse a root and return
//! decoded objects) to the `ContentProvider` seam of a list controller.

use std::fmt;
use std::sync::Arc;

use list_sync::{ContentItem, ContentProvider, ContentRoot, FetchError, FetchedList, VersionToken};

use crate::host::MediaHost;
use crate::object::DigitalObject;

/// Objects of one browse, with the container's update ID
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseResult {
    pub objects: Vec<DigitalObject>,
    pub update_id: VersionToken,
}

/// Remote content directory of a player
pub trait ContentDirectory: Send + Sync {
    /// Browse every object under `root`
    fn browse(&self, root: &ContentRoot) -> Result<BrowseResult, FetchError>;
}

impl<T: ContentDirectory + ?Sized> ContentDirectory for Arc<T> {
    fn browse(&self, root: &ContentRoot) -> Result<BrowseResult, FetchError> {
        (**self).browse(root)
    }
}

/// Turns a browsed object into a list row, `None` to skip it
pub type ItemBuilder = fn(&DigitalObject, &str) -> Option<ContentItem>;

/// `ContentProvider` that browses a directory and builds rows
pub struct DirectoryProvider<D> {
    directory: D,
    host: MediaHost,
    build: ItemBuilder,
}

impl<D: ContentDirectory> DirectoryProvider<D> {
    pub fn new(directory: D, host: MediaHost, build: ItemBuilder) -> Self {
        Self {
            directory,
            host,
            build,
        }
    }

    pub fn host(&self) -> &MediaHost {
        &self.host
    }
}

impl<D: ContentDirectory> ContentProvider for DirectoryProvider<D> {
    fn fetch(&self, root: &ContentRoot) -> Result<FetchedList, FetchError> {
        let result = self.directory.browse(root)?;
        let base_url = self.host.base_url();
        let browsed = result.objects.len();

        let items: Vec<ContentItem> = result
            .objects
            .iter()
            .filter_map(|object| (self.build)(object, &base_url))
            .collect();

        if items.len() != browsed {
            tracing::debug!(
                root = %root,
                skipped = browsed - items.len(),
                "Skipped objects not valid for this list"
            );
        }

        Ok(FetchedList {
            items,
            update_id: result.update_id,
        })
    }
}

impl<D> fmt::Debug for DirectoryProvider<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryProvider")
            .field("host", &self.host)
            .finish()
    }
}

/// Make an artwork reference absolute against `base_url`
pub(crate) fn resolve_art(base_url: &str, uri: &str) -> String {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        uri.to_string()
    } else {
        format!("{}{}", base_url, uri)
    }
}
