//! The UI-visible side of a synchronized list

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::item::{ContentItem, FieldKey, FieldValue, Record};
use crate::snapshot::VersionToken;

/// Whether the published rows reflect the latest known server state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    NotSynced,
    Synced,
}

/// Ordered rows currently exposed to consumers
///
/// Only ever replaced wholesale by `replace`; rows are never patched.
#[derive(Debug, Clone)]
pub struct PublishedList {
    rows: Vec<Arc<ContentItem>>,
    update_id: Option<VersionToken>,
    status: SyncStatus,
}

impl PublishedList {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            update_id: None,
            status: SyncStatus::NotSynced,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn item(&self, row: usize) -> Option<&Arc<ContentItem>> {
        self.rows.get(row)
    }

    /// Field of one row, `None` for an out-of-range row or absent field
    pub fn field_at(&self, row: usize, key: FieldKey) -> Option<FieldValue> {
        self.rows.get(row)?.field(key)
    }

    /// All present fields of one row, empty for an out-of-range row
    pub fn row_as_record(&self, row: usize) -> Record {
        self.rows.get(row).map(|item| item.record()).unwrap_or_default()
    }

    pub fn rows(&self) -> &[Arc<ContentItem>] {
        &self.rows
    }

    pub fn update_id(&self) -> Option<&VersionToken> {
        self.update_id.as_ref()
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub(crate) fn mark_stale(&mut self) {
        self.status = SyncStatus::NotSynced;
    }

    pub(crate) fn replace(&mut self, items: Vec<ContentItem>, update_id: Option<VersionToken>) {
        self.rows = items.into_iter().map(Arc::new).collect();
        self.update_id = update_id;
        self.status = SyncStatus::Synced;
    }
}

impl Default for PublishedList {
    fn default() -> Self {
        Self::new()
    }
}
