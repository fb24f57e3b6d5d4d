//! Behavioural properties of the synchronization controller
//!
//! Fetch scripts are generated with proptest; each step is either a load
//! (succeeding or failing) or a publish, and the published list is checked
//! against a simple model after every step.

use std::collections::VecDeque;
use std::sync::Arc;

use list_sync::prelude::*;
use list_sync::{ListEvents, SnapshotStatus, SyncStatus};
use parking_lot::Mutex;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

type FetchResult = Result<FetchedList, FetchError>;

/// Provider replaying queued results, failing once the queue is empty
#[derive(Default)]
struct QueuedProvider {
    results: Mutex<VecDeque<FetchResult>>,
}

impl QueuedProvider {
    fn push(&self, result: FetchResult) {
        self.results.lock().push_back(result);
    }
}

impl ContentProvider for QueuedProvider {
    fn fetch(&self, _root: &ContentRoot) -> FetchResult {
        self.results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Failure("nothing queued".into())))
    }
}

fn controller_with(provider: Arc<QueuedProvider>) -> SyncController {
    SyncController::with_provider(provider, SyncConfig::queue()).unwrap()
}

fn track(generation: usize, index: usize) -> ContentItem {
    ContentItem::new(format!("Q:0/{}", index + 1), format!("Track {} of load {}", index, generation))
        .with_author(format!("Artist {}", index % 3))
        .with_album_track_no(index as u32 + 1)
}

fn published_ids(controller: &SyncController) -> Vec<String> {
    controller.items().iter().map(|item| item.id().to_string()).collect()
}

fn published_titles(controller: &SyncController) -> Vec<String> {
    controller.items().iter().map(|item| item.title().to_string()).collect()
}

fn drain(events: &ListEvents) -> Vec<ListEventKind> {
    events.try_iter().map(|e| e.kind).collect()
}

#[derive(Debug, Clone)]
enum Step {
    LoadOk(usize),
    LoadFailure,
    LoadNotFound,
    Publish,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..6).prop_map(Step::LoadOk),
        Just(Step::LoadFailure),
        Just(Step::LoadNotFound),
        Just(Step::Publish),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The published list always equals the most recently Loaded snapshot
    /// that was followed by a publish, and failures never disturb it.
    #[test]
    fn prop_published_list_tracks_latest_loaded_snapshot(steps in prop::collection::vec(step_strategy(), 1..24)) {
        let provider = Arc::new(QueuedProvider::default());
        let controller = controller_with(Arc::clone(&provider));

        let mut staged: Option<Vec<String>> = None;
        let mut expected: Vec<String> = Vec::new();

        for (generation, step) in steps.into_iter().enumerate() {
            match step {
                Step::LoadOk(len) => {
                    let items: Vec<_> = (0..len).map(|i| track(generation, i)).collect();
                    let titles: Vec<String> = items.iter().map(|i| i.title().to_string()).collect();
                    provider.push(Ok(FetchedList::new(items, format!("v{}", generation))));
                    prop_assert!(controller.load_sync());
                    staged = Some(titles);
                }
                Step::LoadFailure => {
                    provider.push(Err(FetchError::Failure("io".into())));
                    prop_assert!(!controller.load_sync());
                    staged = None;
                }
                Step::LoadNotFound => {
                    provider.push(Err(FetchError::NotFound("Q:0".into())));
                    prop_assert!(!controller.load_sync());
                    staged = None;
                }
                Step::Publish => {
                    let swapped = controller.publish();
                    prop_assert_eq!(swapped, staged.is_some());
                    if let Some(titles) = staged.take() {
                        expected = titles;
                    }
                }
            }
            prop_assert_eq!(published_titles(&controller), expected.clone());
            prop_assert_eq!(controller.row_count(), expected.len());
        }
    }

    /// N change notifications without an intervening load emit one event.
    #[test]
    fn prop_notifications_coalesce(n in 1usize..50) {
        let controller = SyncController::default();
        let events = controller.subscribe();

        let emitted = (0..n).filter(|_| controller.notify_external_change()).count();

        prop_assert_eq!(emitted, 1);
        prop_assert_eq!(drain(&events), vec![ListEventKind::DataUpdated]);
    }

    /// Every published row reads back exactly the fields of its source item.
    #[test]
    fn prop_records_match_source_items(len in 0usize..12) {
        let items: Vec<_> = (0..len).map(|i| track(0, i).with_art(format!("/art/{}.jpg", i))).collect();
        let provider = Arc::new(QueuedProvider::default());
        provider.push(Ok(FetchedList::new(items.clone(), "v1")));
        let controller = controller_with(provider);

        prop_assert!(controller.load_sync());
        prop_assert!(controller.publish());

        for (row, item) in items.iter().enumerate() {
            prop_assert_eq!(controller.row_as_record(row), item.record());
        }
        prop_assert!(controller.row_as_record(len).is_empty());
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_no_provider_leaves_list_untouched() {
    let controller = SyncController::default();

    assert!(!controller.request_load());
    assert_eq!(controller.row_count(), 0);
    assert_eq!(controller.sync_status(), SyncStatus::NotSynced);
}

#[test]
fn test_same_snapshot_twice_does_not_duplicate() {
    let items: Vec<_> = (0..3).map(|i| track(0, i)).collect();
    let provider = Arc::new(QueuedProvider::default());
    provider.push(Ok(FetchedList::new(items.clone(), "v7")));
    provider.push(Ok(FetchedList::new(items.clone(), "v7")));
    let controller = controller_with(provider);

    assert!(controller.load_sync());
    assert!(controller.publish());
    assert_eq!(controller.row_count(), 3);
    assert_eq!(published_ids(&controller), vec!["Q:0/1", "Q:0/2", "Q:0/3"]);

    assert!(controller.load_sync());
    assert!(controller.publish());
    assert_eq!(controller.row_count(), 3);
    assert_eq!(controller.update_id(), Some(VersionToken::new("v7")));
}

#[test]
fn test_reset_precedes_count_changed() {
    let provider = Arc::new(QueuedProvider::default());
    provider.push(Ok(FetchedList::new(vec![track(0, 0)], "1")));
    let controller = controller_with(provider);
    controller.load_sync();

    let events = controller.subscribe();
    controller.publish();

    assert_eq!(drain(&events), vec![ListEventKind::Reset, ListEventKind::CountChanged]);
}

#[test]
fn test_every_listener_sees_every_event() {
    let controller = SyncController::default();
    let first = controller.subscribe();
    let second = controller.subscribe();

    controller.notify_external_change();

    assert_eq!(drain(&first), vec![ListEventKind::DataUpdated]);
    assert_eq!(drain(&second), vec![ListEventKind::DataUpdated]);
}

#[test]
fn test_failure_outcome_is_reported_not_raised() {
    let provider = Arc::new(QueuedProvider::default());
    provider.push(Err(FetchError::Failure("503".into())));
    let controller = controller_with(provider);
    let events = controller.subscribe();

    assert!(!controller.load_sync());
    assert_eq!(controller.staging_status(), Some(SnapshotStatus::Failure));
    assert_eq!(
        drain(&events),
        vec![ListEventKind::LoadFinished(LoadOutcome::Failed(SyncError::FetchFailure("503".into())))]
    );
}

#[test]
fn test_load_clears_pending_refresh_marker() {
    let provider = Arc::new(QueuedProvider::default());
    provider.push(Ok(FetchedList::new(Vec::new(), "1")));
    let controller = controller_with(provider);
    let events = controller.subscribe();

    controller.notify_external_change();
    controller.notify_external_change();
    controller.load_sync();
    controller.notify_external_change();

    let updates = drain(&events)
        .into_iter()
        .filter(|kind| *kind == ListEventKind::DataUpdated)
        .count();
    assert_eq!(updates, 2);
}
