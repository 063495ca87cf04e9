//! Custom Test Assertions
//!
//! The recording notifier used by the engine suites plus assertion helpers
//! that give more meaningful failure messages than raw asserts.

use std::sync::Mutex;

use core_kernel::ItemId;
use domain_claims::{ledger, Claim};
use domain_item::Item;
use domain_lifecycle::{ChangeEvent, ChangeNotifier};

/// Notifier that records every published event
///
/// Stands in for the broadcast hub in engine tests; the publish order is
/// the commit order the real hub would fan out.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<ChangeEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded event, oldest first
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Recorded events for one item, oldest first
    pub fn events_for(&self, item_id: ItemId) -> Vec<ChangeEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.item_id() == item_id)
            .cloned()
            .collect()
    }

    /// Wire-level type tags of every recorded event, oldest first
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(ChangeEvent::event_type)
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn publish(&self, event: ChangeEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Asserts the stored claim count equals the ledger-derived active count
///
/// # Panics
///
/// Panics with both values when the invariant does not hold.
pub fn assert_count_consistent(item: &Item, claims: &[Claim]) {
    let derived = ledger::active_count(claims);
    assert_eq!(
        item.claims_count(),
        derived,
        "item {} stores claims_count={} but the ledger derives {}",
        item.id(),
        item.claims_count(),
        derived
    );
}

/// Asserts an item's status belongs to its branch
pub fn assert_on_branch(item: &Item) {
    assert_eq!(
        item.status().branch(),
        item.kind(),
        "item {} has status {} outside its {} branch",
        item.id(),
        item.status(),
        item.kind()
    );
}

/// Asserts the recorded event types for one item, in order
pub fn assert_event_types(notifier: &RecordingNotifier, item_id: ItemId, expected: &[&str]) {
    let actual: Vec<&'static str> = notifier
        .events_for(item_id)
        .iter()
        .map(ChangeEvent::event_type)
        .collect();
    assert_eq!(
        actual, expected,
        "event sequence for item {item_id} did not match"
    );
}
