//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults, and
//! the engine harness most suites drive their scenarios through: a
//! [`LifecycleEngine`] wired to the in-memory store and a recording
//! notifier.

use std::sync::Arc;

use core_kernel::UserId;
use domain_claims::Claim;
use domain_item::{ContactInfo, Coordinates, Item, ItemKind, NewItem};
use domain_lifecycle::{EngineConfig, LifecycleEngine};
use infra_store::MemoryStore;

use crate::assertions::RecordingNotifier;
use crate::fixtures::{ItemFixtures, UserFixtures};

/// Builder for item creation input
pub struct TestItemBuilder {
    publisher: UserId,
    kind: ItemKind,
    input: NewItem,
}

impl Default for TestItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestItemBuilder {
    /// Starts from the standard found-branch fixture
    pub fn new() -> Self {
        Self {
            publisher: UserFixtures::publisher(),
            kind: ItemKind::Found,
            input: ItemFixtures::found_wallet(),
        }
    }

    pub fn publisher(mut self, publisher: UserId) -> Self {
        self.publisher = publisher;
        self
    }

    /// Sets the branch and swaps in the branch-matched fixture input
    pub fn kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self.input = ItemFixtures::for_kind(kind);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.input.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.input.description = description.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.input.category = category.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.input.location = location.into();
        self
    }

    pub fn coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.input.coordinates = Some(Coordinates { lat, lng });
        self
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.input.images = images;
        self
    }

    pub fn no_images(mut self) -> Self {
        self.input.images.clear();
        self
    }

    pub fn contact(mut self, email: Option<&str>, phone: Option<&str>) -> Self {
        self.input.contact = Some(ContactInfo {
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
        });
        self
    }

    pub fn police_deposit(mut self, police: bool) -> Self {
        self.input.police_deposit = police;
        self
    }

    /// The raw creation input, for driving the engine or the HTTP layer
    pub fn input(self) -> NewItem {
        self.input
    }

    /// Builds the aggregate directly, bypassing the engine
    pub fn build(self) -> Item {
        Item::new(self.publisher, self.input, self.kind).expect("builder input must be valid")
    }
}

/// Builder for claims attached to an existing item
pub struct TestClaimBuilder {
    claimant: UserId,
    message: String,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    pub fn new() -> Self {
        Self {
            claimant: UserFixtures::claimant(),
            message: crate::fixtures::MessageFixtures::ownership(),
        }
    }

    pub fn claimant(mut self, claimant: UserId) -> Self {
        self.claimant = claimant;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn build(self, item: &Item) -> Claim {
        Claim::new(item.id(), self.claimant, self.message).expect("builder input must be valid")
    }
}

/// Engine harness over the in-memory store
///
/// Every committed event lands in `notifier`, so tests can assert both the
/// stored state and the published fan-out of one scenario.
pub struct TestEngine {
    pub engine: Arc<LifecycleEngine>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let engine = Arc::new(LifecycleEngine::with_config(
            store.clone(),
            notifier.clone(),
            config,
        ));
        Self {
            engine,
            store,
            notifier,
        }
    }

    /// Publishes the standard found-branch item and returns it
    pub async fn publish_found_item(&self) -> Item {
        self.engine
            .create_item(
                UserFixtures::publisher(),
                ItemFixtures::found_wallet(),
                ItemKind::Found,
            )
            .await
            .expect("fixture item must publish")
    }

    /// Publishes the standard lost-branch item and returns it
    pub async fn publish_lost_item(&self) -> Item {
        self.engine
            .create_item(
                UserFixtures::publisher(),
                ItemFixtures::lost_keys(),
                ItemKind::Lost,
            )
            .await
            .expect("fixture item must publish")
    }
}
