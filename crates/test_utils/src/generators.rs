//! Property-Based Test Generators
//!
//! Proptest strategies for generating random test data that stays inside
//! the domain's validation rules, plus a few `fake`-backed helpers for
//! ad-hoc values whose content does not matter.

use fake::faker::lorem::en::{Sentence, Words};
use fake::Fake;
use proptest::prelude::*;

use core_kernel::UserId;
use domain_item::{Coordinates, ItemKind, NewItem};

/// Strategy for the two item branches
pub fn item_kind_strategy() -> impl Strategy<Value = ItemKind> {
    prop_oneof![Just(ItemKind::Lost), Just(ItemKind::Found)]
}

/// Strategy for opaque user identifiers
pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
    "[a-z0-9]{8,16}".prop_map(|sub| UserId::new(format!("auth0|{sub}")))
}

/// Strategy for non-blank single-line text fields
pub fn text_field_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9áéíóúñ][a-zA-Z0-9áéíóúñ ]{0,60}".prop_map(|s| s.trim().to_string() + "x")
}

/// Strategy for non-empty image reference lists
pub fn images_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9/-]{4,24}\\.jpg", 1..4)
}

/// Strategy for optional coordinates
pub fn coordinates_strategy() -> impl Strategy<Value = Option<Coordinates>> {
    prop::option::of((-90.0f64..90.0, -180.0f64..180.0).prop_map(|(lat, lng)| Coordinates {
        lat,
        lng,
    }))
}

/// Strategy for valid item creation input
pub fn new_item_strategy() -> impl Strategy<Value = NewItem> {
    (
        text_field_strategy(),
        text_field_strategy(),
        text_field_strategy(),
        text_field_strategy(),
        coordinates_strategy(),
        images_strategy(),
        any::<bool>(),
    )
        .prop_map(
            |(title, description, category, location, coordinates, images, police)| NewItem {
                title,
                description,
                category,
                location,
                coordinates,
                images,
                contact: None,
                police_deposit: police,
                monthly_report_url: None,
            },
        )
}

/// Strategy for non-blank claim messages
pub fn claim_message_strategy() -> impl Strategy<Value = String> {
    text_field_strategy()
}

/// One step of a random claim workflow, driven against a single item
///
/// Claimants are drawn from a small pool by index so sequences exercise
/// the duplicate-claim rule as well as the happy path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOp {
    /// Claimant `n` files a claim
    Create(usize),
    /// Publisher approves claimant `n`'s pending claim, if any
    Approve(usize),
    /// Publisher rejects claimant `n`'s pending claim, if any
    Reject(usize),
    /// Claimant `n` withdraws their claim, if any
    Withdraw(usize),
}

/// Strategy for random claim workflows over a pool of `claimants` users
pub fn claim_ops_strategy(claimants: usize, len: usize) -> impl Strategy<Value = Vec<ClaimOp>> {
    let op = (0usize..claimants, 0u8..4u8).prop_map(|(user, op)| match op {
        0 => ClaimOp::Create(user),
        1 => ClaimOp::Approve(user),
        2 => ClaimOp::Reject(user),
        _ => ClaimOp::Withdraw(user),
    });
    prop::collection::vec(op, 1..len)
}

/// A throwaway title for tests that only need some text
pub fn random_title() -> String {
    let words: Vec<String> = Words(2..5).fake();
    words.join(" ")
}

/// A throwaway description
pub fn random_description() -> String {
    Sentence(4..12).fake()
}
