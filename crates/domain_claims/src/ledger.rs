//! Claim ledger rules
//!
//! Pure functions over a loaded set of claims for one item. The lifecycle
//! engine uses these to derive item state; adapters must never duplicate
//! the logic.

use core_kernel::UserId;

use crate::claim::{Claim, ClaimStatus};

/// Iterates the active (pending or approved) claims
pub fn active(claims: &[Claim]) -> impl Iterator<Item = &Claim> {
    claims.iter().filter(|claim| claim.status.is_active())
}

/// Iterates the claims still awaiting a decision
pub fn pending(claims: &[Claim]) -> impl Iterator<Item = &Claim> {
    claims
        .iter()
        .filter(|claim| claim.status == ClaimStatus::Pending)
}

/// Number of active claims; the value `claims_count` must mirror
pub fn active_count(claims: &[Claim]) -> u32 {
    active(claims).count() as u32
}

/// True when `user` already holds an active claim in this ledger
///
/// Backs the one-active-claim-per-claimant rule.
pub fn has_active_claim_by(claims: &[Claim], user: &UserId) -> bool {
    active(claims).any(|claim| &claim.claimant == user)
}

/// The designated claimer: claimant of the most recently approved claim
///
/// Derived on every read, never stored, so it cannot drift from the ledger.
pub fn current_claimer(claims: &[Claim]) -> Option<&UserId> {
    claims
        .iter()
        .filter(|claim| claim.status == ClaimStatus::Approved)
        .max_by_key(|claim| claim.updated_at)
        .map(|claim| &claim.claimant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::ItemId;

    fn claim_for(item_id: ItemId, user: &str) -> Claim {
        Claim::new(item_id, UserId::new(user), "lo perdí ayer").unwrap()
    }

    #[test]
    fn test_active_count_ignores_rejected() {
        let item_id = ItemId::new();
        let mut rejected = claim_for(item_id, "user-1");
        rejected.reject().unwrap();
        let claims = vec![rejected, claim_for(item_id, "user-2")];

        assert_eq!(active_count(&claims), 1);
    }

    #[test]
    fn test_has_active_claim_by_sees_approved() {
        let item_id = ItemId::new();
        let mut approved = claim_for(item_id, "user-1");
        approved.approve().unwrap();
        let claims = vec![approved];

        assert!(has_active_claim_by(&claims, &UserId::new("user-1")));
        assert!(!has_active_claim_by(&claims, &UserId::new("user-2")));
    }

    #[test]
    fn test_current_claimer_is_latest_approval() {
        let item_id = ItemId::new();
        let mut first = claim_for(item_id, "user-1");
        let mut second = claim_for(item_id, "user-2");

        first.approve().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        second.approve().unwrap();

        let claims = vec![first, second];
        assert_eq!(current_claimer(&claims), Some(&UserId::new("user-2")));
    }

    #[test]
    fn test_current_claimer_none_without_approval() {
        let item_id = ItemId::new();
        let claims = vec![claim_for(item_id, "user-1")];
        assert_eq!(current_claimer(&claims), None);
    }
}
