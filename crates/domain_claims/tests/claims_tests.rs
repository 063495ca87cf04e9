//! Comprehensive tests for domain_claims

use proptest::prelude::*;

use core_kernel::{ItemId, UserId};

use domain_claims::claim::{Claim, ClaimStatus};
use domain_claims::error::ClaimError;
use domain_claims::ledger;

fn create_test_claim(item_id: ItemId, user: &str) -> Claim {
    Claim::new(item_id, UserId::new(user), "Creo que es mío, lo perdí el martes").unwrap()
}

// ============================================================================
// Claim Tests
// ============================================================================

mod claim_tests {
    use super::*;

    #[test]
    fn test_new_claim_defaults() {
        let item_id = ItemId::new();
        let claim = create_test_claim(item_id, "user-2");

        assert_eq!(claim.item_id, item_id);
        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.created_at, claim.updated_at);
    }

    #[test]
    fn test_message_is_trimmed() {
        let claim = Claim::new(ItemId::new(), UserId::new("user-2"), "  es mía  ").unwrap();
        assert_eq!(claim.message, "es mía");
    }

    #[test]
    fn test_empty_message_rejected() {
        let result = Claim::new(ItemId::new(), UserId::new("user-2"), "");
        assert!(matches!(result, Err(ClaimError::EmptyMessage)));
    }

    #[test]
    fn test_pending_to_approved() {
        let mut claim = create_test_claim(ItemId::new(), "user-2");
        assert!(claim.approve().is_ok());
        assert_eq!(claim.status, ClaimStatus::Approved);
        assert!(claim.updated_at >= claim.created_at);
    }

    #[test]
    fn test_pending_to_rejected() {
        let mut claim = create_test_claim(ItemId::new(), "user-2");
        assert!(claim.reject().is_ok());
        assert_eq!(claim.status, ClaimStatus::Rejected);
    }

    #[test]
    fn test_decisions_are_final() {
        let mut approved = create_test_claim(ItemId::new(), "user-2");
        approved.approve().unwrap();
        assert!(matches!(
            approved.reject(),
            Err(ClaimError::InvalidStatusTransition { .. })
        ));

        let mut rejected = create_test_claim(ItemId::new(), "user-3");
        rejected.reject().unwrap();
        assert!(rejected.approve().is_err());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(ClaimStatus::Pending.as_str(), "pendiente");
        assert_eq!(ClaimStatus::Approved.as_str(), "aprobada");
        assert_eq!(ClaimStatus::Rejected.as_str(), "rechazada");
        assert_eq!("pendiente".parse::<ClaimStatus>().unwrap(), ClaimStatus::Pending);
        assert!("withdrawn".parse::<ClaimStatus>().is_err());
    }

    #[test]
    fn test_json_serialization_uses_spanish_names() {
        let claim = create_test_claim(ItemId::new(), "user-2");
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["status"], "pendiente");
    }
}

// ============================================================================
// Ledger Tests
// ============================================================================

mod ledger_tests {
    use super::*;

    #[test]
    fn test_active_count_counts_pending_and_approved() {
        let item_id = ItemId::new();
        let pending = create_test_claim(item_id, "user-1");
        let mut approved = create_test_claim(item_id, "user-2");
        approved.approve().unwrap();
        let mut rejected = create_test_claim(item_id, "user-3");
        rejected.reject().unwrap();

        let claims = vec![pending, approved, rejected];
        assert_eq!(ledger::active_count(&claims), 2);
        assert_eq!(ledger::pending(&claims).count(), 1);
    }

    #[test]
    fn test_duplicate_guard_spans_pending_and_approved() {
        let item_id = ItemId::new();
        let user = UserId::new("user-1");

        let pending = create_test_claim(item_id, "user-1");
        assert!(ledger::has_active_claim_by(&[pending.clone()], &user));

        let mut approved = pending;
        approved.approve().unwrap();
        assert!(ledger::has_active_claim_by(&[approved.clone()], &user));

        let mut rejected = create_test_claim(item_id, "user-1");
        rejected.reject().unwrap();
        assert!(!ledger::has_active_claim_by(&[rejected], &user));
    }

    #[test]
    fn test_current_claimer_tracks_latest_approval() {
        let item_id = ItemId::new();
        let mut first = create_test_claim(item_id, "user-1");
        let mut second = create_test_claim(item_id, "user-2");

        assert_eq!(ledger::current_claimer(&[first.clone()]), None);

        first.approve().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        second.approve().unwrap();

        let claims = vec![first, second];
        assert_eq!(
            ledger::current_claimer(&claims),
            Some(&UserId::new("user-2"))
        );
    }

    #[test]
    fn test_empty_ledger() {
        assert_eq!(ledger::active_count(&[]), 0);
        assert_eq!(ledger::current_claimer(&[]), None);
        assert!(!ledger::has_active_claim_by(&[], &UserId::new("user-1")));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// However claims are decided, the active count always equals the
    /// number of claims that are not rejected.
    #[test]
    fn prop_active_count_matches_definition(
        decisions in proptest::collection::vec(0u8..3, 0..30)
    ) {
        let item_id = ItemId::new();
        let claims: Vec<Claim> = decisions
            .iter()
            .enumerate()
            .map(|(i, decision)| {
                let mut claim = create_test_claim(item_id, &format!("user-{i}"));
                match decision {
                    1 => claim.approve().unwrap(),
                    2 => claim.reject().unwrap(),
                    _ => {}
                }
                claim
            })
            .collect();

        let expected = claims
            .iter()
            .filter(|c| c.status != ClaimStatus::Rejected)
            .count() as u32;
        prop_assert_eq!(ledger::active_count(&claims), expected);
    }
}
