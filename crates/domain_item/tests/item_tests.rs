//! Comprehensive tests for domain_item

use proptest::prelude::*;

use core_kernel::UserId;

use domain_item::item::{ContactInfo, Coordinates, Item, ItemPatch, NewItem};
use domain_item::ports::ItemFilter;
use domain_item::report::{Report, ReportReason};
use domain_item::status::{ItemKind, ItemStatus};
use domain_item::ItemError;

fn create_test_input() -> NewItem {
    NewItem {
        title: "Llaves con llavero rojo".to_string(),
        description: "Manojo de tres llaves".to_string(),
        category: "llaves".to_string(),
        location: "Estación de tren".to_string(),
        coordinates: Some(Coordinates {
            lat: 42.8782,
            lng: -8.5448,
        }),
        images: vec!["img/llaves-1.jpg".to_string(), "img/llaves-2.jpg".to_string()],
        contact: None,
        police_deposit: false,
        monthly_report_url: None,
    }
}

fn create_test_item(kind: ItemKind) -> Item {
    Item::new(UserId::new("user-1"), create_test_input(), kind).unwrap()
}

// ============================================================================
// Creation Tests
// ============================================================================

mod creation_tests {
    use super::*;

    #[test]
    fn test_lost_item_starts_as_perdido() {
        let item = create_test_item(ItemKind::Lost);
        assert_eq!(item.status(), ItemStatus::Lost);
        assert_eq!(item.kind(), ItemKind::Lost);
    }

    #[test]
    fn test_found_item_starts_as_encontrado() {
        let item = create_test_item(ItemKind::Found);
        assert_eq!(item.status(), ItemStatus::Found);
    }

    #[test]
    fn test_creation_trims_text_fields() {
        let mut input = create_test_input();
        input.title = "  Llaves  ".to_string();
        let item = Item::new(UserId::new("user-1"), input, ItemKind::Lost).unwrap();
        assert_eq!(item.title(), "Llaves");
    }

    #[test]
    fn test_creation_requires_each_text_field() {
        for field in ["title", "description", "category", "location"] {
            let mut input = create_test_input();
            match field {
                "title" => input.title = String::new(),
                "description" => input.description = String::new(),
                "category" => input.category = String::new(),
                _ => input.location = String::new(),
            }
            let result = Item::new(UserId::new("user-1"), input, ItemKind::Lost);
            assert!(
                matches!(result, Err(ItemError::MissingField(f)) if f == field),
                "expected MissingField for {field}"
            );
        }
    }

    #[test]
    fn test_creation_rejects_blank_image_reference() {
        let mut input = create_test_input();
        input.images = vec!["".to_string()];
        let result = Item::new(UserId::new("user-1"), input, ItemKind::Found);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_contact_is_dropped() {
        let mut input = create_test_input();
        input.contact = Some(ContactInfo::default());
        let item = Item::new(UserId::new("user-1"), input, ItemKind::Found).unwrap();
        assert!(item.contact().is_none());
    }

    #[test]
    fn test_police_deposit_keeps_report_url() {
        let mut input = create_test_input();
        input.police_deposit = true;
        input.monthly_report_url = Some("https://policia.example/boletin".to_string());
        let item = Item::new(UserId::new("comisaria-1"), input, ItemKind::Found).unwrap();
        assert!(item.police_deposit());
        assert_eq!(
            item.monthly_report_url(),
            Some("https://policia.example/boletin")
        );
    }

    #[test]
    fn test_item_ids_are_creation_ordered() {
        let first = create_test_item(ItemKind::Lost);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = create_test_item(ItemKind::Lost);
        assert!(first.id().as_uuid() < second.id().as_uuid());
    }
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_full_found_round_trip() {
        let mut item = create_test_item(ItemKind::Found);

        item.register_claim().unwrap();
        assert_eq!(item.status(), ItemStatus::PendingDelivery);

        item.register_claim().unwrap();
        assert_eq!(item.claims_count(), 2);
        assert_eq!(item.status(), ItemStatus::PendingDelivery);

        item.release_claim().unwrap();
        assert_eq!(item.status(), ItemStatus::PendingDelivery);

        item.release_claim().unwrap();
        assert_eq!(item.status(), ItemStatus::Found);
        assert_eq!(item.claims_count(), 0);

        item.register_claim().unwrap();
        item.resolve().unwrap();
        assert_eq!(item.status(), ItemStatus::Delivered);
        assert!(item.is_resolved());
    }

    #[test]
    fn test_resolution_without_claims() {
        // A publisher can close a listing that was resolved off-platform
        let mut item = create_test_item(ItemKind::Lost);
        item.resolve().unwrap();
        assert_eq!(item.status(), ItemStatus::Recovered);
    }

    #[test]
    fn test_status_never_leaves_branch() {
        let mut item = create_test_item(ItemKind::Lost);
        item.register_claim().unwrap();
        item.resolve().unwrap();

        assert_eq!(item.status().branch(), ItemKind::Lost);
        assert_eq!(item.status(), ItemStatus::Recovered);
    }

    #[test]
    fn test_version_increases_with_each_mutation() {
        let mut item = create_test_item(ItemKind::Found);
        let v0 = item.version();

        item.register_claim().unwrap();
        let v1 = item.version();
        assert!(v1 > v0);

        item.resolve().unwrap();
        assert!(item.version() > v1);
    }
}

// ============================================================================
// Patch Tests
// ============================================================================

mod patch_tests {
    use super::*;

    #[test]
    fn test_patch_updates_only_given_fields() {
        let mut item = create_test_item(ItemKind::Found);
        let original_description = item.description().to_string();

        item.apply_patch(ItemPatch {
            location: Some("Oficina de objetos perdidos".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(item.location(), "Oficina de objetos perdidos");
        assert_eq!(item.description(), original_description);
    }

    #[test]
    fn test_blank_patch_field_is_rejected() {
        let mut item = create_test_item(ItemKind::Found);
        let result = item.apply_patch(ItemPatch {
            title: Some("   ".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ItemError::MissingField("title"))));
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut item = create_test_item(ItemKind::Found);
        let version = item.version();
        let changed = item.apply_patch(ItemPatch::default()).unwrap();
        assert!(!changed);
        assert_eq!(item.version(), version);
    }
}

// ============================================================================
// Report Tests
// ============================================================================

mod report_tests {
    use super::*;

    #[test]
    fn test_report_keeps_reason_and_reporter() {
        let item = create_test_item(ItemKind::Found);
        let report = Report::new(
            item.id(),
            UserId::new("user-9"),
            ReportReason::Spam,
            Some("Publicado tres veces".to_string()),
        );

        assert_eq!(report.item_id, item.id());
        assert_eq!(report.reason, ReportReason::Spam);
        assert_eq!(report.description.as_deref(), Some("Publicado tres veces"));
    }

    #[test]
    fn test_blank_description_becomes_none() {
        let item = create_test_item(ItemKind::Found);
        let report = Report::new(
            item.id(),
            UserId::new("user-9"),
            ReportReason::Other,
            Some("  ".to_string()),
        );
        assert!(report.description.is_none());
    }

    #[test]
    fn test_reason_wire_names() {
        for (reason, wire) in [
            (ReportReason::Fake, "fake"),
            (ReportReason::PersonalData, "personal_data"),
            (ReportReason::Offensive, "offensive"),
        ] {
            assert_eq!(reason.as_str(), wire);
            assert_eq!(wire.parse::<ReportReason>().unwrap(), reason);
        }
    }
}

// ============================================================================
// Filter Tests
// ============================================================================

mod filter_tests {
    use super::*;

    #[test]
    fn test_combined_filter_is_and() {
        let item = create_test_item(ItemKind::Lost);
        let mut filter = ItemFilter::default();
        filter.kind = Some(ItemKind::Lost);
        filter.category = Some("llaves".to_string());
        assert!(filter.matches(&item));

        filter.category = Some("carteras".to_string());
        assert!(!filter.matches(&item));
    }

    #[test]
    fn test_police_flag_filter() {
        let mut input = create_test_input();
        input.police_deposit = true;
        let police_item = Item::new(UserId::new("comisaria-1"), input, ItemKind::Found).unwrap();
        let civilian_item = create_test_item(ItemKind::Found);

        let mut filter = ItemFilter::default();
        filter.police_deposit = Some(true);
        assert!(filter.matches(&police_item));
        assert!(!filter.matches(&civilian_item));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Any sequence of register/release operations keeps the status glued
    /// to what the active-claim count implies.
    #[test]
    fn prop_status_tracks_claim_count(ops in proptest::collection::vec(any::<bool>(), 0..40)) {
        let mut item = create_test_item(ItemKind::Found);
        let mut active: u32 = 0;

        for register in ops {
            if register {
                item.register_claim().unwrap();
                active += 1;
            } else if active > 0 {
                item.release_claim().unwrap();
                active -= 1;
            } else {
                prop_assert!(item.release_claim().is_err());
            }

            prop_assert_eq!(item.claims_count(), active);
            if active == 0 {
                prop_assert_eq!(item.status(), ItemStatus::Found);
            } else {
                prop_assert_eq!(item.status(), ItemStatus::PendingDelivery);
            }
        }
    }
}
