//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for the entities of the marketplace. Fixtures
//! are deterministic where tests depend on the values and only reach for
//! random data where the value itself does not matter.

use core_kernel::UserId;
use domain_item::{ContactInfo, Coordinates, ItemKind, NewItem};

/// Fixture for user identities
pub struct UserFixtures;

impl UserFixtures {
    /// The publishing user most fixtures use
    pub fn publisher() -> UserId {
        UserId::new("auth0|publisher-01")
    }

    /// A claimant distinct from the publisher
    pub fn claimant() -> UserId {
        UserId::new("auth0|claimant-01")
    }

    /// A second claimant for multi-claim scenarios
    pub fn other_claimant() -> UserId {
        UserId::new("auth0|claimant-02")
    }

    /// A user unrelated to the item under test
    pub fn stranger() -> UserId {
        UserId::new("auth0|stranger-01")
    }
}

/// Fixture for item creation input
pub struct ItemFixtures;

impl ItemFixtures {
    /// A found wallet, the standard found-branch listing
    pub fn found_wallet() -> NewItem {
        NewItem {
            title: "Cartera de cuero marrón".to_string(),
            description: "Encontrada en un banco de la plaza, con iniciales J.R.".to_string(),
            category: "carteras".to_string(),
            location: "Plaza de María Pita".to_string(),
            coordinates: Some(Coordinates {
                lat: 43.3713,
                lng: -8.3960,
            }),
            images: vec![
                "img/cartera-1.jpg".to_string(),
                "img/cartera-2.jpg".to_string(),
            ],
            contact: None,
            police_deposit: false,
            monthly_report_url: None,
        }
    }

    /// Lost keys, the standard lost-branch listing
    pub fn lost_keys() -> NewItem {
        NewItem {
            title: "Llaves con llavero de madera".to_string(),
            description: "Manojo de cuatro llaves, llavero tallado a mano".to_string(),
            category: "llaves".to_string(),
            location: "Estación de autobuses".to_string(),
            coordinates: None,
            images: vec!["img/llaves.jpg".to_string()],
            contact: Some(ContactInfo {
                email: Some("duende@example.org".to_string()),
                phone: None,
            }),
            police_deposit: false,
            monthly_report_url: None,
        }
    }

    /// A listing managed by a police deposit
    pub fn police_umbrella() -> NewItem {
        NewItem {
            title: "Paraguas negro".to_string(),
            description: "Depositado en la comisaría central".to_string(),
            category: "paraguas".to_string(),
            location: "Comisaría Lonzas".to_string(),
            coordinates: None,
            images: vec!["img/paraguas.jpg".to_string()],
            contact: None,
            police_deposit: true,
            monthly_report_url: Some("https://policia.example.org/boletin/2024-06".to_string()),
        }
    }

    /// Branch-matched standard input
    pub fn for_kind(kind: ItemKind) -> NewItem {
        match kind {
            ItemKind::Found => Self::found_wallet(),
            ItemKind::Lost => Self::lost_keys(),
        }
    }
}

/// Fixture for claim messages
pub struct MessageFixtures;

impl MessageFixtures {
    pub fn ownership() -> String {
        "Es mía, la perdí el martes por la tarde. Dentro hay una foto de mi perro.".to_string()
    }

    pub fn finder() -> String {
        "Creo que he visto estas llaves en el parque, puedo acercarlas.".to_string()
    }
}
