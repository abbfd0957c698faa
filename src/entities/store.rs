// 🏬 Store Entity - named locations, no identity
//
// Stores are appended verbatim once validated; there is no id, no update and
// no delete, so the list only ever grows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::attributes::{FieldDefinition, FieldType, Schema, ValidationRule};
use crate::collection::Collection;
use crate::error::ServiceResult;
use crate::schema::validate_into;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    pub address: String,
    /// [latitude, longitude]
    pub coordinates: [f64; 2],
}

pub fn store_schema() -> Schema {
    Schema::new("Store")
        .with_field(FieldDefinition::text("name", 3, 100))
        .with_field(FieldDefinition::text("address", 3, 100))
        .with_field(
            FieldDefinition::new("coordinates", FieldType::NumberPair)
                .with_description("[latitude, longitude]")
                .with_validation(ValidationRule::Required),
        )
}

pub struct StoreService {
    stores: Collection<Store>,
    schema: Schema,
}

impl StoreService {
    pub fn new() -> Self {
        Self::with_stores(Vec::new())
    }

    pub fn with_stores(stores: Vec<Store>) -> Self {
        StoreService {
            stores: Collection::seeded(stores, 0),
            schema: store_schema(),
        }
    }

    pub fn seeded() -> Self {
        Self::with_stores(default_stores())
    }

    pub fn list(&self) -> Vec<Store> {
        let stores = self.stores.all();
        debug!(count = stores.len(), "listed stores");
        stores
    }

    pub fn count(&self) -> usize {
        self.stores.len()
    }

    pub fn create(&self, payload: &Value) -> ServiceResult<Store> {
        let store: Store = validate_into(&self.schema, payload).map_err(|err| {
            warn!(error = %err, "rejected store");
            err
        })?;

        let store = self.stores.push(store);
        info!(name = %store.name, "created store");
        Ok(store)
    }
}

impl Default for StoreService {
    fn default() -> Self {
        Self::new()
    }
}

/// Demo data the server starts with
pub fn default_stores() -> Vec<Store> {
    vec![
        Store {
            name: "Covent Garden".to_string(),
            address: "6 Slingsby Place, London, WC2E 9AB".to_string(),
            coordinates: [51.5127248, -0.1287614],
        },
        Store {
            name: "Mayfair".to_string(),
            address: "The House of ELEMIS, 2 Lancashire Court, London, W1S 1EX".to_string(),
            coordinates: [51.5125376, -0.1478229],
        },
        Store {
            name: "Victoria".to_string(),
            address: "John Lewis & Partners, 171 Victoria St, London SW1E 5NN".to_string(),
            coordinates: [51.495898, -0.142044],
        },
    ]
}
