use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

text_enum!(ItemStatus, "item status" {
    Available => "available",
    InUse => "in-use",
    Damaged => "damaged",
    Lost => "lost",
    Maintenance => "maintenance",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct InventoryItem {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ItemStatus,
    pub condition: Option<String>,
    pub purchase_price: Option<f64>,
    pub current_value: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_description: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn new(sku: String, name: String, created_by: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            sku,
            name,
            description: None,
            category: None,
            status: ItemStatus::Available,
            condition: None,
            purchase_price: None,
            current_value: None,
            latitude: None,
            longitude: None,
            location_description: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ItemDraft {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub condition: Option<String>,
    pub purchase_price: Option<f64>,
    pub current_value: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_description: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ItemFilters {
    pub status: Option<ItemStatus>,
    pub category: Option<String>,
    pub search: Option<String>,
}
