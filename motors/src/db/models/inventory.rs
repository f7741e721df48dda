//! Database models for inventory (vehicles).

use crate::types::{ClassificationId, InventoryId};
use rust_decimal::Decimal;
use serde::Serialize;

/// Database request for creating a vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryCreateDBRequest {
    pub inv_make: String,
    pub inv_model: String,
    pub inv_year: String,
    pub inv_description: String,
    pub inv_image: String,
    pub inv_thumbnail: String,
    pub inv_price: Decimal,
    pub inv_miles: i32,
    pub inv_color: String,
    pub classification_id: ClassificationId,
}

/// Updates replace every user-editable column, so they carry the same fields as a create.
pub type InventoryUpdateDBRequest = InventoryCreateDBRequest;

/// Database response for a vehicle, joined with its classification name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryDBResponse {
    pub inv_id: InventoryId,
    pub inv_make: String,
    pub inv_model: String,
    pub inv_year: String,
    pub inv_description: String,
    pub inv_image: String,
    pub inv_thumbnail: String,
    pub inv_price: Decimal,
    pub inv_miles: i32,
    pub inv_color: String,
    pub classification_id: ClassificationId,
    pub classification_name: String,
}

impl InventoryDBResponse {
    /// "{make} {model}", used in page titles and notices
    pub fn display_name(&self) -> String {
        format!("{} {}", self.inv_make, self.inv_model)
    }
}

/// Optional filters for the advanced inventory search.
///
/// A `None` filter is left out of the query entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySearch {
    pub classification_id: Option<ClassificationId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub max_miles: Option<i32>,
    /// Case-insensitive substring matched against make or model
    pub q: Option<String>,
}
