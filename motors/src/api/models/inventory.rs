//! Form and response models for classifications and inventory.
//!
//! Forms keep every field as the raw submitted string so a rejected submission can be
//! echoed back exactly as typed. Missing fields deserialize as empty strings and are
//! reported by validation rather than rejected by the extractor.

use crate::db::models::inventory::InventoryDBResponse;
use crate::types::{ClassificationId, InventoryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationForm {
    pub classification_name: String,
}

/// Add and edit vehicle form. `inv_id` is only submitted by the edit form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryForm {
    pub inv_id: String,
    pub inv_make: String,
    pub inv_model: String,
    pub inv_year: String,
    pub inv_description: String,
    pub inv_image: String,
    pub inv_thumbnail: String,
    pub inv_price: String,
    pub inv_miles: String,
    pub inv_color: String,
    pub classification_id: String,
}

impl InventoryForm {
    /// Blank add form with the placeholder images preselected.
    pub fn blank() -> Self {
        Self {
            inv_image: "/images/vehicles/no-image.svg".to_string(),
            inv_thumbnail: "/images/vehicles/no-image-tn.svg".to_string(),
            ..Default::default()
        }
    }

    /// Selected classification, when the submitted value is a valid id.
    pub fn selected_classification(&self) -> Option<ClassificationId> {
        crate::types::parse_id(&self.classification_id)
    }
}

impl From<&InventoryDBResponse> for InventoryForm {
    fn from(v: &InventoryDBResponse) -> Self {
        Self {
            inv_id: v.inv_id.to_string(),
            inv_make: v.inv_make.clone(),
            inv_model: v.inv_model.clone(),
            inv_year: v.inv_year.clone(),
            inv_description: v.inv_description.clone(),
            inv_image: v.inv_image.clone(),
            inv_thumbnail: v.inv_thumbnail.clone(),
            inv_price: v.inv_price.to_string(),
            inv_miles: v.inv_miles.to_string(),
            inv_color: v.inv_color.clone(),
            classification_id: v.classification_id.to_string(),
        }
    }
}

/// Delete confirmation. Only `inv_id` is acted on; the read-only vehicle fields are
/// carried so a failed delete can show the same confirmation again.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub inv_id: String,
    pub inv_make: String,
    pub inv_model: String,
    pub inv_year: String,
    pub inv_price: String,
}

impl From<&InventoryDBResponse> for DeleteForm {
    fn from(v: &InventoryDBResponse) -> Self {
        Self {
            inv_id: v.inv_id.to_string(),
            inv_make: v.inv_make.clone(),
            inv_model: v.inv_model.clone(),
            inv_year: v.inv_year.clone(),
            inv_price: v.inv_price.to_string(),
        }
    }
}

/// Advanced search query string. Every filter is optional; blank counts as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub classification_id: String,
    pub min_price: String,
    pub max_price: String,
    pub min_year: String,
    pub max_year: String,
    pub max_miles: String,
    pub q: String,
}

impl SearchParams {
    /// True when at least one filter was filled in, i.e. the form was submitted.
    pub fn is_submitted(&self) -> bool {
        [
            &self.classification_id,
            &self.min_price,
            &self.max_price,
            &self.min_year,
            &self.max_year,
            &self.max_miles,
            &self.q,
        ]
        .iter()
        .any(|v| !v.trim().is_empty())
    }
}

/// Vehicle as returned by the JSON inventory endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryResponse {
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

impl From<InventoryDBResponse> for InventoryResponse {
    fn from(db: InventoryDBResponse) -> Self {
        Self {
            inv_id: db.inv_id,
            inv_make: db.inv_make,
            inv_model: db.inv_model,
            inv_year: db.inv_year,
            inv_description: db.inv_description,
            inv_image: db.inv_image,
            inv_thumbnail: db.inv_thumbnail,
            inv_price: db.inv_price,
            inv_miles: db.inv_miles,
            inv_color: db.inv_color,
            classification_id: db.classification_id,
            classification_name: db.classification_name,
        }
    }
}
