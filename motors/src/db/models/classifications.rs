//! Database models for vehicle classifications.

use crate::types::ClassificationId;
use serde::Serialize;

/// Database request for creating a new classification
#[derive(Debug, Clone)]
pub struct ClassificationCreateDBRequest {
    pub classification_name: String,
}

/// Database response for a classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationDBResponse {
    pub classification_id: ClassificationId,
    pub classification_name: String,
}
