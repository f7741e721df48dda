//! Common type definitions.
//!
//! All entity ids are `SERIAL` integer keys wrapped in type aliases so that signatures say
//! which table they refer to:
//!
//! - [`ClassificationId`]: vehicle classification (Sport, SUV, ...)
//! - [`InventoryId`]: a single vehicle in inventory
//! - [`AccountId`]: a registered site account

use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for IDs
pub type ClassificationId = i32;
pub type InventoryId = i32;
pub type AccountId = i32;

/// Account level, stored as the `account_type` postgres enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "account_type")]
pub enum AccountType {
    #[default]
    Client,
    Employee,
    Admin,
}

impl AccountType {
    /// Employees and admins get a link to inventory management on their account page.
    pub fn can_manage_inventory(self) -> bool {
        matches!(self, AccountType::Employee | AccountType::Admin)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Client => write!(f, "Client"),
            AccountType::Employee => write!(f, "Employee"),
            AccountType::Admin => write!(f, "Admin"),
        }
    }
}

/// Parse a raw path segment into an integer id.
///
/// Path ids are taken as strings so that a malformed id ends up on the same not-found path as
/// an id that doesn't exist, instead of axum's plain-text rejection.
pub fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|id| *id > 0)
}
