//! Database models for site accounts.

use crate::types::{AccountId, AccountType};
use serde::Serialize;

/// Database request for creating a new account
#[derive(Debug, Clone)]
pub struct AccountCreateDBRequest {
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
    /// Argon2 PHC string, never the raw password
    pub password_hash: String,
    pub account_type: AccountType,
}

/// Database request for updating an account's profile fields
#[derive(Debug, Clone)]
pub struct AccountUpdateDBRequest {
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
}

/// Database response for an account
#[derive(Debug, Clone, Serialize)]
pub struct AccountDBResponse {
    pub account_id: AccountId,
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub account_type: AccountType,
}
