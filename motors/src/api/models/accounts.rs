//! Form and response models for the account area.
//!
//! Passwords are deserialized but never serialized, so a re-rendered form can't echo them.

use crate::db::models::accounts::AccountDBResponse;
use crate::types::{AccountId, AccountType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
    #[serde(skip_serializing)]
    pub account_password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub account_email: String,
    #[serde(skip_serializing)]
    pub account_password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountUpdateForm {
    pub account_id: String,
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
}

impl From<&AccountResponse> for AccountUpdateForm {
    fn from(account: &AccountResponse) -> Self {
        Self {
            account_id: account.account_id.to_string(),
            account_firstname: account.account_firstname.clone(),
            account_lastname: account.account_lastname.clone(),
            account_email: account.account_email.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordChangeForm {
    pub account_id: String,
    #[serde(skip_serializing)]
    pub account_password: String,
}

/// Account details safe to hand to templates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountResponse {
    pub account_id: AccountId,
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
    pub account_type: AccountType,
}

impl From<AccountDBResponse> for AccountResponse {
    fn from(db: AccountDBResponse) -> Self {
        Self {
            account_id: db.account_id,
            account_firstname: db.account_firstname,
            account_lastname: db.account_lastname,
            account_email: db.account_email,
            account_type: db.account_type,
        }
    }
}
