//! Authentication for the account area.
//!
//! Accounts log in with email and password. On success the server issues a signed JWT
//! (HS256, keyed by `secret_key`) in an HTTP-only cookie; every later request is
//! authenticated by verifying that cookie, so no session state is kept server side.
//!
//! # Modules
//!
//! - [`current_account`]: extractor that guards account pages
//! - [`password`]: Argon2 hashing and verification
//! - [`session`]: session token claims, creation and verification, session cookies
//! - [`utils`]: cookie parsing and formatting helpers
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use motors::auth::current_account::CurrentAccount;
//!
//! async fn account_home(CurrentAccount(account): CurrentAccount) -> String {
//!     format!("Welcome {}", account.account_firstname)
//! }
//! ```

pub mod current_account;
pub mod password;
pub mod session;
pub mod utils;
