//! HTTP request handlers.
//!
//! - [`home`]: home page and health check
//! - [`inventory`]: vehicle browsing, management and search under `/inv`
//! - [`accounts`]: registration, login and the account area under `/account`
//! - [`static_assets`]: embedded CSS, scripts and images, plus the not-found fallback
//!
//! Page handlers take a [`crate::views::Site`] and return a [`crate::views::Page`]; the
//! JSON inventory endpoint returns `Json`. Errors are [`crate::errors::Error`] and end up
//! on the error page.

pub mod accounts;
pub mod home;
pub mod inventory;
pub mod static_assets;
