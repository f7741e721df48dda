//! Database record models matching table schemas.
//!
//! Each submodule defines the create/update request structs a repository accepts and the
//! response struct it returns. Row structs that derive `sqlx::FromRow` stay private to the
//! repositories in [`crate::db::handlers`].
//!
//! - [`classifications`]: vehicle classifications
//! - [`inventory`]: vehicles and search filters
//! - [`accounts`]: site accounts

pub mod accounts;
pub mod classifications;
pub mod inventory;
