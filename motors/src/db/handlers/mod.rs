//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection (or transaction, which derefs to one) and
//! exposes strongly-typed operations returning models from [`crate::db::models`].
//!
//! # Available Repositories
//!
//! - [`Classifications`]: vehicle classifications shown in the navigation bar
//! - [`Inventory`]: vehicles, plus the advanced search
//! - [`Accounts`]: registered site accounts
//!
//! # Common Pattern
//!
//! ```ignore
//! use motors::db::handlers::{Inventory, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Inventory::new(&mut conn);
//!
//!     if let Some(vehicle) = repo.get_by_id(1).await? {
//!         println!("{}", vehicle.display_name());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Read operations return `Ok(None)` for a missing row and reserve `Err` for driver
//! failures, so callers can tell "absent" apart from "broken".

pub mod accounts;
pub mod classifications;
pub mod inventory;
pub mod repository;

pub use accounts::Accounts;
pub use classifications::Classifications;
pub use inventory::Inventory;
pub use repository::Repository;
