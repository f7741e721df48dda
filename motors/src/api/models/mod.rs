//! Request and response data models.
//!
//! These are the shapes that cross the HTTP boundary: form bodies and query strings on the
//! way in, and JSON or template context on the way out. They are kept distinct from the
//! database models in [`crate::db::models`] so storage and presentation can evolve
//! independently.
//!
//! - [`inventory`]: classification, vehicle, delete and search forms; the JSON vehicle
//! - [`accounts`]: registration, login, profile and password forms; account details

pub mod accounts;
pub mod inventory;
