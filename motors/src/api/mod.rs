//! HTTP layer: route handlers and the form and response models they exchange.
//!
//! - **[`handlers`]**: axum handlers for every route
//! - **[`models`]**: submitted forms and JSON response shapes
//!
//! # Routes
//!
//! - **Site** (`/`, `/healthz`): home page and health check
//! - **Inventory** (`/inv/*`): classification pages, vehicle detail, management
//!   (classification and vehicle CRUD), advanced search, and a JSON listing by classification
//! - **Account** (`/account/*`): registration, login/logout, profile and password changes
//! - **Assets**: anything else is looked up in the embedded `static/` folder

pub mod handlers;
pub mod models;
