//! # motors: vehicle inventory web application
//!
//! `motors` is a server-rendered dealership site. Visitors browse vehicles by classification,
//! open a detail page per vehicle and run an advanced search; staff manage classifications
//! and inventory; and visitors can register an account, log in and keep their profile up to
//! date.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! uses PostgreSQL for persistence. Pages are rendered on the server with minijinja templates
//! compiled into the binary, as are the stylesheet, scripts and placeholder images.
//!
//! ### Request Flow
//!
//! A request is routed to a handler in [`api::handlers`]. Page handlers take a
//! [`views::Site`] (navigation, logged-in account, pending notices), validate any submitted
//! form with [`validation`], call the repositories in [`db::handlers`], and return a
//! [`views::Page`] that is rendered on the way out. A failed validation re-renders the form
//! with its errors; a mutation the database refuses re-renders it with a failure notice.
//!
//! Errors are [`errors::Error`] values. They turn into a status code plus an
//! [`errors::ErrorReport`], which the [`views::error_pages`] middleware replaces with a full
//! error page. Notices that must survive a redirect travel in a short-lived cookie handled by
//! [`views::flash`].
//!
//! ### Core Components
//!
//! The **database layer** ([`db`]) uses the repository pattern: `Classifications`, `Inventory`
//! and `Accounts` wrap a connection and expose typed queries, including the inventory search
//! builder.
//!
//! The **authentication layer** ([`auth`]) hashes passwords with Argon2 and keeps the logged-in
//! account in a signed JWT cookie. [`auth::current_account::CurrentAccount`] in a handler
//! signature is the login guard.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use motors::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = motors::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     motors::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! Migrations run automatically on startup. They can also be run by hand:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! motors::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod static_assets;
pub mod telemetry;
pub mod types;
pub mod validation;
pub mod views;

#[cfg(test)]
pub mod test_utils;

use api::handlers::{accounts, home, inventory, static_assets as assets};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info};

pub use types::{AccountId, ClassificationId, InventoryId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder().db(pool).config(config).build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the motors database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to PostgreSQL and bring the schema up to date.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let pool = config
        .database
        .pool
        .pool_options()
        .connect_with(config.connect_options()?)
        .await?;
    info!("Running database migrations...");
    migrator().run(&pool).await?;
    Ok(pool)
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: &AppState) -> Router {
    let inventory_routes = Router::new()
        .route("/inv", get(inventory::build_management))
        .route("/inv/", get(inventory::build_management))
        .route("/inv/management", get(inventory::build_management))
        .route("/inv/type/{classification_id}", get(inventory::build_by_classification))
        .route("/inv/detail/{inv_id}", get(inventory::build_detail))
        .route("/inv/error-test", get(inventory::trigger_error))
        .route(
            "/inv/add-classification",
            get(inventory::build_add_classification).post(inventory::add_classification),
        )
        .route(
            "/inv/add-inventory",
            get(inventory::build_add_inventory).post(inventory::add_inventory),
        )
        .route("/inv/getInventory/{classification_id}", get(inventory::get_inventory_json))
        .route("/inv/edit/{inv_id}", get(inventory::build_edit_inventory))
        .route("/inv/update", post(inventory::update_inventory))
        .route("/inv/delete/{inv_id}", get(inventory::build_delete_inventory))
        .route("/inv/delete", post(inventory::delete_inventory))
        .route("/inv/search", get(inventory::search_inventory));

    let account_routes = Router::new()
        .route("/account", get(accounts::build_account))
        .route("/account/", get(accounts::build_account))
        .route("/account/login", get(accounts::build_login).post(accounts::login))
        .route("/account/register", get(accounts::build_register).post(accounts::register))
        .route("/account/logout", get(accounts::logout))
        .route("/account/update/{account_id}", get(accounts::build_update_account))
        .route("/account/update", post(accounts::update_account))
        .route("/account/change-password", post(accounts::change_password));

    let mut router = Router::new()
        .route("/", get(home::build_home))
        .route("/healthz", get(home::healthz))
        .merge(inventory_routes)
        .merge(account_routes)
        // Embedded assets, then the not-found page
        .fallback(assets::serve_embedded_asset)
        .with_state(state.clone());

    // Add Prometheus metrics if enabled
    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    // The flash layer sits outside the error pages so it sees the final response
    router
        .layer(from_fn_with_state(state.clone(), views::error_pages::error_pages))
        .layer(from_fn_with_state(state.clone(), views::flash::persist_flash))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting motors with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;
        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(&app_state);

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "motors listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
