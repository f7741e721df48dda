//! Test utilities for integration testing.

use crate::{
    AppState, build_router,
    auth::password::{Argon2Params, hash_password},
    config::{AuthConfig, Config, PasswordConfig, SessionConfig},
    db::{
        handlers::{Accounts, Classifications, Inventory, repository::Repository},
        models::{
            accounts::AccountCreateDBRequest,
            inventory::{InventoryCreateDBRequest, InventoryDBResponse},
        },
    },
    types::{AccountId, AccountType, ClassificationId},
};
use axum::http::header;
use axum_test::{TestResponse, TestServer};
use rust_decimal::Decimal;
use sqlx::PgPool;

/// Cheap Argon2 parameters so tests that hash passwords stay fast.
const TEST_ARGON2: Argon2Params = Argon2Params {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
};

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        auth: AuthConfig {
            session: SessionConfig {
                cookie_secure: false,
                ..Default::default()
            },
            password: PasswordConfig {
                argon2_memory_kib: TEST_ARGON2.memory_kib,
                argon2_iterations: TEST_ARGON2.iterations,
                argon2_parallelism: TEST_ARGON2.parallelism,
            },
        },
        ..Default::default()
    }
}

/// A test server over the full router, sharing the `#[sqlx::test]` pool.
pub fn create_test_app(pool: PgPool) -> TestServer {
    let state = AppState::builder().db(pool).config(create_test_config()).build();
    TestServer::new(build_router(&state)).expect("Failed to create test server")
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}

/// Id of one of the seeded classifications.
pub async fn get_classification_id(pool: &PgPool, name: &str) -> ClassificationId {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Classifications::new(&mut conn)
        .get_by_name(name)
        .await
        .expect("Failed to look up classification")
        .unwrap_or_else(|| panic!("classification {name} is not seeded"))
        .classification_id
}

pub async fn create_test_vehicle(pool: &PgPool, classification_id: ClassificationId, make: &str, model: &str) -> InventoryDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let request = InventoryCreateDBRequest {
        inv_make: make.to_string(),
        inv_model: model.to_string(),
        inv_year: "2019".to_string(),
        inv_description: format!("A well kept {make} {model} with a clean history."),
        inv_image: "/images/vehicles/no-image.svg".to_string(),
        inv_thumbnail: "/images/vehicles/no-image-tn.svg".to_string(),
        inv_price: Decimal::from(28045),
        inv_miles: 41205,
        inv_color: "Yellow".to_string(),
        classification_id,
    };
    Inventory::new(&mut conn).create(&request).await.expect("Failed to create test vehicle")
}

pub async fn create_test_account(pool: &PgPool, email: &str, password: &str, account_type: AccountType) -> AccountId {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let request = AccountCreateDBRequest {
        account_firstname: "Test".to_string(),
        account_lastname: "Driver".to_string(),
        account_email: email.to_string(),
        password_hash: hash_password(password, TEST_ARGON2).expect("Failed to hash password"),
        account_type,
    };
    Accounts::new(&mut conn)
        .create(&request)
        .await
        .expect("Failed to create test account")
        .account_id
}

/// `name=value` from the response's `Set-Cookie` headers, for sending back on the next request.
///
/// Cleared cookies (empty value) count as absent.
pub fn cookie_pair(response: &TestResponse, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(key, value)| format!("{key}={value}"))
}
