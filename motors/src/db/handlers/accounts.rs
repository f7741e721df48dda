//! Database repository for site accounts.

use crate::{
    db::{
        errors::Result,
        models::accounts::{AccountCreateDBRequest, AccountDBResponse, AccountUpdateDBRequest},
    },
    types::{AccountId, AccountType},
};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

const ACCOUNT_COLUMNS: &str =
    "account_id, account_firstname, account_lastname, account_email, account_password, account_type";

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Account {
    pub account_id: AccountId,
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
    pub account_password: String,
    pub account_type: AccountType,
}

impl From<Account> for AccountDBResponse {
    fn from(a: Account) -> Self {
        Self {
            account_id: a.account_id,
            account_firstname: a.account_firstname,
            account_lastname: a.account_lastname,
            account_email: a.account_email,
            password_hash: a.account_password,
            account_type: a.account_type,
        }
    }
}

pub struct Accounts<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Accounts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(email = %request.account_email), err)]
    pub async fn create(&mut self, request: &AccountCreateDBRequest) -> Result<AccountDBResponse> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO account (account_firstname, account_lastname, account_email, account_password, account_type) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(&request.account_firstname)
        .bind(&request.account_lastname)
        .bind(&request.account_email)
        .bind(&request.password_hash)
        .bind(request.account_type)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(account.into())
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: AccountId) -> Result<Option<AccountDBResponse>> {
        let account = sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE account_id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(account.map(Into::into))
    }

    /// Emails are stored lowercased, so lookups are exact.
    #[instrument(skip(self), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<AccountDBResponse>> {
        let account = sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE account_email = $1"))
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(account.map(Into::into))
    }

    #[instrument(skip(self, request), fields(email = %request.account_email), err)]
    pub async fn update(&mut self, id: AccountId, request: &AccountUpdateDBRequest) -> Result<AccountDBResponse> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "UPDATE account SET account_firstname = $1, account_lastname = $2, account_email = $3 \
             WHERE account_id = $4 RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(&request.account_firstname)
        .bind(&request.account_lastname)
        .bind(&request.account_email)
        .bind(id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(account.into())
    }

    #[instrument(skip(self, password_hash), err)]
    pub async fn update_password(&mut self, id: AccountId, password_hash: &str) -> Result<AccountDBResponse> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "UPDATE account SET account_password = $1 WHERE account_id = $2 RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(password_hash)
        .bind(id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(account.into())
    }
}
