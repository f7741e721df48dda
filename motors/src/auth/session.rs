//! JWT session token creation and verification.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    api::models::accounts::AccountResponse,
    auth::utils::build_cookie,
    config::Config,
    errors::Error,
    types::{AccountId, AccountType},
};

/// The logged-in account as carried in the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAccount {
    pub account_id: AccountId,
    pub account_firstname: String,
    pub account_email: String,
    pub account_type: AccountType,
}

impl From<&AccountResponse> for SessionAccount {
    fn from(account: &AccountResponse) -> Self {
        Self {
            account_id: account.account_id,
            account_firstname: account.account_firstname.clone(),
            account_email: account.account_email.clone(),
            account_type: account.account_type,
        }
    }
}

/// JWT session claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: AccountId,
    pub firstname: String,
    pub email: String,
    pub account_type: AccountType,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(account: &SessionAccount, config: &Config) -> Self {
        let now = Utc::now();
        let exp = now + config.auth.session.timeout;

        Self {
            sub: account.account_id,
            firstname: account.account_firstname.clone(),
            email: account.account_email.clone(),
            account_type: account.account_type,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

impl From<SessionClaims> for SessionAccount {
    fn from(claims: SessionClaims) -> Self {
        Self {
            account_id: claims.sub,
            account_firstname: claims.firstname,
            account_email: claims.email,
            account_type: claims.account_type,
        }
    }
}

fn secret_key(config: &Config) -> Result<&str, Error> {
    config.secret_key.as_deref().ok_or_else(|| Error::Internal {
        operation: "JWT sessions: secret_key is required".to_string(),
    })
}

/// Create a JWT token for an account session
pub fn create_session_token(account: &SessionAccount, config: &Config) -> Result<String, Error> {
    let claims = SessionClaims::new(account, config);
    let key = EncodingKey::from_secret(secret_key(config)?.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Verify and decode a JWT session token
pub fn verify_session_token(token: &str, config: &Config) -> Result<SessionAccount, Error> {
    let key = DecodingKey::from_secret(secret_key(config)?.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        // Client errors - malformed tokens, invalid claims, expired tokens
        jsonwebtoken::errors::ErrorKind::InvalidToken
        | jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::ExpiredSignature
        | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
        | jsonwebtoken::errors::ErrorKind::InvalidIssuer
        | jsonwebtoken::errors::ErrorKind::InvalidAudience
        | jsonwebtoken::errors::ErrorKind::InvalidSubject
        | jsonwebtoken::errors::ErrorKind::ImmatureSignature
        | jsonwebtoken::errors::ErrorKind::Base64(_)
        | jsonwebtoken::errors::ErrorKind::Json(_)
        | jsonwebtoken::errors::ErrorKind::Utf8(_)
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => Error::Unauthenticated { message: None },

        // Server errors - key issues, internal failures
        _ => Error::Internal {
            operation: format!("JWT verification: {e}"),
        },
    })?;

    Ok(SessionAccount::from(token_data.claims))
}

/// `Set-Cookie` value carrying a fresh session token.
pub fn session_cookie(token: &str, config: &Config) -> String {
    let session = &config.auth.session;
    build_cookie(&session.cookie_name, token, session.timeout.as_secs(), session)
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &Config) -> String {
    let session = &config.auth.session;
    build_cookie(&session.cookie_name, "", 0, session)
}
