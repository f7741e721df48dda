use crate::db::errors::DbError;
use crate::views::flash::FlashMessage;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

/// Where anonymous visitors are sent when a page needs a logged-in account.
pub const LOGIN_PATH: &str = "/account/login";

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Logged in, but not allowed to do this
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Attached to every error response so the error page middleware can render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
}

impl Error {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Error::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::SEE_OTHER,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Please log in.".to_string()),
            Error::Forbidden { message } => message.clone(),
            Error::NotFound { resource, .. } => format!("{resource} not found"),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { table, .. } => match table.as_deref() {
                    Some("account") => "An account with this email address already exists".to_string(),
                    Some("classification") => "Classification already exists.".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::Forbidden { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let message = self.user_message();

        if let Error::Unauthenticated { .. } = self {
            let mut response = (status, [(header::LOCATION, LOGIN_PATH)]).into_response();
            response.extensions_mut().insert(FlashMessage::new(message));
            return response;
        }

        let mut response = (status, message.clone()).into_response();
        response.extensions_mut().insert(ErrorReport { status, message });
        response
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_hides_id() {
        let err = Error::not_found("Vehicle", 42);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(), "Vehicle not found");
        assert_eq!(err.to_string(), "Vehicle with ID 42 not found");
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let err = Error::Internal {
            operation: "connect to secret host".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "Internal server error");

        let db = Error::Database(DbError::Other(anyhow::anyhow!("connection refused")));
        assert_eq!(db.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!db.user_message().contains("refused"));
    }

    #[test]
    fn test_rejected_writes_are_client_errors() {
        let check = Error::Database(DbError::CheckViolation {
            constraint: Some("inventory_inv_price_check".to_string()),
            table: Some("inventory".to_string()),
            message: "new row violates check constraint".to_string(),
        });
        assert_eq!(check.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(check.user_message(), "Invalid data provided");

        let duplicate = Error::Database(DbError::UniqueViolation {
            constraint: None,
            table: Some("classification".to_string()),
            message: "duplicate key".to_string(),
        });
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);
        assert_eq!(duplicate.user_message(), "Classification already exists.");

        let forbidden = Error::Forbidden {
            message: "Employees only".to_string(),
        };
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.user_message(), "Employees only");
    }

    #[test]
    fn test_error_response_carries_report() {
        let response = Error::not_found("Classification", 9).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let report = response.extensions().get::<ErrorReport>().unwrap();
        assert_eq!(report.message, "Classification not found");
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let response = Error::Unauthenticated { message: None }.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);
        assert!(response.extensions().get::<ErrorReport>().is_none());
        let flash = response.extensions().get::<FlashMessage>().unwrap();
        assert_eq!(flash.notices(), ["Please log in.".to_string()]);
    }
}
