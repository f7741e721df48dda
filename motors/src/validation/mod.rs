//! Input validation for submitted forms and search queries.
//!
//! Validators are plain functions from a submitted form to either the typed value the
//! repositories accept or a [`ValidationErrors`] list. They never touch the response: the
//! handler decides which form to re-render and passes the submitted form back alongside
//! the errors. Checks that need the database (uniqueness) take a connection and return the
//! outcome wrapped in a [`crate::db::errors::Result`].
//!
//! - [`rules`]: reusable field rules (required, lengths, numbers, email, passwords)
//! - [`inventory`]: classification, vehicle, delete and search forms
//! - [`accounts`]: registration, login, profile update and password change forms

pub mod accounts;
pub mod inventory;
pub mod rules;

use serde::Serialize;

/// A single failed rule, keyed by the form field it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered list of failed rules, in the order the fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Record the error of a failed rule and pass a successful value through.
    pub fn check<T>(&mut self, field: &'static str, outcome: std::result::Result<T, String>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }
}

/// Outcome of validating a form: the typed value, or every rule that failed.
pub type Validated<T> = std::result::Result<T, ValidationErrors>;
