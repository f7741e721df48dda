//! Validation for the registration, login, profile and password forms.

use super::{ValidationErrors, Validated, rules};
use crate::{
    api::models::accounts::{AccountUpdateForm, LoginForm, PasswordChangeForm, RegisterForm},
    db::{errors::Result, handlers::Accounts, models::accounts::AccountUpdateDBRequest},
    types::AccountId,
};
use sqlx::PgConnection;

pub const FIRSTNAME_REQUIRED: &str = "Please provide a first name.";
pub const LASTNAME_REQUIRED: &str = "Please provide a last name.";
pub const EMAIL_INVALID: &str = "A valid email is required.";
pub const EMAIL_REGISTERED: &str = "Email exists. Please log in or use different email";
pub const EMAIL_TAKEN: &str = "Email exists. Please use a different email";
pub const PASSWORD_WEAK: &str = "Password does not meet requirements.";
pub const PASSWORD_REQUIRED: &str = "Password is required.";
pub const ACCOUNT_ID_INVALID: &str = "Account id is missing or invalid.";

/// A registration that passed validation. The password is still plaintext here; the
/// handler hashes it before anything is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

struct Profile {
    firstname: Option<String>,
    lastname: Option<String>,
    email: Option<String>,
}

fn check_profile(errors: &mut ValidationErrors, firstname: &str, lastname: &str, email: &str) -> Profile {
    Profile {
        firstname: errors.check("account_firstname", rules::required(firstname, FIRSTNAME_REQUIRED)),
        lastname: errors.check("account_lastname", rules::min_chars(lastname, 2, LASTNAME_REQUIRED)),
        email: errors.check("account_email", rules::email(email, EMAIL_INVALID)),
    }
}

/// Field rules, then a check that the email isn't already registered.
pub async fn validate_registration(conn: &mut PgConnection, form: &RegisterForm) -> Result<Validated<NewAccount>> {
    let mut errors = ValidationErrors::new();
    let profile = check_profile(
        &mut errors,
        &form.account_firstname,
        &form.account_lastname,
        &form.account_email,
    );

    if let Some(email) = &profile.email
        && Accounts::new(conn).get_by_email(email).await?.is_some()
    {
        errors.add("account_email", EMAIL_REGISTERED);
    }

    let password = errors.check("account_password", rules::strong_password(&form.account_password, PASSWORD_WEAK));

    Ok(match (profile.firstname, profile.lastname, profile.email, password) {
        (Some(firstname), Some(lastname), Some(email), Some(password)) if errors.is_empty() => Ok(NewAccount {
            firstname,
            lastname,
            email,
            password,
        }),
        _ => Err(errors),
    })
}

pub fn validate_login(form: &LoginForm) -> Validated<Credentials> {
    let mut errors = ValidationErrors::new();
    let email = errors.check("account_email", rules::email(&form.account_email, EMAIL_INVALID));
    let password = errors.check("account_password", rules::required(&form.account_password, PASSWORD_REQUIRED));

    match (email, password) {
        (Some(email), Some(password)) => Ok(Credentials { email, password }),
        _ => Err(errors),
    }
}

/// Profile rules; the email may only belong to the account being updated.
pub async fn validate_account_update(
    conn: &mut PgConnection,
    form: &AccountUpdateForm,
) -> Result<Validated<(AccountId, AccountUpdateDBRequest)>> {
    let mut errors = ValidationErrors::new();
    let account_id = errors.check("account_id", rules::int_min(&form.account_id, 1, ACCOUNT_ID_INVALID));
    let profile = check_profile(
        &mut errors,
        &form.account_firstname,
        &form.account_lastname,
        &form.account_email,
    );

    if let Some(email) = &profile.email
        && let Some(owner) = Accounts::new(conn).get_by_email(email).await?
        && Some(owner.account_id) != account_id
    {
        errors.add("account_email", EMAIL_TAKEN);
    }

    Ok(match (account_id, profile.firstname, profile.lastname, profile.email) {
        (Some(id), Some(account_firstname), Some(account_lastname), Some(account_email)) if errors.is_empty() => Ok((
            id,
            AccountUpdateDBRequest {
                account_firstname,
                account_lastname,
                account_email,
            },
        )),
        _ => Err(errors),
    })
}

pub fn validate_password_change(form: &PasswordChangeForm) -> Validated<(AccountId, String)> {
    let mut errors = ValidationErrors::new();
    let account_id = errors.check("account_id", rules::int_min(&form.account_id, 1, ACCOUNT_ID_INVALID));
    let password = errors.check("account_password", rules::strong_password(&form.account_password, PASSWORD_WEAK));

    match (account_id, password) {
        (Some(id), Some(password)) => Ok((id, password)),
        _ => Err(errors),
    }
}
