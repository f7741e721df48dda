//! Account area: registration, login and logout, and the logged-in account's profile.

use axum::{
    Form,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, instrument, warn};

use crate::{
    AppState,
    api::models::accounts::{AccountResponse, AccountUpdateForm, LoginForm, PasswordChangeForm, RegisterForm},
    auth::{
        current_account::CurrentAccount,
        password,
        session::{self, SessionAccount},
    },
    db::{errors::DbError, handlers::Accounts, models::accounts::AccountCreateDBRequest},
    errors::{Error, Result},
    types::{AccountId, AccountType, parse_id},
    validation::accounts::{validate_account_update, validate_login, validate_password_change, validate_registration},
    views::{Page, Site, flash::redirect_with_notice},
};

pub const ACCOUNT_PATH: &str = "/account/";
pub const BAD_CREDENTIALS: &str = "Please check your credentials and try again.";

fn login_page(site: &Site, form: &LoginForm) -> Page {
    site.page("account/login.html", "Login").with("form", form)
}

fn register_page(site: &Site, form: &RegisterForm) -> Page {
    site.page("account/register.html", "Register").with("form", form)
}

fn update_page(site: &Site, form: &AccountUpdateForm) -> Page {
    site.page("account/update.html", "Edit Account").with("form", form)
}

fn with_cookie(mut response: Response, cookie: &str) -> Result<Response> {
    let value = HeaderValue::from_str(cookie).map_err(|e| Error::Internal {
        operation: format!("encode session cookie: {e}"),
    })?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(response)
}

/// Accounts may only edit themselves.
fn ensure_own_account(me: &SessionAccount, account_id: AccountId) -> Result<()> {
    if me.account_id == account_id {
        Ok(())
    } else {
        Err(Error::Forbidden {
            message: "You can only change your own account.".to_string(),
        })
    }
}

async fn load_account(state: &AppState, account_id: AccountId) -> Result<AccountResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    Accounts::new(&mut conn)
        .get_by_id(account_id)
        .await?
        .map(AccountResponse::from)
        .ok_or_else(|| Error::not_found("Account", account_id))
}

#[instrument(skip_all, fields(account_id = account.account_id))]
pub async fn build_account(site: Site, CurrentAccount(account): CurrentAccount) -> Page {
    let title = format!("Welcome {}", account.account_firstname);
    site.page("account/management.html", title)
        .with("can_manage_inventory", account.account_type.can_manage_inventory())
}

#[instrument(skip_all)]
pub async fn build_login(site: Site) -> Page {
    login_page(&site, &LoginForm::default())
}

#[instrument(skip_all)]
pub async fn login(site: Site, State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response> {
    let credentials = match validate_login(&form) {
        Ok(credentials) => credentials,
        Err(errors) => return Ok(login_page(&site, &form).errors(&errors).into_response()),
    };

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let account = Accounts::new(&mut conn).get_by_email(&credentials.email).await?;
    drop(conn);

    let verified = match &account {
        Some(account) => password::verify_password_blocking(credentials.password, account.password_hash.clone()).await?,
        None => false,
    };
    let Some(account) = account.filter(|_| verified) else {
        info!("Rejected login attempt");
        return Ok(login_page(&site, &form)
            .notice(BAD_CREDENTIALS)
            .status(StatusCode::BAD_REQUEST)
            .into_response());
    };

    let account = AccountResponse::from(account);
    let token = session::create_session_token(&SessionAccount::from(&account), &state.config)?;
    info!(account_id = account.account_id, "Account logged in");

    with_cookie(
        Redirect::to(ACCOUNT_PATH).into_response(),
        &session::session_cookie(&token, &state.config),
    )
}

#[instrument(skip_all)]
pub async fn build_register(site: Site) -> Page {
    register_page(&site, &RegisterForm::default())
}

#[instrument(skip_all)]
pub async fn register(site: Site, State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Result<Page> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let new_account = match validate_registration(&mut conn, &form).await? {
        Ok(new_account) => new_account,
        Err(errors) => return Ok(register_page(&site, &form).errors(&errors)),
    };
    drop(conn);

    let password_hash =
        password::hash_password_blocking(new_account.password, state.config.auth.password.argon2_params()).await?;
    let request = AccountCreateDBRequest {
        account_firstname: new_account.firstname,
        account_lastname: new_account.lastname,
        account_email: new_account.email,
        password_hash,
        account_type: AccountType::Client,
    };

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    match Accounts::new(&mut conn).create(&request).await {
        Ok(account) => {
            info!(account_id = account.account_id, "Account registered");
            let login_form = LoginForm {
                account_email: account.account_email,
                ..Default::default()
            };
            Ok(login_page(&site, &login_form)
                .notice(format!(
                    "Congratulations, you're registered {}. Please log in.",
                    account.account_firstname
                ))
                .status(StatusCode::CREATED))
        }
        Err(e) if e.is_constraint_violation() => {
            warn!("Failed to register account: {e}");
            Ok(register_page(&site, &form).notice("Sorry, the registration failed."))
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Result<Response> {
    with_cookie(
        redirect_with_notice("/", "You have been logged out."),
        &session::clear_session_cookie(&state.config),
    )
}

#[instrument(skip_all, fields(account_id = %account_id))]
pub async fn build_update_account(
    site: Site,
    CurrentAccount(me): CurrentAccount,
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Page> {
    let id = parse_id(&account_id).ok_or_else(|| Error::not_found("Account", &account_id))?;
    ensure_own_account(&me, id)?;

    let account = load_account(&state, id).await?;
    Ok(update_page(&site, &AccountUpdateForm::from(&account)))
}

#[instrument(skip_all, fields(account_id = me.account_id))]
pub async fn update_account(
    site: Site,
    CurrentAccount(me): CurrentAccount,
    State(state): State<AppState>,
    Form(form): Form<AccountUpdateForm>,
) -> Result<Response> {
    if let Some(id) = parse_id(&form.account_id) {
        ensure_own_account(&me, id)?;
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let (id, request) = match validate_account_update(&mut conn, &form).await? {
        Ok(valid) => valid,
        Err(errors) => return Ok(update_page(&site, &form).errors(&errors).into_response()),
    };

    match Accounts::new(&mut conn).update(id, &request).await {
        Ok(updated) => {
            // Names and email live in the session too
            let account = AccountResponse::from(updated);
            let token = session::create_session_token(&SessionAccount::from(&account), &state.config)?;
            with_cookie(
                redirect_with_notice(ACCOUNT_PATH, "Account updated successfully."),
                &session::session_cookie(&token, &state.config),
            )
        }
        Err(e) if e.is_constraint_violation() => {
            warn!("Failed to update account: {e}");
            Ok(update_page(&site, &form)
                .notice("Sorry, the account update failed.")
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip_all, fields(account_id = me.account_id))]
pub async fn change_password(
    site: Site,
    CurrentAccount(me): CurrentAccount,
    State(state): State<AppState>,
    Form(form): Form<PasswordChangeForm>,
) -> Result<Response> {
    if let Some(id) = parse_id(&form.account_id) {
        ensure_own_account(&me, id)?;
    }

    let (id, new_password) = match validate_password_change(&form) {
        Ok(valid) => valid,
        Err(errors) => {
            let account = load_account(&state, me.account_id).await?;
            return Ok(update_page(&site, &AccountUpdateForm::from(&account))
                .errors(&errors)
                .into_response());
        }
    };

    let password_hash = password::hash_password_blocking(new_password, state.config.auth.password.argon2_params()).await?;
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    match Accounts::new(&mut conn).update_password(id, &password_hash).await {
        Ok(_) => Ok(redirect_with_notice(ACCOUNT_PATH, "Password updated successfully.")),
        Err(e) if e.is_constraint_violation() => {
            warn!("Failed to change password: {e}");
            drop(conn);
            let account = load_account(&state, me.account_id).await?;
            Ok(update_page(&site, &AccountUpdateForm::from(&account))
                .notice("Sorry, the password update failed.")
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
