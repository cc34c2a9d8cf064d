//! Signup, signin and logout pages

use axum::extract::{Form, State};
use axum::response::{IntoResponse, Redirect};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use tower_cookies::Cookies;

use super::{PageResult, base_context, render};
use crate::auth::session::{CurrentUser, create_token, end_session, start_session};
use crate::db::users;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::{
    MAX_USERNAME_LEN, hash_password, validate_password, validate_required_text, verify_password,
};

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninForm {
    pub username: String,
    pub password: String,
}

fn form_page(
    state: &AppState,
    cookies: &Cookies,
    template: &str,
    username: Option<&str>,
    error: Option<&str>,
) -> PageResult {
    let mut ctx = base_context(cookies, None);
    if let Some(username) = username {
        ctx.insert("username", username);
    }
    if let Some(error) = error {
        ctx.insert("error", error);
    }
    render(state, template, &ctx)
}

fn login(state: &AppState, cookies: &Cookies, user: &CurrentUser) -> Result<(), AppError> {
    let token = create_token(user, state.jwt_secret()).map_err(|e| {
        tracing::error!(error = %e, "JWT creation failed");
        AppError::new(ErrorCode::InternalError)
    })?;
    start_session(cookies, token);
    Ok(())
}

/// GET /signup
pub async fn signup_page(State(state): State<AppState>, cookies: Cookies) -> PageResult {
    form_page(&state, &cookies, "signup.html.tera", None, None)
}

/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<SignupForm>,
) -> PageResult {
    let username = form.username.trim();
    let rejected = |err: AppError| {
        form_page(&state, &cookies, "signup.html.tera", Some(username), Some(&err.message))
    };

    if form.password1 != form.password2 {
        return rejected(AppError::new(ErrorCode::PasswordMismatch));
    }
    if let Err(err) = validate_required_text(username, "username", MAX_USERNAME_LEN)
        .and_then(|()| validate_password(&form.password1))
    {
        return rejected(err);
    }

    let hash = hash_password(&form.password1).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        AppError::new(ErrorCode::InternalError)
    })?;

    let user = match users::create(&state.pool, username, None, &hash, false).await {
        Ok(user) => user,
        Err(ServiceError::App(err)) if err.code == ErrorCode::UsernameExists => {
            return rejected(err);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    login(&state, &cookies, &CurrentUser::from(&user))?;
    Ok(Redirect::to("/info").into_response())
}

/// GET /signin
pub async fn signin_page(State(state): State<AppState>, cookies: Cookies) -> PageResult {
    form_page(&state, &cookies, "signin.html.tera", None, None)
}

/// POST /signin
pub async fn signin(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<SigninForm>,
) -> PageResult {
    let username = form.username.trim();
    let row = users::find_by_username(&state.pool, username).await?;

    let Some(row) = row.filter(|r| r.is_active && verify_password(&form.password, &r.password_hash))
    else {
        tracing::warn!(username = %username, "Failed login");
        let err = AppError::invalid_credentials();
        return form_page(&state, &cookies, "signin.html.tera", Some(username), Some(&err.message));
    };

    let user = shared::models::User::from(row);
    login(&state, &cookies, &CurrentUser::from(&user))?;
    tracing::info!(user_id = user.id, "User signed in");
    Ok(Redirect::to("/main").into_response())
}

/// GET /logout
pub async fn logout(cookies: Cookies) -> Redirect {
    end_session(&cookies);
    Redirect::to("/")
}
