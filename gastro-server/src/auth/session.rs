//! Session tokens
//!
//! A signed HS256 token identifies the user. Browsers carry it in the
//! `gastro_session` cookie; API clients send it as `Authorization: Bearer`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::User;
use tower_cookies::{Cookie, Cookies};

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "gastro_session";
const SESSION_EXPIRY_HOURS: i64 = 24;

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: String,
    pub username: String,
    pub is_staff: bool,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated user extracted from the session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
    pub is_staff: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

/// Create a session token
pub fn create_token(
    user: &CurrentUser,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = SessionClaims {
        sub: user.user_id.to_string(),
        username: user.username.clone(),
        is_staff: user.is_staff,
        exp: (now + chrono::Duration::hours(SESSION_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a token and return the user it names
pub fn decode_token(token: &str, secret: &str) -> Result<CurrentUser, AppError> {
    let token_data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid session token"),
        }
    })?;

    let user_id = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Invalid subject"))?;

    Ok(CurrentUser {
        user_id,
        username: token_data.claims.username,
        is_staff: token_data.claims.is_staff,
    })
}

/// Set the session cookie after a successful login
pub fn start_session(cookies: &Cookies, token: String) {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookies.add(cookie);
}

pub fn end_session(cookies: &Cookies) {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookies.remove(cookie);
}

/// Token from the Authorization header, falling back to the session cookie
fn request_token(request: &Request) -> Option<String> {
    if let Some(header) = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        && let Some(token) = header.strip_prefix("Bearer ")
    {
        return Some(token.to_string());
    }
    request
        .extensions()
        .get::<Cookies>()
        .and_then(|c| c.get(SESSION_COOKIE))
        .map(|c| c.value().to_string())
}

/// Session user from the cookie jar, if any
pub fn session_user(cookies: &Cookies, secret: &str) -> Option<CurrentUser> {
    let token = cookies.get(SESSION_COOKIE)?;
    decode_token(token.value(), secret).ok()
}

/// API middleware: requires a valid token, inserts [`CurrentUser`]
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = request_token(&request)
        .ok_or_else(|| AppError::not_authenticated().into_response())?;
    let user =
        decode_token(&token, state.jwt_secret()).map_err(IntoResponse::into_response)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// API middleware: requires a staff user. Must run after [`require_user`].
pub async fn require_staff(request: Request, next: Next) -> Result<Response, Response> {
    let is_staff = request
        .extensions()
        .get::<CurrentUser>()
        .map(|u| u.is_staff)
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    if !is_staff {
        return Err(AppError::staff_required().into_response());
    }
    Ok(next.run(request).await)
}

/// Page middleware: anonymous visitors are redirected to `/signin`
pub async fn require_login_page(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = request_token(&request).and_then(|t| decode_token(&t, state.jwt_secret()).ok());
    match user {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => Redirect::to("/signin").into_response(),
    }
}
