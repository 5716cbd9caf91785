//! Request-scoped identity.
//!
//! A signed session token travels in the `session` cookie (or a bearer
//! header for API clients). Each extractor decodes it per request and hands
//! the handler an explicit identity value; nothing is kept in shared state.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    error::{AppError, AppResult},
    response::Notice,
    services::admin_service,
    state::AppState,
};

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// An identity whose admin flag was confirmed against the database.
///
/// Only `admin_service::authorize_admin` builds one, so holding an
/// `AdminUser` is proof the gate was passed.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: Uuid,
    pub email: String,
}

impl AdminUser {
    pub(crate) fn confirmed(user_id: Uuid, email: String) -> Self {
        Self { user_id, email }
    }
}

pub fn issue_token(secret: &str, user_id: Uuid, ttl_hours: i64) -> AppResult<String> {
    let expiration = Duration::try_hours(ttl_hours)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn verify_token(secret: &str, token: &str) -> AppResult<AuthUser> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let user_id = Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::Unauthorized)?;
    Ok(AuthUser { user_id })
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

fn token_from_parts(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if let Some(token) = bearer {
        return Some(token.trim().to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

fn identify(parts: &Parts, state: &AppState) -> AppResult<AuthUser> {
    let token = token_from_parts(parts).ok_or(AppError::Unauthorized)?;
    verify_token(&state.config.jwt_secret, &token)
}

/// JSON endpoints: anonymous requests get a 401 body.
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        identify(parts, state)
    }
}

/// Form and page endpoints: anonymous requests are sent back to the home page.
pub struct RequireUser(pub AuthUser);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = Notice;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        identify(parts, state)
            .map(RequireUser)
            .map_err(|err| err.into_notice("/"))
    }
}

/// Admin-only endpoints. Anonymous users and non-admins are redirected to the
/// home page with a notice instead of seeing an error.
pub struct RequireAdmin(pub AdminUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = Notice;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let denied = || Notice::error("/", "Admin access required.");
        let user = identify(parts, state).map_err(|_| denied())?;
        match admin_service::authorize_admin(state, &user).await {
            Ok(admin) => Ok(RequireAdmin(admin)),
            Err(err) if err.is_internal() => Err(err.into_notice("/")),
            Err(_) => Err(denied()),
        }
    }
}
