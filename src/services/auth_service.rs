use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    domain::Registration,
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::issue_token,
    models::User,
    state::AppState,
};

/// A verified account plus the session token to hand back to the client.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Create the account and log it in straight away.
pub async fn register_user(state: &AppState, registration: Registration) -> AppResult<Session> {
    let Registration { email, password } = registration;

    let exist = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict("Email already registered!".to_string()));
    }

    let password_hash = hash_password(&password)?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(password_hash),
        is_admin: Set(false),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| match err.sql_err() {
        // Lost a race with a concurrent registration of the same email.
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Email already registered!".to_string())
        }
        _ => AppError::OrmError(err),
    })?;

    tracing::info!(user_id = %user.id, "user registered");
    start_session(state, user.into())
}

pub async fn login_user(state: &AppState, email: &str, password: &str) -> AppResult<Session> {
    let email = email.trim().to_lowercase();
    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Validation("Invalid email or password!".into())),
    };

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Validation("Invalid email or password!".into()));
    }

    tracing::info!(user_id = %user.id, "user logged in");
    start_session(state, user.into())
}

fn start_session(state: &AppState, user: User) -> AppResult<Session> {
    let token = issue_token(
        &state.config.jwt_secret,
        user.id,
        state.config.session_ttl_hours,
    )?;
    Ok(Session { user, token })
}
