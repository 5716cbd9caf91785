#![allow(dead_code)]

use std::sync::OnceLock;

use sqlx::postgres::PgPoolOptions;
use tempfile::TempDir;
use thrift_and_thrive::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    domain::{NewAddress, Registration},
    dto::products::SellForm,
    middleware::auth::{AdminUser, AuthUser, SESSION_COOKIE, issue_token},
    services::{address_service, admin_service, auth_service, product_service},
    state::AppState,
};
use tokio::sync::Mutex;
use uuid::Uuid;

/// A state wired to the test database with its own report and upload dirs.
pub struct TestApp {
    pub state: AppState,
    _files: TempDir,
}

static MIGRATED: OnceLock<Mutex<bool>> = OnceLock::new();

/// Returns `None` (and the caller skips) when no database is configured.
pub async fn setup() -> anyhow::Result<Option<TestApp>> {
    let Ok(database_url) =
        std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))
    else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run database tests.");
        return Ok(None);
    };

    let files = tempfile::tempdir()?;
    let config = test_config(&database_url, &files);
    let pool = create_pool(&database_url).await?;
    let state = AppState::new(pool, config);

    // Concurrent CREATE TABLE IF NOT EXISTS can still collide in the catalog.
    let mut migrated = MIGRATED.get_or_init(|| Mutex::new(false)).lock().await;
    if !*migrated {
        run_migrations(&state.orm).await?;
        *migrated = true;
    }
    drop(migrated);

    Ok(Some(TestApp {
        state,
        _files: files,
    }))
}

fn test_config(database_url: &str, files: &TempDir) -> AppConfig {
    AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        session_ttl_hours: 1,
        reports_dir: files.path().join("reports"),
        uploads_dir: files.path().join("uploads"),
        bootstrap_admin: None,
    }
}

/// A state whose pool never connects; enough for requests that are
/// rejected before any query runs.
pub fn offline() -> anyhow::Result<TestApp> {
    let database_url = "postgres://offline@127.0.0.1:1/none";
    let files = tempfile::tempdir()?;
    let pool = PgPoolOptions::new().connect_lazy(database_url)?;
    let state = AppState::new(pool, test_config(database_url, &files));
    Ok(TestApp {
        state,
        _files: files,
    })
}

/// Session cookie header value for `user`.
pub fn session_for(state: &AppState, user: &AuthUser) -> anyhow::Result<String> {
    let token = issue_token(&state.config.jwt_secret, user.user_id, 1)?;
    Ok(format!("{SESSION_COOKIE}={token}"))
}

pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

pub async fn register(state: &AppState, prefix: &str) -> anyhow::Result<AuthUser> {
    let registration = Registration::new(&unique_email(prefix), "secret", "secret")?;
    let session = auth_service::register_user(state, registration).await?;
    Ok(AuthUser {
        user_id: session.user.id,
    })
}

pub async fn admin(state: &AppState) -> anyhow::Result<AdminUser> {
    let account =
        admin_service::provision_admin(state, &unique_email("admin"), "admin-secret").await?;
    let admin = admin_service::authorize_admin(state, &AuthUser { user_id: account.id }).await?;
    Ok(admin)
}

pub async fn list_product(
    state: &AppState,
    seller: &AuthUser,
    name: &str,
    price: &str,
) -> anyhow::Result<Uuid> {
    let form = SellForm {
        name: Some(name.into()),
        description: Some(format!("{name} in good shape")),
        price: Some(price.into()),
        condition: Some("Used".into()),
        image_name: Some(format!("{}.jpg", Uuid::new_v4().simple())),
        image_bytes: Some(b"fake image".to_vec()),
    };
    let product = product_service::sell_product(state, seller, form).await?;
    Ok(product.id)
}

pub async fn add_address(state: &AppState, user: &AuthUser, street: &str) -> anyhow::Result<Uuid> {
    let address = NewAddress::new(
        Some(street),
        Some("Springfield"),
        Some("IL"),
        Some("62701"),
        Some("USA"),
        Some("555-0100"),
        Some("Home"),
    )?;
    let address = address_service::add_address(state, user, address).await?;
    Ok(address.id)
}
