use thrift_and_thrive::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    domain::Registration,
    error::AppError,
    middleware::auth::AuthUser,
    services::{admin_service, auth_service, product_service},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let state = AppState::new(pool, config);
    run_migrations(&state.orm).await?;

    let admin = admin_service::provision_admin(&state, "admin@example.com", "admin123").await?;
    println!("Ensured admin {}", admin.email);

    let registration = Registration::new("user@example.com", "user123", "user123")?;
    match auth_service::register_user(&state, registration).await {
        Ok(session) => println!("Created user {}", session.user.email),
        Err(AppError::Conflict(_)) => println!("User user@example.com already exists"),
        Err(err) => return Err(err.into()),
    }

    let admin = admin_service::authorize_admin(&state, &AuthUser { user_id: admin.id }).await?;
    let count = product_service::add_sample_products(&state, &admin).await?;

    println!("Seed completed. Added {count} sample products.");
    Ok(())
}
