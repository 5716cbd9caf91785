use std::{env, path::PathBuf};

/// One year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub reports_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the admin account provisioned at startup.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|h| h.parse::<i64>().ok())
            .filter(|h| (1..=MAX_SESSION_TTL_HOURS).contains(h))
            .unwrap_or(24);
        let reports_dir = env::var("REPORTS_DIR").unwrap_or_else(|_| "reports".to_string());
        let uploads_dir = env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string());

        let bootstrap_admin = match (
            env::var("BOOTSTRAP_ADMIN_EMAIL"),
            env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            session_ttl_hours,
            reports_dir: PathBuf::from(reports_dir),
            uploads_dir: PathBuf::from(uploads_dir),
            bootstrap_admin,
        })
    }
}
