use anyhow::{Context, Result};
use model::auth::{PasswordHasher, UserManager};
use sea_orm::Database;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Default database used when neither `--database-url` nor `DATABASE_URL` is given
pub const DEFAULT_DATABASE_URL: &str = "sqlite://bandbrand.db";

/// Default bind address for the HTTP server
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Read `PASSWORD_HASH_COST`, falling back to bcrypt's default cost.
pub fn password_hasher_from_env() -> Result<PasswordHasher> {
    match std::env::var("PASSWORD_HASH_COST") {
        Ok(raw) => {
            let cost: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("PASSWORD_HASH_COST must be an integer, got '{}'", raw))?;
            debug!("Using bcrypt cost {} from environment", cost);
            Ok(PasswordHasher::new(cost))
        }
        Err(_) => Ok(PasswordHasher::default()),
    }
}

/// Initialize application state for the given database
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    dotenvy::dotenv().ok();

    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    let hasher = password_hasher_from_env()?;
    debug!("Password hasher configured with cost {}", hasher.cost());

    Ok(AppState {
        db,
        users: UserManager::new(hasher),
    })
}
