use anyhow::{Context, Result};
use model::auth::NewUser;
use tracing::{debug, info, trace};

use crate::config::initialize_app_state_with_url;

pub async fn create_superuser(database_url: &str, username: &str, email: &str, password: &str) -> Result<()> {
    trace!("Entering create_superuser function");
    debug!("Database URL: {}", database_url);

    let state = initialize_app_state_with_url(database_url).await?;

    let new_user = NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password: Some(password.to_string()),
        ..Default::default()
    };
    let user = state
        .users
        .create_superuser(&state.db, new_user)
        .await
        .with_context(|| format!("Failed to create superuser '{}'", username))?;

    info!("Superuser '{}' created with ID {}", user, user.id());
    Ok(())
}
