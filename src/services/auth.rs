use anyhow::Context;
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

pub fn hash_password(password: &str, cost: u32) -> anyhow::Result<String> {
    bcrypt::hash(password, cost).context("failed to hash password")
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    bcrypt::verify(password, password_hash).unwrap_or(false)
}

/// Checks a password against the hash stored for `username`, if any.
fn authenticate(
    username: &str,
    stored_hash: Option<&str>,
    password: &str,
) -> Result<(), AppError> {
    let Some(stored) = stored_hash else {
        tracing::warn!(username, "login for unknown admin");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, stored) {
        tracing::warn!(username, "admin login rejected");
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(username, "admin logged in");
    Ok(())
}

/// Looks up the admin's hash under the store lock, then runs the bcrypt check
/// on the blocking pool so it never stalls a runtime worker.
pub async fn verify_login(state: &AppState, username: &str, password: &str) -> Result<(), AppError> {
    let stored = {
        let db = state.db();
        queries::get_admin_hash(&db, username).map_err(AppError::db("looking up admin"))?
    };

    let username = username.to_string();
    let password = password.to_string();
    tokio::task::spawn_blocking(move || authenticate(&username, stored.as_deref(), &password))
        .await
        .map_err(|e| AppError::Internal(format!("login check failed: {e}")))?
}

/// Creates or updates the configured admin account. Skipped when no
/// credentials are configured.
pub fn seed_admin(conn: &Connection, config: &AppConfig) -> anyhow::Result<()> {
    if config.admin_username.is_empty() || config.admin_password.is_empty() {
        tracing::warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set, admin account not seeded");
        return Ok(());
    }

    let hash = hash_password(&config.admin_password, config.bcrypt_cost)?;
    queries::upsert_admin(conn, &config.admin_username, &hash)
        .context("failed to store admin account")?;

    tracing::info!(username = %config.admin_username, "admin account ready");
    Ok(())
}
