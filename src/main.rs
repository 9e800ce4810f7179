use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use booking_desk::config::AppConfig;
use booking_desk::db;
use booking_desk::handlers;
use booking_desk::services::auth;
use booking_desk::services::mail::log_only::LogMailer;
use booking_desk::services::mail::relay::HttpMailRelay;
use booking_desk::services::mail::Mailer;
use booking_desk::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    auth::seed_admin(&conn, &config)?;

    let mailer: Box<dyn Mailer> = if config.mail_api_url.is_empty() {
        tracing::warn!("MAIL_API_URL not set, confirmation emails will only be logged");
        Box::new(LogMailer)
    } else {
        tracing::info!("using mail relay (url: {})", config.mail_api_url);
        Box::new(HttpMailRelay::new(
            config.mail_api_url.clone(),
            config.mail_api_key.clone(),
            config.mail_from.clone(),
            Duration::from_secs(config.mail_timeout_secs),
        )?)
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        mailer,
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
