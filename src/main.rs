use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use appointments::config::AppConfig;
use appointments::db::{self, SqliteBookingStore};
use appointments::handlers;
use appointments::services::auth::AdminSessions;
use appointments::services::calendar::SystemClock;
use appointments::services::scheduling::BookingService;
use appointments::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    let conn = db::init_db(&config.database_url)?;
    tracing::info!("using database {}", config.database_url);

    let bookings = BookingService::new(
        Arc::new(SqliteBookingStore::new(conn)),
        Arc::new(SystemClock),
    );

    let state = Arc::new(AppState {
        bookings,
        sessions: AdminSessions::new(&config.secret_key, &config.admin_password),
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
