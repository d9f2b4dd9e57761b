use events_management::core::Config;
use events_management::entities::User;
use events_management::{AppState, create_router};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_FILTER: &str = "events_management=debug,tower_http=info";

/// Ogni quanto ripulire i refresh token scaduti
const TOKEN_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    // Inizializza la configurazione
    let config = Config::from_env()?;
    config.print_info();

    // Pool SQLite; il file viene creato se non esiste
    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options)
        .await?;
    info!("Connected to database");

    sqlx::migrate!().run(&pool).await?;
    info!("Migrations applied");

    let state = Arc::new(AppState::new(
        pool,
        config.auth.clone(),
        config.storage.clone(),
    ));

    // Amministratore iniziale
    let admin_hash = User::hash_password(&config.admin_password)?;
    if state.user.bootstrap_admin(&admin_hash).await?.is_some() {
        warn!("Bootstrap administrator created: change its password after the first login");
    }

    spawn_token_purger(state.clone());

    let app = create_router(state).layer(CorsLayer::permissive());

    let address = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&address).await?;
    info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

fn spawn_token_purger(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TOKEN_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            state.refresh_tokens.purge_expired();
        }
    });
}

async fn shutdown_signal() {
    wait_for_shutdown(signal::ctrl_c()).await
}

/// Completa solo quando arriva il segnale; se l'handler non si installa il server resta su
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_waits_forever_when_signal_handler_fails() {
        let failing = async { Err(std::io::Error::other("no signal handler")) };
        let waited = tokio::time::timeout(Duration::from_millis(50), wait_for_shutdown(failing)).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn shutdown_completes_on_signal() {
        let waited = tokio::time::timeout(Duration::from_millis(50), wait_for_shutdown(async { Ok(()) })).await;
        assert!(waited.is_ok());
    }
}
