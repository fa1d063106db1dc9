use std::sync::Arc;

use anyhow::Context;
use flightbook::app::{build_router, AppState};
use flightbook::config::ServiceConfig;
use flightbook::db::repository::{BookingRepository, MongoBookingRepository};
use mongodb::options::ClientOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flightbook=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting flightbook server...");

    let config = ServiceConfig::from_env().context("Failed to load configuration")?;

    // Build the MongoDB client. The driver connects lazily, so an unreachable
    // server only shows up in the ping below and in per-request failures.
    let mut client_options = ClientOptions::parse(config.mongo_uri.as_str())
        .await
        .context("Invalid MONGO_URI")?;
    client_options.app_name = Some("flightbook".to_string());
    client_options.server_selection_timeout = Some(config.server_selection_timeout());

    let db_name = config.database_name(client_options.default_database.as_deref());
    let mongo_client =
        mongodb::Client::with_options(client_options).context("Failed to create MongoDB client")?;
    let mongo_db = mongo_client.database(&db_name);

    match MongoBookingRepository::ping(&mongo_db).await {
        Ok(()) => tracing::info!(
            "Connected to MongoDB at {} (database '{}')",
            config.redacted_mongo_uri(),
            db_name
        ),
        Err(e) => tracing::warn!(
            "MongoDB at {} is not reachable, bookings will fail until it is: {}",
            config.redacted_mongo_uri(),
            e
        ),
    }

    let booking_repo: Arc<dyn BookingRepository> =
        Arc::new(MongoBookingRepository::new(&mongo_db));
    let app = build_router(AppState::new(booking_repo));

    let addr = config.listen_addr().await?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down, closing MongoDB client");
    mongo_client.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
