use dotenvy::dotenv;
use note_frontend::config::get_configuration;
use note_frontend::policy::Policy;
use note_frontend::services::backend::BackendClient;
use note_frontend::startup::build_router;
use note_frontend::AppState;
use client_core::observability::logging::init_tracing;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tower_sessions::cookie::Key;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "note-frontend",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    note_frontend::services::metrics::init_metrics();

    let backend = Arc::new(BackendClient::new(configuration.backend.clone()));
    let policy = Policy::new(configuration.policy.admin_email.clone());

    let session_key = Key::try_from(
        configuration.server.session_secret.expose_secret().as_bytes(),
    )
    .map_err(|e| anyhow::anyhow!("session secret must be at least 64 bytes: {}", e))?;

    let app = build_router(AppState::new(backend, policy), session_key);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting note-frontend on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
