//! HRAC Server — application entry point.

use hrac_server::{AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hrac=info".parse().unwrap()))
        .json()
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    let db = hrac_db::connect(&config.db).await?;
    hrac_db::run_migrations(&db).await?;

    let registry = hrac_server::routes::build_registry();
    let state = AppState::new(db, registry, config.authz.clone());

    hrac_server::bootstrap::bootstrap(&state, config.admin_user_id).await?;
    hrac_server::bootstrap::validate_registry(&state, state.gate.registry()).await?;

    let app = hrac_server::routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
