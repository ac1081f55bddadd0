use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use clinicore::assistant::CompletionClient;
use clinicore::{api, config, db};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    // Open once at startup so migrations run before the first request.
    let db_path = config::database_path();
    if let Err(e) = db::open_database(&db_path) {
        tracing::error!("Failed to open database at {}: {e}", db_path.display());
        std::process::exit(1);
    }

    // Blocking reqwest client: built off the async runtime, same as the
    // handlers that call it.
    let client = tokio::task::spawn_blocking(CompletionClient::from_env)
        .await
        .expect("completion client init");
    tracing::info!(
        base_url = %client.base_url(),
        model = %client.model(),
        "Completion backend configured"
    );

    let ctx = api::ApiContext::new(db_path, Arc::new(client));
    let app = api::api_router(ctx);

    let addr = config::bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "API server started");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("API server error: {e}");
    }
}
