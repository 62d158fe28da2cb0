mod api_doc;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Context;
use config::Config;
use state::AppState;
use store::CloudflareKv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; variables may come from the environment
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    tracing::info!("kv-proxy starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store = CloudflareKv::from_config(&config)?;

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let state = AppState {
        store: Arc::new(store),
        config: Arc::new(config),
    };
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server is running on {}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
