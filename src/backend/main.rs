/**
 * Blogify Server Entry Point
 *
 * Loads `.env`, initializes tracing, and serves the Axum app.
 */

use blogify::backend::server::{config::ServerConfig, init::create_app};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blogify=debug,tower_http=info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("[STARTUP] Server initialization started");

    let config = ServerConfig::from_env()?;
    let app = create_app(&config).await;

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("[STARTUP] Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
