use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};

use backend::{create_router, initialize_backend};

// Defaults, overridable through the environment.
const DEFAULT_DATABASE_URL: &str = "sqlite:student_cards.db";
const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let database_url =
        env::var("STUDENT_CARDS_DB").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let port = env::var("STUDENT_CARDS_PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let state = initialize_backend(&database_url).await?;
    let app = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
