//! markdeck - HTTP server for random Markdown snippets.
//!
//! Connects to Postgres, makes sure the snippet table exists and is seeded,
//! then serves pages on port 8080.

use std::net::{Ipv4Addr, SocketAddr};

use axum::http::Request;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use markdeck::{AppState, Config, MemoryStore, PgStore, SnippetStore, router};

/// Port the server listens on.
const LISTEN_PORT: u16 = 8080;

/// markdeck - random Markdown snippets by category.
#[derive(Parser, Debug)]
#[command(name = "markdeck")]
#[command(about = "Serves random Markdown snippets as sanitized HTML", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,

    /// Serve from an in-memory store instead of Postgres. Nothing persists.
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load .env file if it exists
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = if args.ephemeral {
        tracing::warn!("using in-memory store; snippets will not persist");
        bootstrap(MemoryStore::new()).await?
    } else {
        let config = Config::from_env()?;
        bootstrap(PgStore::connect(&config).await?).await?
    };

    // Build router with middleware
    let app = router(state).layer(TraceLayer::new_for_http().make_span_with(
        |request: &Request<_>| {
            tracing::span!(
                Level::INFO,
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
            )
        },
    ));

    // Start server
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, LISTEN_PORT));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "starting markdeck server");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create and seed the table, then wrap the store in application state.
async fn bootstrap(store: impl SnippetStore) -> anyhow::Result<AppState> {
    let seeded = store.initialize().await?;
    let snippets = store.count().await?;
    tracing::info!(seeded, snippets, "snippet store ready");

    Ok(AppState::new(store))
}
