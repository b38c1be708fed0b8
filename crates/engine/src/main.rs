//! Curricula Engine - Main entry point.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use curricula_engine::api;
use curricula_engine::infrastructure::{
    clock::SystemClock,
    config::AppConfig,
    embedding::OllamaEmbeddingClient,
    neo4j::{ensure_schema, Neo4jGraph, Neo4jRepositories},
    password::BcryptHasher,
    ports::ClockPort,
};
use curricula_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may be started from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "curricula_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Curricula Engine");

    let config = AppConfig::from_env();
    let addr = config.socket_addr()?;

    // Connect to Neo4j
    tracing::info!(
        uri = %config.neo4j_uri,
        database = %config.neo4j_database,
        "Connecting to Neo4j"
    );
    let neo4j_config = neo4rs::ConfigBuilder::default()
        .uri(config.neo4j_uri.as_str())
        .user(config.neo4j_user.as_str())
        .password(config.neo4j_password.as_str())
        .db(config.neo4j_database.as_str())
        .build()?;
    let graph = Neo4jGraph::new(neo4rs::Graph::connect(neo4j_config).await?);

    // Ensure database schema (indexes)
    ensure_schema(&graph).await?;

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let repos = Neo4jRepositories::new(graph, clock);

    // Create infrastructure clients
    let embedder = Arc::new(OllamaEmbeddingClient::new(
        &config.embedding_base_url,
        &config.embedding_model,
    ));
    tracing::info!(
        base_url = %config.embedding_base_url,
        model = %config.embedding_model,
        top_k = config.search_top_k,
        "Embedding client configured"
    );
    let hasher = Arc::new(BcryptHasher::new());

    // Create application
    let app = Arc::new(App::new(repos, embedder, hasher, config.search_top_k));

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins.map(str::trim).filter(|s| !s.is_empty())?;

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        // JSON bodies trigger CORS preflights.
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
