mod api;
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod services;
mod store;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::sync::Mutex;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::Post;
use crate::config::Config;
use crate::db::Database;
use crate::models::{StoryKind, VideoKind};
use crate::services::{ContentRepository, FormListController};
use crate::store::{BlobStore, DocumentStore, PgDocumentStore, S3BlobStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "kidzone_admin=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Configuration loaded successfully");

    // Initialize database connection
    let db = Database::connect(&config).await?;
    tracing::info!("Database connection established");

    // Run database migrations
    db.run_migrations().await?;

    // Wire the content stores
    let documents: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(db.pg.clone()));
    let blobs: Arc<dyn BlobStore> = Arc::new(S3BlobStore::connect(&config.storage).await?);
    tracing::info!("Content stores initialized");

    // Build application state
    let state = AppState {
        config: config.clone(),
        stories: Arc::new(Mutex::new(FormListController::new(
            ContentRepository::<StoryKind>::new(documents.clone(), blobs.clone()),
        ))),
        videos: Arc::new(Mutex::new(FormListController::new(
            ContentRepository::<VideoKind>::new(documents, blobs),
        ))),
        posts: Arc::new(Mutex::new(api::initial_posts())),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api::routes(state.clone()))
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub stories: Arc<Mutex<FormListController<StoryKind>>>,
    pub videos: Arc<Mutex<FormListController<VideoKind>>>,
    pub posts: Arc<Mutex<Vec<Post>>>,
}
