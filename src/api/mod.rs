mod auth;
mod dashboard;
mod posts;
mod stories;
mod users;
mod videos;

pub use posts::initial_posts;
pub use posts::Post;

use axum::extract::multipart::Field;
use axum::middleware;
use axum::Router;

use crate::error::{AppError, Result};
use crate::middleware::require_auth;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", axum::routing::get(auth::me))
        .nest("/dashboard", dashboard::routes())
        .nest("/stories", stories::routes())
        .nest("/videos", videos::routes())
        .nest("/posts", posts::routes())
        .nest("/users", users::routes())
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/auth/login", axum::routing::post(auth::login))
        .merge(protected)
}

pub(crate) async fn field_text(field: Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed form field: {e}")))
}

pub(crate) fn parse_bool(value: &str) -> bool {
    matches!(value, "true" | "on" | "1")
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use crate::config::{AuthConfig, Config, DatabaseConfig, ServerConfig, StorageConfig};
    use crate::services::{ContentRepository, FormListController};
    use crate::store::memory::{MemoryBlobStore, MemoryDocumentStore};
    use crate::AppState;

    /// Application state over in-memory stores, for handler tests.
    pub(crate) fn state(
        docs: &Arc<MemoryDocumentStore>,
        blobs: &Arc<MemoryBlobStore>,
    ) -> AppState {
        AppState {
            config: config(),
            stories: Arc::new(Mutex::new(FormListController::new(ContentRepository::new(
                docs.clone(),
                blobs.clone(),
            )))),
            videos: Arc::new(Mutex::new(FormListController::new(ContentRepository::new(
                docs.clone(),
                blobs.clone(),
            )))),
            posts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/kidzone_admin_test".to_string(),
                max_connections: 1,
            },
            storage: StorageConfig {
                bucket: "kidzone-media".to_string(),
                region: "us-east-1".to_string(),
                endpoint: None,
                public_base_url: "https://kidzone-media.s3.test".to_string(),
                url_marker: "kidzone-media.s3".to_string(),
            },
            auth: AuthConfig {
                admin_password: "admin123".to_string(),
                token_secret: "test-secret".to_string(),
                token_expiry_hours: 1,
            },
        }
    }
}
