//! Posts live in memory only; there is no backing collection for them yet.

use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub link: String,
}

pub fn initial_posts() -> Vec<Post> {
    vec![
        Post {
            id: Uuid::new_v4(),
            title: "Fun Facts for Kids".to_string(),
            link: "https://example.com/post1".to_string(),
        },
        Post {
            id: Uuid::new_v4(),
            title: "Learning With Games".to_string(),
            link: "https://example.com/post2".to_string(),
        },
    ]
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(add_post))
        .route("/:id", delete(remove_post))
}

async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>> {
    Ok(Json(state.posts.lock().await.clone()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "link is required"))]
    pub link: String,
}

async fn add_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<Post>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let post = Post {
        id: Uuid::new_v4(),
        title: payload.title.trim().to_string(),
        link: payload.link.trim().to_string(),
    };
    state.posts.lock().await.push(post.clone());
    Ok(Json(post))
}

async fn remove_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let mut posts = state.posts.lock().await;
    let before = posts.len();
    posts.retain(|post| post.id != id);
    if posts.len() == before {
        return Err(AppError::NotFound(format!("post {} not found", id)));
    }
    Ok(Json(json!({ "success": true })))
}
