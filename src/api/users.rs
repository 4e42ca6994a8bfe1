use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::error::Result;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_users))
}

#[derive(Debug, Serialize)]
pub struct ConnectedUser {
    pub name: String,
    pub online: bool,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub connected: usize,
    pub users: Vec<ConnectedUser>,
}

async fn list_users() -> Result<Json<UsersResponse>> {
    // Static sample data; the platform does not report presence yet.
    let users = vec![
        ConnectedUser { name: "Alice".to_string(), online: true },
        ConnectedUser { name: "Bob".to_string(), online: true },
        ConnectedUser { name: "Charlie".to_string(), online: true },
    ];

    Ok(Json(UsersResponse {
        connected: users.len(),
        users,
    }))
}
