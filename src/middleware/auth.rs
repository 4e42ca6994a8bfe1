use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::Result;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Always "admin"; there are no per-user accounts
    pub exp: usize,  // Expiration time
    pub iat: usize,  // Issued at
}

#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub subject: String,
}

/// Issues the bearer token handed out after a successful login.
pub fn issue_token(auth: &AuthConfig) -> Result<String> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: "admin".to_string(),
        iat: now.timestamp() as usize,
        exp: (now + chrono::Duration::hours(auth.token_expiry_hours as i64)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.token_secret.as_bytes()),
    )
    .map_err(|e| anyhow::anyhow!("failed to issue token: {e}").into())
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> std::result::Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.auth.token_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?
    .claims;

    request.extensions_mut().insert(CurrentAdmin {
        subject: claims.sub,
    });

    Ok(next.run(request).await)
}
