use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{stored_from_document, AgeGroup, Stored, VideoDraft, VideoFields};
use crate::services::AssetUpload;
use crate::AppState;

use super::field_text;
use super::stories::DeleteQuery;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos).post(create_video))
        .route("/:id", put(update_video).delete(delete_video))
}

async fn list_videos(State(state): State<AppState>) -> Result<Json<Vec<Stored<VideoFields>>>> {
    let mut controller = state.videos.lock().await;
    controller.reload().await;
    let videos = controller
        .items()
        .iter()
        .filter_map(stored_from_document::<VideoFields>)
        .collect();
    Ok(Json(videos))
}

async fn create_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let (draft, upload) = parse_video_form(multipart).await?;

    let mut controller = state.videos.lock().await;
    controller.cancel();
    let id = controller.submit(draft, upload).await?;

    Ok(Json(json!({ "id": id })))
}

async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let (draft, upload) = parse_video_form(multipart).await?;

    let mut controller = state.videos.lock().await;
    controller.ensure_loaded().await;
    controller.begin_edit(id)?;
    controller.submit(draft, upload).await?;

    Ok(Json(json!({ "success": true })))
}

async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<serde_json::Value>> {
    if !query.confirm {
        return Err(AppError::BadRequest(
            "deletion must be confirmed with confirm=true".to_string(),
        ));
    }

    let mut controller = state.videos.lock().await;
    controller.ensure_loaded().await;
    controller.delete(id).await?;

    Ok(Json(json!({ "success": true })))
}

async fn parse_video_form(
    mut multipart: Multipart,
) -> Result<(VideoDraft, Option<AssetUpload>)> {
    let mut draft = VideoDraft::default();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "thumbnail" => {
                let file_name = field.file_name().unwrap_or("thumbnail").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("malformed upload: {e}")))?;
                if !bytes.is_empty() {
                    upload = Some(AssetUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "title" => draft.title = field_text(field).await?,
            "description" => draft.description = field_text(field).await?,
            "videoUrl" => draft.video_url = field_text(field).await?,
            "ageGroup" => draft.age_group = AgeGroup::parse(&field_text(field).await?)?,
            "thumbnailUrl" => {
                let value = field_text(field).await?;
                if !value.trim().is_empty() {
                    draft.thumbnail_url = Some(value);
                }
            }
            _ => {}
        }
    }

    Ok((draft, upload))
}
