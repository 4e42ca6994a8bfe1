use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{stored_from_document, AgeGroup, Stored, StoryDraft, StoryFields};
use crate::services::AssetUpload;
use crate::AppState;

use super::{field_text, parse_bool};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stories).post(create_story))
        .route("/:id", put(update_story).delete(delete_story))
}

async fn list_stories(State(state): State<AppState>) -> Result<Json<Vec<Stored<StoryFields>>>> {
    let mut controller = state.stories.lock().await;
    controller.reload().await;
    let stories = controller
        .items()
        .iter()
        .filter_map(stored_from_document::<StoryFields>)
        .collect();
    Ok(Json(stories))
}

async fn create_story(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let (draft, upload) = parse_story_form(multipart).await?;

    let mut controller = state.stories.lock().await;
    controller.cancel();
    let id = controller.submit(draft, upload).await?;

    Ok(Json(json!({ "id": id })))
}

async fn update_story(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let (draft, upload) = parse_story_form(multipart).await?;

    let mut controller = state.stories.lock().await;
    controller.ensure_loaded().await;
    controller.begin_edit(id)?;
    controller.submit(draft, upload).await?;

    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

async fn delete_story(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<serde_json::Value>> {
    // Destructive action; nothing happens without explicit confirmation.
    if !query.confirm {
        return Err(AppError::BadRequest(
            "deletion must be confirmed with confirm=true".to_string(),
        ));
    }

    let mut controller = state.stories.lock().await;
    controller.ensure_loaded().await;
    controller.delete(id).await?;

    Ok(Json(json!({ "success": true })))
}

async fn parse_story_form(
    mut multipart: Multipart,
) -> Result<(StoryDraft, Option<AssetUpload>)> {
    let mut draft = StoryDraft::default();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cover" => {
                let file_name = field.file_name().unwrap_or("cover").to_string();
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
            "link" => draft.link = field_text(field).await?,
            "ageGroup" => draft.age_group = AgeGroup::parse(&field_text(field).await?)?,
            "coverUrl" => {
                let value = field_text(field).await?;
                if !value.trim().is_empty() {
                    draft.cover_url = Some(value);
                }
            }
            "isCodeStory" => draft.is_code_story = parse_bool(&field_text(field).await?),
            "codeSnippet" => draft.code_snippet = Some(field_text(field).await?),
            "programmingLanguage" => {
                draft.programming_language = Some(field_text(field).await?)
            }
            "isTemporary" => draft.is_temporary = parse_bool(&field_text(field).await?),
            _ => {}
        }
    }

    Ok((draft, upload))
}
