//! Content records managed by the dashboard. Stories and videos are flat
//! documents in their own collections; field names stay camelCase on the
//! wire so existing records keep deserializing.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::store::{Document, Fields};

/// The four audience buckets every piece of content is filed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    #[default]
    #[serde(rename = "0-3")]
    Toddler,
    #[serde(rename = "3-6")]
    Preschool,
    #[serde(rename = "6-9")]
    EarlyReader,
    #[serde(rename = "9-12")]
    Preteen,
}

impl AgeGroup {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "0-3" => Ok(AgeGroup::Toddler),
            "3-6" => Ok(AgeGroup::Preschool),
            "6-9" => Ok(AgeGroup::EarlyReader),
            "9-12" => Ok(AgeGroup::Preteen),
            other => Err(AppError::BadRequest(format!(
                "unknown age group: {}",
                other
            ))),
        }
    }
}

/// A persisted record together with its server-assigned id and timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stored<F> {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: F,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Decodes one document into a typed record, skipping malformed ones with a
/// warning rather than failing the whole listing.
pub fn stored_from_document<F: DeserializeOwned>(doc: &Document) -> Option<Stored<F>> {
    match serde_json::from_value::<F>(doc.data.clone()) {
        Ok(fields) => Some(Stored {
            id: doc.id,
            fields,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }),
        Err(e) => {
            tracing::warn!(id = %doc.id, error = %e, "skipping malformed document");
            None
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub age_group: AgeGroup,
    #[serde(default)]
    pub cover_url: String,
    #[serde(default)]
    pub is_code_story: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub programming_language: Option<String>,
    #[serde(default)]
    pub is_temporary: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub age_group: AgeGroup,
}

/// User-editable story fields; id, timestamps and the resolved cover URL are
/// never client-supplied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StoryDraft {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub age_group: AgeGroup,
    #[serde(default)]
    pub is_code_story: bool,
    #[serde(default)]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub programming_language: Option<String>,
    #[serde(default)]
    pub is_temporary: bool,
    /// Explicit cover URL, used when no file is uploaded.
    #[serde(default)]
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct VideoDraft {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(url(message = "a valid video URL is required"))]
    pub video_url: String,
    #[serde(default)]
    pub age_group: AgeGroup,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Ties a draft type to its collection, asset conventions and field layout.
/// Both managed content types go through the same repository recipe; this
/// trait is everything that differs between them.
pub trait ContentKind: Send + Sync + 'static {
    type Draft: Send + Sync + Clone;

    const COLLECTION: &'static str;
    const ASSET_PREFIX: &'static str;
    const PLACEHOLDER_URL: &'static str;

    /// Field checks that must pass before any network call is made.
    fn validate(draft: &Self::Draft) -> Result<()>;

    /// Asset URL supplied directly on the draft, if any.
    fn draft_asset_url(draft: &Self::Draft) -> Option<String>;

    /// Asset URL derivable from the draft when nothing was supplied.
    fn derived_asset_url(draft: &Self::Draft) -> Option<String>;

    /// Serializes the draft plus the resolved asset URL into record fields.
    fn to_fields(draft: &Self::Draft, asset_url: &str) -> Fields;

    /// Asset URL currently stored on a record, for preserve and cleanup
    /// decisions.
    fn asset_url_of(data: &Value) -> Option<String>;

    /// Seeds an editable draft from an existing record.
    fn draft_from(data: &Value) -> Self::Draft;
}

pub struct StoryKind;

impl ContentKind for StoryKind {
    type Draft = StoryDraft;

    const COLLECTION: &'static str = "stories";
    const ASSET_PREFIX: &'static str = "covers";
    const PLACEHOLDER_URL: &'static str = "https://placehold.co/400x300/png?text=Story";

    fn validate(draft: &StoryDraft) -> Result<()> {
        draft
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if draft.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        // Code stories carry the snippet as their payload, so the link
        // becomes optional; every other story needs one.
        if !draft.is_code_story && draft.link.trim().is_empty() {
            return Err(AppError::BadRequest("story link is required".to_string()));
        }
        Ok(())
    }

    fn draft_asset_url(draft: &StoryDraft) -> Option<String> {
        draft
            .cover_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }

    fn derived_asset_url(_draft: &StoryDraft) -> Option<String> {
        None
    }

    fn to_fields(draft: &StoryDraft, asset_url: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("title".to_string(), json!(draft.title.trim()));
        fields.insert("link".to_string(), json!(draft.link.trim()));
        fields.insert("ageGroup".to_string(), json!(draft.age_group));
        fields.insert("coverUrl".to_string(), json!(asset_url));
        fields.insert("isCodeStory".to_string(), json!(draft.is_code_story));
        fields.insert("isTemporary".to_string(), json!(draft.is_temporary));
        if draft.is_code_story {
            fields.insert(
                "codeSnippet".to_string(),
                json!(draft.code_snippet.as_deref().unwrap_or_default()),
            );
            fields.insert(
                "programmingLanguage".to_string(),
                json!(draft.programming_language.as_deref().unwrap_or("javascript")),
            );
        }
        fields
    }

    fn asset_url_of(data: &Value) -> Option<String> {
        data.get("coverUrl")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }

    fn draft_from(data: &Value) -> StoryDraft {
        let fields: StoryFields = serde_json::from_value(data.clone()).unwrap_or_default();
        StoryDraft {
            title: fields.title,
            link: fields.link,
            age_group: fields.age_group,
            is_code_story: fields.is_code_story,
            code_snippet: if fields.is_code_story {
                fields.code_snippet
            } else {
                None
            },
            programming_language: if fields.is_code_story {
                fields.programming_language
            } else {
                None
            },
            is_temporary: fields.is_temporary,
            // The stored cover is preserved implicitly on update unless a
            // new file or URL is submitted.
            cover_url: None,
        }
    }
}

pub struct VideoKind;

impl ContentKind for VideoKind {
    type Draft = VideoDraft;

    const COLLECTION: &'static str = "videos";
    const ASSET_PREFIX: &'static str = "thumbnails";
    const PLACEHOLDER_URL: &'static str =
        "https://via.placeholder.com/640x360?text=Video+Thumbnail";

    fn validate(draft: &VideoDraft) -> Result<()> {
        draft
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if draft.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        Ok(())
    }

    fn draft_asset_url(draft: &VideoDraft) -> Option<String> {
        draft
            .thumbnail_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }

    fn derived_asset_url(draft: &VideoDraft) -> Option<String> {
        youtube_thumbnail(&draft.video_url)
    }

    fn to_fields(draft: &VideoDraft, asset_url: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("title".to_string(), json!(draft.title.trim()));
        fields.insert("description".to_string(), json!(draft.description.trim()));
        fields.insert("videoUrl".to_string(), json!(draft.video_url.trim()));
        fields.insert("thumbnailUrl".to_string(), json!(asset_url));
        fields.insert("ageGroup".to_string(), json!(draft.age_group));
        fields
    }

    fn asset_url_of(data: &Value) -> Option<String> {
        data.get("thumbnailUrl")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }

    fn draft_from(data: &Value) -> VideoDraft {
        let fields: VideoFields = serde_json::from_value(data.clone()).unwrap_or_default();
        VideoDraft {
            title: fields.title,
            description: fields.description,
            video_url: fields.video_url,
            age_group: fields.age_group,
            thumbnail_url: None,
        }
    }
}

static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("youtube id pattern")
});

/// Default thumbnail for YouTube-hosted videos when none was uploaded.
pub fn youtube_thumbnail(video_url: &str) -> Option<String> {
    YOUTUBE_ID
        .captures(video_url)
        .and_then(|captures| captures.get(1))
        .map(|id| format!("https://i3.ytimg.com/vi/{}/maxresdefault.jpg", id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_groups_parse_only_the_four_buckets() {
        assert_eq!(AgeGroup::parse("0-3").unwrap(), AgeGroup::Toddler);
        assert_eq!(AgeGroup::parse("9-12").unwrap(), AgeGroup::Preteen);
        assert!(AgeGroup::parse("13-15").is_err());
        assert!(AgeGroup::parse("").is_err());
    }

    #[test]
    fn age_group_serializes_as_bucket_string() {
        assert_eq!(json!(AgeGroup::Preschool), json!("3-6"));
    }

    #[test]
    fn youtube_thumbnails_derive_from_watch_and_short_urls() {
        assert_eq!(
            youtube_thumbnail("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("https://i3.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg".to_string())
        );
        assert_eq!(
            youtube_thumbnail("https://youtu.be/dQw4w9WgXcQ"),
            Some("https://i3.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg".to_string())
        );
        assert_eq!(youtube_thumbnail("https://vimeo.com/12345"), None);
    }

    #[test]
    fn code_story_may_omit_link_but_plain_story_may_not() {
        let mut draft = StoryDraft {
            title: "Loops for Kids".to_string(),
            is_code_story: true,
            ..StoryDraft::default()
        };
        assert!(StoryKind::validate(&draft).is_ok());

        draft.is_code_story = false;
        assert!(StoryKind::validate(&draft).is_err());

        draft.link = "https://example.com/story".to_string();
        assert!(StoryKind::validate(&draft).is_ok());
    }

    #[test]
    fn video_url_must_be_present_and_well_formed() {
        let mut draft = VideoDraft {
            title: "ABC Song".to_string(),
            description: "Sing along".to_string(),
            ..VideoDraft::default()
        };
        assert!(VideoKind::validate(&draft).is_err());

        draft.video_url = "not a url".to_string();
        assert!(VideoKind::validate(&draft).is_err());

        draft.video_url = "https://example.com/video1".to_string();
        assert!(VideoKind::validate(&draft).is_ok());
    }

    #[test]
    fn code_fields_are_only_stored_for_code_stories() {
        let draft = StoryDraft {
            title: "Fox".to_string(),
            link: "https://x".to_string(),
            code_snippet: Some("print('hi')".to_string()),
            ..StoryDraft::default()
        };
        let fields = StoryKind::to_fields(&draft, StoryKind::PLACEHOLDER_URL);
        assert!(!fields.contains_key("codeSnippet"));
        assert!(!fields.contains_key("programmingLanguage"));
    }

    #[test]
    fn story_draft_seeds_from_stored_fields() {
        let data = json!({
            "title": "Clever Rabbit",
            "link": "https://example.com/story2",
            "ageGroup": "6-9",
            "coverUrl": "https://kidzone-media.s3.test/covers/1_r.png",
            "isCodeStory": false,
            "isTemporary": true,
        });
        let draft = StoryKind::draft_from(&data);
        assert_eq!(draft.title, "Clever Rabbit");
        assert_eq!(draft.age_group, AgeGroup::EarlyReader);
        assert!(draft.is_temporary);
        assert!(draft.cover_url.is_none());
    }
}
