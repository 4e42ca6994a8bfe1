//! Per-content-type form and list state: the last-loaded snapshot plus the
//! current edit target. Drives the repository and reconciles by full reload
//! after every successful mutation.

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::ContentKind;
use crate::store::Document;

use super::{AssetUpload, ContentRepository};

pub struct FormListController<K: ContentKind> {
    repo: ContentRepository<K>,
    items: Vec<Document>,
    editing: Option<Uuid>,
}

impl<K: ContentKind> FormListController<K> {
    pub fn new(repo: ContentRepository<K>) -> Self {
        Self {
            repo,
            items: Vec::new(),
            editing: None,
        }
    }

    /// The last-loaded list snapshot, newest-created first.
    pub fn items(&self) -> &[Document] {
        &self.items
    }

    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    /// Replaces the snapshot with a fresh listing. Load failures have
    /// already been logged by the repository and show up as an empty list.
    pub async fn reload(&mut self) {
        self.items = self.repo.load_all().await;
    }

    /// Loads the snapshot if it has never been seeded, so edit and delete
    /// lookups have something to work against.
    pub async fn ensure_loaded(&mut self) {
        if self.items.is_empty() {
            self.reload().await;
        }
    }

    /// Switches to edit mode and returns a draft seeded from the snapshot
    /// item.
    pub fn begin_edit(&mut self, id: Uuid) -> Result<K::Draft> {
        let doc = self
            .items
            .iter()
            .find(|doc| doc.id == id)
            .ok_or_else(|| AppError::NotFound(format!("{} record {} not found", K::COLLECTION, id)))?;
        self.editing = Some(id);
        Ok(K::draft_from(&doc.data))
    }

    /// Discards the draft and returns to idle.
    pub fn cancel(&mut self) {
        self.editing = None;
    }

    /// Validates the draft before any network call, then dispatches create
    /// or update depending on the current mode. On success the form resets
    /// and the list is fully reloaded; on failure the snapshot and mode stay
    /// untouched so the caller can retry. Returns the new id for creates.
    pub async fn submit(
        &mut self,
        draft: K::Draft,
        upload: Option<AssetUpload>,
    ) -> Result<Option<Uuid>> {
        K::validate(&draft)?;

        match self.editing {
            Some(id) => {
                self.repo.update(id, &draft, upload, &self.items).await?;
                self.editing = None;
                self.reload().await;
                Ok(None)
            }
            None => {
                let id = self.repo.create(&draft, upload).await?;
                self.reload().await;
                Ok(Some(id))
            }
        }
    }

    /// Deletes a record, passing along the asset URL known from the
    /// snapshot so the repository can decide about blob cleanup.
    pub async fn delete(&mut self, id: Uuid) -> Result<()> {
        let known_asset_url = self
            .items
            .iter()
            .find(|doc| doc.id == id)
            .and_then(|doc| K::asset_url_of(&doc.data));
        self.repo.delete(id, known_asset_url.as_deref()).await?;
        self.reload().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use crate::models::{StoryDraft, StoryKind};
    use crate::store::memory::{MemoryBlobStore, MemoryDocumentStore};

    fn controller(
        docs: &Arc<MemoryDocumentStore>,
        blobs: &Arc<MemoryBlobStore>,
    ) -> FormListController<StoryKind> {
        FormListController::new(ContentRepository::new(docs.clone(), blobs.clone()))
    }

    fn story_draft(title: &str, link: &str) -> StoryDraft {
        StoryDraft {
            title: title.to_string(),
            link: link.to_string(),
            ..StoryDraft::default()
        }
    }

    fn upload(file_name: &str) -> AssetUpload {
        AssetUpload {
            file_name: file_name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_before_any_network_call() {
        let docs = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let mut controller = controller(&docs, &blobs);

        let result = controller.submit(story_draft("Fox", ""), None).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(docs.len(), 0);
        assert!(blobs.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn code_story_with_empty_link_is_accepted() {
        let docs = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let mut controller = controller(&docs, &blobs);

        let draft = StoryDraft {
            title: "Loops for Kids".to_string(),
            is_code_story: true,
            code_snippet: Some("for i in range(3): print(i)".to_string()),
            programming_language: Some("python".to_string()),
            ..StoryDraft::default()
        };
        let id = controller.submit(draft, None).await.unwrap();

        assert!(id.is_some());
        assert_eq!(controller.items().len(), 1);
    }

    #[tokio::test]
    async fn create_then_edit_preserves_cover_and_advances_updated_at() {
        let docs = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let mut controller = controller(&docs, &blobs);

        let id = controller
            .submit(story_draft("Fox", "https://x"), Some(upload("fox.png")))
            .await
            .unwrap()
            .unwrap();
        let cover = controller.items()[0].data["coverUrl"]
            .as_str()
            .unwrap()
            .to_string();
        let created_at = controller.items()[0].created_at;

        let mut draft = controller.begin_edit(id).unwrap();
        assert_eq!(draft.title, "Fox");
        draft.title = "Fox v2".to_string();

        let result = controller.submit(draft, None).await.unwrap();
        assert!(result.is_none());
        assert!(controller.editing().is_none());

        let item = &controller.items()[0];
        assert_eq!(item.data["title"], "Fox v2");
        assert_eq!(item.data["coverUrl"].as_str().unwrap(), cover);
        assert_eq!(item.created_at, created_at);
        assert!(item.updated_at > created_at);
    }

    #[tokio::test]
    async fn cancel_discards_the_edit_and_next_submit_creates() {
        let docs = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let mut controller = controller(&docs, &blobs);

        let id = controller
            .submit(story_draft("Fox", "https://x"), None)
            .await
            .unwrap()
            .unwrap();

        controller.begin_edit(id).unwrap();
        controller.cancel();
        assert!(controller.editing().is_none());

        let created = controller
            .submit(story_draft("Rabbit", "https://y"), None)
            .await
            .unwrap();
        assert!(created.is_some());
        assert_eq!(controller.items().len(), 2);
    }

    #[tokio::test]
    async fn save_failure_keeps_edit_mode_and_snapshot_untouched() {
        let docs = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let mut controller = controller(&docs, &blobs);

        let id = controller
            .submit(story_draft("Fox", "https://x"), None)
            .await
            .unwrap()
            .unwrap();

        controller.begin_edit(id).unwrap();
        docs.fail.store(true, Ordering::SeqCst);

        let result = controller
            .submit(story_draft("Fox v2", "https://x"), None)
            .await;

        assert!(result.is_err());
        assert_eq!(controller.editing(), Some(id));
        assert_eq!(controller.items()[0].data["title"], "Fox");
    }

    #[tokio::test]
    async fn delete_uses_the_snapshot_asset_for_cleanup() {
        let docs = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let mut controller = controller(&docs, &blobs);

        let id = controller
            .submit(story_draft("Fox", "https://x"), Some(upload("fox.png")))
            .await
            .unwrap()
            .unwrap();
        let cover = controller.items()[0].data["coverUrl"]
            .as_str()
            .unwrap()
            .to_string();

        controller.delete(id).await.unwrap();

        assert!(controller.items().is_empty());
        assert_eq!(*blobs.removed.lock().unwrap(), vec![cover]);
    }

    #[tokio::test]
    async fn new_records_appear_first_in_the_snapshot() {
        let docs = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let mut controller = controller(&docs, &blobs);

        controller
            .submit(story_draft("First", "https://a"), None)
            .await
            .unwrap();
        controller
            .submit(story_draft("Second", "https://b"), None)
            .await
            .unwrap();

        assert_eq!(controller.items()[0].data["title"], "Second");
    }
}
