//! The repository recipe shared by every managed content type:
//! load-all-ordered, create-with-optional-upload, update-with-optional-
//! replace, delete-with-best-effort-cleanup.

use std::marker::PhantomData;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::models::ContentKind;
use crate::store::{asset_path, BlobStore, Document, DocumentStore, OrderDirection, OrderField};

/// A file received from the form, ready for blob storage.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct ContentRepository<K: ContentKind> {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    _kind: PhantomData<K>,
}

impl<K: ContentKind> ContentRepository<K> {
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            documents,
            blobs,
            _kind: PhantomData,
        }
    }

    /// Lists the collection newest-created first. A failed listing is logged
    /// and surfaces as an empty result; there is no retry beyond the next
    /// explicit reload.
    pub async fn load_all(&self) -> Vec<Document> {
        match self
            .documents
            .list_ordered(K::COLLECTION, OrderField::CreatedAt, OrderDirection::Descending)
            .await
        {
            Ok(docs) => docs,
            Err(e) => {
                tracing::error!(collection = K::COLLECTION, error = %e, "failed to load content list");
                Vec::new()
            }
        }
    }

    /// Creates a record, uploading the asset first when one was supplied.
    /// Upload failure is non-fatal: creation continues with the placeholder.
    pub async fn create(&self, draft: &K::Draft, upload: Option<AssetUpload>) -> Result<Uuid> {
        let asset_url = self.resolve_asset(draft, upload, None).await;
        let doc = self
            .documents
            .insert(K::COLLECTION, K::to_fields(draft, &asset_url))
            .await?;
        Ok(doc.id)
    }

    /// Updates a record. When neither a new file nor a new URL is given, the
    /// existing asset is preserved, looked up from the locally held snapshot
    /// rather than re-fetched. `created_at` is never part of the payload.
    pub async fn update(
        &self,
        id: Uuid,
        draft: &K::Draft,
        upload: Option<AssetUpload>,
        snapshot: &[Document],
    ) -> Result<()> {
        let existing = snapshot
            .iter()
            .find(|doc| doc.id == id)
            .and_then(|doc| K::asset_url_of(&doc.data));
        let asset_url = self.resolve_asset(draft, upload, existing).await;
        self.documents
            .replace(K::COLLECTION, id, K::to_fields(draft, &asset_url))
            .await
    }

    /// Deletes a record. If the known asset URL is hosted by our own blob
    /// store, its removal is attempted first; that cleanup is attempt, log,
    /// never propagate. Record deletion failures do propagate, since they
    /// leave the list stale.
    pub async fn delete(&self, id: Uuid, known_asset_url: Option<&str>) -> Result<()> {
        if let Some(url) = known_asset_url {
            if !url.is_empty() && self.blobs.owns_url(url) {
                if let Err(e) = self.blobs.remove(url).await {
                    tracing::warn!(
                        collection = K::COLLECTION,
                        url,
                        error = %e,
                        "asset cleanup failed, continuing with record deletion"
                    );
                }
            }
        }
        self.documents.remove(K::COLLECTION, id).await
    }

    /// Upload first; then the draft's explicit URL; then the existing asset
    /// (updates only); then anything derivable from the draft; finally the
    /// placeholder.
    async fn resolve_asset(
        &self,
        draft: &K::Draft,
        upload: Option<AssetUpload>,
        existing: Option<String>,
    ) -> String {
        if let Some(upload) = upload {
            let path = asset_path(K::ASSET_PREFIX, &upload.file_name);
            match self
                .blobs
                .put(&path, upload.bytes, &upload.content_type)
                .await
            {
                Ok(url) => return url,
                Err(e) => {
                    tracing::warn!(
                        collection = K::COLLECTION,
                        error = %e,
                        "asset upload failed, falling back to placeholder"
                    );
                    return K::PLACEHOLDER_URL.to_string();
                }
            }
        }
        if let Some(url) = K::draft_asset_url(draft) {
            return url;
        }
        if let Some(url) = existing {
            return url;
        }
        if let Some(url) = K::derived_asset_url(draft) {
            return url;
        }
        K::PLACEHOLDER_URL.to_string()
    }
}
