//! Remote content store contract: document collections plus a companion
//! blob store for uploaded files. Both sides of the contract are traits so
//! the repository and controller can be exercised without the network.

mod blobs;
mod documents;
#[cfg(test)]
pub(crate) mod memory;

pub use blobs::S3BlobStore;
pub use documents::PgDocumentStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::Result;

/// Flat field map of one record, as stored in a collection.
pub type Fields = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub enum OrderField {
    CreatedAt,
}

#[derive(Debug, Clone, Copy)]
pub enum OrderDirection {
    #[allow(dead_code)]
    Ascending,
    Descending,
}

/// A document collection store. Ids and both timestamps are assigned by the
/// store; `replace` merges partial fields and refreshes `updated_at` only.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, fields: Fields) -> Result<Document>;

    async fn replace(&self, collection: &str, id: Uuid, partial: Fields) -> Result<()>;

    async fn remove(&self, collection: &str, id: Uuid) -> Result<()>;

    async fn list_ordered(
        &self,
        collection: &str,
        field: OrderField,
        direction: OrderDirection,
    ) -> Result<Vec<Document>>;
}

/// Blob storage for uploaded assets, addressed by public URL.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads and returns the public URL of the stored object.
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;

    async fn remove(&self, url: &str) -> Result<()>;

    /// Whether the URL points at an object hosted by this store.
    fn owns_url(&self, url: &str) -> bool;
}

/// Strips everything outside the alphanumeric-plus-dot set so uploaded
/// filenames form safe storage paths.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect()
}

/// Collision-resistant object path for an uploaded asset.
pub fn asset_path(prefix: &str, file_name: &str) -> String {
    format!(
        "{}/{}_{}",
        prefix,
        Utc::now().timestamp_millis(),
        sanitize_file_name(file_name)
    )
}
