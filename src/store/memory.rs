//! In-memory store doubles for repository and controller tests. The clock
//! ticks one second per server-side stamp so `updated_at` advances
//! deterministically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, Result};

use super::{BlobStore, Document, DocumentStore, Fields, OrderDirection, OrderField};

pub struct MemoryDocumentStore {
    entries: Mutex<Vec<(String, Document)>>,
    clock: Mutex<DateTime<Utc>>,
    pub fail: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            clock: Mutex::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn tick(&self) -> DateTime<Utc> {
        let mut clock = self.clock.lock().unwrap();
        *clock += Duration::seconds(1);
        *clock
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Storage("injected document store failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, fields: Fields) -> Result<Document> {
        self.check()?;
        let now = self.tick();
        let doc = Document {
            id: Uuid::new_v4(),
            data: Value::Object(fields),
            created_at: now,
            updated_at: now,
        };
        self.entries
            .lock()
            .unwrap()
            .push((collection.to_string(), doc.clone()));
        Ok(doc)
    }

    async fn replace(&self, collection: &str, id: Uuid, partial: Fields) -> Result<()> {
        self.check()?;
        let now = self.tick();
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|(c, d)| c == collection && d.id == id)
            .ok_or_else(|| AppError::NotFound(format!("{} record {} not found", collection, id)))?;

        if let Value::Object(data) = &mut entry.1.data {
            for (key, value) in partial {
                data.insert(key, value);
            }
        }
        entry.1.updated_at = now;
        Ok(())
    }

    async fn remove(&self, collection: &str, id: Uuid) -> Result<()> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|(c, d)| !(c == collection && d.id == id));
        if entries.len() == before {
            return Err(AppError::NotFound(format!(
                "{} record {} not found",
                collection, id
            )));
        }
        Ok(())
    }

    async fn list_ordered(
        &self,
        collection: &str,
        field: OrderField,
        direction: OrderDirection,
    ) -> Result<Vec<Document>> {
        self.check()?;
        let entries = self.entries.lock().unwrap();
        let mut docs: Vec<Document> = entries
            .iter()
            .filter(|(c, _)| c == collection)
            .map(|(_, d)| d.clone())
            .collect();
        match field {
            OrderField::CreatedAt => docs.sort_by_key(|d| d.created_at),
        }
        if matches!(direction, OrderDirection::Descending) {
            docs.reverse();
        }
        Ok(docs)
    }
}

pub struct MemoryBlobStore {
    public_base_url: String,
    url_marker: String,
    pub puts: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<String>>,
    pub fail_puts: AtomicBool,
    pub fail_removes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            public_base_url: "https://kidzone-media.s3.test".to_string(),
            url_marker: "kidzone-media.s3".to_string(),
            puts: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
            fail_puts: AtomicBool::new(false),
            fail_removes: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<String> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(AppError::Storage("injected blob upload failure".to_string()));
        }
        self.puts.lock().unwrap().push(path.to_string());
        Ok(format!("{}/{}", self.public_base_url, path))
    }

    async fn remove(&self, url: &str) -> Result<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(AppError::Storage("injected blob delete failure".to_string()));
        }
        self.removed.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn owns_url(&self, url: &str) -> bool {
        url.contains(&self.url_marker)
    }
}
