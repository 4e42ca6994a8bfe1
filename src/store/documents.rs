use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, Result};

use super::{Document, DocumentStore, Fields, OrderDirection, OrderField};

/// Document collections backed by a single Postgres JSONB table.
pub struct PgDocumentStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    data: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            data: row.data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &str, fields: Fields) -> Result<Document> {
        let row: DocumentRow = sqlx::query_as(
            r#"
            INSERT INTO documents (collection, data)
            VALUES ($1, $2)
            RETURNING id, data, created_at, updated_at
            "#,
        )
        .bind(collection)
        .bind(Value::Object(fields))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn replace(&self, collection: &str, id: Uuid, partial: Fields) -> Result<()> {
        // JSONB merge keeps fields the partial does not mention; created_at
        // is a table column and can never be touched from here.
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(partial))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "{} record {} not found",
                collection, id
            )));
        }

        Ok(())
    }

    async fn remove(&self, collection: &str, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
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
        let order_column = match field {
            OrderField::CreatedAt => "created_at",
        };
        let order_dir = match direction {
            OrderDirection::Ascending => "ASC",
            OrderDirection::Descending => "DESC",
        };

        let query = format!(
            "SELECT id, data, created_at, updated_at FROM documents \
             WHERE collection = $1 ORDER BY {} {}",
            order_column, order_dir
        );

        let rows: Vec<DocumentRow> = sqlx::query_as(&query)
            .bind(collection)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }
}
