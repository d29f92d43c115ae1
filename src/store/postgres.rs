// src/store/postgres.rs

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, postgres::PgPoolOptions, types::Json};

use super::{DocumentKind, DocumentStore};
use crate::error::AppError;

const CONNECT_RETRIES: u32 = 5;

/// Documents kept as JSONB rows in a single `documents` table,
/// keyed by `(type, id)`.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with retry, then applies the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let mut retry_count = 0;
        let pool = loop {
            match PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(3))
                .connect(database_url)
                .await
            {
                Ok(pool) => break pool,
                Err(e) => {
                    retry_count += 1;
                    if retry_count > CONNECT_RETRIES {
                        return Err(e);
                    }
                    tracing::warn!(
                        "Database not ready, retrying in 2s... (Attempt {})",
                        retry_count
                    );
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        };

        tracing::info!("Database connected, running migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied successfully.");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn read(&self, kind: DocumentKind, id: &str) -> Result<Option<Value>, AppError> {
        let body = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT body FROM documents WHERE type = $1 AND id = $2",
        )
        .bind(kind.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read {} document '{}': {:?}", kind, id, e);
            AppError::from(e)
        })?;

        Ok(body.map(|Json(value)| value))
    }

    async fn upsert(&self, kind: DocumentKind, id: &str, document: Value) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO documents (type, id, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (type, id) DO UPDATE SET
                body = EXCLUDED.body,
                updated_at = NOW()
            "#,
        )
        .bind(kind.as_str())
        .bind(id)
        .bind(Json(document))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert {} document '{}': {:?}", kind, id, e);
            AppError::from(e)
        })?;

        Ok(())
    }

    async fn query(&self, kind: DocumentKind) -> Result<Vec<Value>, AppError> {
        let rows = sqlx::query_scalar::<_, Json<Value>>("SELECT body FROM documents WHERE type = $1")
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query {} documents: {:?}", kind, e);
                AppError::from(e)
            })?;

        Ok(rows.into_iter().map(|Json(value)| value).collect())
    }
}
