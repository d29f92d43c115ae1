// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{DocumentKind, DocumentStore};
use crate::error::AppError;

/// In-process document store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<(DocumentKind, String), Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read(&self, kind: DocumentKind, id: &str) -> Result<Option<Value>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents.get(&(kind, id.to_string())).cloned())
    }

    async fn upsert(&self, kind: DocumentKind, id: &str, document: Value) -> Result<(), AppError> {
        self.documents
            .write()
            .await
            .insert((kind, id.to_string()), document);
        Ok(())
    }

    async fn query(&self, kind: DocumentKind) -> Result<Vec<Value>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, doc)| doc.clone())
            .collect())
    }
}
