// src/store/mod.rs

//! JSON document storage.
//!
//! All record kinds share one physical collection. Each document is
//! addressed by its discriminator (`type`, the partition key) and its id.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Discriminator stored in every document's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    UserSubmission,
    Answers,
    QuizAnswers,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::UserSubmission => "user_submission",
            DocumentKind::Answers => "answers",
            DocumentKind::QuizAnswers => "quiz_answers",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point read. `Ok(None)` when no document has this id in the partition.
    async fn read(&self, kind: DocumentKind, id: &str) -> Result<Option<Value>, AppError>;

    /// Insert or fully replace the document.
    async fn upsert(&self, kind: DocumentKind, id: &str, document: Value) -> Result<(), AppError>;

    /// Every document in the partition, in no particular order.
    async fn query(&self, kind: DocumentKind) -> Result<Vec<Value>, AppError>;
}
