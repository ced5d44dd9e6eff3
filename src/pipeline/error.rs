//! Pipeline-fatal error taxonomy.
//!
//! Capability failures never appear here — the owning stage resolves
//! them into the unknown sentinel or empty output. Only structural
//! failures (missing record, storage failure) are fatal to a document,
//! and exactly one of them marks the record `failed`.

use thiserror::Error;
use uuid::Uuid;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
