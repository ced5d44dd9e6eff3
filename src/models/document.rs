use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DocumentStatus;
use super::extraction::{Classification, ExtractedDate, LegalObligation};

/// One record per uploaded file. The pipeline overwrites the full result
/// set (classification, dates, obligations, messages) on every completed
/// run, so redelivered tasks converge to the same final record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    /// Owning case, if any. Without a case context the calendar stage is
    /// a no-op.
    pub case_id: Option<String>,
    pub filename: String,
    pub path: String,
    pub status: DocumentStatus,
    pub classification: Option<Classification>,
    pub extracted_dates: Vec<ExtractedDate>,
    pub obligations: Vec<LegalObligation>,
    pub human_review_required: bool,
    pub error_messages: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// A freshly uploaded document awaiting its first pipeline run.
    pub fn queued(id: Uuid, case_id: Option<String>, filename: &str, path: &str) -> Self {
        let now = Utc::now();
        Self {
            id,
            case_id,
            filename: filename.to_string(),
            path: path.to_string(),
            status: DocumentStatus::Queued,
            classification: None,
            extracted_dates: Vec::new(),
            obligations: Vec::new(),
            human_review_required: false,
            error_messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
