//! Pipeline orchestrator.
//!
//! Runs one document through acquisition, classification, extraction,
//! validation, obligation synthesis, calendar integration and the
//! escalation gate, then persists the full result set. Collaborators
//! arrive via constructor injection; nothing in here probes the
//! environment.
//!
//! Failure discipline: capability trouble never reaches this level (the
//! owning stages degrade it), so any error that does surface is
//! structural and marks the document `failed` with the error recorded
//! on it.

use std::sync::Arc;

use rusqlite::Connection;
use uuid::Uuid;

use super::acquire::{PreviewGuard, TextSource};
use super::calendar::CalendarIntegrator;
use super::classify::Classifier;
use super::error::PipelineError;
use super::escalation;
use super::extract::ParserRegistry;
use super::llm::LlmClient;
use super::obligations;
use super::observer::{PipelineObserver, Stage};
use super::validate::validate;
use crate::db::repository::{get_document, update_document, update_status};
use crate::models::enums::DocumentStatus;
use crate::models::DocumentRecord;

pub struct DocumentProcessor {
    text_source: Box<dyn TextSource>,
    classifier: Classifier,
    parsers: ParserRegistry,
    calendar: CalendarIntegrator,
    observer: Arc<dyn PipelineObserver>,
    attach_case_to_synthesized: bool,
}

impl DocumentProcessor {
    pub fn new(
        text_source: Box<dyn TextSource>,
        llm: Arc<dyn LlmClient>,
        model: &str,
        max_images: usize,
        attach_case_to_synthesized: bool,
        observer: Arc<dyn PipelineObserver>,
    ) -> Self {
        Self {
            text_source,
            classifier: Classifier::new(llm.clone(), model, max_images),
            parsers: ParserRegistry::new(llm, model, max_images),
            calendar: CalendarIntegrator::new(),
            observer,
            attach_case_to_synthesized,
        }
    }

    /// Process one queued (or redelivered) document to a terminal status.
    /// The returned status is what was persisted. `Err` means the record
    /// could not even be loaded or the failure could not be recorded.
    pub fn process(&self, conn: &Connection, document_id: &Uuid) -> Result<DocumentStatus, PipelineError> {
        let doc = get_document(conn, document_id)?
            .ok_or(PipelineError::DocumentNotFound(*document_id))?;

        update_status(conn, document_id, DocumentStatus::Processing)?;
        tracing::info!(document_id = %document_id, filename = %doc.filename, "Processing document");

        match self.run(conn, doc) {
            Ok(status) => {
                self.observer.finished(document_id, status);
                Ok(status)
            }
            Err(e) => {
                tracing::error!(document_id = %document_id, error = %e, "Processing failed");
                self.mark_failed(conn, document_id, &e)?;
                self.observer.finished(document_id, DocumentStatus::Failed);
                Ok(DocumentStatus::Failed)
            }
        }
    }

    fn run(&self, conn: &Connection, mut doc: DocumentRecord) -> Result<DocumentStatus, PipelineError> {
        // The run's clock is the upload time, not the wall clock, so a
        // redelivered document synthesizes identical due dates and the
        // final record converges across reruns.
        let now = doc.created_at;
        let id = doc.id;

        let acquired = self.text_source.acquire(std::path::Path::new(&doc.path));
        let previews = PreviewGuard::new(acquired.preview_images);
        let text = acquired.text;
        self.observer
            .stage_completed(&id, Stage::Acquire, &format!("{} chars", text.len()));

        let classification = self.classifier.classify(&text, previews.paths());
        self.observer
            .stage_completed(&id, Stage::Classify, classification.document_type.as_str());

        let output = self
            .parsers
            .extract(classification.document_type, &text, previews.paths());
        self.observer.stage_completed(
            &id,
            Stage::Extract,
            &format!("{} dates, {} obligations", output.dates.len(), output.obligations.len()),
        );

        let (valid_dates, warnings) = validate(output.dates, now);
        self.observer
            .stage_completed(&id, Stage::Validate, &format!("{} warnings", warnings.len()));

        let associated_case = match (&doc.case_id, self.attach_case_to_synthesized) {
            (Some(case_id), true) => case_id.as_str(),
            _ => "",
        };
        let mut all_obligations = output.obligations;
        all_obligations.extend(obligations::synthesize(&text, &classification, associated_case, now));
        self.observer.stage_completed(
            &id,
            Stage::Obligations,
            &format!("{} total", all_obligations.len()),
        );

        let conflicts = self
            .calendar
            .integrate(conn, doc.case_id.as_deref(), &valid_dates)?;
        self.observer
            .stage_completed(&id, Stage::Calendar, &format!("{} conflicts", conflicts.len()));

        let (needs_review, review_msgs) =
            escalation::evaluate(&classification, &valid_dates, &all_obligations, &warnings);
        self.observer
            .stage_completed(&id, Stage::Escalation, if needs_review { "review" } else { "pass" });

        // Conflicts are advisory: recorded on the document for a human to
        // see, but they do not by themselves force review.
        let mut error_messages = review_msgs;
        error_messages.extend(conflicts);

        let status = if needs_review {
            DocumentStatus::NeedsReview
        } else {
            DocumentStatus::Completed
        };

        doc.classification = Some(classification);
        doc.extracted_dates = valid_dates;
        doc.obligations = all_obligations;
        doc.human_review_required = needs_review;
        doc.error_messages = error_messages;
        doc.status = status;
        update_document(conn, &doc)?;
        self.observer
            .stage_completed(&id, Stage::Persist, status.as_str());

        Ok(status)
    }

    /// Record a structural failure on the document without discarding
    /// whatever was already persisted for it.
    fn mark_failed(
        &self,
        conn: &Connection,
        document_id: &Uuid,
        error: &PipelineError,
    ) -> Result<(), PipelineError> {
        let mut doc = get_document(conn, document_id)?
            .ok_or(PipelineError::DocumentNotFound(*document_id))?;
        doc.status = DocumentStatus::Failed;
        doc.human_review_required = false;
        doc.error_messages = vec![error.to_string()];
        update_document(conn, &doc)?;
        Ok(())
    }
}
