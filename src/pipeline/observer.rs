//! Stage-event observer.
//!
//! The orchestrator reports stage progress through an injected observer
//! instead of logging ad hoc, so hosts can mirror pipeline progress
//! (metrics, UI feeds) without touching pipeline code. The default
//! implementation emits tracing events.

use uuid::Uuid;

use crate::models::enums::DocumentStatus;

/// One entry per orchestrator stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Acquire,
    Classify,
    Extract,
    Validate,
    Obligations,
    Calendar,
    Escalation,
    Persist,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Acquire => "acquire",
            Stage::Classify => "classify",
            Stage::Extract => "extract",
            Stage::Validate => "validate",
            Stage::Obligations => "obligations",
            Stage::Calendar => "calendar",
            Stage::Escalation => "escalation",
            Stage::Persist => "persist",
        }
    }
}

pub trait PipelineObserver: Send + Sync {
    fn stage_completed(&self, document_id: &Uuid, stage: Stage, detail: &str);
    fn finished(&self, document_id: &Uuid, status: DocumentStatus);
}

/// Default observer: structured tracing events.
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn stage_completed(&self, document_id: &Uuid, stage: Stage, detail: &str) {
        tracing::info!(document_id = %document_id, stage = stage.as_str(), detail, "Pipeline stage completed");
    }

    fn finished(&self, document_id: &Uuid, status: DocumentStatus) {
        tracing::info!(document_id = %document_id, status = status.as_str(), "Pipeline finished");
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Records stage events for assertions.
    #[derive(Default)]
    pub struct RecordingObserver {
        pub stages: Mutex<Vec<Stage>>,
        pub final_status: Mutex<Option<DocumentStatus>>,
    }

    impl PipelineObserver for RecordingObserver {
        fn stage_completed(&self, _document_id: &Uuid, stage: Stage, _detail: &str) {
            self.stages.lock().unwrap().push(stage);
        }

        fn finished(&self, _document_id: &Uuid, status: DocumentStatus) {
            *self.final_status.lock().unwrap() = Some(status);
        }
    }
}
