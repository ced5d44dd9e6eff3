//! Document classification stage.
//!
//! The resilience contract lives here: any capability failure —
//! unconfigured client, transport error, unparsable output — degrades
//! into the `unknown`/0.0 sentinel instead of aborting the document.
//! Downstream, the dispatch skips extraction for `unknown` and the
//! escalation gate routes the document to a human.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use super::acquire::encode_preview_images;
use super::llm::{extract_json_object, LlmClient};
use crate::models::enums::DocumentType;
use crate::models::extraction::MAX_PARTIES;
use crate::models::Classification;

/// Prompt text budget, matching the capability's context window.
const MAX_PROMPT_CHARS: usize = 12_000;

const CLASSIFY_SYSTEM_PROMPT: &str = "You are a legal document classification agent for a personal injury law firm. \
Classify the document into one of the allowed types and extract metadata. \
Allowed types strictly limited to: court_order, insurance_correspondence, medical_records, \
settlement_communication, discovery_request, employment_records, expert_witness_report, \
police_report, unknown. \
Respond ONLY with a compact JSON object with keys: document_type (one of allowed), \
confidence_score (0..1), sub_type (string or null), jurisdiction (string or null), \
parties_involved (array of strings).";

pub struct Classifier {
    llm: Arc<dyn LlmClient>,
    model: String,
    max_images: usize,
}

/// Wire shape of the capability's answer, before sanitization.
#[derive(Deserialize)]
struct RawClassification {
    document_type: Option<String>,
    confidence_score: Option<serde_json::Value>,
    sub_type: Option<String>,
    jurisdiction: Option<String>,
    parties_involved: Option<Vec<serde_json::Value>>,
}

impl Classifier {
    pub fn new(llm: Arc<dyn LlmClient>, model: &str, max_images: usize) -> Self {
        Self {
            llm,
            model: model.to_string(),
            max_images,
        }
    }

    /// Total: always produces a Classification. Capability trouble of any
    /// kind yields the sentinel.
    pub fn classify(&self, text: &str, preview_images: &[PathBuf]) -> Classification {
        let truncated: String = text.chars().take(MAX_PROMPT_CHARS).collect();
        let images = encode_preview_images(preview_images, self.max_images);
        let prompt = format!(
            "Task: Determine the document type and extract metadata.\n\n\
             Use both the extracted text and any provided page images.\n\n\
             Extracted text (may be partial):\n{truncated}"
        );

        let response = match self
            .llm
            .generate(&self.model, &prompt, CLASSIFY_SYSTEM_PROMPT, &images)
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Classification capability failed; substituting unknown sentinel");
                return Classification::unknown();
            }
        };

        match parse_classification(&response) {
            Some(c) => {
                tracing::info!(
                    document_type = c.document_type.as_str(),
                    confidence = c.confidence_score,
                    "Classification result"
                );
                c
            }
            None => {
                tracing::warn!("Classification output unparsable; substituting unknown sentinel");
                Classification::unknown()
            }
        }
    }
}

/// Sanitize capability output into the closed model: unsupported types
/// collapse to unknown, confidence is clamped to [0,1], parties are
/// stringified and capped.
fn parse_classification(response: &str) -> Option<Classification> {
    let json = extract_json_object(response)?;
    let raw: RawClassification = serde_json::from_str(&json).ok()?;

    let document_type = DocumentType::from_wire(raw.document_type.as_deref().unwrap_or("unknown"));
    let confidence_score = raw
        .confidence_score
        .as_ref()
        .and_then(json_number)
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);

    let parties_involved = raw
        .parties_involved
        .unwrap_or_default()
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .take(MAX_PARTIES)
        .collect();

    Some(Classification {
        document_type,
        confidence_score,
        sub_type: raw.sub_type,
        jurisdiction: raw.jurisdiction,
        parties_involved,
    })
}

fn json_number(v: &serde_json::Value) -> Option<f32> {
    match v {
        serde_json::Value::Number(n) => n.as_f64().map(|f| f as f32),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
