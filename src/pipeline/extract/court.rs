//! Court order / scheduling order parser.
//!
//! Capability-only: court deadlines are too consequential for a keyword
//! guess, so an unusable capability answer yields empty output and lets
//! the escalation gate route the document to a human.

use std::path::PathBuf;

use super::base::{Capability, COURT_CAPABILITY_CONFIDENCE};
use super::{DocumentParser, ParserOutput};
use crate::models::enums::{DocumentType, PriorityLevel};

const SYSTEM_PROMPT: &str = "You are a legal parsing agent specialized in COURT ORDERS and SCHEDULING ORDERS. \
Using the extracted text and any provided page images, extract key dates and obligations. \
Return ONLY JSON with fields: \
dates: array of {date_iso (ISO8601), date_type (hearing|conference|trial|deadline), source_text}; \
obligations: array of {description, due_date_iso (ISO8601), responsible_party, priority_level}. \
Only include an obligation if a due_date is explicitly present; otherwise omit it. \
Do not hallucinate. If not sure, leave arrays empty.";

const TASK: &str = "Extract hearing/trial/conference dates and filing deadlines. \
Also extract obligations (e.g., file motion, serve response) with due dates.";

pub struct CourtParser {
    capability: Capability,
}

impl CourtParser {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }
}

impl DocumentParser for CourtParser {
    fn name(&self) -> &'static str {
        "court"
    }

    fn parse(&self, text: &str, images: &[PathBuf]) -> ParserOutput {
        self.capability
            .extract(
                self.name(),
                SYSTEM_PROMPT,
                TASK,
                text,
                images,
                COURT_CAPABILITY_CONFIDENCE,
                PriorityLevel::High,
                DocumentType::CourtOrder.as_str(),
            )
            .unwrap_or_default()
    }
}
