//! Medical records parser.

use std::path::PathBuf;

use super::base::{
    heuristic_dates, synthesized_obligation, system_prompt, Capability, CAPABILITY_CONFIDENCE,
};
use super::{DocumentParser, ParserOutput};
use crate::models::enums::{DocumentType, PriorityLevel, ResponsibleParty};

const TASK: &str = "Extract treatment and appointment dates from medical records. \
Also extract obligations (e.g., schedule follow-up, review MMI status) with due dates.";

pub struct MedicalParser {
    capability: Capability,
}

impl MedicalParser {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }

    fn heuristic(&self, text: &str) -> ParserOutput {
        let lower = text.to_lowercase();
        let date_type = if lower.contains("appointment") || lower.contains("visit") {
            "appointment"
        } else {
            "treatment"
        };
        let dates = heuristic_dates(text, date_type, "medical parser heuristic");
        let mut obligations = Vec::new();
        if lower.contains("mmi") || lower.contains("maximum medical improvement") {
            obligations.extend(synthesized_obligation(
                &dates,
                "Review MMI status",
                ResponsibleParty::Attorney,
                PriorityLevel::Medium,
                DocumentType::MedicalRecords.as_str(),
            ));
        }
        ParserOutput { dates, obligations }
    }
}

impl DocumentParser for MedicalParser {
    fn name(&self) -> &'static str {
        "medical"
    }

    fn parse(&self, text: &str, images: &[PathBuf]) -> ParserOutput {
        self.capability
            .extract(
                self.name(),
                &system_prompt("MEDICAL RECORDS"),
                TASK,
                text,
                images,
                CAPABILITY_CONFIDENCE,
                PriorityLevel::Medium,
                DocumentType::MedicalRecords.as_str(),
            )
            .unwrap_or_else(|| self.heuristic(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::llm::NullLlmClient;
    use std::sync::Arc;

    fn parser() -> MedicalParser {
        MedicalParser::new(Capability::new(Arc::new(NullLlmClient), "test-model", 2))
    }

    #[test]
    fn visit_language_tags_appointments() {
        let out = parser().parse("Follow-up visit scheduled for 03/15/2026.", &[]);
        assert_eq!(out.dates[0].date_type, "appointment");
    }

    #[test]
    fn default_tag_is_treatment() {
        let out = parser().parse("Physical therapy administered 03/15/2026.", &[]);
        assert_eq!(out.dates[0].date_type, "treatment");
    }

    #[test]
    fn mmi_keywords_synthesize_review_obligation() {
        let out = parser().parse(
            "Patient reached maximum medical improvement. Seen 03/15/2026.",
            &[],
        );
        assert_eq!(out.obligations.len(), 1);
        assert_eq!(out.obligations[0].description, "Review MMI status");
        assert_eq!(out.obligations[0].responsible_party, ResponsibleParty::Attorney);
    }
}
