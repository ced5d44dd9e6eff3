//! Police report parser.

use std::path::PathBuf;

use super::base::{
    heuristic_dates, synthesized_obligation, system_prompt, Capability, CAPABILITY_CONFIDENCE,
};
use super::{DocumentParser, ParserOutput};
use crate::models::enums::{DocumentType, PriorityLevel, ResponsibleParty};

const TASK: &str = "Extract incident dates from police and accident reports. \
Also extract obligations (e.g., obtain certified copy, confirm incident details) with due dates.";

pub struct PoliceParser {
    capability: Capability,
}

impl PoliceParser {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }

    fn heuristic(&self, text: &str) -> ParserOutput {
        let lower = text.to_lowercase();
        let incident = ["incident", "collision", "accident"].iter().any(|k| lower.contains(k));
        let date_type = if incident { "incident_date" } else { "date" };
        let dates = heuristic_dates(text, date_type, "police parser heuristic");
        let mut obligations = Vec::new();
        let triggered = ["police report", "officer", "case number", "citation"]
            .iter()
            .any(|k| lower.contains(k));
        if triggered {
            obligations.extend(synthesized_obligation(
                &dates,
                "Review police report and confirm incident details",
                ResponsibleParty::Paralegal,
                PriorityLevel::Medium,
                DocumentType::PoliceReport.as_str(),
            ));
        }
        ParserOutput { dates, obligations }
    }
}

impl DocumentParser for PoliceParser {
    fn name(&self) -> &'static str {
        "police"
    }

    fn parse(&self, text: &str, images: &[PathBuf]) -> ParserOutput {
        self.capability
            .extract(
                self.name(),
                &system_prompt("POLICE AND ACCIDENT REPORTS"),
                TASK,
                text,
                images,
                CAPABILITY_CONFIDENCE,
                PriorityLevel::Medium,
                DocumentType::PoliceReport.as_str(),
            )
            .unwrap_or_else(|| self.heuristic(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::llm::NullLlmClient;
    use std::sync::Arc;

    fn parser() -> PoliceParser {
        PoliceParser::new(Capability::new(Arc::new(NullLlmClient), "test-model", 2))
    }

    #[test]
    fn collision_language_tags_incident_dates() {
        let out = parser().parse("Collision occurred on 11/03/2025 at the intersection.", &[]);
        assert_eq!(out.dates[0].date_type, "incident_date");
    }

    #[test]
    fn officer_keywords_synthesize_review_obligation() {
        let out = parser().parse("Officer Reyes filed the report on 11/03/2025.", &[]);
        assert_eq!(out.obligations.len(), 1);
        assert_eq!(
            out.obligations[0].description,
            "Review police report and confirm incident details"
        );
        assert_eq!(out.obligations[0].source_document, "police_report");
    }
}
