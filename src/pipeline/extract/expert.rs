//! Expert witness report parser.

use std::path::PathBuf;

use super::base::{
    heuristic_dates, synthesized_obligation, system_prompt, Capability, CAPABILITY_CONFIDENCE,
};
use super::{DocumentParser, ParserOutput};
use crate::models::enums::{DocumentType, PriorityLevel, ResponsibleParty};

const TASK: &str = "Extract report and disclosure deadlines from expert witness reports. \
Also extract obligations (e.g., serve expert disclosures) with due dates.";

pub struct ExpertParser {
    capability: Capability,
}

impl ExpertParser {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }

    fn heuristic(&self, text: &str) -> ParserOutput {
        let lower = text.to_lowercase();
        let report = ["report", "disclosure"].iter().any(|k| lower.contains(k));
        let date_type = if report { "report_deadline" } else { "deadline" };
        let dates = heuristic_dates(text, date_type, "expert parser heuristic");
        let mut obligations = Vec::new();
        if lower.contains("expert") || lower.contains("witness") {
            obligations.extend(synthesized_obligation(
                &dates,
                "Serve expert disclosures",
                ResponsibleParty::Attorney,
                PriorityLevel::High,
                DocumentType::ExpertWitnessReport.as_str(),
            ));
        }
        ParserOutput { dates, obligations }
    }
}

impl DocumentParser for ExpertParser {
    fn name(&self) -> &'static str {
        "expert"
    }

    fn parse(&self, text: &str, images: &[PathBuf]) -> ParserOutput {
        self.capability
            .extract(
                self.name(),
                &system_prompt("EXPERT WITNESS REPORTS"),
                TASK,
                text,
                images,
                CAPABILITY_CONFIDENCE,
                PriorityLevel::Medium,
                DocumentType::ExpertWitnessReport.as_str(),
            )
            .unwrap_or_else(|| self.heuristic(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::llm::NullLlmClient;
    use std::sync::Arc;

    fn parser() -> ExpertParser {
        ExpertParser::new(Capability::new(Arc::new(NullLlmClient), "test-model", 2))
    }

    #[test]
    fn disclosure_language_tags_report_deadlines() {
        let out = parser().parse("Expert disclosure due 06/01/2026.", &[]);
        assert_eq!(out.dates[0].date_type, "report_deadline");
    }

    #[test]
    fn expert_keywords_synthesize_disclosure_obligation() {
        let out = parser().parse("Expert witness report received; rebuttal due 06/01/2026.", &[]);
        assert_eq!(out.obligations.len(), 1);
        assert_eq!(out.obligations[0].description, "Serve expert disclosures");
        assert_eq!(out.obligations[0].source_document, "expert_witness_report");
    }
}
