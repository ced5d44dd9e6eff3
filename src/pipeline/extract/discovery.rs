//! Discovery request parser.

use std::path::PathBuf;

use super::base::{
    heuristic_dates, synthesized_obligation, system_prompt, Capability, CAPABILITY_CONFIDENCE,
};
use super::{DocumentParser, ParserOutput};
use crate::models::enums::{DocumentType, PriorityLevel, ResponsibleParty};

const TASK: &str = "Extract deposition dates and production deadlines from discovery requests. \
Also extract obligations (e.g., respond to interrogatories, produce documents) with due dates.";

pub struct DiscoveryParser {
    capability: Capability,
}

impl DiscoveryParser {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }

    fn heuristic(&self, text: &str) -> ParserOutput {
        let lower = text.to_lowercase();
        let date_type = if lower.contains("deposition") {
            "deposition"
        } else {
            "production_deadline"
        };
        let dates = heuristic_dates(text, date_type, "discovery parser heuristic");
        let mut obligations = Vec::new();
        let triggered = ["interrogatories", "requests for production", "admissions"]
            .iter()
            .any(|k| lower.contains(k));
        if triggered {
            obligations.extend(synthesized_obligation(
                &dates,
                "Respond to discovery",
                ResponsibleParty::Attorney,
                PriorityLevel::High,
                DocumentType::DiscoveryRequest.as_str(),
            ));
        }
        ParserOutput { dates, obligations }
    }
}

impl DocumentParser for DiscoveryParser {
    fn name(&self) -> &'static str {
        "discovery"
    }

    fn parse(&self, text: &str, images: &[PathBuf]) -> ParserOutput {
        self.capability
            .extract(
                self.name(),
                &system_prompt("DISCOVERY REQUESTS"),
                TASK,
                text,
                images,
                CAPABILITY_CONFIDENCE,
                PriorityLevel::Medium,
                DocumentType::DiscoveryRequest.as_str(),
            )
            .unwrap_or_else(|| self.heuristic(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::llm::NullLlmClient;
    use std::sync::Arc;

    fn parser() -> DiscoveryParser {
        DiscoveryParser::new(Capability::new(Arc::new(NullLlmClient), "test-model", 2))
    }

    #[test]
    fn deposition_language_tags_depositions() {
        let out = parser().parse("Deposition of plaintiff noticed for 05/20/2026.", &[]);
        assert_eq!(out.dates[0].date_type, "deposition");
    }

    #[test]
    fn default_tag_is_production_deadline() {
        let out = parser().parse("Produce all records by 05/20/2026.", &[]);
        assert_eq!(out.dates[0].date_type, "production_deadline");
    }

    #[test]
    fn interrogatories_synthesize_response_obligation() {
        let out = parser().parse("Interrogatories served; responses due 05/20/2026.", &[]);
        assert_eq!(out.obligations.len(), 1);
        assert_eq!(out.obligations[0].description, "Respond to discovery");
        assert_eq!(out.obligations[0].priority_level, PriorityLevel::High);
    }
}
