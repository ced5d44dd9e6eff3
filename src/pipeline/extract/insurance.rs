//! Insurance correspondence parser.

use std::path::PathBuf;

use super::base::{
    heuristic_dates, synthesized_obligation, system_prompt, Capability, CAPABILITY_CONFIDENCE,
};
use super::{DocumentParser, ParserOutput};
use crate::models::enums::{DocumentType, PriorityLevel, ResponsibleParty};

const TASK: &str = "Extract response deadlines and coverage dates from insurer correspondence. \
Also extract obligations (e.g., respond to carrier, confirm coverage) with due dates.";

pub struct InsuranceParser {
    capability: Capability,
}

impl InsuranceParser {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }

    fn heuristic(&self, text: &str) -> ParserOutput {
        let lower = text.to_lowercase();
        let date_type = if lower.contains("respond") || lower.contains("response") {
            "deadline"
        } else {
            "coverage_date"
        };
        let dates = heuristic_dates(text, date_type, "insurance parser heuristic");
        let mut obligations = Vec::new();
        if lower.contains("policy") && lower.contains("limit") {
            obligations.extend(synthesized_obligation(
                &dates,
                "Confirm policy limits",
                ResponsibleParty::Paralegal,
                PriorityLevel::Medium,
                DocumentType::InsuranceCorrespondence.as_str(),
            ));
        }
        ParserOutput { dates, obligations }
    }
}

impl DocumentParser for InsuranceParser {
    fn name(&self) -> &'static str {
        "insurance"
    }

    fn parse(&self, text: &str, images: &[PathBuf]) -> ParserOutput {
        self.capability
            .extract(
                self.name(),
                &system_prompt("INSURANCE CORRESPONDENCE"),
                TASK,
                text,
                images,
                CAPABILITY_CONFIDENCE,
                PriorityLevel::Medium,
                DocumentType::InsuranceCorrespondence.as_str(),
            )
            .unwrap_or_else(|| self.heuristic(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::llm::NullLlmClient;
    use std::sync::Arc;

    fn parser() -> InsuranceParser {
        InsuranceParser::new(Capability::new(Arc::new(NullLlmClient), "test-model", 2))
    }

    #[test]
    fn response_language_tags_deadlines() {
        let out = parser().parse("Please respond by 01/10/2026 regarding the claim.", &[]);
        assert_eq!(out.dates.len(), 1);
        assert_eq!(out.dates[0].date_type, "deadline");
        assert_eq!(out.dates[0].confidence_score, 0.6);
        assert!(out.obligations.is_empty());
    }

    #[test]
    fn coverage_language_without_response_keywords() {
        let out = parser().parse("Coverage effective 01/01/2026.", &[]);
        assert_eq!(out.dates[0].date_type, "coverage_date");
    }

    #[test]
    fn policy_limit_keywords_synthesize_one_obligation() {
        let out = parser().parse(
            "Policy limit inquiry. Please respond by 01/10/2026 and by 02/01/2026.",
            &[],
        );
        assert_eq!(out.dates.len(), 2);
        assert_eq!(out.obligations.len(), 1);
        let ob = &out.obligations[0];
        assert_eq!(ob.description, "Confirm policy limits");
        assert_eq!(ob.responsible_party, ResponsibleParty::Paralegal);
        assert_eq!(ob.due_date, out.dates[0].date);
    }

    #[test]
    fn trigger_keywords_without_dates_yield_nothing() {
        let out = parser().parse("Policy limits to be confirmed at a later time.", &[]);
        assert!(out.is_empty());
    }
}
