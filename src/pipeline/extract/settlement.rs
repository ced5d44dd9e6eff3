//! Settlement communication parser.

use std::path::PathBuf;

use super::base::{
    heuristic_dates, synthesized_obligation, system_prompt, Capability, CAPABILITY_CONFIDENCE,
};
use super::{DocumentParser, ParserOutput};
use crate::models::enums::{DocumentType, PriorityLevel, ResponsibleParty};

const TASK: &str = "Extract mediation dates and offer/demand deadlines from settlement communications. \
Also extract obligations (e.g., evaluate offer, attend mediation) with due dates.";

pub struct SettlementParser {
    capability: Capability,
}

impl SettlementParser {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }

    fn heuristic(&self, text: &str) -> ParserOutput {
        let lower = text.to_lowercase();
        let date_type = if lower.contains("mediation") {
            "mediation"
        } else {
            "deadline"
        };
        let dates = heuristic_dates(text, date_type, "settlement parser heuristic");
        let mut obligations = Vec::new();
        if lower.contains("offer") || lower.contains("demand") {
            obligations.extend(synthesized_obligation(
                &dates,
                "Evaluate settlement offer",
                ResponsibleParty::Attorney,
                PriorityLevel::High,
                DocumentType::SettlementCommunication.as_str(),
            ));
        }
        ParserOutput { dates, obligations }
    }
}

impl DocumentParser for SettlementParser {
    fn name(&self) -> &'static str {
        "settlement"
    }

    fn parse(&self, text: &str, images: &[PathBuf]) -> ParserOutput {
        self.capability
            .extract(
                self.name(),
                &system_prompt("SETTLEMENT COMMUNICATIONS"),
                TASK,
                text,
                images,
                CAPABILITY_CONFIDENCE,
                PriorityLevel::Medium,
                DocumentType::SettlementCommunication.as_str(),
            )
            .unwrap_or_else(|| self.heuristic(text))
    }
}
