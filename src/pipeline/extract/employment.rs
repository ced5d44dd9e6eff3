//! Employment records parser.

use std::path::PathBuf;

use super::base::{
    heuristic_dates, synthesized_obligation, system_prompt, Capability, CAPABILITY_CONFIDENCE,
};
use super::{DocumentParser, ParserOutput};
use crate::models::enums::{DocumentType, PriorityLevel, ResponsibleParty};

const TASK: &str = "Extract work dates and return-to-work deadlines from employment records. \
Also extract obligations (e.g., confirm return-to-work date) with due dates.";

pub struct EmploymentParser {
    capability: Capability,
}

impl EmploymentParser {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }

    fn heuristic(&self, text: &str) -> ParserOutput {
        let lower = text.to_lowercase();
        let worked = ["worked", "shift", "timecard"].iter().any(|k| lower.contains(k));
        let date_type = if worked { "work_date" } else { "deadline" };
        let dates = heuristic_dates(text, date_type, "employment parser heuristic");
        let mut obligations = Vec::new();
        if lower.contains("return to work") || lower.contains("rtw") {
            obligations.extend(synthesized_obligation(
                &dates,
                "Confirm return-to-work date",
                ResponsibleParty::Paralegal,
                PriorityLevel::Medium,
                DocumentType::EmploymentRecords.as_str(),
            ));
        }
        ParserOutput { dates, obligations }
    }
}

impl DocumentParser for EmploymentParser {
    fn name(&self) -> &'static str {
        "employment"
    }

    fn parse(&self, text: &str, images: &[PathBuf]) -> ParserOutput {
        self.capability
            .extract(
                self.name(),
                &system_prompt("EMPLOYMENT RECORDS"),
                TASK,
                text,
                images,
                CAPABILITY_CONFIDENCE,
                PriorityLevel::Medium,
                DocumentType::EmploymentRecords.as_str(),
            )
            .unwrap_or_else(|| self.heuristic(text))
    }
}
