//! Phrase-triggered obligation synthesis.
//!
//! A small fixed table of trigger phrases, each with a due-date offset
//! and a default owner. Runs over the full document text independently
//! of the type-specific parsers, so boilerplate like "respond within 30
//! days" is caught even when a parser misses it.

use chrono::{DateTime, Duration, Utc};

use crate::models::enums::{PriorityLevel, ResponsibleParty};
use crate::models::{Classification, LegalObligation};

/// Anything due within this many days is high priority.
const HIGH_PRIORITY_WINDOW_DAYS: i64 = 10;

const TRIGGERS: &[(&str, i64, ResponsibleParty)] = &[
    ("file response", 30, ResponsibleParty::Attorney),
    ("respond within", 30, ResponsibleParty::Attorney),
    ("produce documents", 14, ResponsibleParty::Paralegal),
    ("attend mediation", 0, ResponsibleParty::Attorney),
];

/// Scan text for trigger phrases and synthesize one obligation per hit.
/// `associated_case` is what the caller wants recorded on the obligation
/// (usually empty, or the case id when case attachment is enabled).
pub fn synthesize(
    text: &str,
    classification: &Classification,
    associated_case: &str,
    now: DateTime<Utc>,
) -> Vec<LegalObligation> {
    let lower = text.to_lowercase();
    TRIGGERS
        .iter()
        .filter(|(phrase, _, _)| lower.contains(phrase))
        .map(|(phrase, days, owner)| LegalObligation {
            description: title_case(phrase),
            due_date: now + Duration::days(*days),
            responsible_party: *owner,
            priority_level: if *days <= HIGH_PRIORITY_WINDOW_DAYS {
                PriorityLevel::High
            } else {
                PriorityLevel::Medium
            },
            associated_case: associated_case.to_string(),
            source_document: classification.document_type.as_str().to_string(),
        })
        .collect()
}

fn title_case(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
