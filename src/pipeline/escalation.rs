//! Human-review gate.
//!
//! Pure decision logic: looks at the run's classification, extraction
//! results and validator warnings, and decides whether a human must
//! review the document, attaching review prompts that tell them what to
//! check.

use crate::models::{Classification, ExtractedDate, LegalObligation};

/// Below this classification confidence, the document goes to a human.
const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Returns whether review is required and the review messages. Messages
/// are non-empty exactly when review is required.
pub fn evaluate(
    classification: &Classification,
    dates: &[ExtractedDate],
    obligations: &[LegalObligation],
    warnings: &[String],
) -> (bool, Vec<String>) {
    let mut msgs = Vec::new();
    let mut needs = false;

    if classification.confidence_score < CONFIDENCE_THRESHOLD {
        needs = true;
        msgs.push("Low classification confidence. Please confirm document type.".to_string());
    }

    if dates.is_empty() && obligations.is_empty() {
        needs = true;
        msgs.push("No dates or obligations extracted. Provide key dates and tasks, if any.".to_string());
    }

    if !warnings.is_empty() {
        needs = true;
        msgs.extend(warnings.iter().map(|w| format!("Validator warning: {w}")));
    }

    if needs {
        msgs.push("Are there explicit deadlines (e.g., 'within 30 days') or scheduled events?".to_string());
        msgs.push("Identify responsible party for each task (Attorney or Paralegal).".to_string());
    }

    (needs, msgs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{DocumentType, PriorityLevel, ResponsibleParty};
    use chrono::{TimeZone, Utc};

    fn classification(confidence: f32) -> Classification {
        Classification {
            document_type: DocumentType::CourtOrder,
            confidence_score: confidence,
            sub_type: None,
            jurisdiction: None,
            parties_involved: Vec::new(),
        }
    }

    fn one_date() -> Vec<ExtractedDate> {
        vec![ExtractedDate {
            date: Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap(),
            date_type: "hearing".into(),
            confidence_score: 0.8,
            source_text: "test".into(),
            jurisdiction: None,
        }]
    }

    fn one_obligation() -> Vec<LegalObligation> {
        vec![LegalObligation {
            description: "File Response".into(),
            due_date: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
            responsible_party: ResponsibleParty::Attorney,
            priority_level: PriorityLevel::Medium,
            associated_case: String::new(),
            source_document: "court_order".into(),
        }]
    }

    #[test]
    fn confident_run_with_findings_passes() {
        let (needs, msgs) = evaluate(&classification(0.8), &one_date(), &one_obligation(), &[]);
        assert!(!needs);
        assert!(msgs.is_empty());
    }

    #[test]
    fn low_confidence_escalates() {
        let (needs, msgs) = evaluate(&classification(0.4), &one_date(), &one_obligation(), &[]);
        assert!(needs);
        assert_eq!(msgs[0], "Low classification confidence. Please confirm document type.");
        // Guidance prompts are appended whenever review is required.
        assert_eq!(msgs.len(), 3);
    }

    #[test]
    fn threshold_is_strict() {
        let (needs, _) = evaluate(&classification(0.5), &one_date(), &one_obligation(), &[]);
        assert!(!needs);
    }

    #[test]
    fn empty_extraction_escalates() {
        let (needs, msgs) = evaluate(&classification(0.9), &[], &[], &[]);
        assert!(needs);
        assert_eq!(
            msgs[0],
            "No dates or obligations extracted. Provide key dates and tasks, if any."
        );
    }

    #[test]
    fn obligations_alone_satisfy_the_extraction_check() {
        let (needs, _) = evaluate(&classification(0.9), &[], &one_obligation(), &[]);
        assert!(!needs);
    }

    #[test]
    fn validator_warnings_escalate_and_are_echoed() {
        let warnings = vec!["Suspicious date detected: 1812-06-01 00:00:00 UTC".to_string()];
        let (needs, msgs) = evaluate(&classification(0.9), &one_date(), &one_obligation(), &warnings);
        assert!(needs);
        assert_eq!(
            msgs[0],
            "Validator warning: Suspicious date detected: 1812-06-01 00:00:00 UTC"
        );
    }

    #[test]
    fn sentinel_classification_triggers_both_checks() {
        let (needs, msgs) = evaluate(&Classification::unknown(), &[], &[], &[]);
        assert!(needs);
        assert_eq!(msgs.len(), 4);
        assert!(msgs[0].contains("Low classification confidence"));
        assert!(msgs[1].contains("No dates or obligations extracted"));
    }
}
