use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{DocumentType, PriorityLevel, ResponsibleParty};

/// Cap on parties carried through from capability output.
pub const MAX_PARTIES: usize = 10;

/// Structured result of document classification.
///
/// `unknown`/0.0 is the explicit "insufficient information" value — a
/// first-class sentinel substituted whenever the classification capability
/// is unavailable or its output is untrustworthy. It is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub document_type: DocumentType,
    pub confidence_score: f32,
    pub sub_type: Option<String>,
    pub jurisdiction: Option<String>,
    pub parties_involved: Vec<String>,
}

impl Classification {
    /// The sentinel returned when the capability cannot be trusted.
    /// Downstream stages skip extraction and the gate escalates.
    pub fn unknown() -> Self {
        Self {
            document_type: DocumentType::Unknown,
            confidence_score: 0.0,
            sub_type: None,
            jurisdiction: None,
            parties_involved: Vec::new(),
        }
    }
}

/// A candidate date found in a document. Created only by extractors or
/// the validator; never mutated after creation (the validator filters,
/// it does not edit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDate {
    pub date: DateTime<Utc>,
    /// Free-form tag: "hearing", "deadline", "deposition", ...
    pub date_type: String,
    pub confidence_score: f32,
    /// Provenance: the text or path that produced this date.
    pub source_text: String,
    pub jurisdiction: Option<String>,
}

/// A task the firm owes on a case, created during one pipeline run and
/// persisted as part of the document record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalObligation {
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub responsible_party: ResponsibleParty,
    pub priority_level: PriorityLevel,
    pub associated_case: String,
    pub source_document: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sentinel_shape() {
        let c = Classification::unknown();
        assert_eq!(c.document_type, DocumentType::Unknown);
        assert_eq!(c.confidence_score, 0.0);
        assert!(c.sub_type.is_none());
        assert!(c.parties_involved.is_empty());
    }

    #[test]
    fn classification_serializes_with_wire_type() {
        let c = Classification {
            document_type: DocumentType::CourtOrder,
            confidence_score: 0.8,
            sub_type: Some("scheduling_order".into()),
            jurisdiction: None,
            parties_involved: vec!["Smith".into(), "Acme Corp".into()],
        };
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"court_order\""));
        let back: Classification = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
