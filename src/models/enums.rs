use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(DocumentType {
    CourtOrder => "court_order",
    InsuranceCorrespondence => "insurance_correspondence",
    MedicalRecords => "medical_records",
    SettlementCommunication => "settlement_communication",
    DiscoveryRequest => "discovery_request",
    EmploymentRecords => "employment_records",
    ExpertWitnessReport => "expert_witness_report",
    PoliceReport => "police_report",
    Unknown => "unknown",
});

str_enum!(DocumentStatus {
    Queued => "queued",
    Processing => "processing",
    Completed => "completed",
    NeedsReview => "needs_review",
    Failed => "failed",
});

str_enum!(ResponsibleParty {
    Attorney => "Attorney",
    Paralegal => "Paralegal",
});

str_enum!(PriorityLevel {
    High => "high",
    Medium => "medium",
    Low => "low",
});

impl DocumentType {
    /// Wire-format parse used when sanitizing capability output: anything
    /// outside the closed set collapses to `Unknown` instead of erroring.
    pub fn from_wire(s: &str) -> Self {
        s.parse().unwrap_or(DocumentType::Unknown)
    }
}

impl DocumentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DocumentStatus::Completed | DocumentStatus::NeedsReview | DocumentStatus::Failed
        )
    }

    /// Status transitions are monotonic within a run: queued → processing →
    /// exactly one terminal state. A redelivered task may restart a document
    /// (terminal or stuck-processing → processing); nothing ever returns to
    /// `queued`.
    pub fn can_transition(&self, next: DocumentStatus) -> bool {
        match (self, next) {
            (_, DocumentStatus::Queued) => false,
            (_, DocumentStatus::Processing) => true,
            (DocumentStatus::Processing, n) if n.is_terminal() => true,
            (DocumentStatus::Queued, DocumentStatus::Failed) => true,
            _ => false,
        }
    }
}
