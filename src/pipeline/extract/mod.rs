//! Type-dispatched extraction.
//!
//! One parser per supported document type, selected through a closed
//! match on `DocumentType`. Unsupported and `unknown` classifications
//! get no parser at all — an uncertain type should reach a human via
//! the escalation gate, not be guessed at. Parsers are infallible:
//! capability failure degrades to the per-type heuristic, and heuristic
//! misses degrade to empty output.

pub mod base;
pub mod court;
pub mod discovery;
pub mod employment;
pub mod expert;
pub mod insurance;
pub mod medical;
pub mod police;
pub mod settlement;

use std::path::PathBuf;
use std::sync::Arc;

use base::Capability;
use court::CourtParser;
use discovery::DiscoveryParser;
use employment::EmploymentParser;
use expert::ExpertParser;
use insurance::InsuranceParser;
use medical::MedicalParser;
use police::PoliceParser;
use settlement::SettlementParser;

use super::llm::LlmClient;
use crate::models::enums::DocumentType;
use crate::models::{ExtractedDate, LegalObligation};

/// Candidate dates and obligations for one document.
#[derive(Debug, Default)]
pub struct ParserOutput {
    pub dates: Vec<ExtractedDate>,
    pub obligations: Vec<LegalObligation>,
}

impl ParserOutput {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() && self.obligations.is_empty()
    }
}

/// A type-specific extraction strategy. Never fails: anything it cannot
/// extract comes back as empty sequences.
pub trait DocumentParser: Send + Sync {
    fn name(&self) -> &'static str;
    fn parse(&self, text: &str, images: &[PathBuf]) -> ParserOutput;
}

/// Closed dispatch table over document types.
pub struct ParserRegistry {
    court: CourtParser,
    insurance: InsuranceParser,
    medical: MedicalParser,
    settlement: SettlementParser,
    discovery: DiscoveryParser,
    employment: EmploymentParser,
    expert: ExpertParser,
    police: PoliceParser,
}

impl ParserRegistry {
    pub fn new(llm: Arc<dyn LlmClient>, model: &str, max_images: usize) -> Self {
        let capability = Capability::new(llm, model, max_images);
        Self {
            court: CourtParser::new(capability.clone()),
            insurance: InsuranceParser::new(capability.clone()),
            medical: MedicalParser::new(capability.clone()),
            settlement: SettlementParser::new(capability.clone()),
            discovery: DiscoveryParser::new(capability.clone()),
            employment: EmploymentParser::new(capability.clone()),
            expert: ExpertParser::new(capability.clone()),
            police: PoliceParser::new(capability),
        }
    }

    /// `None` means no parser exists for this type — the deliberate
    /// skip-extraction branch for unsupported/unknown classifications.
    pub fn parser_for(&self, doc_type: DocumentType) -> Option<&dyn DocumentParser> {
        match doc_type {
            DocumentType::CourtOrder => Some(&self.court),
            DocumentType::InsuranceCorrespondence => Some(&self.insurance),
            DocumentType::MedicalRecords => Some(&self.medical),
            DocumentType::SettlementCommunication => Some(&self.settlement),
            DocumentType::DiscoveryRequest => Some(&self.discovery),
            DocumentType::EmploymentRecords => Some(&self.employment),
            DocumentType::ExpertWitnessReport => Some(&self.expert),
            DocumentType::PoliceReport => Some(&self.police),
            DocumentType::Unknown => None,
        }
    }

    /// Run extraction for the classified type; empty output for
    /// unsupported types, independent of document text.
    pub fn extract(&self, doc_type: DocumentType, text: &str, images: &[PathBuf]) -> ParserOutput {
        match self.parser_for(doc_type) {
            Some(parser) => {
                let output = parser.parse(text, images);
                tracing::info!(
                    parser = parser.name(),
                    dates = output.dates.len(),
                    obligations = output.obligations.len(),
                    "Parser result"
                );
                output
            }
            None => {
                tracing::info!(
                    document_type = doc_type.as_str(),
                    "No parser for classification; skipping extraction to trigger escalation"
                );
                ParserOutput::default()
            }
        }
    }
}
