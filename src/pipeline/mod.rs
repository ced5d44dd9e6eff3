//! Document processing pipeline.
//!
//! Stages run in a fixed order per document: acquire text, classify,
//! dispatch to a type-specific parser, validate dates, synthesize
//! obligations, integrate the calendar, run the escalation gate, then
//! persist the full result set. External-capability failure degrades
//! inside the owning stage; only structural failures abort a document.

pub mod acquire;
pub mod calendar;
pub mod classify;
pub mod error;
pub mod escalation;
pub mod extract;
pub mod llm;
pub mod obligations;
pub mod observer;
pub mod processor;
pub mod validate;

pub use error::PipelineError;
pub use processor::DocumentProcessor;
