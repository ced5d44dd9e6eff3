pub mod calendar;
pub mod document;
pub mod enums;
pub mod extraction;

pub use calendar::{event_id, CalendarEvent};
pub use document::DocumentRecord;
pub use extraction::{Classification, ExtractedDate, LegalObligation};
