pub mod calendar;
pub mod document;

pub use calendar::*;
pub use document::*;
