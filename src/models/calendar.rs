use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A case calendar entry. Owned by the case, not the document — multiple
/// documents may contribute events to the same calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub case_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub source_document: Option<String>,
}

/// Deterministic event key. The external queue delivers at-least-once, so
/// reprocessing the same document must upsert the same row rather than
/// insert a duplicate.
pub fn event_id(case_id: &str, date: &DateTime<Utc>) -> String {
    format!("evt-{}-{}", case_id, date.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_id_is_deterministic() {
        let d = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        assert_eq!(event_id("case-7", &d), event_id("case-7", &d));
        assert_eq!(event_id("case-7", &d), format!("evt-case-7-{}", d.timestamp()));
    }

    #[test]
    fn event_id_varies_with_case_and_date() {
        let d1 = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        let d2 = Utc.with_ymd_and_hms(2026, 1, 11, 0, 0, 0).unwrap();
        assert_ne!(event_id("case-7", &d1), event_id("case-8", &d1));
        assert_ne!(event_id("case-7", &d1), event_id("case-7", &d2));
    }
}
