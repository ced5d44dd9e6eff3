//! Plausibility filter for extracted dates.
//!
//! Filters, never edits: a date either passes through unchanged or is
//! dropped with a warning that the escalation gate later surfaces.

use chrono::{DateTime, Datelike, Utc};

use crate::models::ExtractedDate;

/// Years before this are treated as OCR noise rather than real case dates.
const MIN_PLAUSIBLE_YEAR: i32 = 1990;
/// Dates more than this many years out are implausible for active litigation.
const MAX_YEARS_AHEAD: i32 = 5;

/// Split extracted dates into plausible ones and warnings for the rest.
/// `now` is injected so callers pin the run's clock once.
pub fn validate(dates: Vec<ExtractedDate>, now: DateTime<Utc>) -> (Vec<ExtractedDate>, Vec<String>) {
    let max_year = now.year() + MAX_YEARS_AHEAD;
    let mut valid = Vec::with_capacity(dates.len());
    let mut warnings = Vec::new();
    for d in dates {
        let year = d.date.year();
        if year < MIN_PLAUSIBLE_YEAR || year > max_year {
            warnings.push(format!("Suspicious date detected: {}", d.date));
            continue;
        }
        valid.push(d);
    }
    (valid, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date_at(year: i32) -> ExtractedDate {
        ExtractedDate {
            date: Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap(),
            date_type: "deadline".into(),
            confidence_score: 0.6,
            source_text: "test".into(),
            jurisdiction: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn plausible_dates_pass_unchanged() {
        let input = vec![date_at(2026), date_at(1990), date_at(2031)];
        let (valid, warnings) = validate(input.clone(), now());
        assert_eq!(valid, input);
        assert!(warnings.is_empty());
    }

    #[test]
    fn ancient_and_far_future_dates_are_dropped_with_warnings() {
        let (valid, warnings) = validate(vec![date_at(1989), date_at(2026), date_at(2032)], now());
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].date.year(), 2026);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("Suspicious date detected: 1989-06-01"));
        assert!(warnings[1].starts_with("Suspicious date detected: 2032-06-01"));
    }

    #[test]
    fn empty_input_is_fine() {
        let (valid, warnings) = validate(Vec::new(), now());
        assert!(valid.is_empty());
        assert!(warnings.is_empty());
    }
}
