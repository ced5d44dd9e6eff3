use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::CalendarEvent;

/// Insert-or-merge an event by its deterministic id. Repeated integration
/// of the same (case_id, date) updates the row in place.
pub fn upsert_event(conn: &Connection, event: &CalendarEvent) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO calendar_events (id, case_id, title, description, start, end,
         all_day, source_document)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
           title = excluded.title,
           description = excluded.description,
           start = excluded.start,
           end = excluded.end,
           all_day = excluded.all_day,
           source_document = excluded.source_document",
        params![
            event.id,
            event.case_id,
            event.title,
            event.description,
            event.start.to_rfc3339(),
            event.end.to_rfc3339(),
            event.all_day as i32,
            event.source_document,
        ],
    )?;
    Ok(())
}

/// All events for a case ordered by start time. This is the read surface
/// conflict detection must stay consistent with.
pub fn events_for_case(conn: &Connection, case_id: &str) -> Result<Vec<CalendarEvent>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, case_id, title, description, start, end, all_day, source_document
         FROM calendar_events WHERE case_id = ?1 ORDER BY start ASC",
    )?;

    let rows = stmt.query_map(params![case_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, i32>(6)?,
            row.get::<_, Option<String>>(7)?,
        ))
    })?;

    let mut events = Vec::new();
    for row in rows {
        let (id, case_id, title, description, start, end, all_day, source_document) = row?;
        events.push(CalendarEvent {
            id,
            case_id,
            title,
            description,
            start: parse_timestamp(&start),
            end: parse_timestamp(&end),
            all_day: all_day != 0,
            source_document,
        });
    }
    Ok(events)
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::event_id;
    use chrono::TimeZone;

    fn sample_event(case_id: &str, start: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent {
            id: event_id(case_id, &start),
            case_id: case_id.to_string(),
            title: "Hearing".into(),
            description: Some("hearing set for 01/10/2026".into()),
            start,
            end: start,
            all_day: true,
            source_document: Some("auto".into()),
        }
    }

    #[test]
    fn upsert_same_key_keeps_one_row() {
        let conn = open_memory_database().unwrap();
        let start = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        let event = sample_event("case-1", start);

        upsert_event(&conn, &event).unwrap();
        let mut updated = event.clone();
        updated.title = "Rescheduled Hearing".into();
        upsert_event(&conn, &updated).unwrap();

        let events = events_for_case(&conn, "case-1").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Rescheduled Hearing");
    }

    #[test]
    fn events_ordered_by_start() {
        let conn = open_memory_database().unwrap();
        let later = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        upsert_event(&conn, &sample_event("case-1", later)).unwrap();
        upsert_event(&conn, &sample_event("case-1", earlier)).unwrap();

        let events = events_for_case(&conn, "case-1").unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].start < events[1].start);
    }

    #[test]
    fn events_scoped_to_case() {
        let conn = open_memory_database().unwrap();
        let start = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        upsert_event(&conn, &sample_event("case-1", start)).unwrap();

        assert!(events_for_case(&conn, "case-2").unwrap().is_empty());
    }
}
