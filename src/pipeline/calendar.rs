//! Case calendar integration.
//!
//! Writes validated dates into the case calendar under a deterministic
//! event key, then reports proximity conflicts against the events that
//! existed before this run. Snapshot and upserts run inside one
//! exclusive transaction, so two workers integrating the same case —
//! even from separate processes — observe each other's events: whichever
//! commits second sees the first's events in its snapshot. The pre-write
//! snapshot also keeps reprocessing honest: a document redelivered by
//! the queue upserts its own events and must not report them as
//! conflicts with themselves.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::db::repository::{events_for_case, upsert_event};
use crate::db::DatabaseError;
use crate::models::{event_id, CalendarEvent, ExtractedDate};

/// Two events within this many seconds of each other are flagged.
const CONFLICT_WINDOW_SECS: i64 = 60 * 60;

#[derive(Default)]
pub struct CalendarIntegrator;

impl CalendarIntegrator {
    pub fn new() -> Self {
        Self
    }

    /// Upsert one event per validated date and return conflict messages.
    /// Without a case context there is no calendar to write to, so this
    /// is a no-op.
    pub fn integrate(
        &self,
        conn: &Connection,
        case_id: Option<&str>,
        dates: &[ExtractedDate],
    ) -> Result<Vec<String>, DatabaseError> {
        let Some(case_id) = case_id.filter(|c| !c.is_empty()) else {
            tracing::debug!("No case id; skipping calendar integration");
            return Ok(Vec::new());
        };

        // BEGIN IMMEDIATE takes the write lock up front: the snapshot and
        // the upserts are one atomic unit with respect to every other
        // connection on this database. Drop without commit rolls back.
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

        let existing = events_for_case(&tx, case_id)?;

        for d in dates {
            let event = CalendarEvent {
                id: event_id(case_id, &d.date),
                case_id: case_id.to_string(),
                title: event_title(&d.date_type),
                description: Some(d.source_text.clone()),
                start: d.date,
                end: d.date,
                all_day: true,
                source_document: Some("auto".to_string()),
            };
            upsert_event(&tx, &event)?;
        }
        tx.commit()?;

        // Conflicts are judged against what was already on the calendar,
        // never against this run's own upserts.
        let mut conflicts = Vec::new();
        for d in dates {
            let own_id = event_id(case_id, &d.date);
            for ev in &existing {
                if ev.id == own_id {
                    continue;
                }
                if (ev.start - d.date).num_seconds().abs() < CONFLICT_WINDOW_SECS {
                    conflicts.push(format!(
                        "Potential conflict: {} near existing event '{}' at {}",
                        d.date_type, ev.title, ev.start
                    ));
                }
            }
        }

        if !conflicts.is_empty() {
            tracing::warn!(case_id, count = conflicts.len(), "Calendar conflicts detected");
        }
        Ok(conflicts)
    }
}

/// "production_deadline" -> "Production_Deadline": capitalize the start
/// of every alphabetic run.
fn event_title(date_type: &str) -> String {
    let mut out = String::with_capacity(date_type.len());
    let mut at_word_start = true;
    for c in date_type.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
