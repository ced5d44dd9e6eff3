use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::DocumentStatus;
use crate::models::DocumentRecord;

pub fn insert_document(conn: &Connection, doc: &DocumentRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO documents (id, case_id, filename, path, status, classification,
         extracted_dates, obligations, human_review_required, error_messages,
         created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            doc.id.to_string(),
            doc.case_id,
            doc.filename,
            doc.path,
            doc.status.as_str(),
            doc.classification
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            serde_json::to_string(&doc.extracted_dates)?,
            serde_json::to_string(&doc.obligations)?,
            doc.human_review_required as i32,
            serde_json::to_string(&doc.error_messages)?,
            doc.created_at.to_rfc3339(),
            doc.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_document(conn: &Connection, id: &Uuid) -> Result<Option<DocumentRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, case_id, filename, path, status, classification, extracted_dates,
         obligations, human_review_required, error_messages, created_at, updated_at
         FROM documents WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], row_to_raw);

    match result {
        Ok(row) => Ok(Some(document_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Persist the full result set of a pipeline run. Overwrites, never
/// appends — redelivered tasks converge instead of accumulating.
pub fn update_document(conn: &Connection, doc: &DocumentRecord) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE documents SET case_id = ?2, status = ?3, classification = ?4,
         extracted_dates = ?5, obligations = ?6, human_review_required = ?7,
         error_messages = ?8, updated_at = ?9
         WHERE id = ?1",
        params![
            doc.id.to_string(),
            doc.case_id,
            doc.status.as_str(),
            doc.classification
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            serde_json::to_string(&doc.extracted_dates)?,
            serde_json::to_string(&doc.obligations)?,
            doc.human_review_required as i32,
            serde_json::to_string(&doc.error_messages)?,
            Utc::now().to_rfc3339(),
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Document".into(),
            id: doc.id.to_string(),
        });
    }
    Ok(())
}

/// Update only the status, enforcing the monotonic transition rule.
pub fn update_status(
    conn: &Connection,
    id: &Uuid,
    status: DocumentStatus,
) -> Result<(), DatabaseError> {
    let current = get_document(conn, id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "Document".into(),
        id: id.to_string(),
    })?;

    if !current.status.can_transition(status) {
        return Err(DatabaseError::InvalidTransition {
            from: current.status.as_str().into(),
            to: status.as_str().into(),
        });
    }

    conn.execute(
        "UPDATE documents SET status = ?2, updated_at = ?3 WHERE id = ?1",
        params![id.to_string(), status.as_str(), Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

/// Documents in a given status, oldest first. The queue consumer polls
/// this with `Queued`.
pub fn documents_by_status(
    conn: &Connection,
    status: DocumentStatus,
) -> Result<Vec<DocumentRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, case_id, filename, path, status, classification, extracted_dates,
         obligations, human_review_required, error_messages, created_at, updated_at
         FROM documents WHERE status = ?1 ORDER BY created_at ASC",
    )?;

    let rows = stmt.query_map(params![status.as_str()], row_to_raw)?;

    let mut docs = Vec::new();
    for row in rows {
        docs.push(document_from_row(row?)?);
    }
    Ok(docs)
}

// Internal row type for DocumentRecord mapping
struct DocumentRow {
    id: String,
    case_id: Option<String>,
    filename: String,
    path: String,
    status: String,
    classification: Option<String>,
    extracted_dates: String,
    obligations: String,
    human_review_required: i32,
    error_messages: String,
    created_at: String,
    updated_at: String,
}

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        id: row.get(0)?,
        case_id: row.get(1)?,
        filename: row.get(2)?,
        path: row.get(3)?,
        status: row.get(4)?,
        classification: row.get(5)?,
        extracted_dates: row.get(6)?,
        obligations: row.get(7)?,
        human_review_required: row.get(8)?,
        error_messages: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn document_from_row(row: DocumentRow) -> Result<DocumentRecord, DatabaseError> {
    Ok(DocumentRecord {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::InvalidEnum {
            field: "id".into(),
            value: e.to_string(),
        })?,
        case_id: row.case_id,
        filename: row.filename,
        path: row.path,
        status: DocumentStatus::from_str(&row.status)?,
        classification: row
            .classification
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?,
        extracted_dates: serde_json::from_str(&row.extracted_dates)?,
        obligations: serde_json::from_str(&row.obligations)?,
        human_review_required: row.human_review_required != 0,
        error_messages: serde_json::from_str(&row.error_messages)?,
        created_at: parse_timestamp(&row.created_at),
        updated_at: parse_timestamp(&row.updated_at),
    })
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_default()
}
