//! Queue consumer.
//!
//! The documents table doubles as the delivery queue: anything in
//! `queued` status is work. A background thread polls oldest-first and
//! drives each document through the processor. Delivery is
//! at-least-once: a worker killed mid-run leaves the document in
//! `processing`, and any poller redelivers it once it has sat there
//! longer than the stale threshold — which is why the pipeline's writes
//! are convergent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rusqlite::Connection;

use crate::config::Settings;
use crate::db::repository::documents_by_status;
use crate::db::sqlite::open_database;
use crate::models::enums::DocumentStatus;
use crate::pipeline::processor::DocumentProcessor;

/// Sleep granularity for shutdown responsiveness.
const SLEEP_GRANULARITY_SECS: u64 = 1;

/// Documents sitting in `processing` longer than this are presumed
/// orphaned by a dead worker and redelivered.
const STALE_PROCESSING_SECS: i64 = 15 * 60;

/// Handle for the worker thread. Supports graceful shutdown via
/// `shutdown()` or automatic cleanup on `Drop`.
pub struct WorkerHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown. The document currently being processed
    /// finishes; nothing new is picked up.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

/// Start the polling worker on a separate thread. The worker owns its
/// own database connection for its whole lifetime.
pub fn start_worker(settings: Settings, processor: DocumentProcessor) -> WorkerHandle {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    let poll_secs = settings.poll_interval_secs.max(1);

    let handle = std::thread::spawn(move || {
        let conn = match open_database(&settings.database_path) {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(error = %e, path = %settings.database_path.display(), "Worker could not open database");
                return;
            }
        };
        tracing::info!(poll_secs, "Queue worker started");
        worker_loop(&conn, &processor, &flag, poll_secs);
    });

    WorkerHandle {
        shutdown,
        handle: Some(handle),
    }
}

fn worker_loop(conn: &Connection, processor: &DocumentProcessor, shutdown: &AtomicBool, poll_secs: u64) {
    let stale_after = chrono::Duration::seconds(STALE_PROCESSING_SECS);
    while !shutdown.load(Ordering::Relaxed) {
        match drain_queue(conn, processor, shutdown, stale_after) {
            Ok(0) => {}
            Ok(n) => tracing::info!(processed = n, "Queue drained"),
            Err(e) => tracing::error!(error = %e, "Queue poll failed"),
        }

        // Sleep in small increments for responsive shutdown
        for _ in 0..poll_secs.div_ceil(SLEEP_GRANULARITY_SECS) {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }
            std::thread::sleep(Duration::from_secs(SLEEP_GRANULARITY_SECS));
        }
    }
    tracing::info!("Queue worker shutting down");
}

/// Process every queued document, oldest first, then redeliver any
/// document stranded in `processing` for longer than `stale_after`
/// (the status machine permits the restart edge). A document that fails
/// is already marked `failed` by the processor; a document that cannot
/// even be loaded is logged and skipped so one poisoned row cannot wedge
/// the queue.
pub fn drain_queue(
    conn: &Connection,
    processor: &DocumentProcessor,
    shutdown: &AtomicBool,
    stale_after: chrono::Duration,
) -> Result<usize, crate::db::DatabaseError> {
    let mut work = documents_by_status(conn, DocumentStatus::Queued)?;

    let cutoff = Utc::now() - stale_after;
    let stranded: Vec<_> = documents_by_status(conn, DocumentStatus::Processing)?
        .into_iter()
        .filter(|doc| doc.updated_at <= cutoff)
        .collect();
    if !stranded.is_empty() {
        tracing::warn!(count = stranded.len(), "Redelivering stale processing documents");
    }
    work.extend(stranded);

    let mut processed = 0;
    for doc in work {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }
        match processor.process(conn, &doc.id) {
            Ok(status) => {
                processed += 1;
                tracing::debug!(document_id = %doc.id, status = status.as_str(), "Document processed");
            }
            Err(e) => {
                tracing::error!(document_id = %doc.id, error = %e, "Skipping unprocessable document");
            }
        }
    }
    Ok(processed)
}
