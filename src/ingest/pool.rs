//! Concurrent ingestion of every discovered step file.
//!
//! One ingestor runs per step file. At most `max_open_files` run at once;
//! they pull file indices from a shared cursor. Batches and errors travel
//! over two channels sized to the number of files, so senders never block.
//! The scope join is the barrier: nothing is handed to the merger until every
//! ingestor has finished.

use super::discovery::StepFile;
use super::reader::{ingest_step_file, PartialBatch};
use crate::config::ColumnConfig;
use crate::model::{DuplicatePolicy, StepOrder};
use crate::utils::error::{IngestError, IngestFailure};
use log::{debug, error, info};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

/// Options for the ingestion phase
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Upper bound on step files read concurrently
    pub max_open_files: usize,

    pub columns: ColumnConfig,

    pub duplicate_policy: DuplicatePolicy,
}

/// Run one ingestor per step file and collect their output
///
/// **Public** - ingestion phase entry point
///
/// # Returns
/// The receiving end of the batch channel, already closed and fully
/// populated, for the merger to drain.
///
/// # Errors
/// `IngestFailure` carrying every error reported by any ingestor
pub fn ingest_all(
    files: &[StepFile],
    order: &StepOrder,
    options: &IngestOptions,
) -> Result<mpsc::Receiver<PartialBatch>, IngestFailure> {
    let start = Instant::now();
    let capacity = files.len().max(1);
    let (batch_tx, batch_rx) = mpsc::sync_channel::<PartialBatch>(capacity);
    let (error_tx, error_rx) = mpsc::sync_channel::<IngestError>(capacity);

    let workers = options.max_open_files.max(1).min(files.len());
    info!(
        "Ingesting {} step file(s) with up to {} open at once",
        files.len(),
        workers
    );

    let cursor = AtomicUsize::new(0);
    thread::scope(|scope| {
        for worker_id in 0..workers {
            let batch_tx = batch_tx.clone();
            let error_tx = error_tx.clone();
            let cursor = &cursor;

            scope.spawn(move || loop {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(file) = files.get(index) else {
                    break;
                };

                debug!("Ingestor {} picked up {}", worker_id, file.path.display());
                let sent = match ingest_step_file(
                    file,
                    order,
                    &options.columns,
                    options.duplicate_policy,
                ) {
                    Ok(batch) => batch_tx.send(batch).is_ok(),
                    Err(err) => error_tx.send(err).is_ok(),
                };
                if !sent {
                    break;
                }
            });
        }
    });

    // Close both channels; the receivers now drain what was sent.
    drop(batch_tx);
    drop(error_tx);

    let errors: Vec<IngestError> = error_rx.into_iter().collect();
    if !errors.is_empty() {
        for err in &errors {
            error!("Ingestion failed: {}", err);
        }
        return Err(IngestFailure { errors });
    }

    debug!("Ingestion finished in {:.2}s", start.elapsed().as_secs_f64());
    Ok(batch_rx)
}
