//! Single-slot background worker for batch runs.
//!
//! An interactive surface must not block its event thread while a batch
//! runs, so the batch is offloaded to one background thread and progress is
//! streamed over a channel the surface polls. Only one batch may run at a
//! time: a busy flag rejects a second submission outright, with no queueing.
//! There is no mid-batch cancellation.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use crate::batch::{self, BatchOutcome};
use crate::engine::{StampOptions, StampResult, WatermarkEngine};
use crate::error::{Error, Result};

/// Progress notification emitted during a background batch run.
#[derive(Debug)]
pub enum BatchEvent {
    /// The batch has started; `total` files will be processed.
    Started {
        /// Number of files in the batch.
        total: usize,
    },
    /// One file has been processed (successfully or not).
    FileDone {
        /// Zero-based index of the file within the batch.
        index: usize,
        /// Number of files in the batch.
        total: usize,
        /// The file's result.
        result: StampResult,
    },
    /// The batch has finished; the worker slot is free again.
    Finished {
        /// Full per-file outcome, in input order.
        outcome: BatchOutcome,
    },
}

/// A worker that runs at most one batch at a time on a background thread.
pub struct BatchWorker {
    engine: Arc<WatermarkEngine>,
    busy: Arc<AtomicBool>,
}

impl BatchWorker {
    /// Create a worker around a shared engine.
    #[must_use]
    pub fn new(engine: Arc<WatermarkEngine>) -> Self {
        Self {
            engine,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a batch is currently running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Submit a batch for background execution.
    ///
    /// Returns a receiver of [`BatchEvent`]s: one `Started`, one `FileDone`
    /// per input in order, then `Finished`. The busy slot is released just
    /// before `Finished` is sent. Events are buffered, so a surface that
    /// polls slowly never blocks the worker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerBusy`] if a batch is already running.
    pub fn submit(
        &self,
        inputs: Vec<PathBuf>,
        output_dir: Option<PathBuf>,
        opts: StampOptions,
    ) -> Result<Receiver<BatchEvent>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::WorkerBusy);
        }

        let (tx, rx) = mpsc::channel();
        let engine = Arc::clone(&self.engine);
        let busy = Arc::clone(&self.busy);

        thread::spawn(move || {
            // Receiver may be dropped by the surface; sends are best-effort.
            let _ = tx.send(BatchEvent::Started {
                total: inputs.len(),
            });

            let outcome = batch::run_batch_with_progress(
                &engine,
                &inputs,
                output_dir.as_deref(),
                &opts,
                |index, total, result| {
                    let _ = tx.send(BatchEvent::FileDone {
                        index,
                        total,
                        result: result.clone(),
                    });
                },
            );

            busy.store(false, Ordering::Release);
            let _ = tx.send(BatchEvent::Finished { outcome });
        });

        Ok(rx)
    }
}
