//! Background writer for fire-and-forget field updates.
//!
//! Setters must not wait on the database, so field changes go into a bounded
//! queue drained by one writer task. A single consumer keeps writes in the
//! order they were enqueued. Failures cannot be returned to the setter that
//! caused them; they are handed to an [`ErrorReporter`] instead.
//!
//! When the queue is full, changes are parked in an overflow map keyed by
//! table, row and column, where a later value replaces an earlier one. The
//! writer applies the overflow only once the queue is empty, and nothing
//! enters the queue while the overflow holds changes, so a parked value is
//! never overwritten by an older queued one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shelf_core::FieldChange;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::store::{Store, StoreError};

/// Receives errors from writes nobody is waiting on.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &StoreError, context: &str);
}

/// Reports errors to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, error: &StoreError, context: &str) {
        log::error!("{context}: {error}");
    }
}

enum WriteOp {
    Field(FieldChange),
    Flush(oneshot::Sender<()>),
    Shutdown,
}

type CellKey = (&'static str, i64, &'static str);

/// Latest pending value per cell, used while the queue is full.
#[derive(Default)]
struct Overflow {
    pending: Mutex<HashMap<CellKey, FieldChange>>,
}

impl Overflow {
    // The map stays consistent even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, HashMap<CellKey, FieldChange>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(&self) -> Vec<FieldChange> {
        self.lock().drain().map(|(_, change)| change).collect()
    }
}

fn park(pending: &mut HashMap<CellKey, FieldChange>, change: FieldChange) {
    pending.insert((change.table, change.id, change.column), change);
}

/// Sending side of the writer. Cheap to clone.
#[derive(Clone)]
pub struct WriteQueue {
    tx: mpsc::Sender<WriteOp>,
    overflow: Arc<Overflow>,
    reporter: Arc<dyn ErrorReporter>,
}

impl WriteQueue {
    /// Queue a field write without waiting.
    ///
    /// A full queue parks the change in the overflow map. If the writer has
    /// stopped, the write is dropped and reported.
    pub fn enqueue(&self, change: FieldChange) {
        if self.tx.is_closed() {
            self.reporter.report(&StoreError::WriterClosed, "enqueue");
            return;
        }
        let mut pending = self.overflow.lock();
        if !pending.is_empty() {
            park(&mut pending, change);
            return;
        }
        match self.tx.try_send(WriteOp::Field(change)) {
            Ok(()) => {}
            Err(TrySendError::Full(WriteOp::Field(change))) => {
                log::debug!("Write queue full, coalescing writes until the writer catches up");
                park(&mut pending, change);
            }
            Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Closed(_)) => {
                self.reporter.report(&StoreError::WriterClosed, "enqueue");
            }
        }
    }

    /// Wait until every write queued before this call has been applied,
    /// including coalesced ones.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(WriteOp::Flush(done_tx))
            .await
            .map_err(|_| StoreError::WriterClosed)?;
        done_rx.await.map_err(|_| StoreError::WriterClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owns the writer task.
pub struct Writer {
    queue: WriteQueue,
    handle: JoinHandle<u64>,
}

impl Writer {
    /// Spawn the writer task on the current tokio runtime.
    pub fn spawn(store: Store, capacity: usize, reporter: Arc<dyn ErrorReporter>) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let overflow = Arc::new(Overflow::default());
        let task = WriterTask {
            store,
            overflow: Arc::clone(&overflow),
            reporter: Arc::clone(&reporter),
            written: 0,
        };
        let handle = tokio::spawn(task.run(rx));
        Self {
            queue: WriteQueue {
                tx,
                overflow,
                reporter,
            },
            handle,
        }
    }

    pub fn queue(&self) -> WriteQueue {
        self.queue.clone()
    }

    /// Apply everything already queued, then stop the task.
    pub async fn shutdown(self) -> Result<(), StoreError> {
        self.queue
            .tx
            .send(WriteOp::Shutdown)
            .await
            .map_err(|_| StoreError::WriterClosed)?;
        let written = self.handle.await?;
        log::debug!("Writer stopped after {written} writes");
        Ok(())
    }
}

struct WriterTask {
    store: Store,
    overflow: Arc<Overflow>,
    reporter: Arc<dyn ErrorReporter>,
    written: u64,
}

impl WriterTask {
    async fn run(mut self, mut rx: mpsc::Receiver<WriteOp>) -> u64 {
        let mut waiting: Vec<oneshot::Sender<()>> = Vec::new();
        let mut stopping = false;
        loop {
            let op = match rx.try_recv() {
                Ok(op) => op,
                Err(idle) => {
                    // Queue is empty: parked changes are now the newest.
                    self.apply_overflow().await;
                    for done in waiting.drain(..) {
                        // The flusher may have given up waiting.
                        let _ = done.send(());
                    }
                    if stopping || matches!(idle, TryRecvError::Disconnected) {
                        break;
                    }
                    match rx.recv().await {
                        Some(op) => op,
                        None => {
                            self.apply_overflow().await;
                            break;
                        }
                    }
                }
            };
            match op {
                WriteOp::Field(change) => self.apply(change).await,
                WriteOp::Flush(done) => waiting.push(done),
                WriteOp::Shutdown => stopping = true,
            }
        }
        self.written
    }

    async fn apply_overflow(&mut self) {
        let parked = self.overflow.take();
        if !parked.is_empty() {
            log::debug!("Applying {} coalesced writes", parked.len());
        }
        for change in parked {
            self.apply(change).await;
        }
    }

    async fn apply(&mut self, change: FieldChange) {
        let context = format!("write {}.{} for id {}", change.table, change.column, change.id);
        log::debug!("{context}");
        match self.store.write_field(change).await {
            Ok(()) => self.written += 1,
            Err(e) => self.reporter.report(&e, &context),
        }
    }
}
