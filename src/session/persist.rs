//! Background writer that mirrors session changes into durable storage.
//!
//! Commands are drained from an unbounded FIFO by a single task, so writes
//! reach storage in the order the mutations committed. Failures are logged
//! and counted, never returned to the mutating caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::PersistedSession;
use crate::models::User;
use crate::traits::KeyValueStorage;

#[derive(Debug)]
enum PersistCommand {
    /// Replace the durable record with this user (or an empty record).
    Write(Option<User>),
    /// Delete the durable record.
    Remove,
    /// Acknowledge once every earlier command has been processed.
    Flush(oneshot::Sender<()>),
}

/// Sending half of the persistence queue.
#[derive(Debug, Clone)]
pub(crate) struct PersistQueue {
    tx: mpsc::UnboundedSender<PersistCommand>,
    failures: Arc<AtomicU64>,
}

impl PersistQueue {
    /// Spawn the writer task for `key` on the current tokio runtime.
    pub(crate) fn spawn(
        storage: Arc<dyn KeyValueStorage>,
        key: String,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let failures = Arc::new(AtomicU64::new(0));
        let handle = tokio::spawn(run_writer(rx, storage, key, Arc::clone(&failures)));
        (Self { tx, failures }, handle)
    }

    pub(crate) fn write(&self, user: Option<User>) {
        self.send(PersistCommand::Write(user));
    }

    pub(crate) fn remove(&self) {
        self.send(PersistCommand::Remove);
    }

    /// Wait until every command queued before this call has been applied.
    pub(crate) async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(PersistCommand::Flush(ack_tx));
        // A dropped ack means the writer is gone; nothing left to wait for.
        let _ = ack_rx.await;
    }

    pub(crate) fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn send(&self, command: PersistCommand) {
        if self.tx.send(command).is_err() {
            warn!("Session writer has stopped; dropping persistence command");
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }
}

async fn run_writer(
    mut rx: mpsc::UnboundedReceiver<PersistCommand>,
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    failures: Arc<AtomicU64>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            PersistCommand::Write(user) => {
                let record = PersistedSession::new(user);
                let result = match serde_json::to_string(&record) {
                    Ok(raw) => storage.set_item(&key, &raw).await,
                    Err(e) => Err(e.into()),
                };
                match result {
                    Ok(()) => debug!(key = %key, signed_in = record.user.is_some(), "Session persisted"),
                    Err(e) => {
                        failures.fetch_add(1, Ordering::Relaxed);
                        warn!(key = %key, error = %e, "Failed to persist session");
                    }
                }
            }
            PersistCommand::Remove => match storage.remove_item(&key).await {
                Ok(()) => debug!(key = %key, "Session record removed"),
                Err(e) => {
                    failures.fetch_add(1, Ordering::Relaxed);
                    warn!(key = %key, error = %e, "Failed to remove session record");
                }
            },
            PersistCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!(key = %key, "Session writer stopped");
}
