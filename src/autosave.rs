//! Autosave: debounced background writes of the working diagram.
//!
//! DESIGN
//! ======
//! The editor publishes the latest snapshot into a `watch` channel on every
//! persisted change. A background task waits for a quiet period with no
//! further changes, then writes only the newest snapshot. A burst of edits
//! therefore costs one write.
//!
//! Dropping the [`Autosaver`] aborts the task; a change still inside its
//! quiet period is discarded.
//!
//! ERROR HANDLING
//! ==============
//! Write failures are logged and the task keeps waiting for the next change.

#[cfg(test)]
#[path = "autosave_test.rs"]
mod autosave_test;

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::doc::DiagramSnapshot;
use crate::persistence::write_working;
use crate::storage::KeyValueStore;

/// Handle to the background autosave task.
pub struct Autosaver {
    tx: watch::Sender<Option<DiagramSnapshot>>,
    task: JoinHandle<()>,
}

impl Autosaver {
    /// Spawn the autosave task on the current Tokio runtime.
    ///
    /// Must be called from within a runtime context.
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>, key: impl Into<String>, quiet: Duration) -> Self {
        let key = key.into();
        let (tx, mut rx) = watch::channel::<Option<DiagramSnapshot>>(None);
        info!(key = %key, ?quiet, "autosave configured");

        let task = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                loop {
                    tokio::select! {
                        changed = rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                        () = tokio::time::sleep(quiet) => break,
                    }
                }
                let pending = rx.borrow_and_update().clone();
                let Some(snapshot) = pending else {
                    continue;
                };
                match write_working(store.as_ref(), &key, &snapshot, OffsetDateTime::now_utc()) {
                    Ok(()) => debug!(key = %key, nodes = snapshot.node_count(), "working diagram autosaved"),
                    Err(e) => warn!(key = %key, error = %e, "autosave failed"),
                }
            }
        });

        Self { tx, task }
    }

    /// Replace the pending snapshot and restart the quiet period.
    pub fn schedule(&self, snapshot: DiagramSnapshot) {
        self.tx.send_modify(|slot| *slot = Some(snapshot));
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        self.task.abort();
    }
}
