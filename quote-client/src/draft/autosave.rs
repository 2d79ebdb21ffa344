//! Autosave scheduler
//!
//! Collapses bursts of field edits into one `update` call. Edits are merged
//! into a pending patch; every edit pushes the deadline back by the debounce
//! window, and when the window passes quietly the whole patch is written.
//!
//! ```text
//! schedule(a) ─┐
//! schedule(b) ─┼─▶ pending = a ⊕ b ⊕ c ──(quiet for delay)──▶ update(id, pending)
//! schedule(c) ─┘
//! write_now(x) ──────────────────────────────────────────────▶ update(id, x)
//! ```
//!
//! The draft id is read when the write executes, not when the edit was made.
//! Disposal abandons whatever is still pending.

use std::sync::Arc;

use shared::quote::{DraftPatch, QuoteDraft};
use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::ClientResult;
use crate::gateway::DraftGateway;

/// Idle wake-up when nothing is pending
const IDLE_SLEEP_SECS: u64 = 3600;

enum Command {
    Merge(DraftPatch),
    Discard,
}

/// Debounced writer in front of a [`DraftGateway`]
pub struct AutosaveScheduler {
    gateway: Arc<dyn DraftGateway>,
    quote_id: watch::Receiver<Option<String>>,
    tx: mpsc::UnboundedSender<Command>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for AutosaveScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutosaveScheduler")
            .field("quote_id", &*self.quote_id.borrow())
            .field("disposed", &self.shutdown.is_cancelled())
            .finish()
    }
}

impl AutosaveScheduler {
    /// Start the scheduler's worker task on the current tokio runtime
    pub fn spawn(
        gateway: Arc<dyn DraftGateway>,
        quote_id: watch::Receiver<Option<String>>,
        delay: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let worker = AutosaveWorker {
            gateway: gateway.clone(),
            quote_id: quote_id.clone(),
            rx,
            shutdown: shutdown.clone(),
            delay,
        };
        tokio::spawn(worker.run());

        Self {
            gateway,
            quote_id,
            tx,
            shutdown,
        }
    }

    /// Merge `patch` into the pending buffer and restart the timer
    pub fn schedule(&self, patch: DraftPatch) {
        if patch.is_empty() {
            return;
        }
        if self.tx.send(Command::Merge(patch)).is_err() {
            tracing::warn!("Autosave worker stopped, dropping edit");
        }
    }

    /// Drop the pending buffer without writing it
    pub fn discard_pending(&self) {
        let _ = self.tx.send(Command::Discard);
    }

    /// Write `patch` immediately, bypassing the buffer
    ///
    /// A pending debounced write is left untouched. Returns `Ok(None)` when no
    /// draft exists yet, since there is nothing to write to.
    pub async fn write_now(&self, patch: DraftPatch) -> ClientResult<Option<QuoteDraft>> {
        let Some(quote_id) = self.quote_id.borrow().clone() else {
            tracing::debug!("No draft yet, skipping immediate write");
            return Ok(None);
        };
        let fields = patch.field_names();
        let record = self.gateway.update(&quote_id, &patch).await?;
        tracing::debug!(quote_id = %quote_id, ?fields, "Draft written");
        Ok(Some(record))
    }

    /// Stop the worker; anything still pending is abandoned
    pub fn dispose(&self) {
        self.shutdown.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl Drop for AutosaveScheduler {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct AutosaveWorker {
    gateway: Arc<dyn DraftGateway>,
    quote_id: watch::Receiver<Option<String>>,
    rx: mpsc::UnboundedReceiver<Command>,
    shutdown: CancellationToken,
    delay: Duration,
}

impl AutosaveWorker {
    async fn run(mut self) {
        let mut pending = DraftPatch::default();
        let mut deadline: Option<Instant> = None;

        loop {
            let sleep_until =
                deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(IDLE_SLEEP_SECS));

            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    if !pending.is_empty() {
                        tracing::debug!(fields = ?pending.field_names(), "Autosave disposed, pending edits abandoned");
                    }
                    break;
                }

                _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                    deadline = None;
                    let batch = std::mem::take(&mut pending);
                    self.flush(batch).await;
                }

                cmd = self.rx.recv() => {
                    match cmd {
                        Some(Command::Merge(patch)) => {
                            pending.merge(patch);
                            deadline = Some(Instant::now() + self.delay);
                        }
                        Some(Command::Discard) => {
                            pending = DraftPatch::default();
                            deadline = None;
                        }
                        None => break,
                    }
                }
            }
        }

        tracing::debug!("Autosave worker stopped");
    }

    async fn flush(&self, batch: DraftPatch) {
        if batch.is_empty() {
            return;
        }
        let Some(quote_id) = self.quote_id.borrow().clone() else {
            tracing::warn!(fields = ?batch.field_names(), "No draft to autosave into, dropping edits");
            return;
        };

        match self.gateway.update(&quote_id, &batch).await {
            Ok(_) => {
                tracing::debug!(quote_id = %quote_id, fields = ?batch.field_names(), "Autosaved draft");
            }
            Err(e) => {
                // Local state stays authoritative; next successful write catches up
                tracing::error!(quote_id = %quote_id, "Autosave failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayOp, MemoryDraftGateway};
    use shared::quote::TripType;

    const DELAY: Duration = Duration::from_millis(500);

    async fn setup() -> (Arc<MemoryDraftGateway>, AutosaveScheduler, watch::Sender<Option<String>>) {
        let gateway = Arc::new(MemoryDraftGateway::new());
        let created = gateway.create(TripType::OneWay).await.unwrap();
        gateway.clear_calls();
        let (id_tx, id_rx) = watch::channel(Some(created.quote_id));
        let scheduler = AutosaveScheduler::spawn(gateway.clone(), id_rx, DELAY);
        (gateway, scheduler, id_tx)
    }

    fn name(value: &str) -> DraftPatch {
        DraftPatch {
            trip_name: Some(value.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesced_into_one_write() {
        let (gateway, scheduler, _id) = setup().await;

        for value in ["S", "Su", "Sum", "Summ", "Summer"] {
            scheduler.schedule(name(value));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(gateway.count(GatewayOp::Update), 0);

        tokio::time::sleep(DELAY).await;

        let updates = gateway.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1.trip_name.as_deref(), Some("Summer"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_restarts_on_each_edit() {
        let (gateway, scheduler, _id) = setup().await;

        scheduler.schedule(name("A"));
        tokio::time::sleep(Duration::from_millis(400)).await;
        scheduler.schedule(name("AB"));
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(gateway.count(GatewayOp::Update), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(gateway.count(GatewayOp::Update), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_fields_merged() {
        let (gateway, scheduler, _id) = setup().await;

        scheduler.schedule(name("Gala"));
        scheduler.schedule(DraftPatch {
            event_type: Some("wedding".to_string()),
            ..Default::default()
        });
        tokio::time::sleep(Duration::from_millis(600)).await;

        let updates = gateway.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1.field_names(), vec!["tripName", "eventType"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_now_leaves_pending_timer_alone() {
        let (gateway, scheduler, _id) = setup().await;

        scheduler.schedule(name("Pending"));
        let written = scheduler.write_now(DraftPatch::step(2)).await.unwrap();
        assert!(written.is_some());
        assert_eq!(gateway.count(GatewayOp::Update), 1);

        tokio::time::sleep(Duration::from_millis(600)).await;

        let updates = gateway.updates();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].1, DraftPatch::step(2));
        assert_eq!(updates[1].1, name("Pending"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_abandons_pending() {
        let (gateway, scheduler, _id) = setup().await;

        scheduler.schedule(name("Lost"));
        scheduler.dispose();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(scheduler.is_disposed());
        assert_eq!(gateway.count(GatewayOp::Update), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_quote_id_at_flush_time() {
        let gateway = Arc::new(MemoryDraftGateway::new());
        let (id_tx, id_rx) = watch::channel(None);
        let scheduler = AutosaveScheduler::spawn(gateway.clone(), id_rx, DELAY);

        scheduler.schedule(name("Early"));
        let created = gateway.create(TripType::TwoWay).await.unwrap();
        id_tx.send_replace(Some(created.quote_id.clone()));
        tokio::time::sleep(Duration::from_millis(600)).await;

        let updates = gateway.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, created.quote_id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_autosave_is_swallowed() {
        let (gateway, scheduler, _id) = setup().await;
        gateway.set_unavailable(GatewayOp::Update, true);

        scheduler.schedule(name("First"));
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(gateway.count(GatewayOp::Update), 1);

        gateway.set_unavailable(GatewayOp::Update, false);
        scheduler.schedule(name("Second"));
        tokio::time::sleep(Duration::from_millis(600)).await;

        let updates = gateway.updates();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].1, name("Second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_discard_pending() {
        let (gateway, scheduler, _id) = setup().await;

        scheduler.schedule(name("Gone"));
        scheduler.discard_pending();
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(gateway.count(GatewayOp::Update), 0);
    }

    #[tokio::test]
    async fn test_write_now_without_draft() {
        let gateway = Arc::new(MemoryDraftGateway::new());
        let (_id_tx, id_rx) = watch::channel(None);
        let scheduler = AutosaveScheduler::spawn(gateway.clone(), id_rx, DELAY);

        let written = scheduler.write_now(DraftPatch::step(2)).await.unwrap();
        assert!(written.is_none());
        assert!(gateway.calls().is_empty());
    }
}
