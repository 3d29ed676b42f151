//! Result polling for a single try-on request.
//!
//! A poll cycle starts in [`PollState::Loading`], fetches the request right
//! away and then on a fixed interval until the service reports a terminal
//! status or a fetch fails. Each cycle runs as its own task and publishes
//! snapshots through a watch channel; the [`PollHandle`] owns the cycle and
//! tears it down when cancelled or dropped.
//!
//! Fetches are awaited inside the loop, so ticks never overlap. If a fetch
//! outlasts the interval the missed ticks are skipped rather than bunched up.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use tryon_client::TryOnApi;
use tryon_models::{RequestId, TryOnRequestDetail, TryOnStatus};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// What the result view currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// No snapshot yet
    Loading,
    /// Latest snapshot is not terminal (`pending`, `processing` or unrecognized)
    Processing(TryOnRequestDetail),
    /// The service finished the request
    Completed(TryOnRequestDetail),
    /// The service reported the request as failed
    Failed(TryOnRequestDetail),
    /// Fetching the status itself failed
    Errored(String),
}

impl PollState {
    pub fn from_detail(detail: TryOnRequestDetail) -> Self {
        match detail.status {
            TryOnStatus::Completed => PollState::Completed(detail),
            TryOnStatus::Failed => PollState::Failed(detail),
            TryOnStatus::Pending | TryOnStatus::Processing | TryOnStatus::Unknown(_) => {
                PollState::Processing(detail)
            }
        }
    }

    /// Check if the cycle has ended (no more fetches will happen).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollState::Completed(_) | PollState::Failed(_) | PollState::Errored(_)
        )
    }

    /// Latest snapshot, if one has been received.
    pub fn detail(&self) -> Option<&TryOnRequestDetail> {
        match self {
            PollState::Processing(d) | PollState::Completed(d) | PollState::Failed(d) => Some(d),
            PollState::Loading | PollState::Errored(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PollState::Loading => "loading",
            PollState::Processing(_) => "processing",
            PollState::Completed(_) => "completed",
            PollState::Failed(_) => "failed",
            PollState::Errored(_) => "errored",
        }
    }
}

/// Gate shared between a handle and its task.
///
/// Publishing happens under the lock, so once `close` returns no further
/// snapshot can reach subscribers.
#[derive(Debug, Default)]
struct Gate {
    closed: Mutex<bool>,
}

impl Gate {
    fn close(&self) {
        *self.closed.lock().unwrap_or_else(|p| p.into_inner()) = true;
    }

    fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn publish(&self, tx: &watch::Sender<PollState>, state: PollState) -> bool {
        let closed = self.closed.lock().unwrap_or_else(|p| p.into_inner());
        if *closed {
            return false;
        }
        tx.send_replace(state);
        true
    }
}

/// Starts poll cycles.
pub struct ResultPoller;

impl ResultPoller {
    /// Start polling `request_id` on the current tokio runtime.
    pub fn spawn<A>(api: Arc<A>, request_id: RequestId, interval: Duration) -> PollHandle
    where
        A: TryOnApi + ?Sized + 'static,
    {
        // tokio::time::interval panics on a zero period
        let interval = interval.max(Duration::from_millis(1));
        let (tx, rx) = watch::channel(PollState::Loading);
        let gate = Arc::new(Gate::default());
        let task = tokio::spawn(run_cycle(api, request_id, interval, tx, gate.clone()));

        PollHandle {
            request_id,
            state: rx,
            gate,
            task,
        }
    }
}

async fn run_cycle<A>(
    api: Arc<A>,
    request_id: RequestId,
    interval: Duration,
    tx: watch::Sender<PollState>,
    gate: Arc<Gate>,
) where
    A: TryOnApi + ?Sized,
{
    info!(request_id, interval_ms = interval.as_millis() as u64, "Polling try-on request");

    // First tick completes immediately
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut tick: u64 = 0;
    loop {
        ticker.tick().await;
        if gate.is_closed() {
            break;
        }
        tick += 1;

        let next = match api.get_by_id(request_id).await {
            Ok(detail) => {
                debug!(request_id, tick, status = %detail.status, "Poll tick");
                PollState::from_detail(detail)
            }
            Err(e) => {
                warn!(request_id, tick, "Failed to fetch try-on request: {}", e);
                PollState::Errored(e.user_message())
            }
        };

        let terminal = next.is_terminal();
        let outcome = next.as_str();
        if !gate.publish(&tx, next) {
            debug!(request_id, tick, "Poll cycle torn down, discarding response");
            break;
        }
        if terminal {
            info!(request_id, ticks = tick, outcome, "Polling finished");
            break;
        }
    }
}

/// Owner of one poll cycle.
///
/// Dropping the handle cancels the cycle.
#[derive(Debug)]
pub struct PollHandle {
    request_id: RequestId,
    state: watch::Receiver<PollState>,
    gate: Arc<Gate>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Latest published state.
    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.clone()
    }

    /// True once the cycle task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the cycle. No fetch starts and no state is published afterwards.
    pub fn cancel(&self) {
        self.gate.close();
        self.task.abort();
        debug!(request_id = self.request_id, "Poll cycle cancelled");
    }

    /// Call `on_update` with the current state and every later one until the
    /// cycle ends, then return the final state.
    pub async fn follow<F>(&self, mut on_update: F) -> PollState
    where
        F: FnMut(&PollState),
    {
        let mut rx = self.subscribe();
        loop {
            let state = rx.borrow_and_update().clone();
            on_update(&state);
            if state.is_terminal() {
                return state;
            }
            if rx.changed().await.is_err() {
                // Task ended without a terminal snapshot (cancelled)
                return rx.borrow().clone();
            }
        }
    }

    /// Wait until the cycle ends and return the final state.
    pub async fn wait_terminal(&self) -> PollState {
        self.follow(|_| {}).await
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.gate.close();
        self.task.abort();
    }
}
