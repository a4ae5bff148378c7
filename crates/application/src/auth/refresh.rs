//! Single-flight coordination of credential refreshes.
//!
//! The first request to see a recoverable 401 becomes the leader and runs
//! the refresh. Requests that hit a 401 while the refresh is in flight are
//! parked in a queue and woken with the outcome once the leader resolves.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use beacon_domain::ApiRequest;
use tokio::sync::oneshot;

use crate::error::ApiError;

/// New access credential, or the error that ended the refresh.
pub type RefreshOutcome = Result<String, ApiError>;

struct PendingRequest {
    request: ApiRequest,
    reply: oneshot::Sender<RefreshOutcome>,
}

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    pending: Vec<PendingRequest>,
}

/// Shared refresh state for one client.
///
/// At most one refresh runs at a time. The in-flight flag and the queue
/// change together under one lock, so a request can never be queued after
/// the queue was drained.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// What a request that hit a 401 should do next.
pub enum RefreshTicket {
    /// No refresh was running; the caller must perform it.
    Leader(RefreshLease),
    /// A refresh is running; wait for its outcome.
    Waiter(RefreshWaiter),
}

impl RefreshCoordinator {
    /// Create an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the current refresh, or starts one if none is running.
    pub fn join(self: &Arc<Self>, request: &ApiRequest) -> RefreshTicket {
        let mut state = self.lock();
        if state.in_flight {
            let (reply, receiver) = oneshot::channel();
            state.pending.push(PendingRequest {
                request: request.clone(),
                reply,
            });
            tracing::debug!(
                request = %request.describe(),
                queued = state.pending.len(),
                "Queued behind in-flight refresh"
            );
            return RefreshTicket::Waiter(RefreshWaiter { receiver });
        }

        state.in_flight = true;
        tracing::debug!(request = %request.describe(), "Starting credential refresh");
        RefreshTicket::Leader(RefreshLease {
            coordinator: Arc::clone(self),
            settled: false,
        })
    }

    /// Whether a refresh is currently in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.lock().in_flight
    }

    /// Number of requests waiting on the in-flight refresh.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    fn settle(&self, outcome: &RefreshOutcome) -> usize {
        let mut state = self.lock();
        let pending = std::mem::take(&mut state.pending);
        state.in_flight = false;

        let count = pending.len();
        for PendingRequest { request, reply } in pending {
            if reply.send(outcome.clone()).is_err() {
                tracing::debug!(request = %request.describe(), "Queued request was dropped");
            }
        }
        count
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("RefreshCoordinator")
            .field("in_flight", &state.in_flight)
            .field("pending", &state.pending.len())
            .finish()
    }
}

/// Held by the request performing the refresh.
///
/// Dropping it without calling [`RefreshLease::resolve`] releases every
/// waiter with [`ApiError::Cancelled`].
pub struct RefreshLease {
    coordinator: Arc<RefreshCoordinator>,
    settled: bool,
}

impl RefreshLease {
    /// Delivers the outcome to every queued request and ends the refresh.
    ///
    /// Returns the number of requests that were waiting.
    pub fn resolve(mut self, outcome: &RefreshOutcome) -> usize {
        self.settled = true;
        let count = self.coordinator.settle(outcome);
        match outcome {
            Ok(_) => tracing::debug!(released = count, "Credential refresh succeeded"),
            Err(error) => tracing::warn!(rejected = count, %error, "Credential refresh failed"),
        }
        count
    }
}

impl Drop for RefreshLease {
    fn drop(&mut self) {
        if !self.settled {
            let count = self.coordinator.settle(&Err(ApiError::Cancelled));
            tracing::warn!(rejected = count, "Credential refresh abandoned");
        }
    }
}

/// Held by a request queued behind an in-flight refresh.
#[derive(Debug)]
pub struct RefreshWaiter {
    receiver: oneshot::Receiver<RefreshOutcome>,
}

impl RefreshWaiter {
    /// Waits for the leader's outcome.
    ///
    /// # Errors
    /// Returns the refresh error, or [`ApiError::Cancelled`] if the leader
    /// went away without resolving.
    pub async fn wait(self) -> RefreshOutcome {
        self.receiver.await.unwrap_or(Err(ApiError::Cancelled))
    }
}
