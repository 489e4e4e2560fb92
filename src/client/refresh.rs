use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

use crate::error::AuthError;

/// Outcome of one refresh: the new access token, or the reason the session ended.
pub(crate) type RefreshOutcome = Result<String, AuthError>;

/// Single-flight gate for access-token refresh.
///
/// At most one caller holds a [`RefreshLeader`] at a time. Everyone else arriving while it is
/// outstanding gets a receiver that resolves, in arrival order, with the leader's outcome.
#[derive(Debug, Default)]
pub(crate) struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

#[derive(Debug, Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

pub(crate) enum RefreshTicket<'a> {
    Leader(RefreshLeader<'a>),
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshCoordinator {
    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn join(&self) -> RefreshTicket<'_> {
        let mut state = self.lock();
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            RefreshTicket::Waiter(rx)
        } else {
            state.in_flight = true;
            RefreshTicket::Leader(RefreshLeader {
                coordinator: self,
                settled: false,
            })
        }
    }

    pub(crate) fn is_in_flight(&self) -> bool {
        self.lock().in_flight
    }

    pub(crate) fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    fn settle(&self, outcome: &RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        let count = waiters.len();
        for waiter in waiters {
            // A waiter whose caller went away is simply skipped.
            let _ = waiter.send(outcome.clone());
        }
        count
    }
}

/// Held by the one caller performing the refresh. Dropping it unsettled fails all waiters.
pub(crate) struct RefreshLeader<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshLeader<'_> {
    /// Clears the in-flight mark and wakes every waiter. Returns how many were woken.
    pub(crate) fn settle(mut self, outcome: &RefreshOutcome) -> usize {
        self.settled = true;
        self.coordinator.settle(outcome)
    }
}

impl Drop for RefreshLeader<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator.settle(&Err(AuthError::refresh_failed(
                None,
                "token refresh was abandoned",
            )));
        }
    }
}

/// Awaits a waiter ticket; a vanished leader counts as a failed refresh.
pub(crate) async fn wait_for(rx: oneshot::Receiver<RefreshOutcome>) -> RefreshOutcome {
    rx.await.unwrap_or_else(|_| {
        Err(AuthError::refresh_failed(
            None,
            "token refresh was abandoned",
        ))
    })
}
