//! Grace-period wakeup driver for event-driven runtimes.
//!
//! `linger_core::Presence` is deadline-polled, which suits a runtime that
//! ticks every frame. Runtimes that sleep between inbox events (the usual
//! tokio select loop) need a wakeup when the grace period elapses;
//! [`GraceTimer`] provides it as a cancellable scheduled task that sends
//! one [`GraceElapsed`] event into the runtime's inbox.
//!
//! At most one task is live per timer. Arming again or cancelling
//! supersedes the previous task via its cancellation token, and every
//! elapsed event carries a generation id so the reducer ignores anything
//! stale - a cancelled or superseded timer can never force a removal, even
//! if its event was already in flight.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Identifies one armed grace timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Inbox event sent when an armed grace period elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraceElapsed {
    pub id: TimerId,
}

/// Owns the single pending removal task for one gated subtree.
///
/// Call [`GraceTimer::arm`] when the subtree closes, [`GraceTimer::cancel`]
/// when it reopens, and [`GraceTimer::finish`] when a [`GraceElapsed`]
/// event arrives; a `false` return from `finish` means the event was stale
/// and must be ignored. Dropping the timer cancels any live task.
#[derive(Debug)]
pub struct GraceTimer {
    tx: mpsc::UnboundedSender<GraceElapsed>,
    next_id: u64,
    live: Option<(TimerId, CancellationToken)>,
}

impl GraceTimer {
    pub fn new(tx: mpsc::UnboundedSender<GraceElapsed>) -> Self {
        Self {
            tx,
            next_id: 0,
            live: None,
        }
    }

    /// Cancels any live task and schedules a new one for `delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, delay: Duration) -> TimerId {
        self.cancel();
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let token = CancellationToken::new();
        self.live = Some((id, token.clone()));
        let tx = self.tx.clone();
        debug!(?id, ?delay, "arming grace timer");
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    // Receiver gone means the runtime is shutting down.
                    let _ = tx.send(GraceElapsed { id });
                }
            }
        });
        id
    }

    /// Cancels the live task, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some((id, token)) = self.live.take() {
            debug!(?id, "cancelling grace timer");
            token.cancel();
        }
    }

    /// True if `id` is the currently armed timer.
    pub fn is_current(&self, id: TimerId) -> bool {
        self.live.as_ref().is_some_and(|(live, _)| *live == id)
    }

    /// Consumes the live timer if `id` matches it. Returns whether the
    /// elapsed event should be acted on; stale ids return `false`.
    pub fn finish(&mut self, id: TimerId) -> bool {
        if self.is_current(id) {
            self.live = None;
            true
        } else {
            false
        }
    }
}

impl Drop for GraceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
