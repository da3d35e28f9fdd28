//! Presence state machine for a boolean-gated subtree.
//!
//! One [`Presence`] instance tracks one gated subtree. The caller owns the
//! open/closed signal and calls [`Presence::set_open`] whenever it changes;
//! the machine derives two booleans from it:
//!
//! - `should_render`: the subtree must currently exist in the render tree.
//! - `frozen`: the subtree is in its post-close grace period (mounted, but
//!   holding its last output while the exit transition plays).
//!
//! Removal is deadline-based rather than callback-based: closing arms a
//! single `remove_at` deadline, and the driver's tick (or a scheduled wakeup
//! derived from [`Presence::deadline`]) observes expiry. Cancellation is
//! assigning `None`, so a cancelled deadline can never fire late and there
//! is no callback to orphan on drop.

use std::time::{Duration, Instant};

/// Grace period applied when none is configured.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(300);

/// Upper bound for the grace period. Out-of-range values are clamped
/// silently, never rejected.
pub const MAX_GRACE: Duration = Duration::from_millis(10_000);

/// Lifecycle state for one boolean-gated subtree.
///
/// Invariants, held at every observable state:
/// - `frozen` implies `should_render` (a non-existent subtree is never
///   frozen).
/// - While open: `should_render` and not `frozen` (opening overrides any
///   in-progress grace period).
/// - At most one pending deadline; opening or a fresh close clears the
///   previous one before arming or skipping a new one.
#[derive(Debug, Clone)]
pub struct Presence {
    open: bool,
    should_render: bool,
    frozen: bool,
    remove_at: Option<Instant>,
    grace: Duration,
}

impl Presence {
    /// Creates the state for a subtree whose signal currently reads `open`,
    /// with the default grace period.
    pub fn new(open: bool) -> Self {
        Self::with_grace(open, DEFAULT_GRACE)
    }

    /// Creates the state with an explicit grace period (clamped to
    /// [`MAX_GRACE`]).
    pub fn with_grace(open: bool, grace: Duration) -> Self {
        Self {
            open,
            should_render: open,
            frozen: false,
            remove_at: None,
            grace: grace.min(MAX_GRACE),
        }
    }

    /// Whether the subtree must currently be instantiated.
    pub fn should_render(&self) -> bool {
        self.should_render
    }

    /// Whether the subtree is in its post-close grace period.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// The last observed open signal.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The configured grace period.
    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// The pending removal deadline, if closing. Event-driven runtimes use
    /// this to schedule a wakeup instead of polling [`Presence::tick`].
    pub fn deadline(&self) -> Option<Instant> {
        self.remove_at
    }

    /// Updates the grace period, clamped to [`MAX_GRACE`]. Applies to
    /// subsequent closes; an already-armed deadline is left as scheduled.
    pub fn set_grace(&mut self, grace: Duration) {
        self.grace = grace.min(MAX_GRACE);
    }

    /// Drives the machine from the caller's open signal.
    ///
    /// Opening takes effect synchronously: the deadline is cleared, the
    /// subtree renders, and any in-progress grace period ends immediately.
    /// Closing while the subtree exists freezes it and (re-)arms the
    /// removal deadline at `now + grace`; closing again while already
    /// closing restarts the grace period from the latest close. Closing
    /// while the subtree is already gone is a no-op.
    pub fn set_open(&mut self, open: bool, now: Instant) {
        self.open = open;
        if open {
            self.remove_at = None;
            self.should_render = true;
            self.frozen = false;
        } else if self.should_render {
            self.frozen = true;
            self.remove_at = Some(now + self.grace);
        }
    }

    /// Observes the clock. If the removal deadline has been reached the
    /// subtree leaves the tree (`should_render` and `frozen` both drop to
    /// false) and `true` is returned; otherwise this is a no-op.
    ///
    /// A zero grace period expires on the first tick at or after the close
    /// instant.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.remove_at {
            Some(at) if now >= at => {
                self.remove_at = None;
                self.should_render = false;
                self.frozen = false;
                true
            }
            _ => false,
        }
    }
}
