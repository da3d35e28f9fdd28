//! Lifecycle state machine for delayed unmount of gated UI subtrees.
//!
//! When a boolean visibility flag flips to false, a naive renderer removes
//! the gated subtree on the same pass, so an exit transition never gets a
//! chance to play. [`Presence`] delays the removal: closing enters a frozen
//! grace period during which the subtree must stay mounted, and only after
//! the grace period elapses (with no intervening reopen) does it report that
//! the subtree should leave the tree.
//!
//! This crate is pure state: no clock reads, no timers, no rendering
//! dependency. Drivers feed it `Instant` values and decide how to schedule
//! wakeups (see `linger-tui` for a ratatui/tokio driver).

pub mod presence;

pub use presence::{DEFAULT_GRACE, MAX_GRACE, Presence};
