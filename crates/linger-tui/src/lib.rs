//! Freeze barrier and grace-timer plumbing for ratatui apps.
//!
//! Pairs with `linger-core`: the caller derives `{should_render, frozen}`
//! from a [`linger_core::Presence`], instantiates the gated subtree only
//! while `should_render` is true, and routes `frozen` into a
//! [`FreezeFrame`]. While frozen, the frame holds the subtree's last
//! committed cells on screen instead of invoking its draw code, so an exit
//! transition has something to play over.
//!
//! - `reveal`: refcounted registry for the shared reveal override that keeps
//!   frozen cells visible (strips terminal conceal).
//! - `freeze`: the barrier itself (snapshot capture and blit).
//! - `timer`: tokio wakeup driver for event-driven runtimes that sleep
//!   between inbox events instead of ticking every frame.

pub mod freeze;
pub mod reveal;
pub mod timer;

pub use freeze::FreezeFrame;
pub use reveal::{REVEAL_MARKER, RevealHandle, RevealOverride, RevealRegistry};
pub use timer::{GraceElapsed, GraceTimer, TimerId};
