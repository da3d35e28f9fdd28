//! Shared reveal override for frozen cells.
//!
//! Frozen snapshots are blitted back verbatim, including any conceal
//! attribute (`Modifier::HIDDEN`) the subtree committed. Terminals render
//! concealed cells invisible, which would defeat the point of holding the
//! frozen frame on screen, so while at least one freeze barrier is live a
//! single shared override is kept installed that strips `HIDDEN` from
//! blitted cells.
//!
//! The override is refcounted rather than per-instance: simultaneous
//! barriers share one entry, installed on the 0 -> 1 crossing and removed on
//! the 1 -> 0 crossing. The registry is an explicit object owned by the
//! composition root (not a module-level global), and uses single-threaded
//! interior mutability - the whole model is cooperative, so the count bump
//! and the presence check happen together under one borrow and no lock is
//! needed.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::style::{Modifier, Style};

/// Stable marker naming the shared override entry.
pub const REVEAL_MARKER: &str = "linger-reveal";

/// The one shared override entry, present while any barrier is live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealOverride {
    /// Stable identifier for the entry.
    pub marker: &'static str,
    /// Patch applied to every blitted snapshot cell.
    pub patch: Style,
}

impl RevealOverride {
    fn install() -> Self {
        Self {
            marker: REVEAL_MARKER,
            patch: Style::new().remove_modifier(Modifier::HIDDEN),
        }
    }
}

#[derive(Debug, Default)]
struct RevealShared {
    count: usize,
    entry: Option<RevealOverride>,
}

/// Refcounted owner of the shared reveal override.
///
/// Clones share the same underlying state; create one per composition root
/// and hand it to every [`crate::FreezeFrame`].
#[derive(Debug, Clone, Default)]
pub struct RevealRegistry {
    shared: Rc<RefCell<RevealShared>>,
}

impl RevealRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a live barrier and returns the handle that keeps the
    /// shared entry installed. The 0 -> 1 crossing installs it; overlapping
    /// acquires see it already present and never double-install.
    pub fn acquire(&self) -> RevealHandle {
        let mut shared = self.shared.borrow_mut();
        shared.count += 1;
        if shared.entry.is_none() {
            shared.entry = Some(RevealOverride::install());
        }
        RevealHandle {
            shared: Rc::clone(&self.shared),
        }
    }

    /// Number of live handles.
    pub fn active(&self) -> usize {
        self.shared.borrow().count
    }

    /// The shared entry, present iff at least one barrier is live.
    pub fn entry(&self) -> Option<RevealOverride> {
        self.shared.borrow().entry.clone()
    }

    /// The style patch for blitted cells, present iff any barrier is live.
    pub fn override_style(&self) -> Option<Style> {
        self.shared.borrow().entry.as_ref().map(|entry| entry.patch)
    }
}

/// Keeps the shared override installed. Dropping the last live handle
/// removes the entry; a handle can only drop once, so release is inherently
/// idempotent.
#[derive(Debug)]
pub struct RevealHandle {
    shared: Rc<RefCell<RevealShared>>,
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        let mut shared = self.shared.borrow_mut();
        shared.count = shared.count.saturating_sub(1);
        if shared.count == 0 {
            shared.entry = None;
        }
    }
}
