//! The freeze barrier: hold a subtree's last committed cells while frozen.
//!
//! ratatui has no retained tree to suspend, so freezing is an explicit
//! snapshot: while unfrozen the subtree draws normally and its committed
//! cells are captured; while frozen the draw code is never invoked and the
//! captured cells are blitted back verbatim, with the shared reveal
//! override applied so concealed content stays visible for the exit
//! transition. See `reveal` for the override bookkeeping.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::reveal::{RevealHandle, RevealRegistry};

/// Retained state for one freeze barrier instance: the wrapper around a
/// single boolean-gated subtree.
///
/// Holds the subtree's last committed output and, while live, a handle
/// keeping the shared reveal override installed. The handle is acquired at
/// construction - before any frame could be committed - so the override is
/// present before the first frozen cell could be painted. Dropping the
/// frame releases it.
#[derive(Debug)]
pub struct FreezeFrame {
    snapshot: Option<Buffer>,
    registry: Option<RevealRegistry>,
    _reveal: Option<RevealHandle>,
}

impl FreezeFrame {
    /// A barrier participating in the shared reveal override.
    pub fn new(registry: &RevealRegistry) -> Self {
        Self {
            snapshot: None,
            _reveal: Some(registry.acquire()),
            registry: Some(registry.clone()),
        }
    }

    /// A barrier with no visual context (non-interactive or test use).
    /// Structural behavior - when the subtree draws and when it holds - is
    /// unchanged; the reveal override is simply a no-op.
    pub fn headless() -> Self {
        Self {
            snapshot: None,
            registry: None,
            _reveal: None,
        }
    }

    /// Whether an unfrozen commit has been captured yet.
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Renders the gated subtree, or holds its last committed output.
    ///
    /// While unfrozen, `draw` renders into `area` and the committed cells
    /// are captured as the new snapshot. While frozen, `draw` is never
    /// invoked: the previous snapshot is blitted back at its recorded
    /// position (clipped to the current buffer) and receives no further
    /// updates. Freezing before any unfrozen commit draws nothing.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        frozen: bool,
        draw: impl FnOnce(&mut Frame, Rect),
    ) {
        if frozen {
            self.blit(frame.buffer_mut());
        } else {
            draw(frame, area);
            self.capture(frame.buffer_mut(), area);
        }
    }

    fn capture(&mut self, buf: &Buffer, area: Rect) {
        let area = area.intersection(buf.area);
        let mut snapshot = Buffer::empty(area);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let (Some(dst), Some(src)) = (snapshot.cell_mut((x, y)), buf.cell((x, y))) {
                    *dst = src.clone();
                }
            }
        }
        self.snapshot = Some(snapshot);
    }

    fn blit(&self, buf: &mut Buffer) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let patch = self
            .registry
            .as_ref()
            .and_then(RevealRegistry::override_style);
        // Clip to the live buffer: a resize while frozen must not write out
        // of bounds.
        let area = snapshot.area.intersection(buf.area);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let (Some(src), Some(dst)) = (snapshot.cell((x, y)), buf.cell_mut((x, y))) {
                    *dst = src.clone();
                    if let Some(patch) = patch {
                        dst.set_style(patch);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::{Modifier, Style};
    use ratatui::widgets::Paragraph;

    use super::*;

    fn terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(12, 3)).expect("test terminal")
    }

    fn row(buf: &Buffer, y: u16, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, y)).expect("cell in bounds").symbol())
            .collect()
    }

    fn draw_pass(
        terminal: &mut Terminal<TestBackend>,
        freeze: &mut FreezeFrame,
        frozen: bool,
        text: &str,
    ) {
        let widget = Paragraph::new(text.to_owned());
        terminal
            .draw(|frame| {
                let area = Rect::new(0, 0, 12, 1);
                freeze.render(frame, area, frozen, |frame, area| {
                    frame.render_widget(&widget, area);
                });
            })
            .expect("draw");
    }

    #[test]
    fn unfrozen_renders_fresh_content() {
        let mut terminal = terminal();
        let mut freeze = FreezeFrame::headless();

        draw_pass(&mut terminal, &mut freeze, false, "hello");
        assert_eq!(row(terminal.backend().buffer(), 0, 5), "hello");
        assert!(freeze.has_snapshot());
    }

    #[test]
    fn frozen_holds_last_committed_output() {
        let mut terminal = terminal();
        let mut freeze = FreezeFrame::headless();

        draw_pass(&mut terminal, &mut freeze, false, "first");

        // The frozen pass must not invoke the subtree's draw code.
        let mut drawn = false;
        terminal
            .draw(|frame| {
                freeze.render(frame, Rect::new(0, 0, 12, 1), true, |_, _| drawn = true);
            })
            .expect("draw");

        assert!(!drawn);
        assert_eq!(row(terminal.backend().buffer(), 0, 5), "first");
    }

    #[test]
    fn snapshot_is_not_updated_while_frozen() {
        let mut terminal = terminal();
        let mut freeze = FreezeFrame::headless();

        draw_pass(&mut terminal, &mut freeze, false, "stale");
        draw_pass(&mut terminal, &mut freeze, true, "fresh");
        draw_pass(&mut terminal, &mut freeze, true, "fresh");

        assert_eq!(row(terminal.backend().buffer(), 0, 5), "stale");
    }

    #[test]
    fn unfreezing_resumes_fresh_rendering() {
        let mut terminal = terminal();
        let mut freeze = FreezeFrame::headless();

        draw_pass(&mut terminal, &mut freeze, false, "before");
        draw_pass(&mut terminal, &mut freeze, true, "ignored");
        draw_pass(&mut terminal, &mut freeze, false, "after");

        assert_eq!(row(terminal.backend().buffer(), 0, 6), "after ");
    }

    #[test]
    fn frozen_without_snapshot_draws_nothing() {
        let mut terminal = terminal();
        let mut freeze = FreezeFrame::headless();

        let mut drawn = false;
        terminal
            .draw(|frame| {
                freeze.render(frame, Rect::new(0, 0, 12, 1), true, |_, _| drawn = true);
            })
            .expect("draw");

        assert!(!drawn);
        assert!(!freeze.has_snapshot());
        assert_eq!(row(terminal.backend().buffer(), 0, 12), " ".repeat(12));
    }

    #[test]
    fn reveal_override_strips_conceal_from_blitted_cells() {
        let registry = RevealRegistry::new();
        let mut terminal = terminal();
        let mut freeze = FreezeFrame::new(&registry);

        let concealed = Paragraph::new("secret").style(Style::new().add_modifier(Modifier::HIDDEN));
        terminal
            .draw(|frame| {
                let area = Rect::new(0, 0, 12, 1);
                freeze.render(frame, area, false, |frame, area| {
                    frame.render_widget(&concealed, area);
                });
            })
            .expect("draw");

        let committed = terminal.backend().buffer().cell((0, 0)).expect("cell");
        assert!(committed.modifier.contains(Modifier::HIDDEN));

        terminal
            .draw(|frame| {
                freeze.render(frame, Rect::new(0, 0, 12, 1), true, |_, _| {});
            })
            .expect("draw");

        let blitted = terminal.backend().buffer().cell((0, 0)).expect("cell");
        assert_eq!(blitted.symbol(), "s");
        assert!(!blitted.modifier.contains(Modifier::HIDDEN));
    }

    #[test]
    fn headless_blit_leaves_conceal_in_place() {
        let mut terminal = terminal();
        let mut freeze = FreezeFrame::headless();

        let concealed = Paragraph::new("secret").style(Style::new().add_modifier(Modifier::HIDDEN));
        terminal
            .draw(|frame| {
                let area = Rect::new(0, 0, 12, 1);
                freeze.render(frame, area, false, |frame, area| {
                    frame.render_widget(&concealed, area);
                });
            })
            .expect("draw");
        terminal
            .draw(|frame| {
                freeze.render(frame, Rect::new(0, 0, 12, 1), true, |_, _| {});
            })
            .expect("draw");

        let blitted = terminal.backend().buffer().cell((0, 0)).expect("cell");
        assert!(blitted.modifier.contains(Modifier::HIDDEN));
    }

    #[test]
    fn frame_lifecycle_drives_registry_count() {
        let registry = RevealRegistry::new();
        let first = FreezeFrame::new(&registry);
        let second = FreezeFrame::new(&registry);
        assert_eq!(registry.active(), 2);
        assert!(registry.entry().is_some());

        drop(first);
        assert_eq!(registry.active(), 1);
        assert!(registry.entry().is_some());

        drop(second);
        assert_eq!(registry.active(), 0);
        assert!(registry.entry().is_none());
    }

    #[test]
    fn headless_frames_do_not_touch_the_registry() {
        let registry = RevealRegistry::new();
        let frame = FreezeFrame::headless();
        assert_eq!(registry.active(), 0);
        drop(frame);
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn blit_clips_to_a_shrunken_buffer() {
        let mut terminal = terminal();
        let mut freeze = FreezeFrame::headless();
        draw_pass(&mut terminal, &mut freeze, false, "wide content");

        let mut small = Terminal::new(TestBackend::new(4, 1)).expect("test terminal");
        small
            .draw(|frame| {
                freeze.render(frame, Rect::new(0, 0, 4, 1), true, |_, _| {});
            })
            .expect("draw");

        assert_eq!(row(small.backend().buffer(), 0, 4), "wide");
    }
}
