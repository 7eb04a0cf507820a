//! Keyboard navigation state machine.
//!
//! The controller tracks two precise positions: the *active* cell (what has
//! keyboard focus) and the *cursor* (the moving end of an extended
//! selection). Both are exact (row, col) pairs even when they sit inside a
//! merge, so leaving a merge keeps the orthogonal coordinate the user came
//! in with. The anchor of an extended selection exists only while Shift is
//! held; a plain move clears it and the active cell anchors again.

use crate::layout::{Axis, MergeIndex};
use crate::types::{Bounds, Modifiers, NavKey, SelectionMode};

/// Everything a transition reads from the grid.
pub struct NavContext<'a> {
    pub rows: &'a mut Axis,
    pub cols: &'a mut Axis,
    pub merges: &'a MergeIndex,
    /// Height walked by PageUp/PageDown.
    pub page_extent: f64,
    pub mode: SelectionMode,
}

/// Result of a transition the grid must apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavMove {
    /// Exact landing position.
    pub cursor: (u32, u32),
    /// Rectangle of the focused cell (a merge, or the cell itself).
    pub focus: Bounds,
    pub selection: Bounds,
    /// Selection grew from the anchor; focus did not move.
    pub extended: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationController {
    active: Option<(u32, u32)>,
    cursor: Option<(u32, u32)>,
    focus: Option<Bounds>,
    previous: Option<Bounds>,
    anchor: Option<(u32, u32)>,
    selection: Option<Bounds>,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Option<Bounds> {
        self.focus
    }

    pub fn previous_focus(&self) -> Option<Bounds> {
        self.previous
    }

    pub fn active(&self) -> Option<(u32, u32)> {
        self.active
    }

    pub fn cursor(&self) -> Option<(u32, u32)> {
        self.cursor
    }

    pub fn anchor(&self) -> Option<(u32, u32)> {
        self.anchor
    }

    pub fn selection(&self) -> Option<Bounds> {
        self.selection
    }

    /// Focus a cell directly (pointer press, programmatic focus).
    pub fn set_focus(&mut self, row: u32, col: u32, merges: &MergeIndex) -> Bounds {
        let owner = merges.owner_bounds(row, col);
        if self.focus != Some(owner) {
            self.previous = self.focus;
        }
        self.focus = Some(owner);
        self.active = Some((row, col));
        self.cursor = Some((row, col));
        self.anchor = None;
        self.selection = Some(owner);
        owner
    }

    /// Grow the selection from the anchor (or the active cell) to (row, col).
    pub fn extend_to(&mut self, row: u32, col: u32, merges: &MergeIndex) -> Bounds {
        let anchor = *self
            .anchor
            .get_or_insert(self.active.unwrap_or((row, col)));
        let selection = merges.expand(Bounds::new(anchor.0, row, anchor.1, col));
        self.cursor = Some((row, col));
        self.selection = Some(selection);
        if self.focus.is_none() {
            self.focus = Some(merges.owner_bounds(anchor.0, anchor.1));
            self.active = Some(anchor);
        }
        selection
    }

    /// Forget everything (merges or axes were replaced).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drop state pointing past the end of shrunk axes.
    pub fn clamp_to(&mut self, rows: u32, cols: u32) {
        let fits = |p: Option<(u32, u32)>| p.map_or(true, |(r, c)| r < rows && c < cols);
        if !fits(self.active) || !fits(self.cursor) || !fits(self.anchor) {
            self.reset();
        }
    }

    /// Apply a navigation key. `None` means nothing moved and the host
    /// should let the key through.
    pub fn handle_key(&mut self, key: NavKey, mods: Modifiers, ctx: &mut NavContext<'_>) -> Option<NavMove> {
        let rows = ctx.rows.len();
        let cols = ctx.cols.len();
        if rows == 0 || cols == 0 {
            return None;
        }
        let extend = mods.shift && ctx.mode.allows_extend() && self.active.is_some();

        let Some(active) = self.active else {
            let row = probe(ctx.rows, 0, true)?;
            let col = probe(ctx.cols, 0, true)?;
            return Some(self.commit((row, col), ctx.merges));
        };
        let from = if extend { self.cursor.unwrap_or(active) } else { active };
        let (row, col) = (from.0.min(rows - 1), from.1.min(cols - 1));
        let current = ctx.merges.owner_bounds(row, col);

        let target = match key {
            NavKey::ArrowLeft => (row, probe(ctx.cols, current.col_begin.checked_sub(1)?, false)?),
            NavKey::ArrowRight => (row, probe(ctx.cols, current.col_end.checked_add(1)?, true)?),
            NavKey::ArrowUp => (probe(ctx.rows, current.row_begin.checked_sub(1)?, false)?, col),
            NavKey::ArrowDown => (probe(ctx.rows, current.row_end.checked_add(1)?, true)?, col),
            NavKey::Home => (row, probe_either(ctx.cols, 0, true)?),
            NavKey::End => (row, probe_either(ctx.cols, cols - 1, false)?),
            NavKey::First => (probe_either(ctx.rows, 0, true)?, col),
            NavKey::Last => (probe_either(ctx.rows, rows - 1, false)?, col),
            NavKey::PageDown => {
                let landing = page(ctx.rows, current.row_end, ctx.page_extent, true);
                (probe_either(ctx.rows, landing, true)?, col)
            }
            NavKey::PageUp => {
                let landing = page(ctx.rows, current.row_begin, ctx.page_extent, false);
                (probe_either(ctx.rows, landing, false)?, col)
            }
        };

        if extend {
            let anchor = self.anchor.unwrap_or(active);
            let selection = ctx.merges.expand(Bounds::new(anchor.0, target.0, anchor.1, target.1));
            if self.selection == Some(selection) {
                return None;
            }
            self.anchor = Some(anchor);
            self.cursor = Some(target);
            self.selection = Some(selection);
            let focus = self.focus.unwrap_or_else(|| ctx.merges.owner_bounds(active.0, active.1));
            tracing::debug!(?key, ?target, ?selection, "extend selection");
            return Some(NavMove { cursor: target, focus, selection, extended: true });
        }

        let landing = ctx.merges.owner_bounds(target.0, target.1);
        if self.focus == Some(landing) && self.selection == Some(landing) {
            return None;
        }
        tracing::debug!(?key, ?target, "move focus");
        Some(self.commit(target, ctx.merges))
    }

    fn commit(&mut self, target: (u32, u32), merges: &MergeIndex) -> NavMove {
        let focus = self.set_focus(target.0, target.1, merges);
        NavMove { cursor: target, focus, selection: focus, extended: false }
    }
}

/// Nearest interactive index from `from` in one direction.
fn probe(axis: &Axis, from: u32, forward: bool) -> Option<u32> {
    axis.probe_interactive(from, forward)
}

/// Like [`probe`], falling back to the opposite direction.
fn probe_either(axis: &Axis, from: u32, forward: bool) -> Option<u32> {
    probe(axis, from, forward).or_else(|| probe(axis, from, !forward))
}

/// Row reached by walking `extent` pixels from the edge of `row`.
fn page(rows: &mut Axis, row: u32, extent: f64, forward: bool) -> u32 {
    let last = rows.len().saturating_sub(1);
    if forward {
        let start = rows.end_of(row).unwrap_or(0.0);
        rows.index_at(start + extent - 1.0).map_or(last, |r| r.max(row.saturating_add(1)).min(last))
    } else {
        let start = rows.offset_of(row).unwrap_or(0.0);
        let pos = start - extent;
        if pos <= 0.0 {
            return 0;
        }
        rows.index_at(pos).map_or(0, |r| r.min(row.saturating_sub(1)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::layout::Visibility;
    use crate::types::Merge;
    use test_case::test_case;

    struct Fixture {
        rows: Axis,
        cols: Axis,
        merges: MergeIndex,
        nav: NavigationController,
    }

    impl Fixture {
        fn new(n: u32, merges: &[Merge]) -> Self {
            let merges = MergeIndex::new(merges);
            Self {
                rows: Axis::uniform(n, 20.0).unwrap(),
                cols: Axis::uniform(n, 50.0).unwrap(),
                merges,
                nav: NavigationController::new(),
            }
        }

        fn at(mut self, row: u32, col: u32) -> Self {
            self.nav.set_focus(row, col, &self.merges);
            self
        }

        fn press(&mut self, key: NavKey, mods: Modifiers) -> Option<NavMove> {
            let mut ctx = NavContext {
                rows: &mut self.rows,
                cols: &mut self.cols,
                merges: &self.merges,
                page_extent: 100.0,
                mode: SelectionMode::Extended,
            };
            self.nav.handle_key(key, mods, &mut ctx)
        }
    }

    #[test_case(NavKey::ArrowRight, (3, 4) ; "right")]
    #[test_case(NavKey::ArrowLeft, (3, 2) ; "left")]
    #[test_case(NavKey::ArrowUp, (2, 3) ; "up")]
    #[test_case(NavKey::ArrowDown, (4, 3) ; "down")]
    #[test_case(NavKey::Home, (3, 0) ; "home")]
    #[test_case(NavKey::End, (3, 9) ; "end")]
    #[test_case(NavKey::First, (0, 3) ; "first")]
    #[test_case(NavKey::Last, (9, 3) ; "last")]
    #[test_case(NavKey::PageDown, (8, 3) ; "page down")]
    #[test_case(NavKey::PageUp, (0, 3) ; "page up")]
    fn test_plain_moves(key: NavKey, expected: (u32, u32)) {
        let mut f = Fixture::new(10, &[]).at(3, 3);
        let mv = f.press(key, Modifiers::NONE).unwrap();
        assert_eq!(mv.cursor, expected);
        assert!(!mv.extended);
        assert_eq!(f.nav.anchor(), None);
    }

    #[test]
    fn test_edge_reports_no_movement() {
        let mut f = Fixture::new(5, &[]).at(0, 0);
        assert!(f.press(NavKey::ArrowLeft, Modifiers::NONE).is_none());
        assert!(f.press(NavKey::ArrowUp, Modifiers::NONE).is_none());
        assert!(f.press(NavKey::Home, Modifiers::NONE).is_none());
    }

    #[test]
    fn test_skips_hidden_and_collapsed() {
        let mut f = Fixture::new(6, &[]).at(0, 0);
        f.cols.set_visibility(1, Visibility::Hidden).unwrap();
        f.cols.set_visibility(2, Visibility::Collapsed).unwrap();
        assert_eq!(f.press(NavKey::ArrowRight, Modifiers::NONE).unwrap().cursor, (0, 3));
        f.cols.set_visibility(5, Visibility::Hidden).unwrap();
        assert_eq!(f.press(NavKey::End, Modifiers::NONE).unwrap().cursor, (0, 4));
    }

    #[test]
    fn test_merge_selected_whole_and_exit_keeps_row() {
        let mut f = Fixture::new(6, &[Merge::new(2, 2, 2, 2).unwrap()]).at(3, 1);
        let mv = f.press(NavKey::ArrowRight, Modifiers::NONE).unwrap();
        assert_eq!(mv.focus, Bounds::new(2, 3, 2, 3));
        assert_eq!(mv.selection, Bounds::new(2, 3, 2, 3));
        assert_eq!(mv.cursor, (3, 2));
        let mv = f.press(NavKey::ArrowRight, Modifiers::NONE).unwrap();
        assert_eq!(mv.cursor, (3, 4));
        assert_eq!(mv.focus, Bounds::cell(3, 4));
    }

    #[test]
    fn test_shift_extends_from_anchor_and_shrinks_back() {
        let mut f = Fixture::new(8, &[]).at(1, 1);
        let mv = f.press(NavKey::ArrowRight, Modifiers::SHIFT).unwrap();
        assert!(mv.extended);
        assert_eq!(mv.selection, Bounds::new(1, 1, 1, 2));
        assert_eq!(f.nav.anchor(), Some((1, 1)));
        f.press(NavKey::ArrowDown, Modifiers::SHIFT).unwrap();
        assert_eq!(f.nav.selection(), Some(Bounds::new(1, 2, 1, 2)));
        let mv = f.press(NavKey::ArrowLeft, Modifiers::SHIFT).unwrap();
        assert_eq!(mv.selection, Bounds::new(1, 2, 1, 1));
        // Focus never moved while extending.
        assert_eq!(f.nav.focus(), Some(Bounds::cell(1, 1)));
        // A plain move collapses back to one cell and clears the anchor.
        let mv = f.press(NavKey::ArrowDown, Modifiers::NONE).unwrap();
        assert_eq!(mv.selection, Bounds::cell(2, 1));
        assert_eq!(f.nav.anchor(), None);
    }

    #[test]
    fn test_extend_through_merge_grows_to_cover_it() {
        let mut f = Fixture::new(8, &[Merge::new(2, 2, 2, 2).unwrap()]).at(2, 1);
        let mv = f.press(NavKey::ArrowRight, Modifiers::SHIFT).unwrap();
        assert_eq!(mv.selection, Bounds::new(2, 3, 1, 3));
        // Shrinking back lands on the exact anchor column again.
        let mv = f.press(NavKey::ArrowLeft, Modifiers::SHIFT).unwrap();
        assert_eq!(mv.selection, Bounds::cell(2, 1));
    }

    #[test]
    fn test_single_mode_ignores_shift() {
        let mut f = Fixture::new(5, &[]).at(0, 0);
        let mut ctx = NavContext {
            rows: &mut f.rows,
            cols: &mut f.cols,
            merges: &f.merges,
            page_extent: 100.0,
            mode: SelectionMode::Single,
        };
        let mv = f.nav.handle_key(NavKey::ArrowDown, Modifiers::SHIFT, &mut ctx).unwrap();
        assert!(!mv.extended);
        assert_eq!(mv.selection, Bounds::cell(1, 0));
    }

    #[test]
    fn test_first_key_without_focus_lands_on_origin() {
        let mut f = Fixture::new(5, &[]);
        let mv = f.press(NavKey::ArrowDown, Modifiers::NONE).unwrap();
        assert_eq!(mv.cursor, (0, 0));
    }

    #[test]
    fn test_clamp_resets_out_of_range_state() {
        let mut f = Fixture::new(10, &[]).at(8, 8);
        f.nav.clamp_to(5, 5);
        assert_eq!(f.nav.focus(), None);
    }
}
