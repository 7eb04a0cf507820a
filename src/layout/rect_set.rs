//! Set algebra over index-space rectangles.
//!
//! A [`RectSet`] stores a selection as a list of pairwise-disjoint
//! rectangles. Adjacent rectangles are merged opportunistically in a single
//! sorted pass; the result covers exactly the selected cells but is not
//! guaranteed to be a minimal cover.

use super::MergeIndex;
use crate::types::Bounds;

/// `a` minus `b` as at most four disjoint rectangles.
///
/// Order: the strip above `b`'s rows, the strip below, then inside the
/// shared row band the strip left of `b` and the strip right of it.
pub fn subtract(a: &Bounds, b: &Bounds) -> Vec<Bounds> {
    let Some(cut) = a.intersection(b) else {
        return vec![*a];
    };
    let mut out = Vec::with_capacity(4);
    if a.row_begin < cut.row_begin {
        out.push(Bounds { row_end: cut.row_begin - 1, ..*a });
    }
    if cut.row_end < a.row_end {
        out.push(Bounds { row_begin: cut.row_end + 1, ..*a });
    }
    if a.col_begin < cut.col_begin {
        out.push(Bounds {
            row_begin: cut.row_begin,
            row_end: cut.row_end,
            col_begin: a.col_begin,
            col_end: cut.col_begin - 1,
        });
    }
    if cut.col_end < a.col_end {
        out.push(Bounds {
            row_begin: cut.row_begin,
            row_end: cut.row_end,
            col_begin: cut.col_end + 1,
            col_end: a.col_end,
        });
    }
    out
}

/// Sort and merge neighbours in one left-to-right pass.
///
/// A rectangle folds into the previously emitted one only when they share a
/// column range and are row-adjacent, or share a row range and are
/// column-adjacent. Mergeable rectangles separated in sort order stay apart.
pub fn merge_adjacent(mut list: Vec<Bounds>) -> Vec<Bounds> {
    list.sort_by_key(|b| (b.row_begin, b.row_end, b.col_begin, b.col_end));
    let mut out: Vec<Bounds> = Vec::with_capacity(list.len());
    for rect in list {
        if let Some(last) = out.last_mut() {
            if last.stacks_above(&rect) {
                last.row_end = rect.row_end;
                continue;
            }
            if last.sits_left_of(&rect) {
                last.col_end = rect.col_end;
                continue;
            }
        }
        out.push(rect);
    }
    out
}

/// Disjoint rectangles forming a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RectSet {
    rects: Vec<Bounds>,
}

impl RectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `bounds`: only the parts not already covered are appended.
    pub fn select(&mut self, bounds: Bounds) {
        let mut remainders = vec![bounds];
        for existing in &self.rects {
            remainders = remainders.iter().flat_map(|r| subtract(r, existing)).collect();
            if remainders.is_empty() {
                return;
            }
        }
        let mut all = std::mem::take(&mut self.rects);
        all.extend(remainders);
        self.rects = merge_adjacent(all);
    }

    /// Remove `bounds` from every rectangle.
    pub fn unselect(&mut self, bounds: Bounds) {
        self.rects = self.rects.iter().flat_map(|r| subtract(r, &bounds)).collect();
    }

    /// Replace the whole selection with one rectangle.
    pub fn reset(&mut self, bounds: Bounds) {
        self.rects.clear();
        self.rects.push(bounds);
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Point containment. For a merged cell any rectangle that merely
    /// intersects the merge counts, so a partially selected merge paints as
    /// selected.
    pub fn contains(&self, row: u32, col: u32, merges: Option<&MergeIndex>) -> bool {
        if let Some(merge) = merges.and_then(|m| m.get(row, col)) {
            let area = merge.bounds();
            return self.rects.iter().any(|r| r.intersects(&area));
        }
        self.rects.iter().any(|r| r.contains(row, col))
    }

    /// Whether any part of `bounds` is selected.
    pub fn intersects(&self, bounds: &Bounds) -> bool {
        self.rects.iter().any(|r| r.intersects(bounds))
    }

    pub fn rects(&self) -> &[Bounds] {
        &self.rects
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bounds> {
        self.rects.iter()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Number of selected cells.
    pub fn area(&self) -> u64 {
        self.rects.iter().map(Bounds::area).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::Merge;

    #[test]
    fn test_subtract_disjoint() {
        let a = Bounds::new(0, 1, 0, 1);
        let b = Bounds::new(5, 6, 5, 6);
        assert_eq!(subtract(&a, &b), vec![a]);
    }

    #[test]
    fn test_subtract_center_hole() {
        let a = Bounds::new(0, 4, 0, 4);
        let b = Bounds::cell(2, 2);
        let parts = subtract(&a, &b);
        assert_eq!(
            parts,
            vec![
                Bounds::new(0, 1, 0, 4),
                Bounds::new(3, 4, 0, 4),
                Bounds::new(2, 2, 0, 1),
                Bounds::new(2, 2, 3, 4),
            ]
        );
        assert_eq!(parts.iter().map(Bounds::area).sum::<u64>(), 24);
    }

    #[test]
    fn test_subtract_covering() {
        let a = Bounds::new(1, 2, 1, 2);
        assert!(subtract(&a, &Bounds::new(0, 5, 0, 5)).is_empty());
    }

    #[test]
    fn test_merge_adjacent_rows_and_cols() {
        let merged = merge_adjacent(vec![
            Bounds::new(2, 3, 0, 1),
            Bounds::new(0, 1, 0, 1),
            Bounds::new(4, 4, 0, 1),
        ]);
        assert_eq!(merged, vec![Bounds::new(0, 4, 0, 1)]);

        let merged = merge_adjacent(vec![Bounds::new(0, 0, 3, 5), Bounds::new(0, 0, 0, 2)]);
        assert_eq!(merged, vec![Bounds::new(0, 0, 0, 5)]);
    }

    #[test]
    fn test_merge_adjacent_is_single_pass() {
        // (0..0, 0..1) and (1..1, 0..1) are row-adjacent but (0..1, 2..2)
        // sorts between them, so the pass leaves all three.
        let merged = merge_adjacent(vec![
            Bounds::new(0, 0, 0, 1),
            Bounds::new(0, 1, 2, 2),
            Bounds::new(1, 1, 0, 1),
        ]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_select_overlapping() {
        let mut set = RectSet::new();
        set.select(Bounds::new(0, 2, 0, 2));
        set.select(Bounds::new(1, 3, 1, 3));
        assert_eq!(set.area(), 9 + 9 - 4);
        for (i, a) in set.rects().iter().enumerate() {
            for b in set.rects().iter().skip(i + 1) {
                assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn test_select_already_covered_is_noop() {
        let mut set = RectSet::new();
        set.select(Bounds::new(0, 5, 0, 5));
        let before = set.clone();
        set.select(Bounds::new(1, 2, 1, 2));
        assert_eq!(set, before);
    }

    #[test]
    fn test_select_then_unselect_round_trip() {
        let mut set = RectSet::new();
        set.select(Bounds::new(3, 7, 2, 9));
        set.unselect(Bounds::new(3, 7, 2, 9));
        assert!(set.is_empty());
    }

    #[test]
    fn test_unselect_punches_hole() {
        let mut set = RectSet::new();
        set.select(Bounds::new(0, 2, 0, 2));
        set.unselect(Bounds::cell(1, 1));
        assert_eq!(set.area(), 8);
        assert!(!set.contains(1, 1, None));
        assert!(set.contains(0, 0, None));
    }

    #[test]
    fn test_contains_merge_inclusive() {
        let merges = MergeIndex::new(&[Merge::new(2, 2, 2, 2).unwrap()]);
        let mut set = RectSet::new();
        set.select(Bounds::cell(2, 2));
        for r in 2..=3 {
            for c in 2..=3 {
                assert!(set.contains(r, c, Some(&merges)), "({r}, {c})");
            }
        }
        assert!(!set.contains(3, 3, None));
        assert!(!set.contains(4, 4, Some(&merges)));
    }
}
