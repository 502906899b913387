use crate::error::EquationError;
use pde_types::{AxisBox, MDIndex};

/// Assigns each `(color, MDIndex)` pair a dense, gap-free global row/column
/// integer. Within one block (one MPI rank's share of the system),
/// indices are interleaved per color: for the `n`-th cell (in row-major
/// order) of a block holding `m` colors, the `m` colors occupy
/// consecutive integers `block_offset + n*m .. block_offset + n*m + m`.
/// Across blocks, one block's whole index range precedes the next's
/// (`block_offset` is the running total of every earlier block's size).
///
/// Per-cell interleaving requires every color's assignable range in this
/// block to have the same cell count (`ColoredBlockedMDRangeMapper::new`
/// rejects a mismatch) — true whenever every target shares one mesh, the
/// common case this compiler targets.
pub struct ColoredBlockedMDRangeMapper<const D: usize> {
    ranges: Vec<AxisBox<D>>,
    block_offset: i64,
}

impl<const D: usize> ColoredBlockedMDRangeMapper<D> {
    pub fn new(ranges: Vec<AxisBox<D>>, block_offset: i64) -> Result<Self, EquationError> {
        if let Some(first) = ranges.first() {
            let expected = first.count();
            for (color, r) in ranges.iter().enumerate().skip(1) {
                // Per-cell interleaving needs every color's range to walk
                // in lockstep; requiring exact equality (not just equal
                // count) keeps `linear_position`'s single shared `start`
                // offset meaningful for every color.
                if *r != ranges[0] {
                    return Err(EquationError::MismatchedTargetExtents {
                        color: color as u32,
                        first: expected,
                        other: r.count(),
                    });
                }
            }
        }
        Ok(Self { ranges, block_offset })
    }

    pub fn colors(&self) -> usize {
        self.ranges.len()
    }

    /// Total rows/columns this block contributes.
    pub fn local_count(&self) -> i64 {
        self.ranges.iter().map(|r| r.count()).sum()
    }

    /// Row-major linear position of `idx` within color `color`'s own
    /// assignable range (axis 0 fastest, matching
    /// `pde_types::RangedIndex`'s traversal order).
    fn linear_position(&self, color: u32, idx: MDIndex<D>) -> i64 {
        let range = &self.ranges[color as usize];
        let extents = range.extents();
        let mut stride = 1i64;
        let mut pos = 0i64;
        for axis in 0..D {
            pos += (idx[axis] - range.start[axis]) * stride;
            stride *= extents[axis].max(1);
        }
        pos
    }

    pub fn global(&self, color: u32, idx: MDIndex<D>) -> i64 {
        let n = self.linear_position(color, idx);
        self.block_offset + n * self.ranges.len() as i64 + color as i64
    }

    /// The global row of the first writable cell of color `color`'s
    /// range, in this block's row-major traversal order — the row a
    /// `pinned` equation's nullspace-removal substitution targets.
    pub fn first_row(&self, color: u32) -> Option<i64> {
        let range = self.ranges.get(color as usize)?;
        if range.is_empty() {
            return None;
        }
        Some(self.global(color, MDIndex::new(range.start)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaves_colors_within_a_block() {
        let r = AxisBox::<1>::new([0], [3]);
        let mapper = ColoredBlockedMDRangeMapper::new(vec![r, r], 0).unwrap();
        assert_eq!(mapper.global(0, MDIndex::new([0])), 0);
        assert_eq!(mapper.global(1, MDIndex::new([0])), 1);
        assert_eq!(mapper.global(0, MDIndex::new([1])), 2);
        assert_eq!(mapper.global(1, MDIndex::new([1])), 3);
        assert_eq!(mapper.local_count(), 6);
    }

    #[test]
    fn block_offset_shifts_every_index() {
        let r = AxisBox::<1>::new([0], [3]);
        let mapper = ColoredBlockedMDRangeMapper::new(vec![r], 10).unwrap();
        assert_eq!(mapper.global(0, MDIndex::new([0])), 10);
        assert_eq!(mapper.global(0, MDIndex::new([2])), 12);
    }

    #[test]
    fn mismatched_extents_is_an_error() {
        let a = AxisBox::<1>::new([0], [3]);
        let b = AxisBox::<1>::new([0], [4]);
        assert!(ColoredBlockedMDRangeMapper::new(vec![a, b], 0).is_err());
    }
}
