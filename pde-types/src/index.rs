use crate::range::AxisBox;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::{Index, IndexMut};

/// A `D`-tuple of integer cell coordinates.
///
/// Ordering is last-axis-major: the highest axis index is compared first,
/// so sorting a `Vec<MDIndex<D>>` groups indices by their outermost axis,
/// matching the original's `operator<` on `MDIndex`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MDIndex<const D: usize> {
    coords: [i64; D],
}

impl<const D: usize> MDIndex<D> {
    pub fn new(coords: [i64; D]) -> Self {
        Self { coords }
    }

    pub fn zero() -> Self {
        Self { coords: [0; D] }
    }

    pub fn dim(&self) -> usize {
        D
    }

    pub fn as_slice(&self) -> &[i64; D] {
        &self.coords
    }

    pub fn map(&self, f: impl Fn(usize, i64) -> i64) -> Self {
        let mut out = self.coords;
        for (axis, v) in out.iter_mut().enumerate() {
            *v = f(axis, *v);
        }
        Self::new(out)
    }

    pub fn offset_by(&self, delta: &[i64; D]) -> Self {
        let mut out = self.coords;
        for axis in 0..D {
            out[axis] += delta[axis];
        }
        Self::new(out)
    }
}

impl<const D: usize> Index<usize> for MDIndex<D> {
    type Output = i64;
    fn index(&self, axis: usize) -> &i64 {
        &self.coords[axis]
    }
}

impl<const D: usize> IndexMut<usize> for MDIndex<D> {
    fn index_mut(&mut self, axis: usize) -> &mut i64 {
        &mut self.coords[axis]
    }
}

impl<const D: usize> PartialOrd for MDIndex<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const D: usize> Ord for MDIndex<D> {
    fn cmp(&self, other: &Self) -> Ordering {
        for axis in (0..D).rev() {
            match self.coords[axis].cmp(&other.coords[axis]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

/// An [`MDIndex`] bound to the [`AxisBox`] it walks, supporting `++`/`--`
/// and carry-propagating strided `+=`, for row-major (axis 0 fastest)
/// traversal of a range. Mirrors `DS::RangedIndex`.
///
/// Internally tracked as a linear step count against the range's
/// per-axis extents (`(end-start)/stride`), which makes carry
/// propagation exact and overflow-free instead of chasing per-axis
/// carries by hand.
#[derive(Clone, Copy, Debug)]
pub struct RangedIndex<'a, const D: usize> {
    range: &'a AxisBox<D>,
    extents: [i64; D],
    total: i64,
    /// Current linear step, in `0..=total`. `step == total` means exhausted.
    step: i64,
}

impl<'a, const D: usize> RangedIndex<'a, D> {
    /// Build a ranged index starting at the range's first cell.
    pub fn begin(range: &'a AxisBox<D>) -> Self {
        let extents = range.extents();
        let total = extents.iter().product();
        Self {
            range,
            extents,
            total,
            step: 0,
        }
    }

    pub fn range(&self) -> &'a AxisBox<D> {
        self.range
    }

    pub fn is_exhausted(&self) -> bool {
        self.step >= self.total
    }

    fn pos_at(&self, step: i64) -> MDIndex<D> {
        let mut rem = step;
        let mut coords = [0i64; D];
        for axis in 0..D {
            let e = self.extents[axis].max(1);
            let k = rem % e;
            rem /= e;
            coords[axis] = self.range.start[axis] + k * self.range.stride[axis];
        }
        MDIndex::new(coords)
    }

    /// The cell the index currently points at. Panics if exhausted.
    pub fn get(&self) -> MDIndex<D> {
        assert!(!self.is_exhausted(), "RangedIndex::get on exhausted index");
        self.pos_at(self.step)
    }

    /// Advance (or rewind, for negative `k`) by `k` steps.
    pub fn advance(&mut self, k: i64) {
        self.step = (self.step + k).clamp(0, self.total);
    }

    pub fn increment(&mut self) {
        self.advance(1);
    }

    pub fn decrement(&mut self) {
        self.advance(-1);
    }
}

impl<'a, const D: usize> Iterator for RangedIndex<'a, D> {
    type Item = MDIndex<D>;
    fn next(&mut self) -> Option<MDIndex<D>> {
        if self.is_exhausted() {
            return None;
        }
        let cur = self.pos_at(self.step);
        self.step += 1;
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::AxisBox;

    #[test]
    fn total_order_is_last_axis_major() {
        let a = MDIndex::<2>::new([5, 0]);
        let b = MDIndex::<2>::new([0, 1]);
        assert!(a < b, "axis 1 (last) dominates axis 0");
    }

    #[test]
    fn ranged_index_visits_every_cell_row_major() {
        let r = AxisBox::<2>::new([0, 0], [3, 2]);
        let visited: Vec<_> = RangedIndex::begin(&r).collect();
        assert_eq!(visited.len(), 6);
        assert_eq!(visited[0], MDIndex::new([0, 0]));
        assert_eq!(visited[1], MDIndex::new([1, 0]));
        assert_eq!(visited[3], MDIndex::new([0, 1]));
        assert_eq!(*visited.last().unwrap(), MDIndex::new([2, 1]));
    }

    #[test]
    fn empty_range_yields_nothing() {
        let r = AxisBox::<2>::new([0, 0], [0, 2]);
        assert_eq!(RangedIndex::begin(&r).count(), 0);
    }

    #[test]
    fn advance_and_decrement_round_trip() {
        let r = AxisBox::<2>::new([0, 0], [4, 4]);
        let mut idx = RangedIndex::begin(&r);
        idx.advance(5);
        let p = idx.get();
        idx.decrement();
        idx.increment();
        assert_eq!(idx.get(), p);
    }
}
