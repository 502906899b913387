use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// An axis-aligned, half-open, strided box over `D` axes.
///
/// Cell `i` is in the range iff `start[k] <= i[k] < end[k]` for every axis
/// `k`, stepping by `stride[k] >= 1`. Mirrors `DS::Range<d>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBox<const D: usize> {
    pub start: [i64; D],
    pub end: [i64; D],
    pub stride: [i64; D],
}

impl<const D: usize> AxisBox<D> {
    pub fn new(start: [i64; D], end: [i64; D]) -> Self {
        let r = Self {
            start,
            end,
            stride: [1; D],
        };
        debug_assert!(r.check(), "AxisBox::new: end[k] < start[k] for some axis");
        r
    }

    pub fn with_stride(start: [i64; D], end: [i64; D], stride: [i64; D]) -> Self {
        let r = Self { start, end, stride };
        debug_assert!(r.check(), "AxisBox::with_stride: invalid box");
        r
    }

    pub fn empty() -> Self {
        Self {
            start: [0; D],
            end: [0; D],
            stride: [1; D],
        }
    }

    pub fn start_arr(&self) -> [i64; D] {
        self.start
    }

    fn check(&self) -> bool {
        (0..D).all(|k| self.end[k] >= self.start[k] && self.stride[k] >= 1)
    }

    /// Per-axis cell count: `(end[k]-start[k])/stride[k]`.
    pub fn extents(&self) -> [i64; D] {
        let mut e = [0i64; D];
        for k in 0..D {
            e[k] = (self.end[k] - self.start[k]) / self.stride[k];
        }
        e
    }

    pub fn count(&self) -> i64 {
        self.extents().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn in_range(&self, idx: &[i64; D]) -> bool {
        (0..D).all(|k| idx[k] >= self.start[k] && idx[k] < self.end[k])
    }

    /// Intersection of two ranges on the same stride; `Err` if strides
    /// disagree on some axis (`DimMismatch`). Per spec this is also the
    /// definition of `merge`.
    pub fn common_range(&self, other: &Self) -> Result<Self, TypesError> {
        let mut start = [0i64; D];
        let mut end = [0i64; D];
        for k in 0..D {
            if self.stride[k] != other.stride[k] {
                return Err(TypesError::DimMismatch {
                    axis: k,
                    a: self.stride[k],
                    b: other.stride[k],
                });
            }
            start[k] = self.start[k].max(other.start[k]);
            end[k] = self.end[k].min(other.end[k]).max(start[k]);
        }
        Ok(Self::with_stride(start, end, self.stride))
    }

    /// Alias for [`Self::common_range`] matching the spec's naming.
    pub fn intersect(&self, other: &Self) -> Result<Self, TypesError> {
        self.common_range(other)
    }

    pub fn merge(&self, other: &Self) -> Result<Self, TypesError> {
        self.common_range(other)
    }

    /// `true` iff no axis is disjoint between the two ranges. Unlike
    /// [`Self::common_range`] this never fails on stride mismatch: it only
    /// asks a yes/no question about coordinate overlap.
    pub fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|k| self.start[k] < other.end[k] && other.start[k] < self.end[k])
    }

    /// Smallest box covering both ranges (bounding-box union).
    pub fn min_cover_box(&self, other: &Self) -> Self {
        let mut start = [0i64; D];
        let mut end = [0i64; D];
        for k in 0..D {
            start[k] = self.start[k].min(other.start[k]);
            end[k] = self.end[k].max(other.end[k]);
        }
        Self::with_stride(start, end, self.stride)
    }

    /// A one-cell-thick slice of the range at `pos` along `axis`.
    pub fn slice(&self, axis: usize, pos: i64) -> Self {
        self.slice_range(axis, pos, pos + 1)
    }

    /// A slice of the range along `axis` from `pos_start` (inclusive) to
    /// `pos_end` (exclusive).
    pub fn slice_range(&self, axis: usize, pos_start: i64, pos_end: i64) -> Self {
        let mut out = *self;
        out.start[axis] = pos_start;
        out.end[axis] = pos_end;
        out
    }

    /// Shrink each face of the box by `w` cells (both ends, every axis).
    pub fn shrink(&self, w: i64) -> Self {
        let mut out = *self;
        for k in 0..D {
            out.start[k] += w * self.stride[k];
            out.end[k] -= w * self.stride[k];
            if out.end[k] < out.start[k] {
                out.end[k] = out.start[k];
            }
        }
        out
    }

    /// Shrink only the start face of `axis` by `w` cells.
    pub fn shrink_start(&self, axis: usize, w: i64) -> Self {
        let mut out = *self;
        out.start[axis] += w * self.stride[axis];
        if out.end[axis] < out.start[axis] {
            out.end[axis] = out.start[axis];
        }
        out
    }

    /// Shrink only the end face of `axis` by `w` cells.
    pub fn shrink_end(&self, axis: usize, w: i64) -> Self {
        let mut out = *self;
        out.end[axis] -= w * self.stride[axis];
        if out.end[axis] < out.start[axis] {
            out.end[axis] = out.start[axis];
        }
        out
    }

    /// The `2*D` boundary-condition slices of thickness `w`: for each
    /// axis, the `w`-thick slab at the start face followed by the one at
    /// the end face.
    pub fn get_bc_slices(&self, w: i64) -> Vec<Self> {
        let mut out = Vec::with_capacity(2 * D);
        for k in 0..D {
            out.push(self.slice_range(k, self.start[k], self.start[k] + w));
            out.push(self.slice_range(k, self.end[k] - w, self.end[k]));
        }
        out
    }

    /// `true` iff some axis has more than one cell — i.e. the range can
    /// still be bisected.
    pub fn is_splittable(&self) -> bool {
        self.extents().iter().any(|&e| e > 1)
    }

    fn longest_axis(&self) -> usize {
        let ext = self.extents();
        (0..D).max_by_key(|&k| ext[k]).unwrap_or(0)
    }

    /// Bisect the longest axis into two half-open halves whose union is
    /// `self` and whose intersection is empty.
    pub fn split(&self) -> (Self, Self) {
        let axis = self.longest_axis();
        let ext = self.extents();
        self.split_at_fraction(axis, ext[axis] / 2)
    }

    /// Proportional split: cut the longest axis at
    /// `start + round(left/(left+right) * extent)`, for load-balancing
    /// between two workers of relative weight `left`/`right`.
    pub fn split_proportional(&self, left: f64, right: f64) -> (Self, Self) {
        let axis = self.longest_axis();
        let ext = self.extents()[axis];
        let frac = if left + right > 0.0 {
            left / (left + right)
        } else {
            0.5
        };
        let cut = ((frac * ext as f64).round() as i64).clamp(1, ext.max(1) - 1).max(0);
        self.split_at_fraction(axis, cut)
    }

    fn split_at_fraction(&self, axis: usize, steps_in_first: i64) -> (Self, Self) {
        let cut_pos = self.start[axis] + steps_in_first.max(1) * self.stride[axis];
        let cut_pos = cut_pos.min(self.end[axis]).max(self.start[axis] + self.stride[axis]);
        let mut a = *self;
        let mut b = *self;
        a.end[axis] = cut_pos;
        b.start[axis] = cut_pos;
        (a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_union_and_disjoint() {
        let r = AxisBox::<2>::new([0, 0], [10, 4]);
        let (a, b) = r.split();
        assert_eq!(a.count() + b.count(), r.count());
        assert!(!a.intersects(&b) || a.count() == 0 || b.count() == 0);
        assert_eq!(a.min_cover_box(&b), r);
    }

    #[test]
    fn intersect_then_merge_subset_of_a() {
        let a = AxisBox::<2>::new([0, 0], [10, 10]);
        let b = AxisBox::<2>::new([5, 5], [20, 20]);
        let inter = a.intersect(&b).unwrap();
        let merged = inter.merge(&a).unwrap();
        for k in 0..2 {
            assert!(merged.start[k] >= a.start[k]);
            assert!(merged.end[k] <= a.end[k]);
        }
    }

    #[test]
    fn stride_mismatch_is_dim_mismatch() {
        let a = AxisBox::<1>::with_stride([0], [10], [1]);
        let b = AxisBox::<1>::with_stride([0], [10], [2]);
        assert_eq!(
            a.common_range(&b),
            Err(TypesError::DimMismatch { axis: 0, a: 1, b: 2 })
        );
    }

    #[test]
    fn shrink_each_face() {
        let r = AxisBox::<2>::new([0, 0], [10, 10]);
        let s = r.shrink(2);
        assert_eq!(s.start, [2, 2]);
        assert_eq!(s.end, [8, 8]);
    }

    #[test]
    fn bc_slices_count_and_thickness() {
        let r = AxisBox::<3>::new([0, 0, 0], [5, 5, 5]);
        let slices = r.get_bc_slices(1);
        assert_eq!(slices.len(), 6);
        for s in &slices {
            assert_eq!(s.count(), 25);
        }
    }
}
