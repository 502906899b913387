use crate::index::MDIndex;
use crate::range::AxisBox;
use serde::{Deserialize, Serialize};

/// An [`MDIndex`] tagged with its AMR level and patch ("part") number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelMDIndex<const D: usize> {
    pub index: MDIndex<D>,
    pub level: u32,
    pub part: u32,
}

impl<const D: usize> LevelMDIndex<D> {
    pub fn new(index: MDIndex<D>, level: u32, part: u32) -> Self {
        Self { index, level, part }
    }

    /// Re-express this index at `target_level`, multiplying/dividing
    /// coordinates by `ratio^|target_level - level|`.
    pub fn to_level(&self, target_level: u32, ratio: i64) -> MDIndex<D> {
        if target_level == self.level {
            return self.index;
        }
        let factor = ratio.pow(target_level.abs_diff(self.level));
        if target_level > self.level {
            self.index.map(|_, v| v * factor)
        } else {
            self.index.map(|_, v| v.div_euclid(factor))
        }
    }
}

/// An [`AxisBox`] tagged with its AMR level and patch number. Mirrors
/// `DS::LevelRanges`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRange<const D: usize> {
    pub range: AxisBox<D>,
    pub level: u32,
    pub part: u32,
}

impl<const D: usize> LevelRange<D> {
    pub fn new(range: AxisBox<D>, level: u32, part: u32) -> Self {
        Self { range, level, part }
    }

    /// Rescale this range's coordinates from `self.level` to `target_level`
    /// by `ratio^|target_level - level|`, as used when checking proper
    /// nesting between adjacent AMR levels.
    pub fn to_level(&self, target_level: u32, ratio: i64) -> AxisBox<D> {
        if target_level == self.level {
            return self.range;
        }
        let factor = ratio.pow(target_level.abs_diff(self.level));
        let mut start = [0i64; D];
        let mut end = [0i64; D];
        for k in 0..D {
            if target_level > self.level {
                start[k] = self.range.start[k] * factor;
                end[k] = self.range.end[k] * factor;
            } else {
                start[k] = self.range.start[k].div_euclid(factor);
                end[k] = self.range.end[k].div_euclid(factor);
            }
        }
        AxisBox::with_stride(start, end, self.range.stride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_round_trip_identity_at_ratio_1() {
        let r = LevelRange::new(AxisBox::<2>::new([0, 0], [4, 4]), 1, 0);
        assert_eq!(r.to_level(1, 2), r.range);
    }

    #[test]
    fn coarsen_then_refine_covers_original() {
        let r = LevelRange::new(AxisBox::<2>::new([0, 0], [8, 8]), 2, 0);
        let coarse = r.to_level(1, 2);
        let back = LevelRange::new(coarse, 1, 0).to_level(2, 2);
        assert_eq!(back.start, r.range.start);
        assert_eq!(back.end, r.range.end);
    }
}
