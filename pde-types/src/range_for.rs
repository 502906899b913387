use crate::index::RangedIndex;
use crate::range::AxisBox;

/// Default leaf grain size: once a split range's cell count drops to this
/// or below, `range_for`/`range_reduce` stop splitting and run the body
/// sequentially over every cell in the leaf.
pub const DEFAULT_GRAIN_SIZE: i64 = 256;

/// Visit every cell of `range`, splitting recursively down to
/// [`DEFAULT_GRAIN_SIZE`] before running `body` sequentially within a
/// leaf. Ordering between leaves is unspecified; within a leaf, cells are
/// visited in row-major (last-axis-major total) order.
///
/// With the `parallel` feature enabled, leaves run concurrently via
/// `rayon::join`; otherwise (the default, and always in `cfg(test)`) the
/// whole range runs on the calling thread. This mirrors `p3-maybe-rayon`'s
/// `parallel` feature, which makes the thread pool itself an optional,
/// swappable collaborator rather than a hard dependency.
pub fn range_for<const D: usize>(range: &AxisBox<D>, body: impl Fn(crate::MDIndex<D>) + Sync) {
    range_for_grain(range, DEFAULT_GRAIN_SIZE, &body);
}

fn range_for_grain<const D: usize>(
    range: &AxisBox<D>,
    grain: i64,
    body: &(impl Fn(crate::MDIndex<D>) + Sync),
) {
    if range.count() <= grain || !range.is_splittable() {
        for idx in RangedIndex::begin(range) {
            body(idx);
        }
        return;
    }
    let (a, b) = range.split();
    run_split(
        || range_for_grain(&a, grain, body),
        || range_for_grain(&b, grain, body),
    );
}

/// Like [`range_for`] but folds each leaf's partial result with `combine`,
/// returning the fully-reduced value. `identity` seeds both the leaf fold
/// and the cross-leaf combine.
pub fn range_reduce<const D: usize, T: Send>(
    range: &AxisBox<D>,
    identity: T,
    fold: impl Fn(T, crate::MDIndex<D>) -> T + Sync,
    combine: impl Fn(T, T) -> T + Sync,
) -> T
where
    T: Clone,
{
    range_reduce_grain(range, DEFAULT_GRAIN_SIZE, &identity, &fold, &combine)
}

fn range_reduce_grain<const D: usize, T: Send + Clone>(
    range: &AxisBox<D>,
    grain: i64,
    identity: &T,
    fold: &(impl Fn(T, crate::MDIndex<D>) -> T + Sync),
    combine: &(impl Fn(T, T) -> T + Sync),
) -> T {
    if range.count() <= grain || !range.is_splittable() {
        let mut acc = identity.clone();
        for idx in RangedIndex::begin(range) {
            acc = fold(acc, idx);
        }
        return acc;
    }
    let (a, b) = range.split();
    let (ra, rb) = run_split(
        || range_reduce_grain(&a, grain, identity, fold, combine),
        || range_reduce_grain(&b, grain, identity, fold, combine),
    );
    combine(ra, rb)
}

#[cfg(feature = "parallel")]
fn run_split<A, B, RA: Send, RB: Send>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "parallel"))]
fn run_split<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    (a(), b())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[test]
    fn range_for_visits_every_cell_exactly_once() {
        let r = AxisBox::<2>::new([0, 0], [17, 13]);
        let count = AtomicI64::new(0);
        range_for(&r, |_| {
            count.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(count.load(Ordering::Relaxed), r.count());
    }

    #[test]
    fn range_reduce_sums_linear_index() {
        let r = AxisBox::<1>::new([0], [1000]);
        let sum = range_reduce(&r, 0i64, |acc, idx| acc + idx[0], |a, b| a + b);
        assert_eq!(sum, (0..1000i64).sum::<i64>());
    }
}
