use crate::kdtree::KdTree;
use pde_types::AxisBox;
use std::collections::VecDeque;

/// Recursive signature-based box partitioning (Step C). Given the marker
/// points (already loaded into `tree`) and a starting AABB `b`, returns
/// the list of accepted boxes. Grounded on
/// `original_source/src/Core/AMR/AMRGen.hpp::domainPartition`.
pub fn domain_partition<const D: usize>(
    tree: &KdTree<D>,
    b: AxisBox<D>,
    fill_rate_threshold: f64,
    slim_threshold: i64,
) -> Vec<AxisBox<D>> {
    let mut accepted = Vec::new();
    let mut queue: VecDeque<AxisBox<D>> = VecDeque::new();
    queue.push_back(b);

    while let Some(b) = queue.pop_front() {
        if b.is_empty() {
            continue;
        }
        let count = tree.count_in_box(&b);
        if count == 0 {
            continue;
        }
        let fill_rate = count as f64 / b.count().max(1) as f64;
        if fill_rate >= fill_rate_threshold {
            accepted.push(b);
            continue;
        }

        let points = tree.points_in_box(&b);
        let sig = signature(&points, &b);
        let runs: Vec<Vec<(i64, i64)>> = (0..D).map(|axis| nonzero_runs(&sig[axis], b.start[axis])).collect();

        let multi_run_axis = runs.iter().position(|r| r.len() > 1);
        if let Some(_axis) = multi_run_axis {
            for sub in cartesian_product_subboxes(&b, &runs) {
                queue.push_back(sub);
            }
            continue;
        }

        // Every axis is single-run; shrink to the compact box if any run
        // is strictly narrower than the current box.
        let compact = compactify(&b, &runs);
        if compact != b {
            queue.push_back(compact);
            continue;
        }

        // `b` is compact: check slimness.
        let extents = b.extents();
        if (0..D).all(|k| extents[k] < slim_threshold) {
            accepted.push(b);
            continue;
        }

        if let Some((axis, split_pos)) = choose_split(&sig, &b, slim_threshold) {
            let mut a = b;
            let mut c = b;
            a.end[axis] = split_pos;
            c.start[axis] = split_pos;
            queue.push_back(a);
            queue.push_back(c);
        } else {
            let (a, c) = b.split();
            queue.push_back(a);
            queue.push_back(c);
        }
    }

    accepted
}

/// `sig[axis][i]` is the count of marker points with coordinate `i` on
/// `axis`, for `i` in `b`'s extent on that axis (index 0 = `b.start[axis]`).
fn signature<const D: usize>(points: &[pde_types::MDIndex<D>], b: &AxisBox<D>) -> Vec<Vec<i64>> {
    let ext = b.extents();
    let mut sig: Vec<Vec<i64>> = (0..D).map(|axis| vec![0i64; ext[axis].max(0) as usize]).collect();
    for p in points {
        for axis in 0..D {
            let i = p[axis] - b.start[axis];
            if i >= 0 && (i as usize) < sig[axis].len() {
                sig[axis][i as usize] += 1;
            }
        }
    }
    sig
}

/// Maximal runs of nonzero signature entries, returned as
/// `(run_start, run_end_exclusive)` pairs in absolute coordinates.
fn nonzero_runs(sig_axis: &[i64], start: i64) -> Vec<(i64, i64)> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < sig_axis.len() {
        if sig_axis[i] == 0 {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < sig_axis.len() && sig_axis[i] != 0 {
            i += 1;
        }
        runs.push((start + run_start as i64, start + i as i64));
    }
    runs
}

fn cartesian_product_subboxes<const D: usize>(
    b: &AxisBox<D>,
    runs: &[Vec<(i64, i64)>],
) -> Vec<AxisBox<D>> {
    let mut boxes = vec![*b];
    for axis in 0..D {
        if runs[axis].len() <= 1 {
            continue;
        }
        let mut next = Vec::new();
        for base in &boxes {
            for &(s, e) in &runs[axis] {
                next.push(base.slice_range(axis, s, e));
            }
        }
        boxes = next;
    }
    boxes
}

fn compactify<const D: usize>(b: &AxisBox<D>, runs: &[Vec<(i64, i64)>]) -> AxisBox<D> {
    let mut out = *b;
    for axis in 0..D {
        if let Some(&(s, e)) = runs[axis].first() {
            out.start[axis] = s;
            out.end[axis] = e;
        }
    }
    out
}

/// Step C.4's second-difference split-point search: compute
/// `lap[k][i] = sig[k][i-1] - 2*sig[k][i] + sig[k][i+1]`, find sign-change
/// points, keep the one with maximal jump per axis, try axes in
/// descending jump order, skipping any split that would leave a
/// sub-`slim_threshold` sliver.
fn choose_split<const D: usize>(
    sig: &[Vec<i64>],
    b: &AxisBox<D>,
    slim_threshold: i64,
) -> Option<(usize, i64)> {
    let mut candidates: Vec<(usize, i64, i64)> = Vec::new(); // (axis, split_pos, jump)
    for axis in 0..D {
        if let Some((pos, jump)) = best_sign_change(&sig[axis], b.start[axis]) {
            candidates.push((axis, pos, jump));
        }
    }
    candidates.sort_by(|a, c| c.2.cmp(&a.2));
    for (axis, pos, _) in candidates {
        let left_width = pos - b.start[axis];
        let right_width = b.end[axis] - pos;
        if left_width >= slim_threshold && right_width >= slim_threshold {
            return Some((axis, pos));
        }
    }
    None
}

fn best_sign_change(sig_axis: &[i64], start: i64) -> Option<(i64, i64)> {
    let n = sig_axis.len();
    if n < 3 {
        return None;
    }
    let lap: Vec<i64> = (1..n - 1)
        .map(|i| sig_axis[i - 1] - 2 * sig_axis[i] + sig_axis[i + 1])
        .collect();
    let median = start + (n as i64) / 2;
    let mut best: Option<(usize, i64, i64)> = None; // (idx, jump, dist_to_median)
    for i in 1..lap.len() {
        let prev = lap[i - 1];
        let cur = lap[i];
        if (prev < 0 && cur >= 0) || (prev > 0 && cur <= 0) || (prev.signum() != cur.signum() && prev != 0) {
            let jump = (cur - prev).abs();
            let pos = start + 1 + i as i64;
            let dist = (pos - median).abs();
            match &best {
                None => best = Some((i, jump, dist)),
                Some((_, best_jump, best_dist)) => {
                    if jump > *best_jump || (jump == *best_jump && dist < *best_dist) {
                        best = Some((i, jump, dist));
                    }
                }
            }
        }
    }
    best.map(|(i, jump, _)| (start + 1 + i as i64, jump))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pde_types::MDIndex;

    #[test]
    fn dense_block_is_accepted_whole() {
        let pts: Vec<MDIndex<2>> = (0..10)
            .flat_map(|i| (0..10).map(move |j| MDIndex::new([i, j])))
            .collect();
        let tree = KdTree::build(pts);
        let b = AxisBox::<2>::new([0, 0], [10, 10]);
        let accepted = domain_partition(&tree, b, 0.9, 2);
        let total: i64 = accepted.iter().map(|r| r.count()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn two_disjoint_clusters_split_apart() {
        let mut pts: Vec<MDIndex<2>> = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                pts.push(MDIndex::new([i, j]));
                pts.push(MDIndex::new([i + 20, j]));
            }
        }
        let tree = KdTree::build(pts);
        let b = AxisBox::<2>::new([0, 0], [24, 4]);
        let accepted = domain_partition(&tree, b, 0.8, 2);
        assert!(accepted.len() >= 2);
    }
}
