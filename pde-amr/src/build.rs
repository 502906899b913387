use crate::kdtree::KdTree;
use crate::partition::domain_partition;
use pde_mesh::{CartesianAMRMesh, CartesianMesh, MeshBuilder, MeshError};
use pde_types::{AxisBox, LevelMDIndex, MDIndex, RangedIndex};
use tracing::debug;

/// Marker-driven construction of a [`CartesianAMRMesh`]: gathers marked
/// cells per level, partitions them into patches, and assembles the
/// hierarchy. Grounded on
/// `original_source/src/Core/AMR/AMRGen.hpp::init_grid`, which drives the
/// same per-level loop from `max_level-1` down to `1`.
pub fn build_hierarchy<const D: usize>(
    base: CartesianMesh<D>,
    ratio: i64,
    max_level: u32,
    buff_width: i64,
    fill_rate_threshold: f64,
    slim_threshold: i64,
    mark: impl Fn(u32, LevelMDIndex<D>) -> bool,
) -> Result<CartesianAMRMesh<D>, MeshError> {
    let mut meshes = vec![base.clone()];
    for _ in 1..max_level {
        let next = meshes.last().unwrap().refine(ratio);
        meshes.push(next);
    }

    // `patches_by_level[l]` holds level-`l` patches (in level-`l`
    // coordinates), for `l = 1..max_level-1`. Index 0 is left empty.
    let mut patches_by_level: Vec<Vec<AxisBox<D>>> = vec![Vec::new(); max_level as usize];

    for l in (1..max_level).rev() {
        let coarse_level = l - 1;
        let coarse_range = *meshes[coarse_level as usize].range();

        let mut points: Vec<MDIndex<D>> = Vec::new();
        for idx in RangedIndex::begin(&coarse_range) {
            if mark(coarse_level, LevelMDIndex::new(idx, coarse_level, 0)) {
                points.push(idx);
            }
        }

        if l + 1 < max_level {
            for fine_patch in &patches_by_level[(l + 1) as usize] {
                let expanded = fine_patch.shrink(-(buff_width * ratio));
                let mut start = [0i64; D];
                let mut end = [0i64; D];
                for k in 0..D {
                    start[k] = expanded.start[k].div_euclid(ratio * ratio);
                    end[k] = expanded.end[k].div_euclid(ratio * ratio);
                    start[k] = start[k].clamp(coarse_range.start[k], coarse_range.end[k]);
                    end[k] = end[k].clamp(coarse_range.start[k], coarse_range.end[k]).max(start[k]);
                }
                let down = AxisBox::new(start, end);
                for idx in RangedIndex::begin(&down) {
                    points.push(idx);
                }
            }
        }

        points.sort();
        points.dedup();
        debug!(level = coarse_level, markers = points.len(), "gathered AMR markers");

        let tree = KdTree::build(points);
        let accepted = domain_partition(&tree, coarse_range, fill_rate_threshold, slim_threshold);
        debug!(level = l, patches = accepted.len(), "partitioned AMR patches");

        let level_patches: Vec<AxisBox<D>> = accepted
            .into_iter()
            .map(|b| {
                let mut start = [0i64; D];
                let mut end = [0i64; D];
                for k in 0..D {
                    start[k] = b.start[k] * ratio;
                    end[k] = b.end[k] * ratio + 1;
                }
                AxisBox::new(start, end)
            })
            .collect();
        patches_by_level[l as usize] = level_patches;
    }

    let level_patches: Vec<Vec<AxisBox<D>>> = patches_by_level.into_iter().skip(1).collect();

    let mut builder = MeshBuilder::new()
        .set_base_mesh(base)
        .set_refinement_ratio(ratio)
        .set_buff_width(buff_width);
    for patches in level_patches {
        builder = builder.add_level(patches);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_marker_produces_nested_level_patches() {
        let base = CartesianMesh::<2>::uniform([0.0, 0.0], [1.0, 1.0], [17, 17], 1).unwrap();
        let cx = 0.5;
        let cy = 0.5;
        let radius = 0.2;
        let hierarchy = build_hierarchy(
            base,
            2,
            3,
            1,
            0.5,
            2,
            |level, lvl_idx| {
                let n = 16 * 2i64.pow(level);
                let x = lvl_idx.index[0] as f64 / n as f64;
                let y = lvl_idx.index[1] as f64 / n as f64;
                ((x - cx).powi(2) + (y - cy).powi(2)).sqrt() < radius
            },
        )
        .unwrap();
        assert_eq!(hierarchy.levels(), 3);
        assert!(!hierarchy.patches(1).is_empty());
    }
}
