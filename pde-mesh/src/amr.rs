use crate::cartesian::CartesianMesh;
use crate::error::MeshError;
use pde_types::{AxisBox, LevelRange};
use serde::{Deserialize, Serialize};

/// An adjacency edge between two patches on the same level: their
/// boxes, each shrunk by `buff_width`, intersect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborEdge {
    pub a: usize,
    pub b: usize,
}

/// A parent/child edge between a level-`l` patch and a level-`l-1`
/// patch whose up-scaled box it intersects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentEdge {
    pub child: usize,
    pub parent: usize,
}

/// A Cartesian AMR mesh hierarchy: one refined [`CartesianMesh`] per
/// level, plus per-level patch lists and their neighbor/parent
/// adjacency. Mirrors `CartesianAMRMesh<Dim>`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartesianAMRMesh<const D: usize> {
    meshes: Vec<CartesianMesh<D>>,
    patches: Vec<Vec<LevelRange<D>>>,
    neighbors: Vec<Vec<NeighborEdge>>,
    parents: Vec<Vec<ParentEdge>>,
    refinement_ratio: i64,
    buff_width: i64,
}

impl<const D: usize> CartesianAMRMesh<D> {
    /// Build a hierarchy from a base mesh and, for each refined level
    /// above it, the patch boxes (in that level's own index space)
    /// accepted for refinement there. Level 0 covers the whole base
    /// mesh and has no patches of its own to track (it has no parent
    /// level, so there is nothing to nest against).
    pub fn new(
        base: CartesianMesh<D>,
        refinement_ratio: i64,
        buff_width: i64,
        level_patches: Vec<Vec<AxisBox<D>>>,
    ) -> Result<Self, MeshError> {
        if refinement_ratio < 1 {
            return Err(MeshError::DimMismatch(format!(
                "refinement ratio must be positive, got {refinement_ratio}"
            )));
        }
        let mut meshes = Vec::with_capacity(level_patches.len() + 1);
        meshes.push(base);
        for _ in 0..level_patches.len() {
            let refined = meshes.last().unwrap().refine(refinement_ratio);
            meshes.push(refined);
        }

        let mut patches: Vec<Vec<LevelRange<D>>> = vec![Vec::new()];
        for (l, boxes) in level_patches.iter().enumerate() {
            let level = (l + 1) as u32;
            patches.push(
                boxes
                    .iter()
                    .enumerate()
                    .map(|(part, b)| LevelRange::new(*b, level, part as u32))
                    .collect(),
            );
        }

        let mut out = Self {
            meshes,
            patches,
            neighbors: Vec::new(),
            parents: Vec::new(),
            refinement_ratio,
            buff_width,
        };
        out.rebuild_adjacency();
        out.check_proper_nesting()?;
        Ok(out)
    }

    pub fn levels(&self) -> usize {
        self.meshes.len()
    }

    pub fn mesh(&self, level: usize) -> &CartesianMesh<D> {
        &self.meshes[level]
    }

    pub fn patches(&self, level: usize) -> &[LevelRange<D>] {
        &self.patches[level]
    }

    pub fn refinement_ratio(&self) -> i64 {
        self.refinement_ratio
    }

    pub fn buff_width(&self) -> i64 {
        self.buff_width
    }

    pub fn neighbors(&self, level: usize) -> &[NeighborEdge] {
        &self.neighbors[level]
    }

    pub fn parents(&self, level: usize) -> &[ParentEdge] {
        &self.parents[level]
    }

    /// Recompute same-level neighbor adjacency and cross-level parent
    /// adjacency from the current patch lists.
    fn rebuild_adjacency(&mut self) {
        self.neighbors = vec![Vec::new(); self.patches.len()];
        self.parents = vec![Vec::new(); self.patches.len()];

        for level in 0..self.patches.len() {
            let shrunk: Vec<AxisBox<D>> = self.patches[level]
                .iter()
                .map(|p| p.range.shrink(self.buff_width))
                .collect();
            let mut edges = Vec::new();
            for a in 0..shrunk.len() {
                for b in (a + 1)..shrunk.len() {
                    if shrunk[a].intersects(&shrunk[b]) {
                        edges.push(NeighborEdge { a, b });
                    }
                }
            }
            self.neighbors[level] = edges;
        }

        for level in 1..self.patches.len() {
            let mut edges = Vec::new();
            for (child_idx, child) in self.patches[level].iter().enumerate() {
                let child_shrunk = child.range.shrink(self.buff_width);
                for (parent_idx, parent) in self.patches[level - 1].iter().enumerate() {
                    let parent_scaled = AxisBox::new(
                        Self::scale(&parent.range.start, self.refinement_ratio),
                        Self::scale(&parent.range.end, self.refinement_ratio),
                    );
                    if child_shrunk.intersects(&parent_scaled) {
                        edges.push(ParentEdge {
                            child: child_idx,
                            parent: parent_idx,
                        });
                    }
                }
            }
            self.parents[level] = edges;
        }
    }

    fn scale(coords: &[i64; D], factor: i64) -> [i64; D] {
        let mut out = [0i64; D];
        for k in 0..D {
            out[k] = coords[k] * factor;
        }
        out
    }

    /// Verify every level `l >= 1` patch is covered by the union of its
    /// parent patches (up to refinement scaling), by divide-and-conquer:
    /// subtract each overlapping parent box from the child box and
    /// recurse on the leftover pieces until nothing remains.
    fn check_proper_nesting(&self) -> Result<(), MeshError> {
        for level in 1..self.patches.len() {
            let parent_boxes: Vec<AxisBox<D>> = self.patches[level - 1]
                .iter()
                .map(|p| {
                    AxisBox::new(
                        Self::scale(&p.range.start, self.refinement_ratio),
                        Self::scale(&p.range.end, self.refinement_ratio),
                    )
                })
                .collect();
            for child in &self.patches[level] {
                if !Self::is_covered(child.range, &parent_boxes) {
                    return Err(MeshError::DimMismatch(format!(
                        "level {level} patch {:?} is not properly nested in level {}",
                        child.range,
                        level - 1
                    )));
                }
            }
        }
        Ok(())
    }

    fn is_covered(region: AxisBox<D>, covers: &[AxisBox<D>]) -> bool {
        if region.is_empty() {
            return true;
        }
        let Some(cover) = covers.iter().find(|c| c.intersects(&region)) else {
            return false;
        };
        let overlap = cover.intersect(&region).expect("same stride by construction");
        // Subtract `overlap` from `region` by slicing along each axis into
        // at most `2*D` leftover boxes, then recurse on each leftover.
        let mut leftovers = Vec::new();
        let mut remainder = region;
        for axis in 0..D {
            if overlap.start[axis] > remainder.start[axis] {
                leftovers.push(remainder.slice_range(axis, remainder.start[axis], overlap.start[axis]));
            }
            if overlap.end[axis] < remainder.end[axis] {
                leftovers.push(remainder.slice_range(axis, overlap.end[axis], remainder.end[axis]));
            }
            remainder = remainder.slice_range(axis, overlap.start[axis].max(remainder.start[axis]), overlap.end[axis].min(remainder.end[axis]));
        }
        leftovers.iter().all(|&l| Self::is_covered(l, covers))
    }
}

/// Incrementally assembles a [`CartesianAMRMesh`], mirroring
/// `CartesianAMRMesh::MeshBuilder`. The base-mesh field is named
/// `ranges`, not `partRanges` — the original's builder writes to a field
/// named `partRanges` that has no matching member, leaving the base
/// mesh's ranges untouched; that is not reproduced here.
#[derive(Default)]
pub struct MeshBuilder<const D: usize> {
    base: Option<CartesianMesh<D>>,
    ranges: Vec<Vec<AxisBox<D>>>,
    refinement_ratio: i64,
    buff_width: i64,
}

impl<const D: usize> MeshBuilder<D> {
    pub fn new() -> Self {
        Self {
            base: None,
            ranges: Vec::new(),
            refinement_ratio: 2,
            buff_width: 1,
        }
    }

    pub fn set_base_mesh(mut self, base: CartesianMesh<D>) -> Self {
        self.base = Some(base);
        self
    }

    pub fn set_refinement_ratio(mut self, ratio: i64) -> Self {
        self.refinement_ratio = ratio;
        self
    }

    pub fn set_buff_width(mut self, width: i64) -> Self {
        self.buff_width = width;
        self
    }

    pub fn add_level(mut self, patches: Vec<AxisBox<D>>) -> Self {
        self.ranges.push(patches);
        self
    }

    pub fn build(self) -> Result<CartesianAMRMesh<D>, MeshError> {
        let base = self
            .base
            .ok_or_else(|| MeshError::DimMismatch("MeshBuilder: no base mesh set".into()))?;
        CartesianAMRMesh::new(base, self.refinement_ratio, self.buff_width, self.ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_level_properly_nested() {
        let base = CartesianMesh::<2>::uniform([0.0, 0.0], [1.0, 1.0], [9, 9], 1).unwrap();
        let amr = MeshBuilder::<2>::new()
            .set_base_mesh(base)
            .set_refinement_ratio(2)
            .set_buff_width(1)
            .add_level(vec![AxisBox::new([2, 2], [6, 6])])
            .build()
            .unwrap();
        assert_eq!(amr.levels(), 2);
        assert_eq!(amr.patches(1).len(), 1);
    }

    #[test]
    fn unnested_patch_is_rejected() {
        let base = CartesianMesh::<2>::uniform([0.0, 0.0], [1.0, 1.0], [9, 9], 1).unwrap();
        let err = MeshBuilder::<2>::new()
            .set_base_mesh(base)
            .set_refinement_ratio(2)
            .set_buff_width(0)
            .add_level(vec![AxisBox::new([100, 100], [104, 104])])
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn adjacent_patches_are_neighbors() {
        let base = CartesianMesh::<1>::uniform([0.0], [1.0], [17], 1).unwrap();
        let amr = MeshBuilder::<1>::new()
            .set_base_mesh(base)
            .set_refinement_ratio(2)
            .set_buff_width(1)
            .add_level(vec![AxisBox::new([0], [8]), AxisBox::new([7], [16])])
            .build()
            .unwrap();
        assert_eq!(amr.neighbors(1).len(), 1);
    }
}
