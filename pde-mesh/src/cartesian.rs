use crate::error::MeshError;
use pde_types::{AxisBox, Real};
use serde::{Deserialize, Serialize};

/// How a mesh axis extends its node coordinates into the ghost/padding
/// region beyond the logical (interior) range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtMode {
    /// Mirror the interior `dx` spacing outward (the default).
    Symm,
    /// Wrap the interior `dx` spacing as if the domain repeated.
    Periodic,
    /// Replicate the edge `dx` value outward at constant spacing.
    Uniform,
}

impl Default for ExtMode {
    fn default() -> Self {
        ExtMode::Symm
    }
}

/// Per-axis node coordinates, plus their extension into the padding
/// region, for one axis of a [`CartesianMesh`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct AxisCoords {
    /// Node coordinates over the *extended* range (`logical` widened by
    /// `padding` nodes on each side).
    x: Vec<Real>,
    /// `dx[i] = x[i+1] - x[i]`, one shorter than `x`.
    dx: Vec<Real>,
    /// `1 / dx[i]`.
    idx: Vec<Real>,
    /// Node-index of `x[0]` (i.e. `range.start - padding`).
    ext_start: i64,
    padding: i64,
}

impl AxisCoords {
    fn build(interior: &[Real], padding: i64, mode: ExtMode) -> Result<Self, MeshError> {
        if interior.len() < 2 {
            return Err(MeshError::InvalidDims {
                axis: 0,
                n: interior.len(),
            });
        }
        let n = interior.len();
        let interior_dx: Vec<Real> = interior.windows(2).map(|w| w[1] - w[0]).collect();
        let p = padding.max(0) as usize;

        let left = Self::extend(&interior_dx, p, mode, Side::Left);
        let right = Self::extend(&interior_dx, p, mode, Side::Right);

        let mut dx = Vec::with_capacity(left.len() + interior_dx.len() + right.len());
        dx.extend(left.iter().rev());
        dx.extend(interior_dx.iter());
        dx.extend(right.iter());

        let mut x = vec![0.0; dx.len() + 1];
        // Anchor the interior segment at its given coordinates.
        for (k, &v) in interior.iter().enumerate() {
            x[p + k] = v;
        }
        for k in (0..p).rev() {
            x[k] = x[k + 1] - dx[k];
        }
        for k in (p + n)..x.len() {
            x[k] = x[k - 1] + dx[k - 1];
        }

        let idx = dx.iter().map(|&d| 1.0 / d).collect();
        Ok(Self {
            x,
            dx,
            idx,
            ext_start: -(p as i64),
            padding,
        })
    }

    fn extend(interior_dx: &[Real], count: usize, mode: ExtMode, side: Side) -> Vec<Real> {
        let len = interior_dx.len();
        (0..count)
            .map(|k| match mode {
                ExtMode::Uniform => match side {
                    Side::Left => interior_dx[0],
                    Side::Right => interior_dx[len - 1],
                },
                ExtMode::Symm => match side {
                    Side::Left => interior_dx[k.min(len - 1)],
                    Side::Right => interior_dx[len - 1 - k.min(len - 1)],
                },
                ExtMode::Periodic => match side {
                    Side::Left => interior_dx[len - 1 - (k % len)],
                    Side::Right => interior_dx[k % len],
                },
            })
            .collect()
    }

    fn x_at(&self, node_index: i64) -> Real {
        self.x[(node_index - self.ext_start) as usize]
    }
    fn dx_at(&self, node_index: i64) -> Real {
        self.dx[(node_index - self.ext_start) as usize]
    }
    fn idx_at(&self, node_index: i64) -> Real {
        self.idx[(node_index - self.ext_start) as usize]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// A Cartesian mesh over `D` axes: per-axis node coordinates plus their
/// derived spacing, valid over an extended range wider than the logical
/// (interior) range by `padding` ghost nodes. Mirrors `CartesianMesh<Dim>`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartesianMesh<const D: usize> {
    dims: [usize; D],
    range: AxisBox<D>,
    ext_range: AxisBox<D>,
    ext_mode: [ExtMode; D],
    axes: Vec<AxisCoords>,
    padding: i64,
}

impl<const D: usize> CartesianMesh<D> {
    /// Build a mesh from per-axis interior node coordinates (at least 2
    /// nodes per axis), a ghost `padding` width, and per-axis extension
    /// modes.
    pub fn new(
        coords: [Vec<Real>; D],
        padding: i64,
        ext_mode: [ExtMode; D],
    ) -> Result<Self, MeshError> {
        let mut dims = [0usize; D];
        let mut axes = Vec::with_capacity(D);
        for (axis, c) in coords.iter().enumerate() {
            if c.len() < 2 {
                return Err(MeshError::InvalidDims { axis, n: c.len() });
            }
            dims[axis] = c.len();
            axes.push(AxisCoords::build(c, padding, ext_mode[axis]).map_err(|_| {
                MeshError::InvalidDims {
                    axis,
                    n: c.len(),
                }
            })?);
        }
        let mut start = [0i64; D];
        let mut end = [0i64; D];
        let mut ext_start = [0i64; D];
        let mut ext_end = [0i64; D];
        for axis in 0..D {
            start[axis] = 0;
            end[axis] = dims[axis] as i64;
            ext_start[axis] = -padding;
            ext_end[axis] = dims[axis] as i64 + padding;
        }
        Ok(Self {
            dims,
            range: AxisBox::new(start, end),
            ext_range: AxisBox::new(ext_start, ext_end),
            ext_mode,
            axes,
            padding,
        })
    }

    /// Build a uniform-spacing mesh on `[lo, hi]` per axis with `n` nodes,
    /// the common case for manufactured-solution tests.
    pub fn uniform(lo: [Real; D], hi: [Real; D], n: [usize; D], padding: i64) -> Result<Self, MeshError> {
        let mut coords: Vec<Vec<Real>> = Vec::with_capacity(D);
        for axis in 0..D {
            let steps = n[axis].max(2) - 1;
            let h = (hi[axis] - lo[axis]) / steps as Real;
            coords.push((0..n[axis]).map(|i| lo[axis] + i as Real * h).collect());
        }
        let coords: [Vec<Real>; D] = coords.try_into().unwrap_or_else(|_| panic!("dim mismatch"));
        Self::new(coords, padding, [ExtMode::default(); D])
    }

    pub fn dims(&self) -> &[usize; D] {
        &self.dims
    }
    pub fn range(&self) -> &AxisBox<D> {
        &self.range
    }
    pub fn ext_range(&self) -> &AxisBox<D> {
        &self.ext_range
    }
    pub fn padding(&self) -> i64 {
        self.padding
    }

    pub fn x(&self, axis: usize, i: i64) -> Real {
        self.axes[axis].x_at(i)
    }
    pub fn dx(&self, axis: usize, i: i64) -> Real {
        self.axes[axis].dx_at(i)
    }
    pub fn idx(&self, axis: usize, i: i64) -> Real {
        self.axes[axis].idx_at(i)
    }

    /// Produce a refined mesh with `ratio*(dims-1)+1` nodes per axis. On
    /// every interior interval `[x[j], x[j+1]]` the new nodes are
    /// `x[j] + k*dx[j]/ratio` for `k = 0..ratio`, plus the final node; the
    /// padding region is then re-extended per each axis's `ExtMode`.
    pub fn refine(&self, ratio: i64) -> Self {
        let mut coords: Vec<Vec<Real>> = Vec::with_capacity(D);
        for axis in 0..D {
            let n = self.dims[axis] as i64;
            let mut v = Vec::with_capacity(((n - 1) * ratio + 1) as usize);
            for j in 0..(n - 1) {
                let x0 = self.x(axis, j);
                let dx = self.dx(axis, j);
                for k in 0..ratio {
                    v.push(x0 + k as Real * dx / ratio as Real);
                }
            }
            v.push(self.x(axis, n - 1));
            coords.push(v);
        }
        let coords: [Vec<Real>; D] = coords.try_into().unwrap_or_else(|_| panic!("dim mismatch"));
        Self::new(coords, self.padding, self.ext_mode).expect("refine: invariants preserved")
    }

    /// Pointwise coordinate equality on the common extended range (per
    /// axis), not requiring identical extents. Mirrors
    /// `CartesianMesh::operator==`'s `commonRangeEqualTo`.
    pub fn common_range_equal_to(&self, other: &Self) -> bool {
        for axis in 0..D {
            let start = self.ext_range.start[axis].max(other.ext_range.start[axis]);
            let end = self.ext_range.end[axis].min(other.ext_range.end[axis]);
            for j in start..end {
                if (self.x(axis, j) - other.x(axis, j)).abs() > 1e-12 {
                    return false;
                }
            }
        }
        true
    }
}

impl<const D: usize> PartialEq for CartesianMesh<D> {
    fn eq(&self, other: &Self) -> bool {
        self.common_range_equal_to(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refine_by_one_is_identity() {
        let m = CartesianMesh::<1>::uniform([0.0], [1.0], [5], 2).unwrap();
        let r = m.refine(1);
        assert_eq!(m, r);
    }

    #[test]
    fn two_refinements_equal_one_combined() {
        let m = CartesianMesh::<1>::uniform([0.0], [1.0], [5], 1).unwrap();
        let step_by_step = m.refine(2).refine(3);
        let combined = m.refine(6);
        // Compare interior (non-padding) nodes only: padding extension
        // differs once the two paths accumulate different rounding.
        for j in 0..=24 {
            assert!((step_by_step.x(0, j) - combined.x(0, j)).abs() < 1e-9);
        }
    }

    #[test]
    fn refined_dims_match_formula() {
        let m = CartesianMesh::<1>::uniform([0.0], [1.0], [5], 1).unwrap();
        let r = m.refine(3);
        assert_eq!(r.dims()[0], 3 * (5 - 1) + 1);
    }

    #[test]
    fn symm_extension_mirrors_spacing() {
        let m = CartesianMesh::<1>::uniform([0.0], [1.0], [5], 2).unwrap();
        // Uniform spacing: Symm/Periodic/Uniform should all agree here.
        assert!((m.dx(0, -1) - m.dx(0, 0)).abs() < 1e-12);
    }
}
