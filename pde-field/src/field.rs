use crate::bc::BcSpec;
use crate::error::FieldError;
use crate::location::Location;
use crate::neighbor::NeighborInfo;
use pde_mesh::CartesianMesh;
use pde_types::{AxisBox, MDIndex, Real};
use std::sync::Arc;

/// A PDE field: a mesh-backed array of values with the six windowing
/// ranges from `spec.md` §3.5. Single-rank fields leave `split_map` and
/// `neighbors` empty; distributed fields populate them and size `local`
/// to this rank's shard of `accessible`.
#[derive(Clone, Debug)]
pub struct Field<const D: usize> {
    mesh: Arc<CartesianMesh<D>>,
    name: String,
    location: [Location; D],
    bc_start: [BcSpec; D],
    bc_end: [BcSpec; D],

    /// Writable interior — no ghost cells.
    assignable: AxisBox<D>,
    /// Where `evalAt` is valid. Equals `assignable` on every face whose
    /// BC is an actual boundary condition (Dirichlet/Neumann/Periodic/
    /// Symm/ASymm) — those faces resolve through `bc_ghost_value`, never
    /// by reading real data past `assignable`. Widens by one ghost layer
    /// only on faces whose BC is `Internal`, since those are filled by
    /// halo exchange and are meant to be read directly.
    accessible: AxisBox<D>,
    /// This rank's shard of `accessible` (equals `accessible` when not
    /// distributed).
    local: AxisBox<D>,
    /// `accessible` widened by the mesh's full ghost padding.
    logical: AxisBox<D>,

    offset: [i64; D],
    padding: i64,
    split_map: Vec<AxisBox<D>>,
    neighbors: Vec<NeighborInfo<D>>,

    data: Vec<Real>,
}

impl<const D: usize> Field<D> {
    pub fn new(
        mesh: Arc<CartesianMesh<D>>,
        name: impl Into<String>,
        location: [Location; D],
        bc_start: [BcSpec; D],
        bc_end: [BcSpec; D],
    ) -> Self {
        let assignable = *mesh.range();
        let ext = *mesh.ext_range();
        let mut acc_start = assignable.start;
        let mut acc_end = assignable.end;
        for axis in 0..D {
            if matches!(bc_start[axis], BcSpec::Internal) {
                acc_start[axis] = (assignable.start[axis] - assignable.stride[axis]).max(ext.start[axis]);
            }
            if matches!(bc_end[axis], BcSpec::Internal) {
                acc_end[axis] = (assignable.end[axis] + assignable.stride[axis]).min(ext.end[axis]);
            }
        }
        let accessible = AxisBox::with_stride(acc_start, acc_end, assignable.stride);
        let logical = *mesh.ext_range();
        let local = accessible;
        let data = vec![0.0; logical.count().max(0) as usize];
        Self {
            mesh,
            name: name.into(),
            location,
            bc_start,
            bc_end,
            assignable,
            accessible,
            local,
            logical,
            offset: [0; D],
            padding: 0,
            split_map: Vec::new(),
            neighbors: Vec::new(),
            data,
        }
    }

    /// Shard this field across `split_map` (one box per rank), binding
    /// `local` to `split_map[my_rank]` and registering `neighbors` as the
    /// halo-exchange partners.
    pub fn distribute(
        mut self,
        my_rank: usize,
        offset: [i64; D],
        padding: i64,
        split_map: Vec<AxisBox<D>>,
        neighbors: Vec<NeighborInfo<D>>,
    ) -> Result<Self, FieldError> {
        let total: i64 = split_map.iter().map(|b| b.count()).sum();
        if total != self.accessible.count() {
            return Err(FieldError::SplitMapMismatch {
                field: self.name.clone(),
                covered: total,
                expected: self.accessible.count(),
            });
        }
        self.local = split_map[my_rank];
        self.offset = offset;
        self.padding = padding;
        self.split_map = split_map;
        self.neighbors = neighbors;
        Ok(self)
    }

    pub fn mesh(&self) -> &CartesianMesh<D> {
        &self.mesh
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn location(&self) -> &[Location; D] {
        &self.location
    }
    pub fn bc_start(&self) -> &[BcSpec; D] {
        &self.bc_start
    }
    pub fn bc_end(&self) -> &[BcSpec; D] {
        &self.bc_end
    }
    pub fn assignable(&self) -> &AxisBox<D> {
        &self.assignable
    }
    pub fn accessible(&self) -> &AxisBox<D> {
        &self.accessible
    }
    pub fn local(&self) -> &AxisBox<D> {
        &self.local
    }
    pub fn logical(&self) -> &AxisBox<D> {
        &self.logical
    }
    pub fn offset(&self) -> &[i64; D] {
        &self.offset
    }
    pub fn padding(&self) -> i64 {
        self.padding
    }
    pub fn split_map(&self) -> &[AxisBox<D>] {
        &self.split_map
    }
    pub fn neighbors(&self) -> &[NeighborInfo<D>] {
        &self.neighbors
    }

    fn linear_offset(&self, idx: &MDIndex<D>) -> Option<usize> {
        if !self.logical.in_range(idx.as_slice()) {
            return None;
        }
        let ext = self.logical.extents();
        let mut stride = 1i64;
        let mut off = 0i64;
        for axis in 0..D {
            off += (idx[axis] - self.logical.start[axis]) * stride;
            stride *= ext[axis].max(1);
        }
        Some(off as usize)
    }

    pub fn get(&self, idx: MDIndex<D>) -> Result<Real, FieldError> {
        self.linear_offset(&idx).map(|o| self.data[o]).ok_or_else(|| FieldError::OutOfLogicalRange {
            field: self.name.clone(),
            index: idx.as_slice().to_vec(),
            logical: format!("{:?}", self.logical),
        })
    }

    pub fn set(&mut self, idx: MDIndex<D>, value: Real) -> Result<(), FieldError> {
        let off = self.linear_offset(&idx).ok_or_else(|| FieldError::OutOfLogicalRange {
            field: self.name.clone(),
            index: idx.as_slice().to_vec(),
            logical: format!("{:?}", self.logical),
        })?;
        self.data[off] = value;
        Ok(())
    }

    /// Fill every assignable cell from `f(idx)`.
    pub fn fill_assignable(&mut self, f: impl Fn(MDIndex<D>) -> Real) {
        let assignable = self.assignable;
        for idx in pde_types::RangedIndex::begin(&assignable) {
            self.set(idx, f(idx)).expect("assignable subset of logical by construction");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bc::BcSpec;

    fn mesh1d() -> Arc<CartesianMesh<1>> {
        Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [9], 1).unwrap())
    }

    #[test]
    fn set_then_get_round_trips() {
        let mesh = mesh1d();
        let mut f = Field::new(
            mesh,
            "u",
            [Location::Center],
            [BcSpec::Dirichlet(0.0.into())],
            [BcSpec::Dirichlet(0.0.into())],
        );
        f.fill_assignable(|idx| idx[0] as Real);
        assert_eq!(f.get(MDIndex::new([3])).unwrap(), 3.0);
    }

    #[test]
    fn out_of_logical_range_is_an_error() {
        let mesh = mesh1d();
        let f = Field::new(
            mesh,
            "u",
            [Location::Center],
            [BcSpec::Periodic],
            [BcSpec::Periodic],
        );
        assert!(f.get(MDIndex::new([1000])).is_err());
    }
}
