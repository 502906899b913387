use crate::field::Field;
use pde_types::Real;

/// The MPI collaborator's contract, modeled as a trait rather than a
/// hard dependency: `spec.md` §1 lists MPI collectives as out of scope
/// for the core, appearing only at the boundary where a field
/// synchronizes its halo. `SingleRank` is the default, always-available
/// implementation and the one every test in this workspace runs against;
/// a real binding (e.g. the `mpi` crate) is a feature-gated extension
/// point this crate does not itself depend on.
pub trait Communicator: Send + Sync {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    /// Exchange one buffer per neighbor: `send_bufs[i]` is sent to the
    /// neighbor at position `i` in the caller's neighbor list, and the
    /// buffer received from that same neighbor is returned at the same
    /// position.
    fn exchange_halo(&self, send_bufs: Vec<Vec<Real>>) -> Vec<Vec<Real>>;
}

/// The trivial single-process communicator: "exchange" with oneself is
/// the identity, which is exactly what a field with no `neighbors`
/// registered needs.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleRank;

impl Communicator for SingleRank {
    fn rank(&self) -> usize {
        0
    }
    fn size(&self) -> usize {
        1
    }
    fn exchange_halo(&self, send_bufs: Vec<Vec<Real>>) -> Vec<Vec<Real>> {
        send_bufs
    }
}

impl<const D: usize> Field<D> {
    /// Synchronize this field's ghost/padding zones with its registered
    /// neighbors: for each neighbor, pack our own interior band matching
    /// its `send_range` into a buffer, round-trip every neighbor's
    /// buffer through `comm`, and unpack what comes back into this
    /// field's `recv_range`. A periodic wrap is just a neighbor whose
    /// `shift_code` encodes the wrap direction; `SingleRank` makes this a
    /// same-rank copy.
    pub fn update_padding(&mut self, comm: &dyn Communicator) {
        if self.neighbors().is_empty() {
            return;
        }
        let sends: Vec<Vec<Real>> = self
            .neighbors()
            .iter()
            .map(|n| {
                pde_types::RangedIndex::begin(&n.send_range)
                    .map(|idx| self.get(idx).unwrap_or(0.0))
                    .collect()
            })
            .collect();
        let recvs = comm.exchange_halo(sends);
        let neighbors = self.neighbors().to_vec();
        for (n, buf) in neighbors.iter().zip(recvs) {
            for (idx, v) in pde_types::RangedIndex::begin(&n.recv_range).zip(buf) {
                let _ = self.set(idx, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bc::BcSpec;
    use crate::location::Location;
    use crate::neighbor::NeighborInfo;
    use pde_mesh::CartesianMesh;
    use pde_types::{AxisBox, MDIndex};
    use std::sync::Arc;

    #[test]
    fn single_rank_round_trips_a_periodic_wrap() {
        let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [9], 1).unwrap());
        let mut f = Field::new(mesh, "u", [Location::Center], [BcSpec::Periodic], [BcSpec::Periodic]);
        f.fill_assignable(|idx| idx[0] as Real);
        let send = AxisBox::<1>::new([1], [2]);
        let recv = AxisBox::<1>::new([-1], [0]);
        let neighbor = NeighborInfo::new(0, send, recv, 1);
        let neighbors = vec![neighbor];
        f = f.distribute(0, [0], 1, vec![*f.accessible()], neighbors).unwrap();
        f.update_padding(&SingleRank);
        assert_eq!(f.get(MDIndex::new([-1])).unwrap(), 1.0);
    }
}
