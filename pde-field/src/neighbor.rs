use pde_types::AxisBox;
use serde::{Deserialize, Serialize};

/// One halo-exchange partner: the box of our own data to send, the box
/// of ghost data to receive into, and a shift code identifying which
/// periodic image (if any) the exchange crosses. Mirrors the
/// `(send_range, recv_range, shift_code)` triple from `spec.md` §3.5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborInfo<const D: usize> {
    pub rank: usize,
    pub send_range: AxisBox<D>,
    pub recv_range: AxisBox<D>,
    pub shift_code: i32,
}

impl<const D: usize> NeighborInfo<D> {
    pub fn new(rank: usize, send_range: AxisBox<D>, recv_range: AxisBox<D>, shift_code: i32) -> Self {
        Self {
            rank,
            send_range,
            recv_range,
            shift_code,
        }
    }
}
