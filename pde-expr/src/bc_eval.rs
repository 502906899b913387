use pde_field::{BcSpec, Field, StencilRow};
use pde_types::{MDIndex, Real};

/// Synthesize a ghost value for `idx`, one BC-reach outside `field`'s
/// accessible range, by finding the first axis on which `idx` falls
/// outside and applying that axis/face's [`BcSpec`]. This is the shared
/// "consult `arg.bc[axis]`" behavior every leaf and composed operator's
/// `eval_safe` falls back to.
pub fn bc_ghost_value<const D: usize>(field: &Field<D>, idx: MDIndex<D>) -> Real {
    let accessible = *field.accessible();
    for axis in 0..D {
        if idx[axis] < accessible.start[axis] {
            return ghost_at(field, idx, axis, Side::Start);
        }
        if idx[axis] >= accessible.end[axis] {
            return ghost_at(field, idx, axis, Side::End);
        }
    }
    field.get(idx).unwrap_or(0.0)
}

/// The symbolic counterpart of [`bc_ghost_value`]: the same one-axis walk,
/// but producing the stencil row the ghost value would expand to (a
/// scaled mirrored-cell term plus, for `Dirichlet`/`Neumann`, a constant
/// contribution from the boundary value) instead of a number.
pub fn bc_ghost_stencil<const D: usize>(field: &Field<D>, color: u32, idx: MDIndex<D>) -> StencilRow<D> {
    let accessible = *field.accessible();
    for axis in 0..D {
        if idx[axis] < accessible.start[axis] {
            return ghost_stencil_at(field, color, idx, axis, Side::Start);
        }
        if idx[axis] >= accessible.end[axis] {
            return ghost_stencil_at(field, color, idx, axis, Side::End);
        }
    }
    StencilRow::term(1.0, color, idx)
}

fn ghost_stencil_at<const D: usize>(field: &Field<D>, color: u32, idx: MDIndex<D>, axis: usize, side: Side) -> StencilRow<D> {
    let accessible = *field.accessible();
    let bc = match side {
        Side::Start => &field.bc_start()[axis],
        Side::End => &field.bc_end()[axis],
    };
    let boundary = match side {
        Side::Start => accessible.start[axis],
        Side::End => accessible.end[axis] - 1,
    };
    let depth = match side {
        Side::Start => boundary - idx[axis],
        Side::End => idx[axis] - boundary,
    };
    let mirror_coord = match side {
        Side::Start => boundary + depth,
        Side::End => boundary - depth,
    };
    let mut mirror_idx = idx;
    mirror_idx[axis] = mirror_coord;

    match bc {
        BcSpec::Periodic => {
            let extent = accessible.end[axis] - accessible.start[axis];
            let mut wrapped = idx;
            wrapped[axis] = match side {
                Side::Start => idx[axis] + extent,
                Side::End => idx[axis] - extent,
            };
            StencilRow::term(1.0, color, wrapped)
        }
        BcSpec::Symm => StencilRow::term(1.0, color, mirror_idx),
        BcSpec::ASymm => StencilRow::term(-1.0, color, mirror_idx),
        BcSpec::Dirichlet(v) => {
            let boundary_val = v.at(boundary);
            // ghost = 2*boundary_val - interior
            StencilRow::term(-1.0, color, mirror_idx).add(&StencilRow::constant(2.0 * boundary_val))
        }
        BcSpec::Neumann(v) => {
            let dx = field.mesh().dx(axis, boundary);
            let flux = v.at(boundary);
            let sign = match side {
                Side::Start => -1.0,
                Side::End => 1.0,
            };
            // ghost = interior +/- flux*dx*depth
            StencilRow::term(1.0, color, mirror_idx).add(&StencilRow::constant(sign * flux * dx * depth as Real))
        }
        BcSpec::Internal => StencilRow::term(1.0, color, mirror_idx),
    }
}

enum Side {
    Start,
    End,
}

fn ghost_at<const D: usize>(field: &Field<D>, idx: MDIndex<D>, axis: usize, side: Side) -> Real {
    let accessible = *field.accessible();
    let bc = match side {
        Side::Start => &field.bc_start()[axis],
        Side::End => &field.bc_end()[axis],
    };
    let boundary = match side {
        Side::Start => accessible.start[axis],
        Side::End => accessible.end[axis] - 1,
    };
    let depth = match side {
        Side::Start => boundary - idx[axis],
        Side::End => idx[axis] - boundary,
    };
    let mirror_coord = match side {
        Side::Start => boundary + depth,
        Side::End => boundary - depth,
    };
    let mut mirror_idx = idx;
    mirror_idx[axis] = mirror_coord;

    match bc {
        BcSpec::Periodic => {
            let extent = accessible.end[axis] - accessible.start[axis];
            let mut wrapped = idx;
            wrapped[axis] = match side {
                Side::Start => idx[axis] + extent,
                Side::End => idx[axis] - extent,
            };
            field.get(wrapped).unwrap_or(0.0)
        }
        BcSpec::Symm => field.get(mirror_idx).unwrap_or(0.0),
        BcSpec::ASymm => -field.get(mirror_idx).unwrap_or(0.0),
        BcSpec::Dirichlet(v) => {
            let boundary_val = v.at(boundary);
            let interior = field.get(mirror_idx).unwrap_or(boundary_val);
            2.0 * boundary_val - interior
        }
        BcSpec::Neumann(v) => {
            let dx = field.mesh().dx(axis, boundary);
            let flux = v.at(boundary);
            let interior = field.get(mirror_idx).unwrap_or(0.0);
            match side {
                Side::Start => interior - flux * dx * depth as Real,
                Side::End => interior + flux * dx * depth as Real,
            }
        }
        BcSpec::Internal => field.get(mirror_idx).unwrap_or(0.0),
    }
}
