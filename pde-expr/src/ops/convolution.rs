use crate::expr::Expr;
use crate::meta::ExprMeta;
use crate::value::Value;
use pde_types::{MDIndex, Real};

/// A compile-time-sized, odd-extent tensor kernel: `extents[k]` is the
/// (odd) width of the kernel along axis `k`, and `data` is the
/// row-major-flattened `N = prod(extents)` coefficients. Grounded on
/// `original_source/src/DataStructures/Arrays/Tensor/FixedSizeTensor.hpp`
/// — a fixed-size array rather than a heap `Vec`, since `N` is known at
/// the call site. `N` can't be derived from `extents` by the const-generic
/// system alone, so the caller supplies it explicitly (and `Kernel::new`
/// asserts it matches).
#[derive(Clone, Debug)]
pub struct Kernel<const D: usize, const N: usize> {
    extents: [usize; D],
    data: [Real; N],
}

impl<const D: usize, const N: usize> Kernel<D, N> {
    pub fn new(extents: [usize; D], data: [Real; N]) -> Self {
        let expected: usize = extents.iter().product();
        assert_eq!(expected, N, "Kernel: extents {extents:?} imply {expected} entries, got {N}");
        for &e in &extents {
            assert!(e % 2 == 1, "Kernel: extent {e} must be odd");
        }
        Self { extents, data }
    }

    fn half_extents(&self) -> [i64; D] {
        self.extents.map(|e| (e as i64) / 2)
    }
}

/// Discrete convolution: `result[i] = sum_k kernel[k] * arg[i + k -
/// center]`. `bc_width = max(extents)/2`. Linear in `arg`, so it works on
/// either evaluation path (`V = Real` for numeric convolution, `V =
/// StencilRow<D>` for the equation compiler).
pub struct Convolution<const D: usize, const N: usize, V: Value<D>> {
    kernel: Kernel<D, N>,
    arg: Box<dyn Expr<D, V>>,
    meta: ExprMeta<D>,
}

impl<const D: usize, const N: usize, V: Value<D>> Convolution<D, N, V> {
    pub fn new(kernel: Kernel<D, N>, arg: Box<dyn Expr<D, V>>) -> Self {
        let am = arg.meta();
        let meta = ExprMeta::derived(format!("conv({})", am.name), am.accessible, am.local, am.logical);
        Self { kernel, arg, meta }
    }

    fn bc_width_inner(&self) -> i64 {
        self.kernel.extents.iter().map(|&e| (e as i64) / 2).max().unwrap_or(0)
    }

    fn offsets(&self) -> Vec<[i64; D]> {
        let half = self.kernel.half_extents();
        let mut out = Vec::with_capacity(self.kernel.data.len());
        let mut local = [0i64; D];
        loop {
            let mut delta = [0i64; D];
            for k in 0..D {
                delta[k] = local[k] - half[k];
            }
            out.push(delta);
            // row-major odometer increment
            let mut axis = 0;
            loop {
                if axis == D {
                    return out;
                }
                local[axis] += 1;
                if (local[axis] as usize) < self.kernel.extents[axis] {
                    break;
                }
                local[axis] = 0;
                axis += 1;
            }
        }
    }
}

impl<const D: usize, const N: usize, V: Value<D>> Expr<D, V> for Convolution<D, N, V> {
    fn bc_width(&self) -> i64 {
        self.arg.bc_width() + self.bc_width_inner()
    }

    fn eval(&self, idx: MDIndex<D>) -> V {
        let mut acc = V::zero();
        for (local, delta) in self.offsets().iter().enumerate() {
            let shifted = idx.offset_by(delta);
            let coeff = self.kernel.data[local];
            acc = acc.add(&self.arg.eval(shifted).scale(coeff));
        }
        acc
    }

    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        let mut acc = V::zero();
        for (local, delta) in self.offsets().iter().enumerate() {
            let shifted = idx.offset_by(delta);
            let coeff = self.kernel.data[local];
            acc = acc.add(&self.arg.eval_safe(shifted).scale(coeff));
        }
        acc
    }

    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.offsets().iter().all(|delta| self.arg.could_safe_eval(idx.offset_by(delta)))
    }

    fn prepare(&mut self) -> ExprMeta<D> {
        let am = self.arg.prepare();
        let w = self.bc_width_inner();
        let accessible = am.accessible.shrink(w);
        let local = am.local.shrink(w);
        let logical = am.logical.shrink(w);
        self.meta = ExprMeta::derived(format!("conv({})", am.name), accessible, local, logical);
        self.meta.clone()
    }

    fn meta(&self) -> &ExprMeta<D> {
        &self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::FieldLeaf;
    use pde_field::{BcSpec, Field, Location};
    use pde_mesh::CartesianMesh;
    use pde_types::Real;
    use std::sync::Arc;

    #[test]
    fn convolution_with_kronecker_kernel_is_identity() {
        let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [9], 2).unwrap());
        let mut f = Field::new(mesh, "u", [Location::Center], [BcSpec::Periodic], [BcSpec::Periodic]);
        f.fill_assignable(|idx| idx[0] as Real * 2.0);
        let leaf = FieldLeaf::new(Arc::new(f));
        let kernel: Kernel<1, 3> = Kernel::new([3], [0.0, 1.0, 0.0]);
        let mut conv: Convolution<1, 3, Real> = Convolution::new(kernel, Box::new(leaf));
        conv.prepare();
        assert_eq!(conv.eval_safe(MDIndex::new([4])), 8.0);
    }
}
