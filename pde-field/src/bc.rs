use pde_types::Real;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A named closure: pairs a boundary-value (or expression-leaf) functor
/// with a name so it can appear in panic messages and parameter dumps
/// without requiring `Fn` to implement `Debug`. Ported from
/// `original_source/src/Utils/NamedFunctor.hpp`.
#[derive(Clone)]
pub struct NamedFn {
    name: Cow<'static, str>,
    f: Arc<dyn Fn(i64) -> Real + Send + Sync>,
}

impl NamedFn {
    pub fn new(name: impl Into<Cow<'static, str>>, f: impl Fn(i64) -> Real + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, face_index: i64) -> Real {
        (self.f)(face_index)
    }
}

impl fmt::Debug for NamedFn {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "NamedFn({})", self.name)
    }
}

/// A scalar boundary value, or a functor of the face index.
#[derive(Clone, Debug)]
pub enum BcValue {
    Scalar(Real),
    Functor(NamedFn),
}

impl BcValue {
    pub fn at(&self, face_index: i64) -> Real {
        match self {
            BcValue::Scalar(v) => *v,
            BcValue::Functor(f) => f.call(face_index),
        }
    }
}

impl From<Real> for BcValue {
    fn from(v: Real) -> Self {
        BcValue::Scalar(v)
    }
}

/// A boundary-condition descriptor attached to one end of one axis of a
/// field. Mirrors `spec.md` §3.4's `BcSpec` variants exactly.
#[derive(Clone, Debug)]
pub enum BcSpec {
    Dirichlet(BcValue),
    Neumann(BcValue),
    Periodic,
    Symm,
    ASymm,
    /// No BC: the field extends from a coupled neighbor (another patch,
    /// another rank, or another expression), so there is no ghost value
    /// to synthesize here.
    Internal,
}

impl BcSpec {
    pub fn dirichlet(v: impl Into<BcValue>) -> Self {
        BcSpec::Dirichlet(v.into())
    }

    pub fn neumann(v: impl Into<BcValue>) -> Self {
        BcSpec::Neumann(v.into())
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, BcSpec::Internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_bc_value_is_constant() {
        let v = BcValue::from(3.5);
        assert_eq!(v.at(0), 3.5);
        assert_eq!(v.at(100), 3.5);
    }

    #[test]
    fn functor_bc_value_varies_with_face_index() {
        let f = NamedFn::new("linear-ramp", |i| i as Real * 2.0);
        let v = BcValue::Functor(f);
        assert_eq!(v.at(3), 6.0);
    }
}
