use crate::field::Field;
use pde_types::AxisBox;

/// The AMR counterpart of [`Field`]: the six ranges become per-level,
/// per-patch lists, plus `max_logical_ranges` — the outer logical bound
/// per level (spec.md §3.5, "For AMR, these six ranges become per
/// level, per patch lists").
pub struct AmrField<const D: usize> {
    levels: Vec<Vec<Field<D>>>,
    max_logical_ranges: Vec<AxisBox<D>>,
}

impl<const D: usize> AmrField<D> {
    pub fn new(levels: Vec<Vec<Field<D>>>) -> Self {
        let max_logical_ranges = levels
            .iter()
            .map(|patches| {
                patches
                    .iter()
                    .map(|f| *f.logical())
                    .reduce(|a, b| a.min_cover_box(&b))
                    .unwrap_or_else(AxisBox::empty)
            })
            .collect();
        Self {
            levels,
            max_logical_ranges,
        }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn patches(&self, level: usize) -> &[Field<D>] {
        &self.levels[level]
    }

    pub fn patches_mut(&mut self, level: usize) -> &mut [Field<D>] {
        &mut self.levels[level]
    }

    pub fn max_logical_range(&self, level: usize) -> &AxisBox<D> {
        &self.max_logical_ranges[level]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bc::BcSpec;
    use crate::location::Location;
    use pde_mesh::CartesianMesh;
    use std::sync::Arc;

    #[test]
    fn max_logical_range_covers_every_patch() {
        let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [9], 1).unwrap());
        let f1 = Field::new(mesh.clone(), "u0", [Location::Center], [BcSpec::Periodic], [BcSpec::Periodic]);
        let f2 = Field::new(mesh, "u1", [Location::Center], [BcSpec::Periodic], [BcSpec::Periodic]);
        let amr = AmrField::new(vec![vec![f1, f2]]);
        let cover = *amr.max_logical_range(0);
        for f in amr.patches(0) {
            assert_eq!(cover.min_cover_box(f.logical()), cover);
        }
    }
}
