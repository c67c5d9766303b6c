use crate::core::models::structure::{AtomicStructure, SpeciesBlock, StructureError};
use crate::core::utils::geometry::axis_bounds;
use nalgebra::{Matrix3, Point3, Vector3};

/// A two-chain packing that passed the clash test.
///
/// Atoms are interleaved per species: for each species block, the first chain's atoms
/// are followed by the second chain's atoms of that same species, so the doubled
/// species counts stay aligned with the coordinate block.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedCrystal {
    header: String,
    species: Vec<SpeciesBlock>,
    positions: Vec<Point3<f64>>,
    stacking_period: f64,
}

impl AcceptedCrystal {
    /// Interleaves two placed copies of `unit` species block by species block.
    ///
    /// # Arguments
    ///
    /// * `unit` - The source unit, providing header, species table and stacking period.
    /// * `first` - Coordinates of the fixed chain, in the unit's atom order.
    /// * `second` - Coordinates of the placed chain, in the unit's atom order.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::AtomCountMismatch`] if either coordinate set does not
    /// match the unit's atom count.
    pub fn assemble(
        unit: &AtomicStructure,
        first: &[Point3<f64>],
        second: &[Point3<f64>],
    ) -> Result<Self, StructureError> {
        for placed in [first, second] {
            if placed.len() != unit.atom_count() {
                return Err(StructureError::AtomCountMismatch {
                    expected: unit.atom_count(),
                    actual: placed.len(),
                });
            }
        }

        let mut positions = Vec::with_capacity(2 * unit.atom_count());
        for range in unit.species_ranges() {
            positions.extend_from_slice(&first[range.clone()]);
            positions.extend_from_slice(&second[range]);
        }
        let species = unit
            .species()
            .iter()
            .map(|block| SpeciesBlock::new(&block.label, 2 * block.count))
            .collect();

        Ok(Self {
            header: unit.header().to_string(),
            species,
            positions,
            stacking_period: unit.stacking_period(),
        })
    }

    pub fn species(&self) -> &[SpeciesBlock] {
        &self.species
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Frames the crystal in an orthorhombic cell with in-plane vacuum.
    ///
    /// Coordinates are shifted so that `min(x) == min(y) == padding / 2`. The in-plane
    /// lattice vectors are the x and y extents plus `padding`; the stacking vector is
    /// `(0, 0, period)` of the source unit.
    ///
    /// # Errors
    ///
    /// Propagates [`StructureError`] from structure construction.
    pub fn into_structure(self, padding: f64) -> Result<AtomicStructure, StructureError> {
        let (min_x, max_x) = axis_bounds(&self.positions, 0);
        let (min_y, max_y) = axis_bounds(&self.positions, 1);
        let half = padding / 2.0;

        let positions: Vec<Point3<f64>> = self
            .positions
            .iter()
            .map(|p| Point3::new(p.x - min_x + half, p.y - min_y + half, p.z))
            .collect();

        let lattice = Matrix3::from_diagonal(&Vector3::new(
            max_x - min_x + padding,
            max_y - min_y + padding,
            self.stacking_period,
        ));

        AtomicStructure::new(&self.header, 1.0, lattice, self.species, positions)
    }
}
