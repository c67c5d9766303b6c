use nalgebra::{Matrix3, Point3};
use std::ops::Range;
use thiserror::Error;

/// Index of the stacking axis (z) in lattice rows and coordinate triples.
pub const STACKING_AXIS: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error(
        "Species counts sum to {expected} atoms but {actual} coordinate rows were provided"
    )]
    AtomCountMismatch { expected: usize, actual: usize },
    #[error("Structure must contain at least one species block")]
    NoSpecies,
}

/// A contiguous block of atoms of one chemical species.
///
/// Blocks appear in the order of the species line of the structure file, and the
/// coordinates of the owning structure are grouped in exactly this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesBlock {
    /// The species label (e.g., "C", "H").
    pub label: String,
    /// The number of atoms in this block.
    pub count: usize,
}

impl SpeciesBlock {
    pub fn new(label: &str, count: usize) -> Self {
        Self {
            label: label.to_string(),
            count,
        }
    }
}

/// Represents one periodic atomic structure: a polymer unit or an assembled crystal.
///
/// The structure is immutable once built. Geometric operations work on copies of its
/// coordinate set, which keep the atom order and therefore the species grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicStructure {
    header: String,
    scale: f64,
    lattice: Matrix3<f64>,
    species: Vec<SpeciesBlock>,
    positions: Vec<Point3<f64>>,
}

impl AtomicStructure {
    /// Creates a new structure, checking the species/coordinate invariant.
    ///
    /// # Arguments
    ///
    /// * `header` - Free-text identifier, preserved verbatim into every derived output.
    /// * `scale` - The universal scale factor read from the input.
    /// * `lattice` - Lattice basis vectors, one per row.
    /// * `species` - Species blocks in file order.
    /// * `positions` - Cartesian coordinates grouped by species.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::AtomCountMismatch`] if the species counts do not sum to
    /// the number of positions, or [`StructureError::NoSpecies`] if `species` is empty.
    pub fn new(
        header: &str,
        scale: f64,
        lattice: Matrix3<f64>,
        species: Vec<SpeciesBlock>,
        positions: Vec<Point3<f64>>,
    ) -> Result<Self, StructureError> {
        if species.is_empty() {
            return Err(StructureError::NoSpecies);
        }
        let expected: usize = species.iter().map(|s| s.count).sum();
        if expected != positions.len() {
            return Err(StructureError::AtomCountMismatch {
                expected,
                actual: positions.len(),
            });
        }
        Ok(Self {
            header: header.to_string(),
            scale,
            lattice,
            species,
            positions,
        })
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn lattice(&self) -> &Matrix3<f64> {
        &self.lattice
    }

    pub fn species(&self) -> &[SpeciesBlock] {
        &self.species
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn atom_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the repeat period of the unit along the stacking axis.
    ///
    /// This is the stacking-axis component of the third lattice vector, the only
    /// lattice entry the crystal search reads.
    pub fn stacking_period(&self) -> f64 {
        self.lattice[(STACKING_AXIS, STACKING_AXIS)]
    }

    /// Returns the index range of each species block within [`Self::positions`].
    pub fn species_ranges(&self) -> Vec<Range<usize>> {
        let mut start = 0;
        self.species
            .iter()
            .map(|block| {
                let range = start..start + block.count;
                start = range.end;
                range
            })
            .collect()
    }
}
