use crate::core::utils::numeric::{format_decimal, round_to};
use crate::engine::error::EngineError;
use itertools::iproduct;

const MAX_ROTATION_DEGREES: f64 = 180.0;
const TRANSLATION_DECIMALS: i32 = 2;
const ROTATION_DECIMALS: i32 = 1;

/// One candidate of the search: axial shift, in-plane rotation, and placement angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    /// Shift of the second chain along the stacking axis, in Angstroms.
    pub translation: f64,
    /// In-plane rotation of the second chain about its own axis, in degrees.
    pub rotation: f64,
    /// Polar angle at which the second chain is placed around the first, in degrees.
    pub placement_angle: f64,
}

impl GridPoint {
    /// Returns the file-name key `"{t}_{r1}_{r2}"` of this point.
    pub fn key(&self) -> String {
        format!(
            "{}_{}_{}",
            format_decimal(self.translation),
            format_decimal(self.rotation),
            format_decimal(self.placement_angle)
        )
    }
}

/// The full `translations × rotations × rotations` sampling grid of one unit.
///
/// Rotations cover `[0, 180]` with both endpoints included. The 0° and 180° samples
/// are degenerate for an in-plane rotation of a chain about z but are kept so the
/// sampled set matches established runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingGrid {
    translations: Vec<f64>,
    rotations: Vec<f64>,
}

impl SamplingGrid {
    /// Builds the grid for a unit spanning `z_span` along the stacking axis.
    ///
    /// Translations are `i · z_span / (n - 1)` rounded to two decimals, rotations are
    /// `i · 180 / (n - 1)` rounded to one decimal, for `i` in `0..n`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DegenerateGrid`] if `n_samples < 2`, or if `z_span` is not
    /// a positive finite number (every translation sample would coincide).
    pub fn new(z_span: f64, n_samples: usize) -> Result<Self, EngineError> {
        if n_samples < 2 {
            return Err(EngineError::DegenerateGrid {
                reason: format!("at least 2 samples per axis are required, got {}", n_samples),
            });
        }
        if !z_span.is_finite() || z_span <= 0.0 {
            return Err(EngineError::DegenerateGrid {
                reason: format!(
                    "unit must extend along the stacking axis, z-span is {}",
                    z_span
                ),
            });
        }

        let steps = (n_samples - 1) as f64;
        let translation_step = z_span / steps;
        let rotation_step = MAX_ROTATION_DEGREES / steps;

        let translations = (0..n_samples)
            .map(|i| round_to(i as f64 * translation_step, TRANSLATION_DECIMALS))
            .collect();
        let rotations = (0..n_samples)
            .map(|i| round_to(i as f64 * rotation_step, ROTATION_DECIMALS))
            .collect();

        Ok(Self {
            translations,
            rotations,
        })
    }

    pub fn translations(&self) -> &[f64] {
        &self.translations
    }

    pub fn rotations(&self) -> &[f64] {
        &self.rotations
    }

    pub fn len(&self) -> usize {
        self.translations.len() * self.rotations.len() * self.rotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerates every grid point, translation-major.
    pub fn points(&self) -> impl Iterator<Item = GridPoint> + '_ {
        iproduct!(
            self.translations.iter(),
            self.rotations.iter(),
            self.rotations.iter()
        )
        .map(|(&translation, &rotation, &placement_angle)| GridPoint {
            translation,
            rotation,
            placement_angle,
        })
    }
}
