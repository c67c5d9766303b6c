use crate::core::models::structure::{AtomicStructure, STACKING_AXIS};
use crate::core::utils::geometry::{
    axis_extent, recenter_and_place, rotate_in_plane, translate_axis,
};
use crate::engine::clash::{ClashDetector, find_close_contacts};
use crate::engine::config::{RadiusPolicy, SearchConfig};
use crate::engine::crystal::AcceptedCrystal;
use crate::engine::error::EngineError;
use crate::engine::grid::{GridPoint, SamplingGrid};
use nalgebra::Point3;
use tracing::{debug, instrument, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Extra clearance added to the bounding-box radius in [`RadiusPolicy::Auto`].
const AUTO_RADIUS_MARGIN: f64 = 2.0;

/// Counters of one exhaustive grid search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Grid points evaluated; always the full grid.
    pub evaluated: usize,
    /// Grid points that passed the clash test and were handed to the sink.
    pub accepted: usize,
    /// Accepted grid points whose sink call returned an error.
    pub failed: usize,
}

impl SearchStats {
    fn merge(self, other: Self) -> Self {
        Self {
            evaluated: self.evaluated + other.evaluated,
            accepted: self.accepted + other.accepted,
            failed: self.failed + other.failed,
        }
    }
}

/// Resolves the planar placement radius for a unit.
///
/// With [`RadiusPolicy::Auto`], each in-plane extent of the unit is rounded with
/// `int(extent + 0.5)` and the larger one is used plus a 2 Å margin, so the two chains
/// cannot trivially overlap before rotation.
pub fn resolve_radius(policy: RadiusPolicy, positions: &[Point3<f64>]) -> f64 {
    match policy {
        RadiusPolicy::Fixed(radius) => radius,
        RadiusPolicy::Auto => {
            let x = (axis_extent(positions, 0) + 0.5).trunc();
            let y = (axis_extent(positions, 1) + 0.5).trunc();
            x.max(y) + AUTO_RADIUS_MARGIN
        }
    }
}

/// Exhaustive translation/rotation search of two-chain packings for one unit.
///
/// The first chain is centred at the origin and never moves. For each grid point the
/// second chain is shifted along z, rotated in-plane about its own centroid, and placed
/// on a circle of the resolved radius around the first. Every point of the grid is
/// evaluated; there is no early exit.
#[derive(Debug)]
pub struct CrystalSearch<'a> {
    unit: &'a AtomicStructure,
    config: &'a SearchConfig,
    grid: SamplingGrid,
    radius: f64,
    first: Vec<Point3<f64>>,
    detector: ClashDetector,
}

impl<'a> CrystalSearch<'a> {
    /// Prepares the grid, radius and fixed chain for `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DegenerateGrid`] if the configured sample count is below
    /// two or the unit has no extent along the stacking axis.
    pub fn new(unit: &'a AtomicStructure, config: &'a SearchConfig) -> Result<Self, EngineError> {
        let span = axis_extent(unit.positions(), STACKING_AXIS);
        let grid = SamplingGrid::new(span, config.n_samples)?;
        let first = recenter_and_place(unit.positions(), 0.0, 0.0);
        let radius = resolve_radius(config.radius, &first);
        let detector = ClashDetector::new(config.clash_threshold, unit.stacking_period());

        Ok(Self {
            unit,
            config,
            grid,
            radius,
            first,
            detector,
        })
    }

    pub fn grid(&self) -> &SamplingGrid {
        &self.grid
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Places the second chain for one grid point.
    pub fn place_second(&self, point: &GridPoint) -> Vec<Point3<f64>> {
        let translated = translate_axis(self.unit.positions(), point.translation);
        let rotated = rotate_in_plane(&translated, point.rotation);
        recenter_and_place(&rotated, point.placement_angle, self.radius)
    }

    /// Evaluates one grid point, returning the assembled crystal if it is clash-free.
    ///
    /// # Errors
    ///
    /// Propagates a [`crate::core::models::structure::StructureError`] if assembly fails,
    /// which only happens if the placed coordinates lose atoms.
    pub fn evaluate(&self, point: &GridPoint) -> Result<Option<AcceptedCrystal>, EngineError> {
        let second = self.place_second(point);
        if !self.detector.is_clash_free(&self.first, &second) {
            trace!(key = %point.key(), "Rejected clashing placement.");
            return Ok(None);
        }

        let crystal = AcceptedCrystal::assemble(self.unit, &self.first, &second)?;
        let contacts = find_close_contacts(crystal.positions(), self.config.contact_threshold);
        if !contacts.is_empty() {
            warn!(
                key = %point.key(),
                num_contacts = contacts.len(),
                closest = contacts
                    .iter()
                    .map(|c| c.distance)
                    .fold(f64::INFINITY, f64::min),
                "Assembled crystal contains atoms closer than the contact threshold."
            );
            for contact in &contacts {
                debug!(
                    atom_a = contact.atom_a,
                    atom_b = contact.atom_b,
                    distance = contact.distance,
                    "Close contact."
                );
            }
        }
        Ok(Some(crystal))
    }

    /// Runs the full grid, handing each accepted crystal to `sink`.
    ///
    /// A sink error is logged and counted in [`SearchStats::failed`]; it never stops the
    /// search, since grid points are independent of each other.
    ///
    /// # Errors
    ///
    /// Returns an error only if crystal assembly itself fails.
    #[instrument(skip_all, name = "crystal_search", fields(header = self.unit.header(), radius = self.radius))]
    pub fn run<F, E>(&self, sink: F) -> Result<SearchStats, EngineError>
    where
        F: Fn(&GridPoint, AcceptedCrystal) -> Result<(), E> + Sync,
        E: std::fmt::Display,
    {
        let points: Vec<GridPoint> = self.grid.points().collect();

        let visit = |point: &GridPoint| -> Result<SearchStats, EngineError> {
            let mut stats = SearchStats {
                evaluated: 1,
                ..Default::default()
            };
            if let Some(crystal) = self.evaluate(point)? {
                stats.accepted = 1;
                if let Err(e) = sink(point, crystal) {
                    warn!(key = %point.key(), error = %e, "Failed to emit accepted crystal.");
                    stats.failed = 1;
                }
            }
            Ok(stats)
        };

        #[cfg(not(feature = "parallel"))]
        let stats = points
            .iter()
            .map(visit)
            .try_fold(SearchStats::default(), |acc, s| s.map(|s| acc.merge(s)))?;

        #[cfg(feature = "parallel")]
        let stats = points
            .par_iter()
            .map(visit)
            .try_reduce(SearchStats::default, |a, b| Ok(a.merge(b)))?;

        debug!(
            evaluated = stats.evaluated,
            accepted = stats.accepted,
            "Grid search finished."
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::SpeciesBlock;
    use crate::engine::config::SearchConfigBuilder;
    use nalgebra::Matrix3;
    use std::collections::BTreeSet;
    use std::convert::Infallible;
    use std::sync::Mutex;

    fn unit_with(positions: Vec<Point3<f64>>, period: f64) -> AtomicStructure {
        let n = positions.len();
        AtomicStructure::new(
            "test chain",
            1.0,
            Matrix3::new(10.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, period),
            vec![SpeciesBlock::new("C", n)],
            positions,
        )
        .unwrap()
    }

    fn zigzag_unit() -> AtomicStructure {
        unit_with(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 2.0),
                Point3::new(0.0, 0.0, 4.0),
            ],
            4.0,
        )
    }

    fn config(n: usize, radius: RadiusPolicy, threshold: f64) -> SearchConfig {
        SearchConfigBuilder::new()
            .n_samples(n)
            .radius(radius)
            .clash_threshold(threshold)
            .build()
            .unwrap()
    }

    fn accepted_keys(search: &CrystalSearch) -> BTreeSet<String> {
        let keys = Mutex::new(BTreeSet::new());
        search
            .run(|point, _| {
                keys.lock().unwrap().insert(point.key());
                Ok::<(), Infallible>(())
            })
            .unwrap();
        keys.into_inner().unwrap()
    }

    #[test]
    fn auto_radius_uses_rounded_bounding_box() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.2, 5.0, 1.0),
        ];
        assert_eq!(resolve_radius(RadiusPolicy::Auto, &positions), 7.0);
    }

    #[test]
    fn auto_radius_rounds_half_up() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.5, 1.0, 1.0),
        ];
        assert_eq!(resolve_radius(RadiusPolicy::Auto, &positions), 6.0);
    }

    #[test]
    fn fixed_radius_is_used_unchanged() {
        assert_eq!(resolve_radius(RadiusPolicy::Fixed(6.25), &[]), 6.25);
    }

    #[test]
    fn scenario_with_wide_radius_accepts_every_candidate() {
        let unit = zigzag_unit();
        let cfg = config(3, RadiusPolicy::Fixed(6.0), 2.0);
        let search = CrystalSearch::new(&unit, &cfg).unwrap();

        assert_eq!(search.grid().translations(), &[0.0, 2.0, 4.0]);
        assert_eq!(search.grid().rotations(), &[0.0, 90.0, 180.0]);

        let stats = search
            .run(|_, _| Ok::<(), Infallible>(()))
            .unwrap();
        assert_eq!(stats.evaluated, 27);
        assert_eq!(stats.accepted, 27);
        assert_eq!(stats.failed, 0);
    }

    #[test]
    fn accepted_crystals_are_clash_free_against_periodic_images() {
        let unit = zigzag_unit();
        let cfg = config(4, RadiusPolicy::Fixed(2.5), 2.0);
        let search = CrystalSearch::new(&unit, &cfg).unwrap();
        let detector = ClashDetector::new(2.0, unit.stacking_period());

        for point in search.grid().points() {
            let second = search.place_second(&point);
            let accepted = search.evaluate(&point).unwrap().is_some();
            let min = detector.min_distance(&search.first, &second).unwrap();
            assert_eq!(accepted, min > 2.0, "point {}", point.key());
        }
    }

    #[test]
    fn tiny_radius_rejects_every_candidate() {
        let unit = unit_with(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 1.5),
                Point3::new(0.0, 0.0, 3.0),
            ],
            4.5,
        );
        for n in 2..5 {
            let cfg = config(n, RadiusPolicy::Fixed(0.1), 2.0);
            let search = CrystalSearch::new(&unit, &cfg).unwrap();
            let stats = search.run(|_, _| Ok::<(), Infallible>(())).unwrap();
            assert_eq!(stats.evaluated, n * n * n);
            assert_eq!(stats.accepted, 0);
        }
    }

    #[test]
    fn repeated_runs_accept_identical_sets() {
        let unit = zigzag_unit();
        let cfg = config(5, RadiusPolicy::Fixed(2.2), 2.0);
        let search = CrystalSearch::new(&unit, &cfg).unwrap();
        let first_run = accepted_keys(&search);
        let second_run = accepted_keys(&CrystalSearch::new(&unit, &cfg).unwrap());
        assert_eq!(first_run, second_run);
    }

    #[test]
    fn raising_threshold_never_increases_acceptance() {
        let unit = zigzag_unit();
        let mut previous = usize::MAX;
        for threshold in [0.5, 1.0, 1.5, 2.0, 2.5, 3.0] {
            let cfg = config(5, RadiusPolicy::Fixed(2.5), threshold);
            let search = CrystalSearch::new(&unit, &cfg).unwrap();
            let accepted = search.run(|_, _| Ok::<(), Infallible>(())).unwrap().accepted;
            assert!(accepted <= previous, "threshold {}", threshold);
            previous = accepted;
        }
    }

    #[test]
    fn sink_failures_are_counted_without_stopping_the_grid() {
        let unit = zigzag_unit();
        let cfg = config(3, RadiusPolicy::Fixed(6.0), 2.0);
        let search = CrystalSearch::new(&unit, &cfg).unwrap();
        let stats = search
            .run(|point, _| {
                if point.translation == 2.0 {
                    Err("disk full")
                } else {
                    Ok(())
                }
            })
            .unwrap();
        assert_eq!(stats.evaluated, 27);
        assert_eq!(stats.accepted, 27);
        assert_eq!(stats.failed, 9);
    }

    #[test]
    fn flat_unit_is_rejected_before_search() {
        let unit = unit_with(
            vec![Point3::new(0.0, 0.0, 1.0), Point3::new(1.5, 0.0, 1.0)],
            3.0,
        );
        let cfg = config(3, RadiusPolicy::Auto, 2.0);
        assert!(matches!(
            CrystalSearch::new(&unit, &cfg),
            Err(EngineError::DegenerateGrid { .. })
        ));
    }
}
