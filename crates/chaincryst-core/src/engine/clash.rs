use nalgebra::{Point3, Vector3};

/// A pair of atoms of one structure found closer than a contact threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseContact {
    pub atom_a: usize,
    pub atom_b: usize,
    pub distance: f64,
}

/// All-pairs steric test between a fixed chain and a placed chain that repeats along z.
///
/// The placed chain is checked together with its two nearest periodic images, shifted
/// by `+period` and `-period` along the stacking axis. One scalar threshold applies to
/// every atom pair regardless of species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClashDetector {
    threshold: f64,
    period: f64,
}

impl ClashDetector {
    pub fn new(threshold: f64, period: f64) -> Self {
        Self { threshold, period }
    }

    /// Returns the placement followed by its `+period` and `-period` images.
    pub fn periodic_images(&self, second: &[Point3<f64>]) -> Vec<Point3<f64>> {
        let shift = Vector3::z() * self.period;
        second
            .iter()
            .copied()
            .chain(second.iter().map(|p| *p + shift))
            .chain(second.iter().map(|p| *p - shift))
            .collect()
    }

    /// Returns `true` iff every distance between `first` and the images of `second`
    /// strictly exceeds the threshold.
    pub fn is_clash_free(&self, first: &[Point3<f64>], second: &[Point3<f64>]) -> bool {
        let threshold_sq = self.threshold * self.threshold;
        let images = self.periodic_images(second);
        first
            .iter()
            .all(|a| images.iter().all(|b| (a - b).norm_squared() > threshold_sq))
    }

    /// Returns the smallest distance between `first` and the images of `second`.
    ///
    /// `None` if either set is empty.
    pub fn min_distance(&self, first: &[Point3<f64>], second: &[Point3<f64>]) -> Option<f64> {
        let images = self.periodic_images(second);
        first
            .iter()
            .flat_map(|a| images.iter().map(move |b| (a - b).norm_squared()))
            .min_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal))
            .map(f64::sqrt)
    }
}

/// Finds every pair `i < j` of `atoms` closer than `threshold`.
pub fn find_close_contacts(atoms: &[Point3<f64>], threshold: f64) -> Vec<CloseContact> {
    let threshold_sq = threshold * threshold;
    let mut contacts = Vec::new();
    for (i, a) in atoms.iter().enumerate() {
        for (j, b) in atoms.iter().enumerate().skip(i + 1) {
            let dist_sq = (a - b).norm_squared();
            if dist_sq < threshold_sq {
                contacts.push(CloseContact {
                    atom_a: i,
                    atom_b: j,
                    distance: dist_sq.sqrt(),
                });
            }
        }
    }
    contacts
}
