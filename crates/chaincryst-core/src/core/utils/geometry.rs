use nalgebra::{Point2, Point3, Rotation2, Vector2};

/// Returns the mean (x, y) of a coordinate set, or the origin for an empty set.
pub fn centroid_xy(positions: &[Point3<f64>]) -> Point2<f64> {
    if positions.is_empty() {
        return Point2::origin();
    }
    let n = positions.len() as f64;
    let (sum_x, sum_y) = positions
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2::new(sum_x / n, sum_y / n)
}

/// Returns `max - min` of the given coordinate axis (0 = x, 1 = y, 2 = z).
///
/// An empty set has zero extent.
pub fn axis_extent(positions: &[Point3<f64>], axis: usize) -> f64 {
    let (min, max) = axis_bounds(positions, axis);
    if positions.is_empty() { 0.0 } else { max - min }
}

/// Returns `(min, max)` of the given coordinate axis.
pub fn axis_bounds(positions: &[Point3<f64>], axis: usize) -> (f64, f64) {
    positions
        .iter()
        .map(|p| p[axis])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

/// Moves the (x, y) centroid to the origin, then offsets the set onto a circle.
///
/// The offset is `(radius * cos(angle), radius * sin(angle))`; a `radius` of zero only
/// centres the set. The z coordinates are left untouched.
///
/// # Arguments
///
/// * `positions` - The coordinates to place.
/// * `angle_degrees` - The polar angle of the placement, in degrees.
/// * `radius` - The distance of the new centroid from the origin.
pub fn recenter_and_place(
    positions: &[Point3<f64>],
    angle_degrees: f64,
    radius: f64,
) -> Vec<Point3<f64>> {
    let centroid = centroid_xy(positions);
    let angle = angle_degrees.to_radians();
    let shift = Vector2::new(angle.cos(), angle.sin()) * radius - centroid.coords;
    positions
        .iter()
        .map(|p| Point3::new(p.x + shift.x, p.y + shift.y, p.z))
        .collect()
}

/// Shifts every atom along the stacking axis (z) by `distance`.
pub fn translate_axis(positions: &[Point3<f64>], distance: f64) -> Vec<Point3<f64>> {
    positions
        .iter()
        .map(|p| Point3::new(p.x, p.y, p.z + distance))
        .collect()
}

/// Rotates every atom in the xy plane about the z axis, leaving z unchanged.
///
/// The rotation matrix `R(θ)` is applied to each `(x, y)` treated as a row vector,
/// `[x y]·R(θ)`, which turns the set clockwise by `angle_degrees` when viewed down +z.
pub fn rotate_in_plane(positions: &[Point3<f64>], angle_degrees: f64) -> Vec<Point3<f64>> {
    // [x y]·R(θ) == R(-θ)·[x y]ᵀ
    let rotation = Rotation2::new(-angle_degrees.to_radians());
    positions
        .iter()
        .map(|p| {
            let xy = rotation * Vector2::new(p.x, p.y);
            Point3::new(xy.x, xy.y, p.z)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn points_approx_equal(a: &Point3<f64>, b: &Point3<f64>) -> bool {
        f64_approx_equal(a.x, b.x) && f64_approx_equal(a.y, b.y) && f64_approx_equal(a.z, b.z)
    }

    fn triangle() -> Vec<Point3<f64>> {
        vec![
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(3.0, 1.0, 1.0),
            Point3::new(2.0, 4.0, 2.0),
        ]
    }

    #[test]
    fn centroid_xy_averages_in_plane_coordinates() {
        let c = centroid_xy(&triangle());
        assert!(f64_approx_equal(c.x, 2.0));
        assert!(f64_approx_equal(c.y, 2.0));
    }

    #[test]
    fn axis_extent_measures_span_along_each_axis() {
        let pts = triangle();
        assert!(f64_approx_equal(axis_extent(&pts, 0), 2.0));
        assert!(f64_approx_equal(axis_extent(&pts, 1), 3.0));
        assert!(f64_approx_equal(axis_extent(&pts, 2), 2.0));
        assert_eq!(axis_extent(&[], 2), 0.0);
    }

    #[test]
    fn recenter_with_zero_radius_only_centers() {
        let centered = recenter_and_place(&triangle(), 45.0, 0.0);
        let c = centroid_xy(&centered);
        assert!(f64_approx_equal(c.x, 0.0));
        assert!(f64_approx_equal(c.y, 0.0));
        assert!(points_approx_equal(
            &centered[0],
            &Point3::new(-1.0, -1.0, 0.0)
        ));
    }

    #[test]
    fn recenter_places_centroid_on_circle() {
        let placed = recenter_and_place(&triangle(), 90.0, 5.0);
        let c = centroid_xy(&placed);
        assert!(f64_approx_equal(c.x, 0.0));
        assert!(f64_approx_equal(c.y, 5.0));
        assert!(placed.iter().zip(triangle()).all(|(a, b)| a.z == b.z));
    }

    #[test]
    fn translate_axis_only_moves_z() {
        let moved = translate_axis(&triangle(), 1.5);
        assert!(points_approx_equal(&moved[2], &Point3::new(2.0, 4.0, 3.5)));
    }

    #[test]
    fn rotate_in_plane_uses_row_vector_convention() {
        let rotated = rotate_in_plane(&[Point3::new(1.0, 0.0, 7.0)], 90.0);
        assert!(points_approx_equal(&rotated[0], &Point3::new(0.0, -1.0, 7.0)));
    }

    #[test]
    fn rotate_in_plane_by_180_inverts_xy() {
        let rotated = rotate_in_plane(&[Point3::new(1.0, 2.0, 3.0)], 180.0);
        assert!(points_approx_equal(
            &rotated[0],
            &Point3::new(-1.0, -2.0, 3.0)
        ));
    }

    #[test]
    fn transforms_do_not_mutate_input() {
        let original = triangle();
        let _ = rotate_in_plane(&original, 33.0);
        let _ = translate_axis(&original, 2.0);
        let _ = recenter_and_place(&original, 10.0, 3.0);
        assert_eq!(original, triangle());
    }
}
