//! Snap functionality for aligning element positions to the canvas grid.

use kurbo::{Point, Vec2};

/// Grid size for snapping, in canvas pixels.
pub const GRID_SIZE: f64 = 10.0;

/// Round a coordinate to the nearest multiple of `grid_size`.
///
/// Halfway values round away from zero. A non-positive or non-finite grid size
/// disables snapping and returns the value unchanged.
pub fn snap(value: f64, grid_size: f64) -> f64 {
    if !(grid_size.is_finite() && grid_size > 0.0) {
        return value;
    }
    let snapped = (value / grid_size).round() * grid_size;
    // Avoid emitting "-0" for small negative inputs.
    if snapped == 0.0 { 0.0 } else { snapped }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(snap(point.x, grid_size), snap(point.y, grid_size))
}

/// Snap a point, or `None` when either coordinate is not finite.
pub fn snap_finite(point: Point, grid_size: f64) -> Option<Point> {
    let snapped = snap_to_grid(point, grid_size);
    (snapped.x.is_finite() && snapped.y.is_finite()).then_some(snapped)
}

/// Convert a client-space drop point into canvas-local coordinates and snap it.
pub fn snap_drop(client: Point, canvas_origin: Point, grid_size: f64) -> Point {
    snap_to_grid(Point::new(client.x - canvas_origin.x, client.y - canvas_origin.y), grid_size)
}

/// Apply a drag delta to a prior position and snap the result.
pub fn snap_drag(origin: Point, delta: Vec2, grid_size: f64) -> Point {
    snap_to_grid(origin + delta, grid_size)
}

/// Check whether a coordinate already sits on the grid.
pub fn is_on_grid(value: f64, grid_size: f64) -> bool {
    snap(value, grid_size) == value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let point = snap_to_grid(Point::new(23.0, 47.0), 10.0);
        assert_eq!(point, Point::new(20.0, 50.0));
    }

    #[test]
    fn test_snap_to_grid_exact() {
        let point = snap_to_grid(Point::new(40.0, 60.0), 20.0);
        assert_eq!(point, Point::new(40.0, 60.0));
    }

    #[test]
    fn test_snap_half_rounds_away_from_zero() {
        assert_eq!(snap(5.0, 10.0), 10.0);
        assert_eq!(snap(15.0, 10.0), 20.0);
        assert_eq!(snap(-5.0, 10.0), -10.0);
        assert_eq!(snap(-4.9, 10.0), 0.0);
        assert!(snap(-4.9, 10.0).is_sign_positive());
    }

    #[test]
    fn test_snap_invalid_grid() {
        assert_eq!(snap(23.0, 0.0), 23.0);
        assert_eq!(snap(23.0, -10.0), 23.0);
        assert_eq!(snap(23.0, f64::NAN), 23.0);
    }

    #[test]
    fn test_snap_properties() {
        for grid in [1.0, 5.0, 10.0, 20.0, 50.0] {
            let mut value = -250.0;
            while value <= 250.0 {
                let snapped = snap(value, grid);
                assert_eq!(snapped % grid, 0.0, "snap({value}, {grid}) = {snapped}");
                assert!((snapped - value).abs() <= grid / 2.0);
                value += 0.75;
            }
        }
    }

    #[test]
    fn test_snap_drop() {
        let canvas_origin = Point::new(100.0, 200.0);
        let point = snap_drop(Point::new(123.0, 247.0), canvas_origin, GRID_SIZE);
        assert_eq!(point, Point::new(20.0, 50.0));
    }

    #[test]
    fn test_snap_drag() {
        let point = snap_drag(Point::new(20.0, 50.0), Vec2::new(14.0, -26.0), GRID_SIZE);
        assert_eq!(point, Point::new(30.0, 20.0));
    }

    #[test]
    fn test_snap_finite() {
        assert_eq!(snap_finite(Point::new(23.0, 47.0), GRID_SIZE), Some(Point::new(20.0, 50.0)));
        assert_eq!(snap_finite(Point::new(f64::NAN, 10.0), GRID_SIZE), None);
        assert_eq!(snap_finite(Point::new(0.0, f64::INFINITY), GRID_SIZE), None);
        assert_eq!(snap_finite(Point::new(1e308, 0.0), 0.1), None);
    }

    #[test]
    fn test_is_on_grid() {
        assert!(is_on_grid(30.0, 10.0));
        assert!(!is_on_grid(31.0, 10.0));
    }
}
