//=========================================================================
// Geometry & Direction Helpers
//=========================================================================
//
// Small 2D math vocabulary shared by entities and cameras.
//
// Conventions:
// - Screen coordinates: origin top-left, Y grows downward.
// - Angles in degrees, normalized to [0, 360). Angle 0 points along +X,
//   angle 90 points toward screen-up (-Y).
//
//=========================================================================

//=== Rect ================================================================

/// Axis-aligned rectangle (position + size) in f32 coordinates.
///
/// Used for camera views, viewports, and sprite bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Point containment, edges inclusive.
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Overlap test where touching edges count as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom())
    }
}

//=== Distance & Direction ================================================

/// Euclidean distance between two points.
pub fn point_distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Angle in degrees from (x1, y1) toward (x2, y2), in [0, 360).
///
/// Y is negated so that angle increases counter-clockwise on screen
/// (angle 90 points up even though +Y is down).
pub fn point_direction(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let deg = (-dy).atan2(dx).to_degrees();
    deg.rem_euclid(360.0)
}

/// X component of a vector with the given length and direction (degrees).
pub fn lengthdir_x(length: f32, direction: f32) -> f32 {
    length * direction.to_radians().cos()
}

/// Y component of a vector with the given length and direction (degrees).
///
/// Negated sine: a direction of 90 moves toward screen-up.
pub fn lengthdir_y(length: f32, direction: f32) -> f32 {
    -length * direction.to_radians().sin()
}

/// Linear interpolation from `start` to `end` by `factor`.
pub fn lerp(start: f32, end: f32, factor: f32) -> f32 {
    start + (end - start) * factor
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_relative_eq!(r.right(), 40.0);
        assert_relative_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn rect_contains_point_is_edge_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(0.0, 0.0));
        assert!(r.contains_point(10.0, 10.0));
        assert!(!r.contains_point(10.1, 5.0));
    }

    #[test]
    fn rect_touching_edges_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&b));

        let c = Rect::new(10.5, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn distance_is_euclidean() {
        assert_relative_eq!(point_distance(0.0, 0.0, 3.0, 4.0), 5.0);
    }

    #[test]
    fn direction_follows_screen_convention() {
        assert_relative_eq!(point_direction(0.0, 0.0, 10.0, 0.0), 0.0);
        assert_relative_eq!(point_direction(0.0, 0.0, 0.0, -10.0), 90.0);
        assert_relative_eq!(point_direction(0.0, 0.0, -10.0, 0.0), 180.0);
        assert_relative_eq!(point_direction(0.0, 0.0, 0.0, 10.0), 270.0);
    }

    #[test]
    fn direction_is_normalized() {
        let d = point_direction(0.0, 0.0, 10.0, 10.0);
        assert!((0.0..360.0).contains(&d));
        assert_relative_eq!(d, 315.0);
    }

    #[test]
    fn lengthdir_round_trips_direction() {
        let dir = 90.0;
        assert_relative_eq!(lengthdir_x(10.0, dir), 0.0, epsilon = 1e-5);
        assert_relative_eq!(lengthdir_y(10.0, dir), -10.0, epsilon = 1e-5);
    }

    #[test]
    fn lerp_endpoints() {
        assert_relative_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_relative_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_relative_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }
}
