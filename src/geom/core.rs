use std::ops::Add;

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// In-plane offset, used for lateral pellet shifts.
    #[must_use]
    pub const fn planar(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }

    /// Length of the x/y part only.
    #[must_use]
    pub fn planar_length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Distance from the rod axis, ignoring any lateral shift.
    #[must_use]
    pub fn radius(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add<Vec3> for Point3 {
    type Output = Self;
    fn add(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Absolute tolerance for comparing lengths in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Default tolerance for rod dimensions (1e-12 m).
    pub const DEFAULT: Self = Self { eps: 1e-12 };

    #[must_use]
    pub fn approx_zero_f64(self, a: f64) -> bool {
        a.abs() <= self.eps
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_offset() {
        let shift = Vec3::planar(3.0, 4.0);
        assert_eq!(shift.z, 0.0);
        assert_eq!(shift.planar_length(), 5.0);
        assert_eq!(Vec3::ZERO.planar_length(), 0.0);
    }

    #[test]
    fn test_point_shifted_by_offset() {
        let p = Point3::new(1.0, 1.0, 0.5);
        let moved = p + Vec3::planar(0.5, -0.5);
        assert_eq!(moved, Point3::new(1.5, 0.5, 0.5));
        assert_eq!(moved.to_array(), [1.5, 0.5, 0.5]);
    }

    #[test]
    fn test_point3_radius_ignores_height() {
        let p = Point3::new(3.0, 4.0, 100.0);
        assert_eq!(p.radius(), 5.0);
    }

    #[test]
    fn test_tolerance_comparisons() {
        let tol = Tolerance::DEFAULT;
        assert!(tol.approx_zero_f64(1e-13));
        assert!(!tol.approx_zero_f64(1e-9));
    }
}
