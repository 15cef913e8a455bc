//! Point values carried by records

use std::fmt;

/// A 3D point assembled from an X/Y/Z group code triplet
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Create a new point
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    /// The origin
    pub const ORIGIN: Point3 = Point3::new(0.0, 0.0, 0.0);

    /// Default extrusion direction
    pub const UNIT_Z: Point3 = Point3::new(0.0, 0.0, 1.0);

    /// Components in X, Y, Z order
    pub fn components(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<(f64, f64, f64)> for Point3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Point3::new(x, y, z)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
