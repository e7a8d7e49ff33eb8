use crate::DVec3;

/// A ray in 3D space with an origin and a direction.
///
/// Every ray handed to the intersection routines carries a unit-length
/// direction; the camera and the shading code normalize before building one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// The point `origin + t * direction`.
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}
