use crate::DVec3;

/// A ray in 3D space: an origin and a unit-length direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray. The direction is normalized.
    ///
    /// A zero direction yields NaN components, which propagate through any
    /// intersection test as a miss.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `origin` toward `target`.
    pub fn toward(origin: DVec3, target: DVec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Mirror this ray's direction about `normal`, starting at `point`.
    pub fn reflect(&self, point: DVec3, normal: DVec3) -> Ray {
        let d = self.direction;
        Ray::new(point, d - normal * 2.0 * normal.dot(d))
    }
}
