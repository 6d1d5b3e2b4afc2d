//! Ray-shape intersection results.

use kdray_math::{Color3, DVec3};

/// Stable shape or light identifier. Ids are dense from 1; 0 means "none".
pub type ShapeId = usize;

/// The id reserved for "no shape".
pub const NO_SHAPE: ShapeId = 0;

/// Hits closer than this are treated as the ray re-hitting the surface it
/// starts on.
pub const SELF_HIT_EPSILON: f64 = 1e-6;

/// Geometry-level hit, before the owning shape stamps its id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub distance: f64,
    pub position: DVec3,
    /// Unit normal, facing against the incoming ray.
    pub normal: DVec3,
    pub color: Color3,
    /// Whether the ray struck the front side of the surface.
    pub front_face: bool,
}

/// Record of the nearest intersection along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionInfo {
    pub color: Color3,
    pub distance: f64,
    pub normal: DVec3,
    pub position: DVec3,
    pub front_face: bool,
    pub shape_id: ShapeId,
}

impl IntersectionInfo {
    /// The no-hit sentinel: infinite distance, shape id 0.
    pub const MISS: IntersectionInfo = IntersectionInfo {
        color: Color3::BLACK,
        distance: f64::INFINITY,
        normal: DVec3::ZERO,
        position: DVec3::ZERO,
        front_face: false,
        shape_id: NO_SHAPE,
    };

    pub fn from_surface(hit: SurfaceHit, shape_id: ShapeId) -> Self {
        Self {
            color: hit.color,
            distance: hit.distance,
            normal: hit.normal,
            position: hit.position,
            front_face: hit.front_face,
            shape_id,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.shape_id != NO_SHAPE
    }

    /// Keep whichever of the two records is nearer.
    pub fn nearest(self, other: IntersectionInfo) -> IntersectionInfo {
        if other.is_hit() && other.distance < self.distance {
            other
        } else {
            self
        }
    }
}

impl Default for IntersectionInfo {
    fn default() -> Self {
        Self::MISS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_at(distance: f64, shape_id: ShapeId) -> IntersectionInfo {
        IntersectionInfo {
            distance,
            shape_id,
            ..IntersectionInfo::MISS
        }
    }

    #[test]
    fn test_miss_sentinel() {
        let miss = IntersectionInfo::default();
        assert!(!miss.is_hit());
        assert_eq!(miss.distance, f64::INFINITY);
        assert_eq!(miss.shape_id, NO_SHAPE);
    }

    #[test]
    fn test_nearest_prefers_closer_hit() {
        let near = hit_at(1.0, 2);
        let far = hit_at(3.0, 1);
        assert_eq!(far.nearest(near).shape_id, 2);
        assert_eq!(near.nearest(far).shape_id, 2);
        assert_eq!(IntersectionInfo::MISS.nearest(far).shape_id, 1);
        assert_eq!(far.nearest(IntersectionInfo::MISS).shape_id, 1);
    }
}
