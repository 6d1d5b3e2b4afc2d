//! Infinite one-sided plane.

use std::sync::Arc;

use crate::intersection::{SurfaceHit, SELF_HIT_EPSILON};
use crate::Material;
use kdray_math::{Axis, Bound, DVec3, Ray};

/// Half-extent of the finite box standing in for a plane's bounds.
pub const PLANE_EXTENT: f64 = 1000.0;

/// The plane `normal · p + offset = 0`, visible from the side its normal
/// points to.
#[derive(Debug, Clone)]
pub struct Plane {
    pub normal: DVec3,
    pub offset: f64,
    pub material: Arc<Material>,
}

impl Plane {
    /// Create a plane. The normal is normalized; a zero normal is kept as zero
    /// and never intersects.
    pub fn new(normal: DVec3, offset: f64, material: Arc<Material>) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            offset,
            material,
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let vd = self.normal.dot(ray.direction);
        if vd >= 0.0 {
            return None;
        }

        let t = -(self.normal.dot(ray.origin) + self.offset) / vd;
        if t <= SELF_HIT_EPSILON {
            return None;
        }

        let position = ray.at(t);

        let (u, v) = if self.material.has_texture() {
            let vec_u = DVec3::new(self.normal.y, self.normal.z, -self.normal.x);
            let vec_v = vec_u.cross(self.normal);
            (position.dot(vec_u), position.dot(vec_v))
        } else {
            (0.0, 0.0)
        };

        Some(SurfaceHit {
            distance: t,
            position,
            normal: self.normal,
            color: self.material.color_at(u, v),
            front_face: true,
        })
    }

    /// Planes are unbounded; they report a large finite box instead.
    pub fn bound(&self, _axis: Axis) -> Bound {
        Bound::new(-PLANE_EXTENT, PLANE_EXTENT)
    }

    pub fn is_well_formed(&self) -> bool {
        self.normal != DVec3::ZERO && self.offset.is_finite()
    }
}
