//! Sphere primitive.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::intersection::{SurfaceHit, SELF_HIT_EPSILON};
use crate::Material;
use kdray_math::{Axis, Bound, DVec3, Ray};

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
    pub material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: DVec3, radius: f64, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn sphere_uv(p: DVec3) -> (f64, f64) {
        // theta: angle down from +Z, phi: angle around Z from +X
        let theta = (-p.z).clamp(-1.0, 1.0).acos();
        let phi = (-p.y).atan2(p.x) + PI;
        (phi / (2.0 * PI), theta / PI)
    }

    /// Nearest hit with a distance beyond the self-hit epsilon.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let oc = ray.origin - self.center;
        let b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - c;
        if discriminant <= 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let near = -b - sqrtd;
        let far = -b + sqrtd;
        let distance = if near > SELF_HIT_EPSILON {
            near
        } else if far > SELF_HIT_EPSILON {
            far
        } else {
            return None;
        };

        let position = ray.at(distance);
        let outward = (position - self.center).normalize();
        let front_face = ray.direction.dot(outward) < 0.0;

        let (u, v) = if self.material.has_texture() {
            Self::sphere_uv(outward)
        } else {
            (0.0, 0.0)
        };

        Some(SurfaceHit {
            distance,
            position,
            normal: if front_face { outward } else { -outward },
            color: self.material.color_at(u, v),
            front_face,
        })
    }

    /// Extent along `axis`. The pair is returned as `(center + r, center - r)`
    /// and is re-ordered by the bounding box.
    pub fn bound(&self, axis: Axis) -> Bound {
        let cd = axis.unit().dot(self.center);
        Bound {
            min: cd + self.radius,
            max: cd - self.radius,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.radius > 0.0 && self.radius.is_finite() && self.center.is_finite()
    }
}
