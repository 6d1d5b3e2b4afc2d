//! Triangle primitive with separate front and back materials.
//!
//! Intersection is a ray-plane test followed by a barycentric membership test
//! using a basis precomputed at construction.

use std::sync::Arc;

use crate::intersection::{SurfaceHit, SELF_HIT_EPSILON};
use crate::Material;
use kdray_math::{Axis, Bound, DVec3, Ray};

/// Padding added on each side of a triangle's bounds so axis-aligned
/// triangles do not get zero-thickness boxes.
const BOUND_PADDING: f64 = 0.0001;

/// A triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Vertices
    a: DVec3,
    b: DVec3,
    c: DVec3,
    /// Unit face normal, or zero for a degenerate triangle
    normal: DVec3,
    /// `normal · a`, shared by every point of the plane
    plane_coefficient: f64,
    /// Barycentric basis: `(q - a) · u_beta` is the weight of `b`
    u_beta: DVec3,
    /// `(q - a) · u_gamma` is the weight of `c`
    u_gamma: DVec3,
    front_material: Arc<Material>,
    back_material: Arc<Material>,
}

impl Triangle {
    /// Create a triangle with the same material on both sides.
    pub fn new(a: DVec3, b: DVec3, c: DVec3, material: Arc<Material>) -> Self {
        Self::two_sided(a, b, c, material.clone(), material)
    }

    /// Create a triangle with distinct front and back materials. The front
    /// side is the one the counter-clockwise winding a, b, c faces.
    pub fn two_sided(
        a: DVec3,
        b: DVec3,
        c: DVec3,
        front_material: Arc<Material>,
        back_material: Arc<Material>,
    ) -> Self {
        let edge_ab = b - a;
        let edge_bc = c - b;
        let edge_ca = a - c;

        // Use the edge pair closer to perpendicular for a stable cross product
        let normal = if edge_ab.dot(edge_bc).abs() < edge_bc.dot(edge_ca).abs() {
            edge_ab.cross(edge_bc)
        } else {
            edge_bc.cross(edge_ca)
        };
        let normal = normal.normalize_or_zero();
        let plane_coefficient = normal.dot(a);

        let aa = edge_ab.length_squared();
        let ab = edge_ab.dot(edge_ca);
        let cc = edge_ca.length_squared();
        let dinv = 1.0 / (aa * cc - ab * ab);
        let (aa, ab, cc) = (aa * dinv, ab * dinv, cc * dinv);

        let u_beta = edge_ab * cc - edge_ca * ab;
        let u_gamma = edge_ab * ab - edge_ca * aa;

        Self {
            a,
            b,
            c,
            normal,
            plane_coefficient,
            u_beta,
            u_gamma,
            front_material,
            back_material,
        }
    }

    pub fn vertices(&self) -> [DVec3; 3] {
        [self.a, self.b, self.c]
    }

    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    pub fn front_material(&self) -> &Material {
        &self.front_material
    }

    pub fn back_material(&self) -> &Material {
        &self.back_material
    }

    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let mdotn = ray.direction.dot(self.normal);
        if mdotn == 0.0 {
            return None;
        }

        let planar_dist = ray.origin.dot(self.normal) - self.plane_coefficient;
        let front_face = mdotn < 0.0;
        if front_face && planar_dist <= 0.0 {
            return None;
        }
        if !front_face && planar_dist >= 0.0 {
            return None;
        }

        let distance = -planar_dist / mdotn;
        if distance <= SELF_HIT_EPSILON {
            return None;
        }

        let q = ray.at(distance);
        let v = q - self.a;
        let beta = v.dot(self.u_beta);
        if beta < 0.0 {
            return None;
        }
        let gamma = v.dot(self.u_gamma);
        if gamma < 0.0 || beta + gamma > 1.0 {
            return None;
        }

        let (material, normal) = if front_face {
            (&self.front_material, self.normal)
        } else {
            (&self.back_material, -self.normal)
        };

        Some(SurfaceHit {
            distance,
            position: q,
            normal,
            color: material.color_at(beta, gamma),
            front_face,
        })
    }

    /// Extent of the three vertices along `axis`, padded on both sides.
    pub fn bound(&self, axis: Axis) -> Bound {
        let [da, db, dc] = self.vertices().map(|p| axis.component(p));
        let min = da.min(db).min(dc);
        let max = da.max(db).max(dc);
        Bound::new(min - BOUND_PADDING, max + BOUND_PADDING)
    }

    pub fn is_well_formed(&self) -> bool {
        self.normal.length_squared() > 0.0
    }
}
