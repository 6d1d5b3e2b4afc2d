//! The closed set of renderable shapes.

use crate::intersection::{IntersectionInfo, ShapeId, SurfaceHit};
use crate::{Material, Plane, Sphere, Triangle};
use kdray_math::{Axis, Bound, BoundingBox, Ray};

/// Geometry of a shape, before it is placed in a scene.
#[derive(Debug, Clone)]
pub enum Geometry {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
}

impl Geometry {
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        match self {
            Geometry::Sphere(s) => s.intersect(ray),
            Geometry::Plane(p) => p.intersect(ray),
            Geometry::Triangle(t) => t.intersect(ray),
        }
    }

    /// Raw extent along one axis. The endpoints may come in either order.
    pub fn bound(&self, axis: Axis) -> Bound {
        match self {
            Geometry::Sphere(s) => s.bound(axis),
            Geometry::Plane(p) => p.bound(axis),
            Geometry::Triangle(t) => t.bound(axis),
        }
    }

    /// Bounding box assembled from the three per-axis bounds.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.bound(Axis::X), self.bound(Axis::Y), self.bound(Axis::Z))
    }

    /// Material seen from the given side. Only triangles have a distinct back.
    pub fn material(&self, front_face: bool) -> &Material {
        match self {
            Geometry::Sphere(s) => s.material.as_ref(),
            Geometry::Plane(p) => p.material.as_ref(),
            Geometry::Triangle(t) if front_face => t.front_material(),
            Geometry::Triangle(t) => t.back_material(),
        }
    }

    /// True for shapes that enclose a volume a refracted ray can exit from.
    pub fn is_closed(&self) -> bool {
        matches!(self, Geometry::Sphere(_))
    }

    pub fn is_well_formed(&self) -> bool {
        match self {
            Geometry::Sphere(s) => s.is_well_formed(),
            Geometry::Plane(p) => p.is_well_formed(),
            Geometry::Triangle(t) => t.is_well_formed(),
        }
    }
}

impl From<Sphere> for Geometry {
    fn from(s: Sphere) -> Self {
        Geometry::Sphere(s)
    }
}

impl From<Plane> for Geometry {
    fn from(p: Plane) -> Self {
        Geometry::Plane(p)
    }
}

impl From<Triangle> for Geometry {
    fn from(t: Triangle) -> Self {
        Geometry::Triangle(t)
    }
}

/// A shape placed in a scene: geometry plus its id and cached bounding box.
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    bounding_box: BoundingBox,
    geometry: Geometry,
}

impl Shape {
    pub(crate) fn new(id: ShapeId, geometry: Geometry) -> Self {
        Self {
            id,
            bounding_box: geometry.bounding_box(),
            geometry,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Intersect the ray with this shape, returning the miss sentinel when
    /// there is no hit.
    pub fn intersect(&self, ray: &Ray) -> IntersectionInfo {
        match self.geometry.intersect(ray) {
            Some(hit) => IntersectionInfo::from_surface(hit, self.id),
            None => IntersectionInfo::MISS,
        }
    }

    pub fn material(&self, front_face: bool) -> &Material {
        self.geometry.material(front_face)
    }
}
