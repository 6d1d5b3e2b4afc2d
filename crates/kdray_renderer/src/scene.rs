//! Immutable scene: shapes and lights with dense ids, background, KD-tree.

use crate::intersection::{IntersectionInfo, ShapeId, NO_SHAPE};
use crate::kdtree::{KdTree, KdTreeSettings};
use crate::light::LightId;
use crate::{Background, Geometry, Light, Shape};
use kdray_math::Ray;

/// A fully assembled scene, read-only for the duration of a render.
///
/// Shapes and lights are numbered from 1 in the order they were supplied.
/// Looking up id 0 or an id past the end yields `None`.
#[derive(Debug)]
pub struct Scene {
    shapes: Vec<Shape>,
    lights: Vec<Light>,
    background: Background,
    kd_tree: KdTree,
}

impl Scene {
    /// Build a scene with the default KD-tree settings.
    pub fn build(
        geometries: impl IntoIterator<Item = Geometry>,
        lights: impl IntoIterator<Item = Light>,
        background: Background,
    ) -> Self {
        Self::build_with_settings(geometries, lights, background, &KdTreeSettings::default())
    }

    pub fn build_with_settings(
        geometries: impl IntoIterator<Item = Geometry>,
        lights: impl IntoIterator<Item = Light>,
        background: Background,
        settings: &KdTreeSettings,
    ) -> Self {
        let shapes: Vec<Shape> = geometries
            .into_iter()
            .enumerate()
            .map(|(i, geometry)| Shape::new(i + 1, geometry))
            .collect();

        let lights: Vec<Light> = lights
            .into_iter()
            .enumerate()
            .map(|(i, light)| light.with_id(i + 1))
            .collect();

        for shape in &shapes {
            check_shape(shape);
        }

        let kd_tree = KdTree::build(&shapes, settings);
        let stats = kd_tree.stats();
        log::info!(
            "Built scene: {} shapes, {} lights, kd-tree {} internal nodes, {} leaves, depth {}, {} shape references",
            shapes.len(),
            lights.len(),
            stats.internal_nodes,
            stats.leaves,
            stats.depth,
            stats.shape_refs
        );

        Self {
            shapes,
            lights,
            background,
            kd_tree,
        }
    }

    pub fn try_get_shape(&self, id: ShapeId) -> Option<&Shape> {
        if id == NO_SHAPE {
            return None;
        }
        self.shapes.get(id - 1)
    }

    pub fn try_get_light(&self, id: LightId) -> Option<&Light> {
        if id == 0 {
            return None;
        }
        self.lights.get(id - 1)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Nearest hit through the KD-tree.
    pub fn intersect(&self, ray: &Ray) -> IntersectionInfo {
        self.kd_tree.find_intersection(&self.shapes, ray)
    }

    /// Nearest hit by testing every shape.
    pub fn intersect_brute_force(&self, ray: &Ray) -> IntersectionInfo {
        self.shapes
            .iter()
            .fold(IntersectionInfo::MISS, |nearest, shape| {
                nearest.nearest(shape.intersect(ray))
            })
    }

    /// Nearest hit, using the KD-tree or a linear scan.
    pub fn find_intersection(&self, ray: &Ray, use_kd_tree: bool) -> IntersectionInfo {
        if use_kd_tree {
            self.intersect(ray)
        } else {
            self.intersect_brute_force(ray)
        }
    }
}

/// Report geometry and material problems. None of them stop the build.
fn check_shape(shape: &Shape) {
    let geometry = shape.geometry();
    if !geometry.is_well_formed() {
        log::warn!("Shape {} is degenerate: {:?}", shape.id(), geometry);
    }

    let front = geometry.material(true);
    if !front.is_balanced() {
        log::warn!(
            "Shape {} material coefficients sum to {:.3}, expected 1.0",
            shape.id(),
            front.coefficient_sum()
        );
    }

    if let Geometry::Triangle(triangle) = geometry {
        let back = triangle.back_material();
        if !std::ptr::eq(back, front) && !back.is_balanced() {
            log::warn!(
                "Shape {} back material coefficients sum to {:.3}, expected 1.0",
                shape.id(),
                back.coefficient_sum()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Plane, Sphere, Triangle};
    use kdray_math::{Color3, DVec3};
    use std::sync::Arc;

    fn mixed_scene() -> Scene {
        let m = Arc::new(Material::solid(Color3::WHITE));
        let geometries: Vec<Geometry> = vec![
            Sphere::new(DVec3::ZERO, 1.0, m.clone()).into(),
            Plane::new(DVec3::Z, 2.0, m.clone()).into(),
            Triangle::new(DVec3::X, DVec3::Y, DVec3::Z, m.clone()).into(),
            Sphere::new(DVec3::new(4.0, 0.0, 0.0), 0.5, m).into(),
        ];
        let lights = vec![
            Light::white(DVec3::new(10.0, 10.0, 10.0)),
            Light::new(DVec3::new(-10.0, 0.0, 5.0), Color3::new(0.5, 0.5, 0.5)),
        ];
        Scene::build(geometries, lights, Background::default())
    }

    #[test]
    fn test_shape_ids_are_dense_and_total() {
        let scene = mixed_scene();
        let n = scene.shapes().len();
        assert_eq!(n, 4);

        assert!(scene.try_get_shape(0).is_none());
        for id in 1..=n {
            assert_eq!(scene.try_get_shape(id).map(Shape::id), Some(id));
        }
        assert!(scene.try_get_shape(n + 1).is_none());
    }

    #[test]
    fn test_shape_ids_follow_insertion_order() {
        let scene = mixed_scene();
        assert!(matches!(
            scene.try_get_shape(2).map(Shape::geometry),
            Some(Geometry::Plane(_))
        ));
        assert!(matches!(
            scene.try_get_shape(3).map(Shape::geometry),
            Some(Geometry::Triangle(_))
        ));
    }

    #[test]
    fn test_light_ids_are_dense_and_total() {
        let scene = mixed_scene();
        assert!(scene.try_get_light(0).is_none());
        assert_eq!(scene.try_get_light(1).map(Light::id), Some(1));
        assert_eq!(scene.try_get_light(2).map(Light::id), Some(2));
        assert!(scene.try_get_light(3).is_none());
    }

    #[test]
    fn test_kd_and_brute_force_agree() {
        let scene = mixed_scene();
        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), -DVec3::Z);
        let kd = scene.find_intersection(&ray, true);
        let brute = scene.find_intersection(&ray, false);
        assert_eq!(kd.shape_id, 1);
        assert_eq!(brute.shape_id, 1);
        assert!((kd.distance - brute.distance).abs() < 1e-9);
    }

    #[test]
    fn test_empty_scene_misses() {
        let scene = Scene::build(Vec::new(), Vec::new(), Background::default());
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        assert!(!scene.intersect(&ray).is_hit());
        assert!(scene.try_get_shape(1).is_none());
    }

    #[test]
    fn test_unbalanced_material_is_not_fatal() {
        let m = Arc::new(Material::solid(Color3::WHITE).with_coefficients(0.5, 0.5, 0.5, 0.0, 0.0));
        let scene = Scene::build(
            vec![Geometry::from(Sphere::new(DVec3::ZERO, 1.0, m))],
            Vec::new(),
            Background::default(),
        );
        assert_eq!(scene.shapes().len(), 1);
    }
}
