//! Direct shading with shadow rays.
//!
//! Each hit starts from its ambient color. Every light then adds a diffuse
//! term, and while depth allows, mirror reflection, refraction, and a shadow
//! ray that either darkens the result or adds a highlight.

use super::{refract, RayTracer};
use crate::intersection::IntersectionInfo;
use crate::{Camera, Light, Material, RenderConfig, Scene, Shape};
use kdray_math::{Color3, DVec3, Ray};

/// Weight of the light color added at an unshadowed glossy hit. Highlights
/// have no falloff model, so they contribute nothing.
const HIGHLIGHT_WEIGHT: f64 = 0.0;

pub struct DirectTracer<'a> {
    scene: &'a Scene,
    camera: &'a Camera,
    config: &'a RenderConfig,
}

impl<'a> DirectTracer<'a> {
    pub fn new(scene: &'a Scene, camera: &'a Camera, config: &'a RenderConfig) -> Self {
        Self {
            scene,
            camera,
            config,
        }
    }

    fn find(&self, ray: &Ray) -> IntersectionInfo {
        self.scene.find_intersection(ray, self.config.use_kd_tree)
    }

    fn trace_depth(&self, ray: &Ray, depth: u32) -> Color3 {
        let hit = self.find(ray);
        if !hit.is_hit() {
            return self.scene.background().color;
        }
        self.shade(&hit, ray, depth)
    }

    fn shade(&self, hit: &IntersectionInfo, ray: &Ray, depth: u32) -> Color3 {
        let background = self.scene.background();
        let Some(shape) = self.scene.try_get_shape(hit.shape_id) else {
            return background.color;
        };
        let material = shape.material(hit.front_face);

        let mut color = hit.color * background.ambience;
        for light in self.scene.lights() {
            color = self.diffuse(color, hit, light);

            if depth < self.config.max_depth {
                color = self.reflection(color, hit, material, ray, depth);
                color = self.refraction(color, hit, shape, material, ray, depth);
                color = self.shadow_and_highlight(color, hit, material, light);
            }
        }

        color
    }

    fn diffuse(&self, color: Color3, hit: &IntersectionInfo, light: &Light) -> Color3 {
        if !self.config.diffuse {
            return color;
        }

        let to_light = (light.position - hit.position).normalize();
        let cos = to_light.dot(hit.normal);
        if cos > 0.0 {
            color + hit.color * light.color * cos
        } else {
            color
        }
    }

    fn reflection(
        &self,
        color: Color3,
        hit: &IntersectionInfo,
        material: &Material,
        ray: &Ray,
        depth: u32,
    ) -> Color3 {
        if !self.config.reflection || material.k_reflection <= 0.0 {
            return color;
        }

        let reflected = ray.reflect(hit.position, hit.normal);
        color.blend(self.trace_depth(&reflected, depth + 1), material.k_reflection)
    }

    fn refraction(
        &self,
        color: Color3,
        hit: &IntersectionInfo,
        shape: &Shape,
        material: &Material,
        ray: &Ray,
        depth: u32,
    ) -> Color3 {
        if !self.config.refraction || material.k_transparent <= 0.0 {
            return color;
        }

        let refracted = refracted_ray(hit, shape, material, ray);
        color.blend(self.trace_depth(&refracted, depth + 1), material.k_transparent)
    }

    fn shadow_and_highlight(
        &self,
        color: Color3,
        hit: &IntersectionInfo,
        material: &Material,
        light: &Light,
    ) -> Color3 {
        if !self.config.shadows {
            return color;
        }

        match self.occluder(hit.position, hit.shape_id, light) {
            Some(occluder) => {
                let transparency = occluder.material(true).k_transparent;
                color * (0.5 + 0.5 * transparency.sqrt())
            }
            None if self.config.highlights && material.gloss > 0.0 => {
                color + light.color * HIGHLIGHT_WEIGHT
            }
            None => color,
        }
    }

    /// The nearest shape between `point` and the light, ignoring the shape
    /// the point lies on.
    pub fn occluder(&self, point: DVec3, shape_id: usize, light: &Light) -> Option<&'a Shape> {
        let to_light = light.position - point;
        let blocker = self.find(&Ray::new(point, to_light));
        if !blocker.is_hit() || blocker.shape_id == shape_id || blocker.distance >= to_light.length()
        {
            return None;
        }
        self.scene.try_get_shape(blocker.shape_id)
    }
}

impl RayTracer for DirectTracer<'_> {
    fn camera(&self) -> &Camera {
        self.camera
    }

    fn resolution(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn trace(&self, ray: &Ray) -> Color3 {
        self.trace_depth(ray, 0)
    }
}

/// The ray continuing past a transparent hit.
///
/// Entering a closed shape refracts twice, once on the way in and again
/// where the ray leaves the far side. Open surfaces refract once. Total
/// internal reflection falls back to the mirror direction.
fn refracted_ray(hit: &IntersectionInfo, shape: &Shape, material: &Material, ray: &Ray) -> Ray {
    let index = material.refraction_index;
    let eta = if hit.front_face { 1.0 / index } else { index };

    let Some(direction) = refract(ray.direction, hit.normal, eta) else {
        return ray.reflect(hit.position, hit.normal);
    };
    let inner = Ray::new(hit.position, direction);
    if !hit.front_face || !shape.geometry().is_closed() {
        return inner;
    }

    let exit = shape.intersect(&inner);
    if !exit.is_hit() {
        return inner;
    }
    match refract(inner.direction, exit.normal, index) {
        Some(direction) => Ray::new(exit.position, direction),
        None => inner.reflect(exit.position, exit.normal),
    }
}
