//! Recursive shading with an intensity budget and fog.
//!
//! Every hit blends ambient, diffuse, specular and reflected terms into a
//! running color, each weighted by its material coefficient. A reflected ray
//! carries the parent's intensity scaled by the reflection coefficient and
//! the fog transmittance; once it falls to the threshold, or the depth limit
//! is reached, the background stands in for the reflection.

use super::{is_visible, RayTracer};
use crate::intersection::IntersectionInfo;
use crate::{Camera, RecursiveSettings, RenderConfig, Scene};
use kdray_math::{Color3, DVec3, Ray};

/// Coefficients at or below this are treated as zero.
const COEFFICIENT_EPSILON: f64 = f64::EPSILON;

pub struct RecursiveTracer<'a> {
    scene: &'a Scene,
    camera: &'a Camera,
    settings: RecursiveSettings,
    resolution: (u32, u32),
}

impl<'a> RecursiveTracer<'a> {
    pub fn new(scene: &'a Scene, camera: &'a Camera, config: &RenderConfig) -> Self {
        Self {
            scene,
            camera,
            settings: config.recursive,
            resolution: (config.width, config.height),
        }
    }

    fn trace_recursive(&self, ray: &Ray, intensity: f64, depth: u32) -> Color3 {
        let hit = self.scene.intersect(ray);
        self.shade(ray, &hit, intensity, depth)
    }

    fn shade(&self, ray: &Ray, hit: &IntersectionInfo, intensity: f64, depth: u32) -> Color3 {
        let background = self.scene.background();
        let Some(shape) = self.scene.try_get_shape(hit.shape_id) else {
            return background.color;
        };
        let material = shape.material(hit.front_face);
        let has_lights = !self.scene.lights().is_empty();
        let fog_density = background.fog_density(hit.distance);

        let mut result = Color3::BLACK;

        if material.k_ambient > COEFFICIENT_EPSILON {
            let ambient = background.color.mix(hit.color);
            result = result.blend(ambient, material.k_ambient);
        }

        if material.k_diffuse > COEFFICIENT_EPSILON {
            let mut diffuse = hit.color;
            if has_lights {
                diffuse = diffuse.mix(self.lighting(hit.position, hit.normal));
            }
            result = result.blend(diffuse, material.k_diffuse);
        }

        if material.k_specular > COEFFICIENT_EPSILON {
            let specular = if has_lights {
                self.specular(&ray.reflect(hit.position, hit.normal), material.gloss)
            } else {
                background.color
            };
            result = result.blend(specular, material.k_specular);
        }

        if material.k_reflection > COEFFICIENT_EPSILON {
            let reflected = if intensity > self.settings.intensity_threshold
                && depth < self.settings.max_depth
            {
                self.trace_recursive(
                    &ray.reflect(hit.position, hit.normal),
                    intensity * material.k_reflection * (1.0 - fog_density),
                    depth + 1,
                )
            } else {
                background.color
            };
            result = result.blend(reflected, material.k_reflection);
        }

        if background.fog.is_some() {
            result = background.color * fog_density + result * (1.0 - fog_density);
        }

        result
    }

    /// Sum of visible lights, each weighted by the cosine between the
    /// normal and the direction to the light.
    fn lighting(&self, point: DVec3, normal: DVec3) -> Color3 {
        let mut color = Color3::BLACK;
        for light in self.scene.lights() {
            if is_visible(self.scene, point, light.position, true) {
                let to_light = (light.position - point).normalize();
                color += light.color * normal.dot(to_light).abs();
            }
        }
        color
    }

    /// Specular response along the mirror ray. Each visible light ahead of
    /// the ray scales the accumulator by the gloss exponent; there is no
    /// falloff model, so the accumulator stays black.
    fn specular(&self, mirror: &Ray, gloss: f64) -> Color3 {
        let mut color = Color3::BLACK;
        for light in self.scene.lights() {
            if !is_visible(self.scene, mirror.origin, light.position, true) {
                continue;
            }
            let to_light = (light.position - mirror.origin).normalize();
            if mirror.direction.dot(to_light) > COEFFICIENT_EPSILON {
                color = color * gloss;
            }
        }
        color
    }
}

impl RayTracer for RecursiveTracer<'_> {
    fn camera(&self) -> &Camera {
        self.camera
    }

    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn trace(&self, ray: &Ray) -> Color3 {
        self.trace_recursive(ray, self.settings.initial_intensity, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::test_scenes::{self, BACKGROUND};
    use crate::{Background, Fog, Geometry, Light, Material, Plane, Sphere};
    use std::sync::Arc;

    fn lone_sphere(background: Background) -> Scene {
        let m = Arc::new(Material::solid(Color3::new(1.0, 0.5, 0.25)));
        Scene::build(
            vec![Geometry::from(Sphere::new(DVec3::ZERO, 1.0, m))],
            Vec::new(),
            background,
        )
    }

    #[test]
    fn test_miss_returns_background_exactly() {
        let scene = test_scenes::basic();
        let camera = test_scenes::basic_camera();
        let config = RenderConfig::default();
        let tracer = RecursiveTracer::new(&scene, &camera, &config);

        let ray = Ray::new(DVec3::new(7.5, 7.5, 2.3), DVec3::new(1.0, 1.0, 1.0));
        assert_eq!(tracer.trace(&ray), BACKGROUND);
    }

    #[test]
    fn test_basic_scene_center_and_corner() {
        let camera = test_scenes::basic_camera();
        let config = RenderConfig::default();

        let scene = test_scenes::basic();
        let tracer = RecursiveTracer::new(&scene, &camera, &config);
        assert_ne!(tracer.pixel_color(250, 250), BACKGROUND);

        let spheres = test_scenes::spheres_only();
        let tracer = RecursiveTracer::new(&spheres, &camera, &config);
        assert_eq!(tracer.pixel_color(0, 0), BACKGROUND);
    }

    #[test]
    fn test_diffuse_without_lights_is_surface_color() {
        let scene = lone_sphere(Background::new(Color3::BLACK, 0.0));
        let camera = Camera::default();
        let config = RenderConfig::default();
        let tracer = RecursiveTracer::new(&scene, &camera, &config);

        let ray = Ray::new(DVec3::new(0.0, 0.0, 6.0), -DVec3::Z);
        assert_eq!(tracer.trace(&ray), Color3::new(1.0, 0.5, 0.25));
    }

    #[test]
    fn test_fog_blends_toward_background() {
        let bg = Color3::new(0.0, 0.0, 0.5);
        let fog = Fog::Linear {
            start: 0.0,
            end: 10.0,
        };
        let scene = lone_sphere(Background::new(bg, 0.0).with_fog(fog));
        let camera = Camera::default();
        let config = RenderConfig::default();
        let tracer = RecursiveTracer::new(&scene, &camera, &config);

        // Hit at distance 5, halfway into the fog
        let ray = Ray::new(DVec3::new(0.0, 0.0, 6.0), -DVec3::Z);
        let color = tracer.trace(&ray);
        assert!((color.r - 0.5).abs() < 1e-12);
        assert!((color.g - 0.25).abs() < 1e-12);
        assert!((color.b - (0.125 + 0.25)).abs() < 1e-12);
    }

    #[test]
    fn test_facing_mirrors_terminate_at_depth_limit() {
        let mirror = Arc::new(Material::solid(Color3::WHITE).with_coefficients(0.0, 0.0, 0.0, 1.0, 0.0));
        let scene = Scene::build(
            vec![
                Geometry::from(Plane::new(DVec3::Z, 0.0, mirror.clone())),
                Plane::new(-DVec3::Z, 10.0, mirror).into(),
            ],
            vec![Light::white(DVec3::new(0.0, 0.0, 5.0))],
            Background::new(BACKGROUND, 0.0),
        );
        let camera = Camera::default();
        let config = RenderConfig::default();
        let tracer = RecursiveTracer::new(&scene, &camera, &config);

        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), -DVec3::Z);
        assert_eq!(tracer.trace(&ray), BACKGROUND);
    }

    #[test]
    fn test_specular_surface_with_visible_light_is_black() {
        let shiny = Arc::new(
            Material::solid(Color3::WHITE)
                .with_coefficients(0.0, 0.0, 1.0, 0.0, 0.0)
                .with_gloss(10.0),
        );
        let scene = Scene::build(
            vec![Geometry::from(Sphere::new(DVec3::ZERO, 1.0, shiny))],
            vec![Light::white(DVec3::new(0.0, 0.0, 10.0))],
            Background::new(BACKGROUND, 0.0),
        );
        let camera = Camera::default();
        let config = RenderConfig::default();
        let tracer = RecursiveTracer::new(&scene, &camera, &config);

        assert!(is_visible(&scene, DVec3::Z, DVec3::new(0.0, 0.0, 10.0), true));
        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), -DVec3::Z);
        assert_eq!(tracer.trace(&ray), Color3::BLACK);
    }

    #[test]
    fn test_light_visibility() {
        let scene = lone_sphere(Background::default());
        assert!(!is_visible(
            &scene,
            DVec3::new(0.0, 0.0, -3.0),
            DVec3::new(0.0, 0.0, 3.0),
            true
        ));
        assert!(is_visible(
            &scene,
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(0.0, 0.0, 3.0),
            true
        ));
    }
}
