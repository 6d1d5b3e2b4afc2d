//! Shading strategies.
//!
//! Both tracers map a pixel to a primary ray through the camera and return
//! the color seen along it. A ray that hits nothing sees the background.

mod direct;
mod recursive;

pub use direct::DirectTracer;
pub use recursive::RecursiveTracer;

use crate::{Camera, RenderConfig, Scene, TracerKind};
use kdray_math::{Color3, DVec3, Ray};

/// A shading strategy.
pub trait RayTracer: Send + Sync {
    fn camera(&self) -> &Camera;

    /// Image size in pixels as (width, height).
    fn resolution(&self) -> (u32, u32);

    /// Color seen along a primary ray.
    fn trace(&self, ray: &Ray) -> Color3;

    /// Color of the pixel at column `x`, row `y`. Rows count downward.
    fn pixel_color(&self, x: u32, y: u32) -> Color3 {
        let (width, height) = self.resolution();
        let (vx, vy) = pixel_to_view(x, y, width, height);
        self.trace(&self.camera().get_ray(vx, vy))
    }
}

/// Create the tracer for `kind`, borrowing the scene, camera and config.
pub fn new_tracer<'a>(
    kind: TracerKind,
    scene: &'a Scene,
    camera: &'a Camera,
    config: &'a RenderConfig,
) -> Box<dyn RayTracer + 'a> {
    match kind {
        TracerKind::Direct => Box::new(DirectTracer::new(scene, camera, config)),
        TracerKind::Recursive => Box::new(RecursiveTracer::new(scene, camera, config)),
    }
}

/// Map a pixel to view coordinates in [-1, 1]. The vertical axis is flipped
/// so that row 0 is the top of the view.
pub fn pixel_to_view(x: u32, y: u32, width: u32, height: u32) -> (f64, f64) {
    let vx = x as f64 / width as f64 * 2.0 - 1.0;
    let vy = -(y as f64 / height as f64 * 2.0 - 1.0);
    (vx, vy)
}

/// True if nothing in the scene lies between `from` and `target`.
pub fn is_visible(scene: &Scene, from: DVec3, target: DVec3, use_kd_tree: bool) -> bool {
    let target_distance = (target - from).length();
    let hit = scene.find_intersection(&Ray::toward(from, target), use_kd_tree);
    !hit.is_hit() || hit.distance >= target_distance
}

/// Refracted direction through a surface whose `normal` faces against
/// `direction`, with `eta` the ratio of the indices (incident over
/// transmitted). `None` on total internal reflection.
pub fn refract(direction: DVec3, normal: DVec3, eta: f64) -> Option<DVec3> {
    let cos_i = -normal.dot(direction);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    if sin2_t > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(direction * eta + normal * (eta * cos_i - cos_t))
}

#[cfg(test)]
pub(crate) mod test_scenes {
    use crate::{Background, Geometry, Light, Material, Plane, Scene, Sphere};
    use kdray_math::{Color3, DVec3};
    use std::sync::Arc;

    pub const BACKGROUND: Color3 = Color3::new(0.25, 0.25, 0.25);

    fn solid(r: f64, g: f64, b: f64) -> Arc<Material> {
        Arc::new(Material::solid(Color3::new(r, g, b)))
    }

    fn spheres() -> Vec<Geometry> {
        vec![
            Sphere::new(DVec3::new(2.5, 5.0, 1.0), 0.75, solid(1.0, 0.0, 1.0)).into(),
            Sphere::new(DVec3::new(3.5, 1.25, 1.5), 1.0, solid(1.0, 1.0, 0.0)).into(),
            Sphere::new(DVec3::new(2.0, 3.0, 1.0), 1.0, solid(0.0, 1.0, 1.0)).into(),
        ]
    }

    fn planes() -> Vec<Geometry> {
        vec![
            Plane::new(DVec3::Z, 0.0, solid(0.0, 1.0, 0.0)).into(),
            Plane::new(DVec3::X, 0.0, solid(0.0, 0.0, 1.0)).into(),
            Plane::new(DVec3::Y, 0.0, solid(1.0, 0.0, 0.0)).into(),
        ]
    }

    fn light() -> Light {
        Light::white(DVec3::new(100.0, 60.0, 40.0))
    }

    /// Three spheres resting on three axis planes.
    pub fn basic() -> Scene {
        let mut geometries = spheres();
        geometries.extend(planes());
        Scene::build(geometries, vec![light()], Background::new(BACKGROUND, 0.2))
    }

    /// The three spheres alone.
    pub fn spheres_only() -> Scene {
        Scene::build(spheres(), vec![light()], Background::new(BACKGROUND, 0.2))
    }

    /// Camera at (7.5, 7.5, 2.3) looking at the origin, z up, 50 degrees.
    pub fn basic_camera() -> crate::Camera {
        crate::Camera::new(DVec3::new(7.5, 7.5, 2.3), DVec3::ZERO, DVec3::Z, 50.0)
    }
}
