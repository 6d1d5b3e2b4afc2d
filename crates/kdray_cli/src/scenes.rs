//! Built-in demo scenes.

use std::sync::Arc;

use kdray_math::{Color3, DVec3};
use kdray_renderer::{Background, Camera, Geometry, Light, Material, Plane, Sphere};

/// Geometry, lights and camera for a scene, before it is built.
#[derive(Debug)]
pub struct SceneDescription {
    pub geometries: Vec<Geometry>,
    pub lights: Vec<Light>,
    pub background: Background,
    pub camera: Camera,
}

fn solid(r: f64, g: f64, b: f64) -> Arc<Material> {
    Arc::new(Material::solid(Color3::new(r, g, b)))
}

/// Three spheres resting in the corner of three axis planes, lit from far
/// away.
pub fn basic() -> SceneDescription {
    let geometries: Vec<Geometry> = vec![
        // Purple, right
        Sphere::new(DVec3::new(2.5, 5.0, 1.0), 0.75, solid(1.0, 0.0, 1.0)).into(),
        // Yellow, left
        Sphere::new(DVec3::new(3.5, 1.25, 1.5), 1.0, solid(1.0, 1.0, 0.0)).into(),
        // Cyan, middle
        Sphere::new(DVec3::new(2.0, 3.0, 1.0), 1.0, solid(0.0, 1.0, 1.0)).into(),
        // Floor, green
        Plane::new(DVec3::Z, 0.0, solid(0.0, 1.0, 0.0)).into(),
        // Back walls, blue and red
        Plane::new(DVec3::X, 0.0, solid(0.0, 0.0, 1.0)).into(),
        Plane::new(DVec3::Y, 0.0, solid(1.0, 0.0, 0.0)).into(),
    ];

    SceneDescription {
        geometries,
        lights: vec![Light::white(DVec3::new(100.0, 60.0, 40.0))],
        background: Background::new(Color3::new(0.2, 0.2, 0.2), 0.2),
        camera: Camera::new(DVec3::new(7.5, 7.5, 2.3), DVec3::ZERO, DVec3::Z, 50.0),
    }
}

/// A grid of glossy, reflective marbles on a checkerboard floor.
pub fn marbles() -> SceneDescription {
    let floor = Arc::new(
        Material::checkerboard(Color3::WHITE, Color3::new(0.1, 0.1, 0.1), 2.0)
            .with_coefficients(0.1, 0.6, 0.0, 0.3, 0.0),
    );
    let mut geometries: Vec<Geometry> = vec![Plane::new(DVec3::Z, 0.0, floor).into()];

    let palette = [
        Color3::new(0.9, 0.2, 0.2),
        Color3::new(0.2, 0.8, 0.3),
        Color3::new(0.2, 0.4, 0.9),
        Color3::new(0.9, 0.8, 0.2),
    ];

    for i in 0..5 {
        for j in 0..5 {
            let color = palette[(i + j) % palette.len()];
            let material = Arc::new(
                Material::solid(color)
                    .with_coefficients(0.1, 0.4, 0.2, 0.3, 0.0)
                    .with_gloss(20.0),
            );
            let center = DVec3::new(i as f64 * 2.5 - 5.0, j as f64 * 2.5 - 5.0, 0.8);
            geometries.push(Sphere::new(center, 0.8, material).into());
        }
    }

    // One glass marble floating over the middle of the grid
    let glass = Arc::new(
        Material::solid(Color3::WHITE)
            .with_coefficients(0.0, 0.1, 0.1, 0.1, 0.7)
            .with_refraction_index(1.5)
            .with_gloss(40.0),
    );
    geometries.push(Sphere::new(DVec3::new(0.0, 0.0, 3.0), 1.2, glass).into());

    SceneDescription {
        geometries,
        lights: vec![
            Light::white(DVec3::new(20.0, -10.0, 30.0)),
            Light::new(DVec3::new(-15.0, -20.0, 10.0), Color3::new(0.4, 0.4, 0.5)),
        ],
        background: Background::new(Color3::new(0.05, 0.05, 0.1), 0.15),
        camera: Camera::new(DVec3::new(0.0, -16.0, 9.0), DVec3::new(0.0, 0.0, 1.0), DVec3::Z, 55.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kdray_renderer::Scene;

    #[test]
    fn test_basic_layout() {
        let desc = basic();
        assert_eq!(desc.geometries.len(), 6);
        assert_eq!(desc.lights.len(), 1);
    }

    #[test]
    fn test_marbles_materials_are_balanced() {
        let desc = marbles();
        assert_eq!(desc.geometries.len(), 1 + 25 + 1);
        let scene = Scene::build(desc.geometries, desc.lights, desc.background);
        for shape in scene.shapes() {
            assert!(shape.material(true).is_balanced(), "shape {}", shape.id());
        }
    }
}
