//! Pinhole camera for primary ray generation.

use kdray_math::{DVec3, Ray};

/// Camera looking from `position` toward `look_at`.
///
/// View coordinates run over [-1, 1] on both axes, with +y up. The basis is
/// computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: DVec3,
    look_at: DVec3,
    up: DVec3,
    /// Field of view in degrees
    fov: f64,

    // Cached basis
    forward: DVec3,
    right: DVec3,
    true_up: DVec3,
    /// Distance to the view plane: cot(fov / 2)
    depth: f64,
}

impl Camera {
    pub fn new(position: DVec3, look_at: DVec3, up: DVec3, fov: f64) -> Self {
        let forward = (look_at - position).normalize_or_zero();
        let right = forward.cross(up).normalize_or_zero();
        let true_up = right.cross(forward).normalize_or_zero();

        let half_angle = fov.to_radians() / 2.0;
        let depth = half_angle.cos() / half_angle.sin();

        Self {
            position,
            look_at,
            up,
            fov,
            forward,
            right,
            true_up,
            depth,
        }
    }

    /// Change the field of view in degrees.
    pub fn with_fov(self, fov: f64) -> Self {
        Self::new(self.position, self.look_at, self.up, fov)
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }

    /// Ray through view coordinates (vx, vy).
    pub fn get_ray(&self, vx: f64, vy: f64) -> Ray {
        let direction = self.forward * self.depth + self.right * vx + self.true_up * vy;
        Ray::new(self.position, direction)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, DVec3::Y, 45.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::new(DVec3::new(7.5, 7.5, 2.3), DVec3::ZERO, DVec3::Z, 50.0);
        let ray = camera.get_ray(0.0, 0.0);
        let expected = (-DVec3::new(7.5, 7.5, 2.3)).normalize();
        assert!((ray.direction - expected).length() < 1e-12);
        assert_eq!(ray.origin, camera.position());
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = Camera::new(DVec3::new(1.0, 2.0, 3.0), DVec3::ZERO, DVec3::Z, 60.0);
        assert!(camera.forward.dot(camera.right).abs() < 1e-12);
        assert!(camera.forward.dot(camera.true_up).abs() < 1e-12);
        assert!(camera.right.dot(camera.true_up).abs() < 1e-12);
        assert!((camera.true_up.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_view_axes() {
        // Looking down -z with +y up: +vx goes right (+x), +vy goes up (+y)
        let camera = Camera::default();
        let right = camera.get_ray(1.0, 0.0);
        let up = camera.get_ray(0.0, 1.0);
        assert!(right.direction.x > 0.0);
        assert!(up.direction.y > 0.0);
    }

    #[test]
    fn test_ninety_degree_fov_edges() {
        // cot(45 deg) = 1, so the edge ray is 45 degrees off axis
        let camera = Camera::default().with_fov(90.0);
        assert_eq!(camera.fov(), 90.0);
        let edge = camera.get_ray(1.0, 0.0);
        assert!((edge.direction.x - edge.direction.z.abs()).abs() < 1e-12);
    }
}
