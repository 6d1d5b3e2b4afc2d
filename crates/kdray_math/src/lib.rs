// Re-export glam for convenience
pub use glam::*;

// kdray math types
mod bound;
mod bounding_box;
mod color;
mod ray;

pub use bound::Bound;
pub use bounding_box::{Axis, BoundingBox};
pub use color::Color3;
pub use ray::Ray;

/// Scene-space vector type.
pub type Vector3 = DVec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector3_operations() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vector3::X.cross(Vector3::Y), Vector3::Z);
        assert!((Vector3::new(3.0, 4.0, 0.0).normalize().length() - 1.0).abs() < 1e-12);
    }
}
