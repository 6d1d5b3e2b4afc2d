use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

/// Linear RGB color. Components are left unclamped until written to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color3 {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color3 {
    pub const BLACK: Color3 = Color3::new(0.0, 0.0, 0.0);
    pub const WHITE: Color3 = Color3::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Weighted blend: `self * (1 - weight) + other * weight`.
    pub fn blend(self, other: Color3, weight: f64) -> Color3 {
        self * (1.0 - weight) + other * weight
    }

    /// Equal-weight blend of two colors.
    pub fn mix(self, other: Color3) -> Color3 {
        self.blend(other, 0.5)
    }

    /// Clamp every component to [0, 1].
    pub fn clamp(self) -> Color3 {
        Color3::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    /// Clamp and quantize to 8 bits per channel.
    pub fn to_rgb8(self) -> [u8; 3] {
        let c = self.clamp();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
        ]
    }
}

impl Add for Color3 {
    type Output = Color3;

    fn add(self, rhs: Color3) -> Color3 {
        Color3::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color3 {
    fn add_assign(&mut self, rhs: Color3) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Color3 {
    type Output = Color3;

    fn mul(self, rhs: f64) -> Color3 {
        Color3::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl Mul<Color3> for Color3 {
    type Output = Color3;

    fn mul(self, rhs: Color3) -> Color3 {
        Color3::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_arithmetic() {
        let a = Color3::new(0.25, 0.5, 0.75);
        let b = Color3::new(0.5, 0.5, 0.5);
        assert_eq!(a + b, Color3::new(0.75, 1.0, 1.25));
        assert_eq!(b * 2.0, Color3::WHITE);
        assert_eq!(a * Color3::new(1.0, 0.0, 0.5), Color3::new(0.25, 0.0, 0.375));
    }

    #[test]
    fn test_color_blend_endpoints() {
        let a = Color3::new(1.0, 0.0, 0.0);
        let b = Color3::new(0.0, 0.0, 1.0);
        assert_eq!(a.blend(b, 0.0), a);
        assert_eq!(a.blend(b, 1.0), b);
        assert_eq!(a.mix(b), Color3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn test_color_clamp() {
        let c = Color3::new(-0.5, 0.5, 1.5).clamp();
        assert_eq!(c, Color3::new(0.0, 0.5, 1.0));
        assert_eq!(Color3::new(2.0, 0.5, -1.0).to_rgb8(), [255, 128, 0]);
    }
}
