//! Background color, ambient level and optional fog.

use kdray_math::Color3;
use serde::{Deserialize, Serialize};

/// Distance-dependent fog. Density is the weight of the background color
/// blended over a hit at that distance, always within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fog {
    /// Zero before `start`, rising linearly to one at `end`.
    Linear { start: f64, end: f64 },
    /// `1 - exp(-density * distance)`.
    Exponential { density: f64 },
}

impl Fog {
    pub fn density_at(&self, distance: f64) -> f64 {
        let density = match *self {
            Fog::Linear { start, end } => {
                if end <= start {
                    if distance >= end {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    (distance - start) / (end - start)
                }
            }
            Fog::Exponential { density } => 1.0 - (-density * distance).exp(),
        };
        density.clamp(0.0, 1.0)
    }
}

/// What a ray sees when it hits nothing, plus scene-wide ambient light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub color: Color3,
    /// Fraction of a surface's own color visible without direct light.
    pub ambience: f64,
    /// Only the recursive tracer applies fog.
    #[serde(default)]
    pub fog: Option<Fog>,
}

impl Background {
    pub fn new(color: Color3, ambience: f64) -> Self {
        Self {
            color,
            ambience,
            fog: None,
        }
    }

    pub fn with_fog(mut self, fog: Fog) -> Self {
        self.fog = Some(fog);
        self
    }

    /// Fog density at `distance`, zero when no fog is configured.
    pub fn fog_density(&self, distance: f64) -> f64 {
        self.fog.map_or(0.0, |fog| fog.density_at(distance))
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::new(Color3::BLACK, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_fog() {
        let fog = Fog::Linear {
            start: 10.0,
            end: 20.0,
        };
        assert_eq!(fog.density_at(0.0), 0.0);
        assert_eq!(fog.density_at(15.0), 0.5);
        assert_eq!(fog.density_at(30.0), 1.0);
        assert_eq!(fog.density_at(f64::INFINITY), 1.0);
    }

    #[test]
    fn test_exponential_fog() {
        let fog = Fog::Exponential { density: 0.1 };
        assert_eq!(fog.density_at(0.0), 0.0);
        let mid = fog.density_at(10.0);
        assert!(mid > 0.6 && mid < 0.7);
        assert_eq!(fog.density_at(f64::INFINITY), 1.0);
    }

    #[test]
    fn test_background_without_fog() {
        let bg = Background::new(Color3::WHITE, 0.2);
        assert_eq!(bg.fog_density(1e9), 0.0);
        let fogged = bg.with_fog(Fog::Exponential { density: 1.0 });
        assert!(fogged.fog_density(1.0) > 0.0);
    }
}
