//! Surface materials: a color pattern plus shading coefficients.

use kdray_math::Color3;
use serde::{Deserialize, Serialize};

/// How far the five shading coefficients may drift from summing to 1.0
/// before a material is reported as unbalanced.
pub const COEFFICIENT_TOLERANCE: f64 = 0.005;

/// Color pattern of a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    /// Constant color everywhere.
    Solid { color: Color3 },
    /// Procedural checker in (u, v) with squares of size `scale / 2`.
    Checkerboard {
        color_a: Color3,
        color_b: Color3,
        scale: f64,
    },
}

/// A surface material.
///
/// The coefficients weight the ambient, diffuse, specular, reflection and
/// transparency terms and should sum to roughly 1.0. Violations are allowed;
/// scene assembly only warns about them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub kind: MaterialKind,
    pub k_ambient: f64,
    pub k_diffuse: f64,
    pub k_specular: f64,
    pub k_reflection: f64,
    pub k_transparent: f64,
    /// Index of refraction used for transparent surfaces.
    pub refraction_index: f64,
    /// Gloss exponent; zero disables highlights.
    pub gloss: f64,
}

impl Material {
    /// A fully diffuse material of a single color.
    pub fn solid(color: Color3) -> Self {
        Self::with_kind(MaterialKind::Solid { color })
    }

    /// A fully diffuse checkerboard material.
    pub fn checkerboard(color_a: Color3, color_b: Color3, scale: f64) -> Self {
        Self::with_kind(MaterialKind::Checkerboard {
            color_a,
            color_b,
            scale,
        })
    }

    fn with_kind(kind: MaterialKind) -> Self {
        Self {
            kind,
            k_ambient: 0.0,
            k_diffuse: 1.0,
            k_specular: 0.0,
            k_reflection: 0.0,
            k_transparent: 0.0,
            refraction_index: 1.0,
            gloss: 0.0,
        }
    }

    /// Set the five shading coefficients.
    pub fn with_coefficients(
        mut self,
        ambient: f64,
        diffuse: f64,
        specular: f64,
        reflection: f64,
        transparent: f64,
    ) -> Self {
        self.k_ambient = ambient;
        self.k_diffuse = diffuse;
        self.k_specular = specular;
        self.k_reflection = reflection;
        self.k_transparent = transparent;
        self
    }

    pub fn with_refraction_index(mut self, index: f64) -> Self {
        self.refraction_index = index;
        self
    }

    pub fn with_gloss(mut self, gloss: f64) -> Self {
        self.gloss = gloss;
        self
    }

    /// True if the color depends on (u, v), so geometry must compute them.
    pub fn has_texture(&self) -> bool {
        matches!(self.kind, MaterialKind::Checkerboard { .. })
    }

    /// Resolve the surface color at texture coordinates (u, v).
    pub fn color_at(&self, u: f64, v: f64) -> Color3 {
        match self.kind {
            MaterialKind::Solid { color } => color,
            MaterialKind::Checkerboard {
                color_a,
                color_b,
                scale,
            } => {
                if wrap(u, scale) * wrap(v, scale) < 0.0 {
                    color_a
                } else {
                    color_b
                }
            }
        }
    }

    pub fn coefficient_sum(&self) -> f64 {
        self.k_ambient + self.k_diffuse + self.k_specular + self.k_reflection + self.k_transparent
    }

    /// True if the coefficients sum to 1.0 within [`COEFFICIENT_TOLERANCE`].
    pub fn is_balanced(&self) -> bool {
        (self.coefficient_sum() - 1.0).abs() <= COEFFICIENT_TOLERANCE
    }
}

/// Wrap `t` into [-scale/2, scale/2).
fn wrap(t: f64, scale: f64) -> f64 {
    let mut x = t % scale;
    if x < -scale / 2.0 {
        x += scale;
    }
    if x >= scale / 2.0 {
        x -= scale;
    }
    x
}
