//! Render configuration.

use serde::{Deserialize, Serialize};

/// Which shading strategy to render with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracerKind {
    /// Shadow rays toward each light, with reflection and refraction.
    #[default]
    Direct,
    /// Intensity-budgeted recursive reflection with fog.
    Recursive,
}

/// Budget for the recursive tracer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecursiveSettings {
    /// Intensity of a primary ray.
    pub initial_intensity: f64,
    /// Reflections are only traced while the intensity is above this.
    pub intensity_threshold: f64,
    pub max_depth: u32,
}

impl Default for RecursiveSettings {
    fn default() -> Self {
        Self {
            initial_intensity: 100.0,
            intensity_threshold: 10.0,
            max_depth: 10,
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Maximum reflection/refraction depth for the direct tracer
    pub max_depth: u32,
    /// Worker threads; 0 or 1 renders on the calling thread
    pub threads: usize,
    pub diffuse: bool,
    pub reflection: bool,
    pub refraction: bool,
    pub shadows: bool,
    pub highlights: bool,
    /// Use the KD-tree for the direct tracer instead of testing every shape
    pub use_kd_tree: bool,
    pub recursive: RecursiveSettings,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            max_depth: 5,
            threads: 8,
            diffuse: true,
            reflection: true,
            refraction: true,
            shadows: true,
            highlights: true,
            use_kd_tree: true,
            recursive: RecursiveSettings::default(),
        }
    }
}

impl RenderConfig {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}
