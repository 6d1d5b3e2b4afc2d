//! JSON render settings for the command-line front end.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kdray_renderer::{Fog, KdTreeSettings, RenderConfig, TracerKind};
use serde::{Deserialize, Serialize};

/// Where the scene comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneSource {
    Basic,
    Marbles,
    /// Path to an NFF file
    Nff(PathBuf),
}

/// Everything needed for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub scene: SceneSource,
    /// PNG file to write
    pub output: PathBuf,
    pub config: RenderConfig,
    pub tracer: TracerKind,
    pub kd_tree: KdTreeSettings,
    /// Fog applied on top of the scene's background
    pub fog: Option<Fog>,
    /// Let an NFF viewpoint block override the configured resolution
    pub use_scene_resolution: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scene: SceneSource::Basic,
            output: PathBuf::from("render.png"),
            config: RenderConfig::default(),
            tracer: TracerKind::default(),
            kd_tree: KdTreeSettings::default(),
            fog: None,
            use_scene_resolution: true,
        }
    }
}

impl RenderSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let settings: RenderSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, RenderSettings::default());
    }

    #[test]
    fn test_nff_source_and_overrides() {
        let json = r#"{
            "scene": { "nff": "scenes/teapot.nff" },
            "output": "teapot.png",
            "tracer": "recursive",
            "config": { "width": 320, "height": 240, "threads": 4 },
            "fog": { "exponential": { "density": 0.05 } }
        }"#;
        let settings: RenderSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.scene, SceneSource::Nff(PathBuf::from("scenes/teapot.nff")));
        assert_eq!(settings.tracer, TracerKind::Recursive);
        assert_eq!(settings.config.width, 320);
        assert_eq!(settings.config.max_depth, 5);
        assert_eq!(settings.fog, Some(Fog::Exponential { density: 0.05 }));
    }

    #[test]
    fn test_named_scene() {
        let settings: RenderSettings = serde_json::from_str(r#"{ "scene": "marbles" }"#).unwrap();
        assert_eq!(settings.scene, SceneSource::Marbles);
    }
}
