//! kdray: render a scene to a PNG file.
//!
//! Usage: `kdray [settings.json]`. Without a settings file the built-in
//! basic scene is rendered with default settings to `render.png`.

mod nff;
mod scenes;
mod settings;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kdray_renderer::{render, ImageBuffer, Scene};

use scenes::SceneDescription;
use settings::{RenderSettings, SceneSource};

fn load_scene(settings: &mut RenderSettings) -> Result<SceneDescription> {
    let desc = match &settings.scene {
        SceneSource::Basic => scenes::basic(),
        SceneSource::Marbles => scenes::marbles(),
        SceneSource::Nff(path) => {
            let nff = nff::load_nff(path)
                .with_context(|| format!("Failed to load NFF scene {}", path.display()))?;
            if let (true, Some((width, height))) = (settings.use_scene_resolution, nff.resolution) {
                settings.config.width = width;
                settings.config.height = height;
            }
            SceneDescription {
                geometries: nff.geometries,
                lights: nff.lights,
                background: nff.background,
                camera: nff.camera,
            }
        }
    };
    Ok(desc)
}

fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    image::save_buffer(
        path,
        &image.to_rgba8(),
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut settings = match std::env::args().nth(1) {
        Some(path) => RenderSettings::load(&PathBuf::from(path))?,
        None => RenderSettings::default(),
    };

    let mut desc = load_scene(&mut settings)?;
    if let Some(fog) = settings.fog {
        desc.background = desc.background.with_fog(fog);
    }

    let scene = Scene::build_with_settings(
        desc.geometries,
        desc.lights,
        desc.background,
        &settings.kd_tree,
    );

    let config = &settings.config;
    let mut image = ImageBuffer::new(config.width, config.height);
    let mut next_report = 0.0;
    render(
        &desc.camera,
        &scene,
        config,
        settings.tracer,
        &mut image,
        |progress| {
            let percent = progress.percent_complete();
            if percent >= next_report {
                log::info!("Percent complete: {:.0}%", percent);
                next_report = (percent / 10.0).floor() * 10.0 + 10.0;
            }
        },
    )?;

    save_png(&image, &settings.output)?;
    log::info!("Wrote {}", settings.output.display());

    Ok(())
}
