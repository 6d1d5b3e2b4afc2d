//! Neutral File Format (NFF) scene reader.
//!
//! Supported instructions:
//!
//! - `b r g b` background color
//! - `v` followed by `from`, `at`, `up`, `angle`, `hither` and `resolution` lines
//! - `l x y z [r g b]` point light, white when no color is given
//! - `f r g b Kd Ks Shine T index` material for the shapes that follow
//! - `s x y z radius` sphere
//! - `p n` followed by `n` vertex lines, fan-triangulated
//! - `pp n` followed by `n` vertex+normal lines; normals are ignored
//!
//! Cones (`c`) are skipped along with their two data lines. Other unknown
//! instructions and `#` comments are ignored.

use std::path::Path;
use std::str::SplitWhitespace;
use std::sync::Arc;

use kdray_math::{Color3, DVec3};
use kdray_renderer::{Background, Camera, Geometry, Light, Material, Sphere, Triangle};
use thiserror::Error;

/// Field of view used when the file has no viewpoint block.
const DEFAULT_FOV: f64 = 50.0;

/// Errors that can occur while reading an NFF file.
#[derive(Error, Debug)]
pub enum NffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid number at line {line}: {token}")]
    InvalidNumber { line: usize, token: String },

    #[error("Unexpected end of file while reading {0}")]
    UnexpectedEof(&'static str),
}

pub type NffResult<T> = Result<T, NffError>;

/// Everything an NFF file describes.
#[derive(Debug)]
pub struct NffScene {
    pub geometries: Vec<Geometry>,
    pub lights: Vec<Light>,
    pub background: Background,
    pub camera: Camera,
    /// Image size suggested by the viewpoint block.
    pub resolution: Option<(u32, u32)>,
}

/// Read and parse an NFF file.
pub fn load_nff(path: impl AsRef<Path>) -> NffResult<NffScene> {
    let content = std::fs::read_to_string(path)?;
    parse_nff(&content)
}

/// Parse NFF text.
pub fn parse_nff(content: &str) -> NffResult<NffScene> {
    NffParser::new(content).parse()
}

/// One tokenized line.
struct Line<'a> {
    number: usize,
    keyword: &'a str,
    rest: SplitWhitespace<'a>,
}

impl<'a> Line<'a> {
    fn number(&mut self) -> NffResult<f64> {
        let line = self.number;
        let token = self.rest.next().ok_or_else(|| NffError::Parse {
            line,
            message: format!("'{}' is missing a value", self.keyword),
        })?;
        token.parse().map_err(|_| NffError::InvalidNumber {
            line,
            token: token.to_string(),
        })
    }

    fn vector(&mut self) -> NffResult<DVec3> {
        Ok(DVec3::new(self.number()?, self.number()?, self.number()?))
    }

    fn count(&mut self) -> NffResult<usize> {
        let line = self.number;
        let token = self.rest.next().ok_or_else(|| NffError::Parse {
            line,
            message: format!("'{}' is missing a vertex count", self.keyword),
        })?;
        token.parse().map_err(|_| NffError::InvalidNumber {
            line,
            token: token.to_string(),
        })
    }

    /// The keyword itself parsed as a number, for data lines that start
    /// with a coordinate.
    fn leading_vector(&mut self) -> NffResult<DVec3> {
        let x = self.keyword.parse().map_err(|_| NffError::InvalidNumber {
            line: self.number,
            token: self.keyword.to_string(),
        })?;
        Ok(DVec3::new(x, self.number()?, self.number()?))
    }

    fn expect_keyword(&self, keyword: &str) -> NffResult<()> {
        if self.keyword == keyword {
            Ok(())
        } else {
            Err(NffError::Parse {
                line: self.number,
                message: format!("expected '{}', found '{}'", keyword, self.keyword),
            })
        }
    }
}

struct NffParser<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    material: Arc<Material>,
    geometries: Vec<Geometry>,
    lights: Vec<Light>,
    background: Background,
    camera: Option<Camera>,
    resolution: Option<(u32, u32)>,
}

impl<'a> NffParser<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines().enumerate(),
            material: Arc::new(Material::solid(Color3::WHITE)),
            geometries: Vec::new(),
            lights: Vec::new(),
            background: Background::default(),
            camera: None,
            resolution: None,
        }
    }

    /// Next non-blank, non-comment line.
    fn next_line(&mut self) -> Option<Line<'a>> {
        for (i, text) in self.lines.by_ref() {
            let mut tokens = text.split_whitespace();
            match tokens.next() {
                None => continue,
                Some(keyword) if keyword.starts_with('#') => continue,
                Some(keyword) => {
                    return Some(Line {
                        number: i + 1,
                        keyword,
                        rest: tokens,
                    })
                }
            }
        }
        None
    }

    fn require_line(&mut self, context: &'static str) -> NffResult<Line<'a>> {
        self.next_line().ok_or(NffError::UnexpectedEof(context))
    }

    fn parse(mut self) -> NffResult<NffScene> {
        while let Some(mut line) = self.next_line() {
            let keyword = line.keyword;
            match keyword {
                "b" => self.background.color = color(line.vector()?),
                "v" => self.parse_viewpoint()?,
                "l" => {
                    let position = line.vector()?;
                    let light = match line.rest.clone().next() {
                        Some(_) => Light::new(position, color(line.vector()?)),
                        None => Light::white(position),
                    };
                    self.lights.push(light);
                }
                "f" => self.material = Arc::new(parse_material(&mut line)?),
                "s" => {
                    let center = line.vector()?;
                    let radius = line.number()?;
                    self.geometries
                        .push(Sphere::new(center, radius, self.material.clone()).into());
                }
                "p" | "pp" => {
                    let count = line.count()?;
                    self.parse_polygon(count)?;
                }
                "c" => {
                    log::warn!("Line {}: cones are not supported, skipping", line.number);
                    self.require_line("cone base")?;
                    self.require_line("cone apex")?;
                }
                other => log::debug!("Line {}: ignoring '{}'", line.number, other),
            }
        }

        log::info!(
            "Parsed NFF scene: {} shapes, {} lights",
            self.geometries.len(),
            self.lights.len()
        );

        let camera = self
            .camera
            .unwrap_or_else(|| Camera::new(DVec3::new(0.0, 0.0, 10.0), DVec3::ZERO, DVec3::Y, DEFAULT_FOV));

        Ok(NffScene {
            geometries: self.geometries,
            lights: self.lights,
            background: self.background,
            camera,
            resolution: self.resolution,
        })
    }

    fn parse_viewpoint(&mut self) -> NffResult<()> {
        let mut from = self.require_line("viewpoint")?;
        from.expect_keyword("from")?;
        let from = from.vector()?;

        let mut at = self.require_line("viewpoint")?;
        at.expect_keyword("at")?;
        let at = at.vector()?;

        let mut up = self.require_line("viewpoint")?;
        up.expect_keyword("up")?;
        let up = up.vector()?;

        let mut angle = self.require_line("viewpoint")?;
        angle.expect_keyword("angle")?;
        let fov = angle.number()?;

        let hither = self.require_line("viewpoint")?;
        hither.expect_keyword("hither")?;

        let mut resolution = self.require_line("viewpoint")?;
        resolution.expect_keyword("resolution")?;
        let width = resolution.count()?;
        let height = resolution.count()?;

        self.camera = Some(Camera::new(from, at, up, fov));
        self.resolution = Some((width as u32, height as u32));
        Ok(())
    }

    fn parse_polygon(&mut self, count: usize) -> NffResult<()> {
        let mut vertices = Vec::with_capacity(count);
        for _ in 0..count {
            let mut line = self.require_line("polygon")?;
            vertices.push(line.leading_vector()?);
        }

        if vertices.len() < 3 {
            log::warn!("Skipping polygon with {} vertices", vertices.len());
            return Ok(());
        }

        let first = vertices[0];
        for pair in vertices[1..].windows(2) {
            let triangle = Triangle::new(first, pair[0], pair[1], self.material.clone());
            self.geometries.push(triangle.into());
        }
        Ok(())
    }
}

fn color(v: DVec3) -> Color3 {
    Color3::new(v.x, v.y, v.z)
}

/// `f r g b Kd Ks Shine T index`. Ks drives mirror reflection; whatever the
/// other terms leave of 1.0 becomes ambient.
fn parse_material(line: &mut Line<'_>) -> NffResult<Material> {
    let surface = color(line.vector()?);
    let kd = line.number()?;
    let ks = line.number()?;
    let shine = line.number()?;
    let transmittance = line.number()?;
    let index = line.number()?;

    let ambient = (1.0 - kd - ks - transmittance).max(0.0);
    Ok(Material::solid(surface)
        .with_coefficients(ambient, kd, 0.0, ks, transmittance)
        .with_gloss(shine)
        .with_refraction_index(index))
}
