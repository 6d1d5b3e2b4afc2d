//! kdray renderer
//!
//! A CPU ray tracer over spheres, planes and triangles, accelerated by a
//! KD-tree built with a surface-area cost heuristic. Two shading strategies
//! are available: direct shadow-ray shading, and recursive reflection with
//! an intensity budget and fog. Rendering runs rows in parallel and writes
//! them to a [`PixelSink`] from a single thread.

mod background;
mod camera;
mod config;
mod error;
mod intersection;
mod kdtree;
mod light;
mod material;
mod pixel;
mod plane;
mod renderer;
mod scene;
mod shape;
mod sphere;
mod timer;
mod tracer;
mod triangle;

pub use background::{Background, Fog};
pub use camera::Camera;
pub use config::{RecursiveSettings, RenderConfig, TracerKind};
pub use error::{RenderError, RenderResult};
pub use intersection::{IntersectionInfo, ShapeId, SurfaceHit, NO_SHAPE, SELF_HIT_EPSILON};
pub use kdtree::{KdNode, KdTree, KdTreeSettings, KdTreeStats, SplitPlane};
pub use light::{Light, LightId};
pub use material::{Material, MaterialKind, COEFFICIENT_TOLERANCE};
pub use pixel::{ImageBuffer, PixelSink, SinkGuard};
pub use plane::{Plane, PLANE_EXTENT};
pub use renderer::{render, RenderProgress};
pub use scene::Scene;
pub use shape::{Geometry, Shape};
pub use sphere::Sphere;
pub use timer::RenderTimer;
pub use tracer::{is_visible, new_tracer, pixel_to_view, refract, DirectTracer, RayTracer, RecursiveTracer};
pub use triangle::Triangle;

/// Re-export the math types from kdray_math
pub use kdray_math::{Axis, Bound, BoundingBox, Color3, DVec3, Ray, Vector3};
