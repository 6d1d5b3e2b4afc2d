//! Errors surfaced by a render call.
//!
//! Shading itself never fails; these cover caller mistakes and worker faults.

use thiserror::Error;

/// Errors that can occur when starting or running a render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Pixel sink is {actual:?} but the render is configured for {expected:?}")]
    SinkMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("A render thread panicked; the image is incomplete")]
    WorkerPanicked,
}

pub type RenderResult<T> = Result<T, RenderError>;
