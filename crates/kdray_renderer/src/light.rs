//! Point lights.

use kdray_math::{Color3, DVec3};
use serde::{Deserialize, Serialize};

/// Light identifier. Ids are dense from 1 in scene insertion order.
pub type LightId = usize;

/// A point light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: DVec3,
    pub color: Color3,
    #[serde(skip)]
    id: LightId,
}

impl Light {
    /// Create a light. Its id is assigned when the scene is built.
    pub fn new(position: DVec3, color: Color3) -> Self {
        Self {
            position,
            color,
            id: 0,
        }
    }

    /// A white light at `position`.
    pub fn white(position: DVec3) -> Self {
        Self::new(position, Color3::WHITE)
    }

    pub fn id(&self) -> LightId {
        self.id
    }

    pub(crate) fn with_id(mut self, id: LightId) -> Self {
        self.id = id;
        self
    }
}
