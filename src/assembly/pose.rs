// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rigid pose of a part in the scene.

use serde::{Deserialize, Serialize};

/// Position, rotation (unit quaternion, x y z w) and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position
    #[serde(default)]
    pub position: [f32; 3],
    /// Rotation quaternion
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    /// Local scale
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: identity_rotation(),
            scale: unit_scale(),
        }
    }
}

impl Pose {
    /// Pose at a position with identity rotation
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Builder: set rotation
    pub fn with_rotation(mut self, rotation: [f32; 4]) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Component-wise product of two scales
pub fn scale_by(scale: [f32; 3], multiplier: [f32; 3]) -> [f32; 3] {
    [
        scale[0] * multiplier[0],
        scale[1] * multiplier[1],
        scale[2] * multiplier[2],
    ]
}
