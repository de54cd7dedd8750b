use serde::{Deserialize, Serialize};

/// Fixed pinhole camera parameters.
///
/// The camera sits at the world origin looking down +Z; there is no
/// translation or rotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraOptions {
    /// Height of the view plane in world units (sets the vertical FOV).
    pub viewport_height: f32,
    /// Distance from the origin to the view plane along +Z.
    pub focal_distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            viewport_height: 2.0,
            focal_distance: 1.0,
        }
    }
}
