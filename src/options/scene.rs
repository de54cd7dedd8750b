use serde::{Deserialize, Serialize};

/// A static sphere entry in the options file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SphereOptions {
    /// World-space center.
    pub center: [f32; 3],
    /// Radius in world units.
    pub radius: f32,
}

/// Scene constants: the orbiting sphere and the static background.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneOptions {
    /// Point the animated sphere orbits around.
    pub orbit_center: [f32; 3],
    /// Distance from the orbit center to the animated sphere's center.
    pub orbit_radius: f32,
    /// Radius of the animated sphere itself.
    pub orbiter_radius: f32,
    /// Animation rate: the orbit angle is `frame_index / frames_per_radian`.
    pub frames_per_radian: f32,
    /// Spheres that never move.
    pub background: Vec<SphereOptions>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            orbit_center: [0.0, 0.0, 3.0],
            orbit_radius: 0.5,
            orbiter_radius: 0.15,
            frames_per_radian: 60.0,
            background: vec![
                SphereOptions {
                    center: [0.0, 0.0, 3.0],
                    radius: 0.3,
                },
                // Ground
                SphereOptions {
                    center: [0.0, -100.8, 3.0],
                    radius: 100.0,
                },
            ],
        }
    }
}
