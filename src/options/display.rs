use serde::{Deserialize, Serialize};

/// Window and presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayOptions {
    /// Frame cap (0 = render on every refresh tick).
    pub max_fps: u32,
    /// Present with FIFO (vsync) instead of the lowest-latency mode.
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_fps: 0,
            vsync: true,
            title: "Orbitrace".into(),
        }
    }
}
