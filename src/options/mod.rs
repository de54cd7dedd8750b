//! Centralized renderer options with TOML support.
//!
//! Camera, scene, sampling, kernel scheduling and display settings are
//! consolidated here. A missing section or field falls back to its default,
//! so a file overriding only `[scene]` is valid.

mod camera;
mod display;
mod kernel;
mod sampling;
mod scene;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use kernel::KernelOptions;
pub use sampling::SamplingOptions;
pub use scene::{SceneOptions, SphereOptions};
use serde::{Deserialize, Serialize};

use crate::error::TraceError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Fixed camera parameters.
    pub camera: CameraOptions,
    /// Orbiting sphere and static background.
    pub scene: SceneOptions,
    /// Stochastic sample pool parameters.
    pub sampling: SamplingOptions,
    /// Compute scheduling hint overrides.
    pub kernel: KernelOptions,
    /// Window and presentation settings.
    pub display: DisplayOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if the file cannot be read and
    /// [`TraceError::OptionsParse`] if it is malformed or fails validation.
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let content = std::fs::read_to_string(path).map_err(TraceError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse and validate options from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::OptionsParse`] on syntax or validation errors.
    pub fn from_toml(content: &str) -> Result<Self, TraceError> {
        let options: Self = toml::from_str(content)
            .map_err(|e| TraceError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::OptionsParse`] if serialization fails and
    /// [`TraceError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), TraceError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TraceError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(TraceError::Io)?;
        }
        std::fs::write(path, content).map_err(TraceError::Io)
    }

    /// Reject values the renderer cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::OptionsParse`] naming the first offending field.
    pub fn validate(&self) -> Result<(), TraceError> {
        if self.sampling.pool_size == 0 {
            return invalid("sampling.pool_size", "must be positive");
        }
        if self.sampling.max_rejection_attempts == 0 {
            return invalid("sampling.max_rejection_attempts", "must be positive");
        }
        positive("camera.viewport_height", self.camera.viewport_height)?;
        positive("camera.focal_distance", self.camera.focal_distance)?;
        finite("scene.orbit_center", &self.scene.orbit_center)?;
        if !self.scene.orbit_radius.is_finite() || self.scene.orbit_radius < 0.0 {
            return invalid("scene.orbit_radius", "must be finite and non-negative");
        }
        positive("scene.orbiter_radius", self.scene.orbiter_radius)?;
        positive("scene.frames_per_radian", self.scene.frames_per_radian)?;
        for sphere in &self.scene.background {
            finite("scene.background[].center", &sphere.center)?;
            positive("scene.background[].radius", sphere.radius)?;
        }
        if self.kernel.preferred_thread_width == Some(0) {
            return invalid("kernel.preferred_thread_width", "must be positive");
        }
        if self.kernel.max_threads_per_group == Some(0) {
            return invalid("kernel.max_threads_per_group", "must be positive");
        }
        Ok(())
    }
}

fn invalid(field: &str, requirement: &str) -> Result<(), TraceError> {
    Err(TraceError::OptionsParse(format!("{field} {requirement}")))
}

/// NaN and infinities fail every check, not just the sign test.
fn positive(field: &str, value: f32) -> Result<(), TraceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        invalid(field, "must be finite and positive")
    }
}

fn finite(field: &str, values: &[f32]) -> Result<(), TraceError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        invalid(field, "must be finite")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[scene]
orbit_radius = 1.25
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.scene.orbit_radius, 1.25);
        // Everything else should be default
        assert_eq!(opts.scene.frames_per_radian, 60.0);
        assert_eq!(opts.sampling.pool_size, 4096);
        assert_eq!(opts.camera.viewport_height, 2.0);
        assert_eq!(opts.scene.background.len(), 2);
    }

    #[test]
    fn empty_background_is_allowed() {
        let opts = Options::from_toml("[scene]\nbackground = []\n").unwrap();
        assert!(opts.scene.background.is_empty());
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = Options::from_toml("[sampling]\npool_size = 0\n").unwrap_err();
        assert!(matches!(err, TraceError::OptionsParse(msg) if msg.contains("pool_size")));
    }

    #[test]
    fn negative_background_radius_is_rejected() {
        let toml_str = r"
[[scene.background]]
center = [0.0, 0.0, 2.0]
radius = -1.0
";
        assert!(Options::from_toml(toml_str).is_err());
    }

    #[test]
    fn negative_orbit_radius_is_rejected() {
        let err = Options::from_toml("[scene]\norbit_radius = -0.5\n").unwrap_err();
        assert!(matches!(err, TraceError::OptionsParse(msg) if msg.contains("orbit_radius")));
        // A zero radius parks the orbiter on the orbit center.
        assert!(Options::from_toml("[scene]\norbit_radius = 0.0\n").is_ok());
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        for toml_str in [
            "[camera]\nviewport_height = nan\n",
            "[camera]\nfocal_distance = inf\n",
            "[scene]\norbit_radius = inf\n",
            "[scene]\norbit_center = [0.0, nan, 3.0]\n",
            "[scene]\nframes_per_radian = nan\n",
            "[[scene.background]]\ncenter = [0.0, 0.0, -inf]\nradius = 1.0\n",
            "[[scene.background]]\ncenter = [0.0, 0.0, 2.0]\nradius = nan\n",
        ] {
            let err = Options::from_toml(toml_str).unwrap_err();
            assert!(
                matches!(err, TraceError::OptionsParse(ref msg) if msg.contains("finite")),
                "{toml_str:?} gave {err}"
            );
        }
    }

    #[test]
    fn seed_is_optional() {
        let opts = Options::from_toml("[sampling]\nseed = 7\n").unwrap();
        assert_eq!(opts.sampling.seed, Some(7));
        assert_eq!(Options::default().sampling.seed, None);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!(
            "orbitrace-options-{}",
            std::process::id()
        ));
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.display.max_fps = 30;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
