//! Scene state: the spheres rendered each frame.
//!
//! One sphere orbits a fixed center; the rest never move. The scene for a
//! frame is a pure function of the frame index, so nothing here is mutated
//! after construction.

use glam::Vec3;

use crate::options::SceneOptions;

// ---------------------------------------------------------------------------
// Sphere
// ---------------------------------------------------------------------------

/// GPU layout of one sphere. Must match `Sphere` in `raytrace.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Sphere {
    /// World-space center.
    pub center: [f32; 3],
    /// Radius in world units.
    pub radius: f32,
}

impl Sphere {
    /// Sphere at `center` with `radius`.
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center: center.to_array(),
            radius,
        }
    }

    /// Center as a vector.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        Vec3::from_array(self.center)
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Spheres for a single frame, with the animated one kept apart from the
/// static background.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// The orbiting sphere.
    pub orbiter: Sphere,
    /// Static spheres, in configuration order.
    pub background: Vec<Sphere>,
}

impl Scene {
    /// Number of spheres uploaded to the GPU.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.background.len()
    }

    /// Always false; the orbiter is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Flatten into the uploaded sequence. The kernel relies on the orbiter
    /// being at index 0.
    #[must_use]
    pub fn to_gpu(&self) -> Vec<Sphere> {
        let mut spheres = Vec::with_capacity(self.len());
        spheres.push(self.orbiter);
        spheres.extend_from_slice(&self.background);
        spheres
    }
}

// ---------------------------------------------------------------------------
// SceneState
// ---------------------------------------------------------------------------

/// Fixed scene constants plus the orbit animation.
#[derive(Debug, Clone)]
pub struct SceneState {
    orbit_center: Vec3,
    orbit_radius: f32,
    orbiter_radius: f32,
    frames_per_radian: f64,
    background: Vec<Sphere>,
}

impl SceneState {
    /// Build from options.
    #[must_use]
    pub fn new(options: &SceneOptions) -> Self {
        Self {
            orbit_center: Vec3::from_array(options.orbit_center),
            orbit_radius: options.orbit_radius,
            orbiter_radius: options.orbiter_radius,
            frames_per_radian: f64::from(options.frames_per_radian),
            background: options
                .background
                .iter()
                .map(|s| Sphere::new(Vec3::from_array(s.center), s.radius))
                .collect(),
        }
    }

    /// Orbit angle in radians at `frame_index`.
    ///
    /// Tied to frame count, not wall time: a slower refresh rate slows the
    /// animation proportionally.
    #[must_use]
    pub fn angle(&self, frame_index: u32) -> f64 {
        f64::from(frame_index) / self.frames_per_radian
    }

    /// Scene at `frame_index`. The orbiter moves in the XY plane starting at
    /// the top of its orbit (`+Y`) and sweeping toward `+X`.
    #[must_use]
    pub fn advance(&self, frame_index: u32) -> Scene {
        let (sin, cos) = self.angle(frame_index).sin_cos();
        let offset = Vec3::new(sin as f32, cos as f32, 0.0) * self.orbit_radius;
        Scene {
            orbiter: Sphere::new(self.orbit_center + offset, self.orbiter_radius),
            background: self.background.clone(),
        }
    }

    /// Spheres per frame; constant for the life of the state.
    #[must_use]
    pub fn sphere_count(&self) -> usize {
        1 + self.background.len()
    }

    /// Distance between the orbiter's center and the orbit center.
    #[must_use]
    pub fn orbit_radius(&self) -> f32 {
        self.orbit_radius
    }

    /// Center of the orbit.
    #[must_use]
    pub fn orbit_center(&self) -> Vec3 {
        self.orbit_center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SphereOptions;

    fn state() -> SceneState {
        SceneState::new(&SceneOptions::default())
    }

    #[test]
    fn orbiter_stays_on_orbit() {
        let state = state();
        for frame in [0, 1, 59, 60, 377, 10_000, u32::MAX / 2, u32::MAX] {
            let scene = state.advance(frame);
            let dist = scene.orbiter.center().distance(state.orbit_center());
            assert!(
                (dist - state.orbit_radius()).abs() < 1e-4,
                "frame {frame}: distance {dist}"
            );
        }
    }

    #[test]
    fn cardinality_is_fixed() {
        let state = state();
        let expected = state.sphere_count();
        for frame in [0, 1, 1000, u32::MAX] {
            assert_eq!(state.advance(frame).to_gpu().len(), expected);
            assert_eq!(state.advance(frame).len(), expected);
        }
    }

    #[test]
    fn orbiter_starts_at_top_of_orbit() {
        let state = state();
        let scene = state.advance(0);
        let center = state.orbit_center();
        let expected = Vec3::new(center.x, center.y + state.orbit_radius(), center.z);
        assert!(scene.orbiter.center().distance(expected) < 1e-6);
    }

    #[test]
    fn sixty_frames_is_one_radian() {
        let state = state();
        assert!((state.angle(60) - 1.0).abs() < 1e-12);
        let quarter_turn = (std::f64::consts::FRAC_PI_2 * 60.0).round() as u32;
        let scene = state.advance(quarter_turn);
        let offset = scene.orbiter.center() - state.orbit_center();
        assert!((offset.x - state.orbit_radius()).abs() < 1e-2);
        assert!(offset.y.abs() < 1e-2);
    }

    #[test]
    fn orbiter_is_index_zero_and_background_is_static() {
        let state = state();
        let a = state.advance(0).to_gpu();
        let b = state.advance(90).to_gpu();
        assert_eq!(a[0], state.advance(0).orbiter);
        assert_eq!(b[0], state.advance(90).orbiter);
        assert_ne!(a[0], b[0]);
        assert_eq!(a[1..], b[1..]);
    }

    #[test]
    fn advance_is_pure() {
        let state = state();
        assert_eq!(state.advance(1234), state.advance(1234));
    }

    #[test]
    fn background_comes_from_options() {
        let opts = SceneOptions {
            background: vec![SphereOptions {
                center: [1.0, 2.0, 3.0],
                radius: 0.5,
            }],
            ..Default::default()
        };
        let scene = SceneState::new(&opts).advance(5);
        assert_eq!(scene.background, vec![Sphere::new(Vec3::new(1.0, 2.0, 3.0), 0.5)]);
    }
}
