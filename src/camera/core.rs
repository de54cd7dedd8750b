use glam::Vec3;

use crate::options::CameraOptions;
use crate::scene::{Scene, SceneState};

/// Pinhole camera at the world origin looking down +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub origin: Vec3,
    /// View-plane height in world units (sets the vertical FOV).
    pub viewport_height: f32,
    /// Distance from the eye to the view plane along +Z.
    pub focal_distance: f32,
}

impl Camera {
    /// Camera from options; the eye is always the origin.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        Self {
            origin: Vec3::ZERO,
            viewport_height: options.viewport_height,
            focal_distance: options.focal_distance,
        }
    }

    /// Vertical field of view in degrees implied by the view plane.
    #[must_use]
    pub fn fovy_degrees(&self) -> f32 {
        (2.0 * (0.5 * self.viewport_height / self.focal_distance).atan()).to_degrees()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraOptions::default())
    }
}

/// GPU uniform record. Must match `Uniforms` in `raytrace.wgsl`.
///
/// Pixel `(x, y)`, counted from the top-left, lies at
/// `upper_left + x * horizontal + y * vertical` on the view plane.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    /// Camera world-space position.
    pub origin: [f32; 3],
    /// Number of spheres in the bound sphere buffer.
    pub sphere_count: u32,
    /// World-space top-left corner of the view plane.
    pub upper_left: [f32; 3],
    pub(crate) _pad0: f32,
    /// Per-pixel step to the right.
    pub horizontal: [f32; 3],
    pub(crate) _pad1: f32,
    /// Per-pixel step down the image (negative Y).
    pub vertical: [f32; 3],
    pub(crate) _pad2: f32,
}

impl Uniforms {
    /// World-space point for pixel `(x, y)` on the view plane.
    #[must_use]
    pub fn pixel_position(&self, x: f32, y: f32) -> Vec3 {
        Vec3::from_array(self.upper_left)
            + x * Vec3::from_array(self.horizontal)
            + y * Vec3::from_array(self.vertical)
    }
}

/// Derives [`Uniforms`] from the camera, the frame's scene and the output
/// image size.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformBuilder {
    camera: Camera,
}

impl UniformBuilder {
    /// Builder for `camera`.
    #[must_use]
    pub fn new(camera: Camera) -> Self {
        Self { camera }
    }

    /// The fixed camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Uniforms for an image of `width` x `height` pixels.
    ///
    /// Returns `None` for a zero-sized image; the caller skips the frame.
    #[must_use]
    pub fn build(&self, scene: &Scene, width: u32, height: u32) -> Option<Uniforms> {
        if width == 0 || height == 0 {
            return None;
        }

        let (w, h) = (width as f32, height as f32);
        let aspect_ratio = w / h;
        let viewport_height = self.camera.viewport_height;
        let viewport_width = aspect_ratio * viewport_height;

        let upper_left = self.camera.origin
            + Vec3::new(
                -viewport_width / 2.0,
                viewport_height / 2.0,
                self.camera.focal_distance,
            );
        let horizontal = Vec3::new(viewport_width / w, 0.0, 0.0);
        let vertical = Vec3::new(0.0, -viewport_height / h, 0.0);

        Some(Uniforms {
            origin: self.camera.origin.to_array(),
            sphere_count: scene.len() as u32,
            upper_left: upper_left.to_array(),
            _pad0: 0.0,
            horizontal: horizontal.to_array(),
            _pad1: 0.0,
            vertical: vertical.to_array(),
            _pad2: 0.0,
        })
    }

    /// Uniforms for `frame_index`, advancing `state` to obtain the scene.
    #[must_use]
    pub fn build_for_frame(
        &self,
        state: &SceneState,
        frame_index: u32,
        width: u32,
        height: u32,
    ) -> Option<Uniforms> {
        self.build(&state.advance(frame_index), width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SceneOptions;

    const EPS: f32 = 1e-5;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < EPS
    }

    fn setup() -> (UniformBuilder, SceneState) {
        (
            UniformBuilder::default(),
            SceneState::new(&SceneOptions::default()),
        )
    }

    #[test]
    fn uniforms_layout_is_64_bytes() {
        assert_eq!(size_of::<Uniforms>(), 64);
        assert_eq!(std::mem::offset_of!(Uniforms, sphere_count), 12);
        assert_eq!(std::mem::offset_of!(Uniforms, upper_left), 16);
        assert_eq!(std::mem::offset_of!(Uniforms, horizontal), 32);
        assert_eq!(std::mem::offset_of!(Uniforms, vertical), 48);
    }

    #[test]
    fn test_800x600_frame_zero() {
        let (builder, state) = setup();
        let scene = state.advance(0);
        let u = builder.build(&scene, 800, 600).unwrap();

        let focal = builder.camera().focal_distance;
        assert!(close(Vec3::from_array(u.origin), Vec3::ZERO));
        assert!(close(
            Vec3::from_array(u.upper_left),
            Vec3::new(-4.0 / 3.0, 1.0, focal)
        ));
        assert!(close(
            Vec3::from_array(u.horizontal),
            Vec3::new(2.0 / 600.0, 0.0, 0.0)
        ));
        assert!(close(
            Vec3::from_array(u.vertical),
            Vec3::new(0.0, -2.0 / 600.0, 0.0)
        ));
        assert_eq!(u.sphere_count, 3);

        // Orbiter starts straight above the orbit center.
        let center = scene.orbiter.center();
        assert!(close(center, Vec3::new(0.0, 0.5, 3.0)));
    }

    #[test]
    fn sphere_count_matches_scene() {
        let (builder, state) = setup();
        for (frame, w, h) in [(0, 1, 1), (17, 1920, 1080), (9000, 3, 7)] {
            let scene = state.advance(frame);
            let u = builder.build(&scene, w, h).unwrap();
            assert_eq!(u.sphere_count as usize, scene.to_gpu().len());
        }
    }

    #[test]
    fn view_plane_matches_aspect() {
        let (builder, state) = setup();
        let scene = state.advance(0);
        for (w, h) in [(800, 600), (1, 1000), (2560, 1440), (7, 3)] {
            let u = builder.build(&scene, w, h).unwrap();
            let viewport_width = u.horizontal[0] * w as f32;
            let viewport_height = -u.vertical[1] * h as f32;
            let expected = w as f32 / h as f32;
            assert!(
                (viewport_width / viewport_height - expected).abs() < 1e-4 * expected,
                "{w}x{h}"
            );
        }
    }

    #[test]
    fn pixel_grid_spans_view_plane() {
        let (builder, state) = setup();
        let u = builder.build(&state.advance(0), 640, 480).unwrap();
        let focal = builder.camera().focal_distance;

        let bottom_right = u.pixel_position(640.0, 480.0);
        assert!(close(bottom_right, Vec3::new(4.0 / 3.0, -1.0, focal)));

        // Rows go down the image.
        assert!(u.pixel_position(0.0, 1.0).y < u.pixel_position(0.0, 0.0).y);
        let middle = u.pixel_position(320.0, 240.0);
        assert!(close(middle, Vec3::new(0.0, 0.0, focal)));
    }

    #[test]
    fn zero_extent_is_skipped() {
        let (builder, state) = setup();
        let scene = state.advance(0);
        assert!(builder.build(&scene, 800, 0).is_none());
        assert!(builder.build(&scene, 0, 600).is_none());
        assert!(builder.build(&scene, 0, 0).is_none());
    }

    #[test]
    fn build_is_deterministic() {
        let (builder, state) = setup();
        let a = builder.build_for_frame(&state, 42, 1024, 768).unwrap();
        let b = builder.build_for_frame(&state, 42, 1024, 768).unwrap();
        assert_eq!(bytemuck::bytes_of(&a), bytemuck::bytes_of(&b));
    }

    #[test]
    fn default_fov_is_ninety_degrees() {
        // viewport_height 2 at focal distance 1
        assert!((Camera::default().fovy_degrees() - 90.0).abs() < 1e-4);
    }
}
