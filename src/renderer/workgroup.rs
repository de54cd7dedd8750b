//! Compute workgroup sizing.
//!
//! The kernel reports two scheduling hints at load time; the group shape is
//! derived from them once and reused every frame. Grids are expressed in
//! threads, and group counts round up so the edges of the image are covered.
//! The kernel bounds-checks the partial groups.

/// GPU-reported scheduling hints for a compute kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelHints {
    /// Execution width: threads the hardware runs in lockstep.
    pub preferred_thread_width: u32,
    /// Upper bound on invocations in one workgroup.
    pub max_threads_per_group: u32,
}

/// Threads per workgroup along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkgroupSize {
    /// Threads along X.
    pub width: u32,
    /// Threads along Y.
    pub height: u32,
    /// Threads along Z (always 1 for image kernels).
    pub depth: u32,
}

impl WorkgroupSize {
    /// `preferred_thread_width` wide and as tall as the thread budget allows.
    ///
    /// A zero hint is treated as 1, and the width never exceeds the budget,
    /// so the result always has at least one thread per axis.
    #[must_use]
    pub fn from_hints(hints: KernelHints) -> Self {
        let max_threads = hints.max_threads_per_group.max(1);
        let width = hints.preferred_thread_width.clamp(1, max_threads);
        Self {
            width,
            height: (max_threads / width).max(1),
            depth: 1,
        }
    }

    /// Shrink each axis to the device's per-axis limits.
    #[must_use]
    pub fn clamped(self, max_width: u32, max_height: u32) -> Self {
        Self {
            width: self.width.clamp(1, max_width.max(1)),
            height: self.height.clamp(1, max_height.max(1)),
            depth: 1,
        }
    }

    /// Invocations per group.
    #[must_use]
    pub fn threads(&self) -> u32 {
        self.width * self.height * self.depth
    }
}

/// Total threads to launch, one per output pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    /// Threads along X (image width).
    pub width: u32,
    /// Threads along Y (image height).
    pub height: u32,
    /// Threads along Z.
    pub depth: u32,
}

impl GridSize {
    /// Grid covering a `width` x `height` image.
    #[must_use]
    pub fn for_image(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth: 1,
        }
    }

    /// Workgroups needed to cover the grid, rounding up on every axis.
    #[must_use]
    pub fn group_count(&self, group: WorkgroupSize) -> (u32, u32, u32) {
        (
            self.width.div_ceil(group.width.max(1)),
            self.height.div_ceil(group.height.max(1)),
            self.depth.div_ceil(group.depth.max(1)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints(width: u32, max: u32) -> KernelHints {
        KernelHints {
            preferred_thread_width: width,
            max_threads_per_group: max,
        }
    }

    #[test]
    fn typical_gpu_hints() {
        let group = WorkgroupSize::from_hints(hints(32, 1024));
        assert_eq!((group.width, group.height, group.depth), (32, 32, 1));

        let group = WorkgroupSize::from_hints(hints(64, 256));
        assert_eq!((group.width, group.height, group.depth), (64, 4, 1));
    }

    #[test]
    fn height_uses_integer_division() {
        let group = WorkgroupSize::from_hints(hints(24, 256));
        assert_eq!((group.width, group.height), (24, 10));
        assert!(group.threads() <= 256);
    }

    #[test]
    fn degenerate_hints_still_produce_a_group() {
        assert_eq!(WorkgroupSize::from_hints(hints(0, 256)).width, 1);
        assert_eq!(WorkgroupSize::from_hints(hints(32, 0)).threads(), 1);
        let group = WorkgroupSize::from_hints(hints(512, 256));
        assert_eq!((group.width, group.height), (256, 1));
    }

    #[test]
    fn clamped_respects_axis_limits() {
        let group = WorkgroupSize::from_hints(hints(1, 1024)).clamped(256, 256);
        assert_eq!((group.width, group.height), (1, 256));
    }

    #[test]
    fn group_count_rounds_up() {
        let group = WorkgroupSize::from_hints(hints(32, 256));
        let grid = GridSize::for_image(800, 600);
        assert_eq!(grid.group_count(group), (25, 75, 1));

        let grid = GridSize::for_image(801, 601);
        assert_eq!(grid.group_count(group), (26, 76, 1));

        let grid = GridSize::for_image(1, 1);
        assert_eq!(grid.group_count(group), (1, 1, 1));
    }

    #[test]
    fn groups_cover_every_pixel() {
        let group = WorkgroupSize::from_hints(hints(32, 1024));
        for (w, h) in [(1, 1), (31, 33), (1920, 1080), (1023, 7)] {
            let (gx, gy, _) = GridSize::for_image(w, h).group_count(group);
            assert!(gx * group.width >= w && (gx - 1) * group.width < w);
            assert!(gy * group.height >= h && (gy - 1) * group.height < h);
        }
    }
}
