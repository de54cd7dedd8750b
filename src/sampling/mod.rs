//! Stochastic sample pool.
//!
//! Two immutable GPU buffers of precomputed randomness the kernel re-indexes
//! at runtime: uniform scalars in `[0, 1)` and points uniformly distributed
//! inside the unit ball. Generated once at startup; resizing means building a
//! new pool.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::TraceError;
use crate::gpu::backend::{BufferUsage, GpuBackend};
use crate::options::SamplingOptions;

/// Draw a point uniformly inside the unit ball by rejection from the cube
/// `[-1, 1)^3`.
///
/// The acceptance rate is π/6 (about 52%), so `max_attempts` only matters
/// for a broken random source.
///
/// # Errors
///
/// [`TraceError::SampleExhausted`] if no candidate of length ≤ 1 is found
/// within `max_attempts` draws.
pub fn random_in_unit_sphere<R: Rng + ?Sized>(
    rng: &mut R,
    max_attempts: u32,
) -> Result<Vec3, TraceError> {
    for _ in 0..max_attempts {
        let candidate = Vec3::new(
            rng.random::<f32>(),
            rng.random::<f32>(),
            rng.random::<f32>(),
        ) * 2.0
            - Vec3::ONE;
        if candidate.length_squared() <= 1.0 {
            return Ok(candidate);
        }
    }
    Err(TraceError::SampleExhausted {
        attempts: max_attempts,
    })
}

/// CPU-side contents of the sample pool.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    /// Uniform scalars in `[0, 1)`.
    pub scalars: Vec<f32>,
    /// Unit-ball points, padded to `vec4` for storage-array stride.
    pub unit_sphere_points: Vec<[f32; 4]>,
}

impl SampleData {
    /// Generate `len` entries of each kind.
    ///
    /// # Errors
    ///
    /// [`TraceError::SampleExhausted`] if rejection sampling gives up.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        len: usize,
        max_attempts: u32,
    ) -> Result<Self, TraceError> {
        let scalars = (0..len).map(|_| rng.random::<f32>()).collect();
        let unit_sphere_points = (0..len)
            .map(|_| random_in_unit_sphere(rng, max_attempts).map(|p| p.extend(0.0).to_array()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            scalars,
            unit_sphere_points,
        })
    }

    /// Generate from the configured seed, or OS entropy when unseeded.
    ///
    /// # Errors
    ///
    /// [`TraceError::SampleExhausted`] if rejection sampling gives up.
    pub fn from_options(options: &SamplingOptions) -> Result<Self, TraceError> {
        let mut rng = options
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self::generate(
            &mut rng,
            options.pool_size as usize,
            options.max_rejection_attempts,
        )
    }

    /// Number of entries in each sequence.
    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    /// True if the pool holds no samples.
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }
}

/// The two sample buffers, resident on the GPU for the renderer's lifetime.
pub struct SamplePool<Buf> {
    random_scalars: Buf,
    unit_sphere_points: Buf,
    len: usize,
}

impl<Buf> SamplePool<Buf> {
    /// Generate the samples and upload both buffers.
    ///
    /// # Errors
    ///
    /// Propagates sampling failures and buffer allocation failures; either
    /// is fatal to renderer startup.
    pub fn initialize<B>(
        backend: &mut B,
        options: &SamplingOptions,
    ) -> Result<Self, TraceError>
    where
        B: GpuBackend<Buffer = Buf>,
    {
        let data = SampleData::from_options(options)?;
        Self::upload(backend, &data)
    }

    /// Upload already-generated samples.
    ///
    /// # Errors
    ///
    /// [`TraceError::BufferAllocation`] if either buffer cannot be created.
    pub fn upload<B>(backend: &mut B, data: &SampleData) -> Result<Self, TraceError>
    where
        B: GpuBackend<Buffer = Buf>,
    {
        let random_scalars = backend.allocate_buffer(
            "Random Scalars",
            BufferUsage::Storage,
            bytemuck::cast_slice(&data.scalars),
        )?;
        let unit_sphere_points = backend.allocate_buffer(
            "Random Unit Sphere Points",
            BufferUsage::Storage,
            bytemuck::cast_slice(&data.unit_sphere_points),
        )?;
        log::info!("sample pool ready: {} entries per buffer", data.len());
        Ok(Self {
            random_scalars,
            unit_sphere_points,
            len: data.len(),
        })
    }

    /// Buffer of uniform scalars.
    pub fn random_scalars(&self) -> &Buf {
        &self.random_scalars
    }

    /// Buffer of unit-ball points.
    pub fn unit_sphere_points(&self) -> &Buf {
        &self.unit_sphere_points
    }

    /// Entries per buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the pool holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore;

    use super::*;

    /// Always yields the maximum value, mapping every candidate to the
    /// (1, 1, 1) corner of the cube.
    struct CornerRng;

    impl RngCore for CornerRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0xFF);
        }
    }

    #[test]
    fn generates_exact_counts_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in [1, 7, 4096] {
            let data = SampleData::generate(&mut rng, len, 10_000).unwrap();
            assert_eq!(data.scalars.len(), len);
            assert_eq!(data.unit_sphere_points.len(), len);
            assert!(data.scalars.iter().all(|s| (0.0..1.0).contains(s)));
            for p in &data.unit_sphere_points {
                let v = Vec3::new(p[0], p[1], p[2]);
                assert!(v.length() <= 1.0 + 1e-6, "point outside ball: {v}");
                assert_eq!(p[3], 0.0);
            }
        }
    }

    #[test]
    fn points_fill_the_ball() {
        // Uniform in volume: about 1/8 of points lie within radius 0.5 and
        // every octant is populated.
        let mut rng = StdRng::seed_from_u64(3);
        let data = SampleData::generate(&mut rng, 8192, 10_000).unwrap();
        let inner = data
            .unit_sphere_points
            .iter()
            .filter(|p| Vec3::new(p[0], p[1], p[2]).length() < 0.5)
            .count() as f32
            / 8192.0;
        assert!((inner - 0.125).abs() < 0.03, "inner fraction {inner}");

        let mut octants = [0usize; 8];
        for p in &data.unit_sphere_points {
            let idx = usize::from(p[0] >= 0.0)
                | usize::from(p[1] >= 0.0) << 1
                | usize::from(p[2] >= 0.0) << 2;
            octants[idx] += 1;
        }
        assert!(octants.iter().all(|&n| n > 800), "{octants:?}");
    }

    #[test]
    fn same_seed_same_samples() {
        let opts = SamplingOptions {
            pool_size: 64,
            seed: Some(9),
            ..Default::default()
        };
        let a = SampleData::from_options(&opts).unwrap();
        let b = SampleData::from_options(&opts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_rng_exhausts_attempts() {
        let mut rng = CornerRng;
        let err = random_in_unit_sphere(&mut rng, 25).unwrap_err();
        assert!(matches!(err, TraceError::SampleExhausted { attempts: 25 }));
    }
}
