//! Benchmarks for per-frame CPU work and sample pool generation.
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use orbitrace::camera::UniformBuilder;
use orbitrace::options::SceneOptions;
use orbitrace::sampling::SampleData;
use orbitrace::scene::SceneState;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sample_pool_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_pool_generate");

    for len in [1024, 4096, 65536].iter() {
        let _ = group.bench_with_input(format!("{len}"), len, |b, &len| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| black_box(SampleData::generate(&mut rng, len, 10_000)))
        });
    }

    group.finish();
}

fn uniform_build_benchmark(c: &mut Criterion) {
    let state = SceneState::new(&SceneOptions::default());
    let builder = UniformBuilder::default();
    let mut frame = 0u32;

    let _ = c.bench_function("uniforms_for_frame", |b| {
        b.iter(|| {
            frame = frame.wrapping_add(1);
            black_box(builder.build_for_frame(&state, black_box(frame), 1920, 1080))
        })
    });
}

criterion_group!(benches, sample_pool_benchmark, uniform_build_benchmark);
criterion_main!(benches);
