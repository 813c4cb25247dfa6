//! Starfield dispersion update, the per-frame hot loop of the GPU style

use backdrop::renderers::point_sprite::{DispersionField, ParticleField};
use backdrop::PointSpriteConfig;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;

fn bench_dispersion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispersion");
    for count in [2_000usize, 8_000, 32_000] {
        let config = PointSpriteConfig {
            particle_count: count,
            ..Default::default()
        };
        let mut field = ParticleField::generate(&config, Some(1));
        let mut dispersion = DispersionField::from_config(&config);
        dispersion.set_center(Vec3::new(0.3, -0.2, 0.0));
        let mut sprites = Vec::with_capacity(count);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            let mut elapsed = 0.0f32;
            b.iter(|| {
                elapsed += 0.016;
                field.apply(black_box(&dispersion), elapsed);
                field.write_sprites(&mut sprites);
                black_box(sprites.len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispersion);
criterion_main!(benches);
