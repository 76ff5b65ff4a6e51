use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;
use strum::IntoEnumIterator;
use tt_config::{ImageRef, QualityTier, TreeConfig};
use tt_geometry::{generate_with_rng, mount_photos, photo_slots, TreeDimensions};
use tt_scene::TreeScene;

fn generate_particles(c: &mut Criterion) {
    for quality in QualityTier::iter() {
        let count = quality.particle_count();
        c.bench_function(&format!("generate {count} particles ({quality})"), |b| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| {
                black_box(generate_with_rng(
                    black_box(count),
                    TreeDimensions::DEFAULT,
                    &mut rng,
                ))
            });
        });
    }
}

fn mount_all_photos(c: &mut Criterion) {
    let slots = photo_slots(TreeDimensions::DEFAULT);
    let images: Vec<ImageRef> = (0..slots.len())
        .map(|i| ImageRef::new(format!("photo-{i}.jpg")))
        .collect();

    c.bench_function("mount photos", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| black_box(mount_photos(black_box(&images), &slots, &mut rng)));
    });
}

fn apply_quality_change(c: &mut Criterion) {
    let config = TreeConfig::default();

    c.bench_function("apply quality change", |b| {
        b.iter_batched(
            || {
                let scene = TreeScene::with_rng(config.clone(), StdRng::seed_from_u64(0));
                let edited = config.with_quality(config.quality().toggled());
                (scene, edited)
            },
            |(mut scene, edited)| black_box(scene.apply(&edited)),
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    generate_particles,
    mount_all_photos,
    apply_quality_change
);
criterion_main!(benches);
