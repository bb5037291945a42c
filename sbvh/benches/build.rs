use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{vec3, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sbvh::{BoundingBox, BoxBvh, BuildOptions, Bvh, BvhStack, Ray, Triangle};

fn random_point(rng: &mut StdRng, range: f32) -> Vec3 {
    vec3(
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
    )
}

fn random_triangles(rng: &mut StdRng, count: usize) -> Vec<Triangle> {
    (0..count)
        .map(|_| {
            let center = random_point(rng, 500.0);

            Triangle::new(
                center + random_point(rng, 5.0),
                center + random_point(rng, 5.0),
                center + random_point(rng, 5.0),
            )
        })
        .collect()
}

fn random_rays(rng: &mut StdRng, count: usize) -> Vec<Ray> {
    (0..count)
        .map(|_| {
            let origin = random_point(rng, 800.0);
            let target = random_point(rng, 400.0);

            Ray::new(origin, (target - origin).normalize())
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let triangles = random_triangles(&mut rng, 50_000);
    let rays = random_rays(&mut rng, 10_000);

    c.bench_function("sbvh build", |b| {
        b.iter(|| {
            Bvh::from_triangles(black_box(&triangles), &BuildOptions::default())
        })
    });

    c.bench_function("sah build (no spatial splits)", |b| {
        let options = BuildOptions::default().with_spatial_splits(false);

        b.iter(|| Bvh::from_triangles(black_box(&triangles), &options))
    });

    c.bench_function("sbvh build (sequential)", |b| {
        let options = BuildOptions::default().with_parallel(false);

        b.iter(|| Bvh::from_triangles(black_box(&triangles), &options))
    });

    let boxes: Vec<BoundingBox> =
        triangles.iter().map(|t| t.bounds()).collect();

    c.bench_function("box bvh build", |b| {
        b.iter(|| BoxBvh::build(black_box(&boxes), &BuildOptions::for_boxes()))
    });

    // ---

    let Ok(bvh) = Bvh::from_triangles(&triangles, &BuildOptions::default())
    else {
        panic!("couldn't build bvh");
    };

    c.bench_function("closest hit", |b| {
        let mut stack = BvhStack::new();

        b.iter(|| {
            for ray in &rays {
                black_box(bvh.closest_hit_with(ray, f32::INFINITY, &mut stack));
            }
        })
    });

    c.bench_function("any hit", |b| {
        let mut stack = BvhStack::new();

        b.iter(|| {
            for ray in &rays {
                black_box(bvh.any_hit_with(ray, f32::INFINITY, &mut stack));
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
