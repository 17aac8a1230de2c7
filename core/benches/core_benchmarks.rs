use criterion::{Criterion, black_box, criterion_group, criterion_main};

use plain_core::frustum::{ViewFrustum, view_projection_around_bb};
use plain_core::math::{Vec3, hammersley_2d, uniform_hemisphere_direction};
use plain_core::mesh::generators::generate_box;
use plain_core::mesh::meshes_to_binary;
use plain_core::{AxisAlignedBoundingBox, Camera, CameraExtrinsic};

// ---------------------------------------------------------------------------
// Frustum tests
// ---------------------------------------------------------------------------

fn camera_frustum() -> ViewFrustum {
    let camera = Camera {
        extrinsic: CameraExtrinsic::look_at(Vec3::new(0.0, 5.0, 20.0), Vec3::ZERO),
        ..Default::default()
    };
    ViewFrustum::from_camera(&camera)
}

fn bench_frustum_from_camera(c: &mut Criterion) {
    let camera = Camera::default();
    c.bench_function("frustum_from_camera", |b| {
        b.iter(|| ViewFrustum::from_camera(black_box(&camera)));
    });
}

fn bench_frustum_intersects_aabb(c: &mut Criterion) {
    let frustum = camera_frustum();
    let boxes: Vec<_> = (0..1000)
        .map(|i| {
            let center = Vec3::new((i % 32) as f32 * 3.0 - 48.0, 0.0, (i / 32) as f32 * -3.0);
            AxisAlignedBoundingBox::new(center - Vec3::ONE, center + Vec3::ONE)
        })
        .collect();
    c.bench_function("frustum_intersects_aabb_1000", |b| {
        b.iter(|| {
            boxes
                .iter()
                .filter(|bb| frustum.intersects_aabb(black_box(bb)))
                .count()
        });
    });
}

fn bench_orthogonal_fit(c: &mut Criterion) {
    let frustum = camera_frustum();
    let sun = Vec3::new(0.3, 1.0, 0.2).normalize();
    c.bench_function("frustum_orthogonal_fitted", |b| {
        b.iter(|| ViewFrustum::orthogonal_fitted_to(black_box(&frustum), black_box(sun)));
    });
}

fn bench_view_projection_around_bb(c: &mut Criterion) {
    let bb = AxisAlignedBoundingBox::new(Vec3::splat(-50.0), Vec3::splat(50.0));
    c.bench_function("view_projection_around_bb", |b| {
        b.iter(|| view_projection_around_bb(black_box(&bb), black_box(Vec3::Y)));
    });
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

fn bench_hemisphere_samples(c: &mut Criterion) {
    c.bench_function("hemisphere_samples_1024", |b| {
        b.iter(|| {
            (0..1024)
                .map(|i| uniform_hemisphere_direction(hammersley_2d(i, 1024)))
                .fold(Vec3::ZERO, |acc, d| acc + d)
        });
    });
}

// ---------------------------------------------------------------------------
// Mesh conversion
// ---------------------------------------------------------------------------

fn bench_meshes_to_binary(c: &mut Criterion) {
    let meshes: Vec<_> = (0..64).map(|_| generate_box(Vec3::ONE)).collect();
    c.bench_function("meshes_to_binary_64_boxes", |b| {
        b.iter(|| meshes_to_binary(black_box(&meshes)));
    });
}

criterion_group!(
    benches,
    bench_frustum_from_camera,
    bench_frustum_intersects_aabb,
    bench_orthogonal_fit,
    bench_view_projection_around_bb,
    bench_hemisphere_samples,
    bench_meshes_to_binary,
);
criterion_main!(benches);
