use std::path::Path;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Mat4, Vec3};
use plain_core::bounds::AxisAlignedBoundingBox;
use plain_core::camera::{Camera, CameraExtrinsic};
use plain_core::frustum::ViewFrustum;
use plain_core::mesh::{generators, meshes_to_binary};
use plain_core::texture::{ImageDescription, ImageLoadError, ImageLoader};

use plain_graphics::compiler;
use plain_graphics::culling::{self, StaticMesh};
use plain_graphics::types::MeshHandle;
use plain_graphics::{
    DummyBackend, FrameBuilder, FrameParameters, FrameResources, PassBindings, Passes,
    RenderBackend, Renderer, RendererSettings, ShaderVariantTracker, ShadingConfig, TaaSettings,
};

struct NoImages;

impl ImageLoader for NoImages {
    fn load_image(&self, path: &Path) -> Result<ImageDescription, ImageLoadError> {
        Err(ImageLoadError::Decode {
            path: path.to_path_buf(),
            reason: "benchmarks load no files".into(),
        })
    }
}

fn grid_transforms(side: u32) -> Vec<Mat4> {
    (0..side * side)
        .map(|i| {
            let (x, z) = ((i % side) as f32, (i / side) as f32);
            Mat4::from_translation(Vec3::new(x * 3.0 - side as f32 * 1.5, 0.0, -z * 3.0))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Culling
// ---------------------------------------------------------------------------

fn bench_cull(c: &mut Criterion) {
    let unit = AxisAlignedBoundingBox::new(Vec3::splat(-0.5), Vec3::splat(0.5));
    let meshes: Vec<StaticMesh> = grid_transforms(64)
        .into_iter()
        .zip(0u32..)
        .map(|(model, i)| StaticMesh::new(MeshHandle::from_raw(i), model, &unit))
        .collect();
    let camera = Camera {
        extrinsic: CameraExtrinsic::look_at(Vec3::new(0.0, 10.0, 20.0), Vec3::new(0.0, 0.0, -50.0)),
        ..Camera::default()
    };
    let frustum = ViewFrustum::from_camera(&camera);
    let shadow = ViewFrustum::orthogonal_fitted_to(&frustum, Vec3::new(0.3, 1.0, 0.2).normalize());

    c.bench_function("cull_4096_meshes", |b| {
        b.iter(|| black_box(culling::cull(black_box(&meshes), &frustum)));
    });
    c.bench_function("shadow_cull_4096_meshes", |b| {
        b.iter(|| {
            let extruded = culling::shadow_cull_frustum(&shadow, Vec3::Y);
            black_box(culling::cull(black_box(&meshes), &extruded))
        });
    });
}

// ---------------------------------------------------------------------------
// Frame graph
// ---------------------------------------------------------------------------

fn bench_frame_graph(c: &mut Criterion) {
    let backend = DummyBackend::new();
    let settings = RendererSettings::default();
    let resources = FrameResources::create(&backend, &NoImages, &settings, 1920, 1080)
        .expect("resources");
    let shading = ShaderVariantTracker::new(
        ShadingConfig::default(),
        TaaSettings::default(),
        settings.specular_probe_mip_count(),
    );
    let passes =
        Passes::declare(&backend, &settings, &resources, &shading, 1920, 1080).expect("passes");
    let bindings = PassBindings::standard(settings.shadow_cascade_count);
    let builder = FrameBuilder::new(
        &passes,
        &resources,
        &bindings,
        &settings,
        backend.swapchain_input_image(),
    );

    let steady = FrameParameters::new(1920, 1080);
    let first = FrameParameters {
        run_ibl: true,
        run_brdf_lut: true,
        ..steady
    };

    c.bench_function("frame_graph_build_steady", |b| {
        b.iter(|| black_box(builder.build(black_box(&steady)).expect("build")));
    });

    let executions = builder.build(&first).expect("build");
    c.bench_function("frame_graph_compile_with_ibl", |b| {
        b.iter(|| black_box(compiler::compile(black_box(&executions)).expect("compile")));
    });
}

// ---------------------------------------------------------------------------
// Full frames
// ---------------------------------------------------------------------------

fn bench_full_frame(c: &mut Criterion) {
    let backend = Arc::new(DummyBackend::new());
    let mut renderer = Renderer::setup(
        backend,
        Arc::new(NoImages),
        RendererSettings::default(),
        1920,
        1080,
    )
    .expect("setup");

    let transforms = grid_transforms(32);
    let meshes = meshes_to_binary(&vec![generators::generate_box(Vec3::splat(0.5)); transforms.len()]);
    renderer.add_static_meshes(&meshes, &transforms).expect("meshes");

    let mut angle = 0.0f32;
    c.bench_function("full_frame_1024_meshes", |b| {
        b.iter(|| {
            angle += 0.01;
            let position = Vec3::new(angle.sin() * 30.0, 10.0, angle.cos() * 30.0);
            renderer.set_camera_extrinsic(CameraExtrinsic::look_at(position, Vec3::ZERO));
            renderer.prepare_new_frame().expect("prepare");
            renderer.render_static_meshes();
            renderer.render_frame().expect("render");
        });
    });
}

criterion_group!(benches, bench_cull, bench_frame_graph, bench_full_frame);
criterion_main!(benches);
