//! # Headless Frames Demo
//!
//! Sets up a renderer over the recording dummy backend, registers a grid of
//! boxes and renders a fixed number of frames while orbiting the camera.
//! Optionally bakes sky occlusion first and switches the diffuse BRDF
//! mid-run, then logs draw and memory statistics.
//!
//! ```text
//! cargo run -p plain-demos --bin headless_frames -- --frames 60 --bake --switch-brdf-at 30
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use glam::Vec3;
use plain_core::camera::CameraExtrinsic;
use plain_core::FileImageLoader;
use plain_demos::{box_grid, orbit_position};
use plain_graphics::{
    DebugSettings, DiffuseBrdf, DummyBackend, GraphicsError, RenderBackend, Renderer,
    RendererSettings, ShadingOption,
};

/// Plain headless frame demo arguments.
#[derive(Parser, Debug)]
#[command(
    name = "headless_frames",
    about = "Render frames of a box grid without a GPU",
    version
)]
struct Args {
    /// Screen width in pixels.
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Screen height in pixels.
    #[arg(long, default_value = "720")]
    height: u32,

    /// Number of frames to render.
    #[arg(long, default_value = "30")]
    frames: u64,

    /// Boxes per grid side.
    #[arg(long, default_value = "8")]
    grid: u32,

    /// Bake sky occlusion before the first frame.
    #[arg(long)]
    bake: bool,

    /// Sky occlusion samples, overriding the default of 1024.
    #[arg(long)]
    samples: Option<u32>,

    /// Switch the diffuse BRDF to Lambert at this frame.
    #[arg(long)]
    switch_brdf_at: Option<u64>,

    /// Equirectangular HDR environment map.
    #[arg(long)]
    environment_map: Option<PathBuf>,

    /// Draw bounding boxes and the shadow frustum.
    #[arg(long)]
    debug_geometry: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    plain_core::init();
    plain_graphics::init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        log::error!("Demo failed: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), GraphicsError> {
    let mut settings = RendererSettings::default();
    if let Some(path) = &args.environment_map {
        settings = settings.with_environment_map(path.clone());
    }
    if let Some(samples) = args.samples {
        settings = settings.with_sky_occlusion_sample_count(samples);
    }

    let backend = Arc::new(DummyBackend::new());
    let mut renderer = Renderer::setup(
        backend.clone(),
        Arc::new(FileImageLoader),
        settings,
        args.width,
        args.height,
    )?;

    let (meshes, transforms) = box_grid(args.grid);
    renderer.add_static_meshes(&meshes, &transforms)?;

    if args.debug_geometry {
        renderer.set_debug_settings(DebugSettings {
            draw_bounding_boxes: true,
            draw_shadow_frustum: true,
            ..DebugSettings::default()
        });
    }

    if args.bake {
        let report_every = (renderer.settings().sky_occlusion_sample_count / 4).max(1);
        let resolution = renderer.bake_sky_occlusion_with_progress(|done, total| {
            if done % report_every == 0 || done == total {
                log::info!("Sky occlusion sample {}/{}", done, total);
            }
        })?;
        if resolution.is_none() {
            log::warn!("Nothing to bake, grid is empty");
        }
    }

    let radius = args.grid as f32 * 3.0;
    for frame in 0..args.frames {
        if args.switch_brdf_at == Some(frame) {
            renderer.set_option(ShadingOption::DiffuseBrdf(DiffuseBrdf::Lambert));
            log::info!("Frame {}: diffuse BRDF switched to Lambert", frame);
        }

        renderer.set_camera_extrinsic(CameraExtrinsic::look_at(
            orbit_position(frame, radius),
            Vec3::ZERO,
        ));
        renderer.prepare_new_frame()?;
        renderer.render_static_meshes();
        renderer.render_frame()?;

        let stats = renderer.stats();
        log::debug!(
            "Frame {}: {} meshes, {} main pass draws, {} shadow draws",
            frame,
            stats.mesh_count,
            stats.main_pass_drawcalls,
            stats.shadow_map_drawcalls
        );
    }

    let stats = renderer.stats();
    let memory = renderer.memory_stats();
    log::info!(
        "Rendered {} frames on {}: last frame drew {}/{} meshes, {} shadow casters, {:.1} MB in use",
        backend.frames_rendered(),
        backend.name(),
        stats.main_pass_drawcalls,
        stats.mesh_count,
        stats.shadow_map_drawcalls,
        memory.used_megabytes()
    );
    if let Some(frame) = backend.last_frame() {
        log::info!(
            "Last frame graph: {} passes, presented: {}",
            frame.compiled.pass_count(),
            frame.presented
        );
    }

    renderer.shutdown();
    Ok(())
}
