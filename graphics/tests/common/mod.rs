//! Common utilities for renderer integration tests.
//!
//! Every test drives a real [`Renderer`] on top of the recording
//! [`DummyBackend`] and inspects what the backend was asked to do.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Mat4, Vec3};
use parking_lot::Mutex;
use plain_core::mesh::{generators, meshes_to_binary, MaterialTexturePaths, MeshBinary};
use plain_core::texture::{ImageDescription, ImageFormat, ImageLoadError, ImageLoader, ImageUsageFlags};

use plain_graphics::backend::dummy::RecordedFrame;
use plain_graphics::{DummyBackend, Renderer, RendererSettings};

/// Route `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Image loading
// ============================================================================

/// Loader that only knows the files in `available` and records every request.
#[derive(Debug, Default)]
pub struct FakeImageLoader {
    available: Vec<PathBuf>,
    requests: Mutex<Vec<PathBuf>>,
}

impl FakeImageLoader {
    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            available: files.into_iter().map(Into::into).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of load requests for `path`.
    pub fn request_count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|p| p.as_path() == Path::new(path))
            .count()
    }
}

impl ImageLoader for FakeImageLoader {
    fn load_image(&self, path: &Path) -> Result<ImageDescription, ImageLoadError> {
        self.requests.lock().push(path.to_path_buf());
        if self.available.iter().any(|p| p == path) {
            Ok(ImageDescription::new_2d(
                4,
                4,
                ImageFormat::RGBA8,
                ImageUsageFlags::SAMPLED,
            ))
        } else {
            Err(ImageLoadError::Decode {
                path: path.to_path_buf(),
                reason: "file not found".into(),
            })
        }
    }
}

// ============================================================================
// Meshes
// ============================================================================

/// A unit cube around the origin without textures.
pub fn unit_box() -> MeshBinary {
    textured_box(MaterialTexturePaths::default())
}

/// A unit cube around the origin using `textures`.
pub fn textured_box(textures: MaterialTexturePaths) -> MeshBinary {
    let mut mesh = generators::generate_box(Vec3::splat(0.5));
    mesh.texture_paths = textures;
    meshes_to_binary(&[mesh]).remove(0)
}

pub fn at(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

// ============================================================================
// Test Context
// ============================================================================

/// A renderer over a recording backend.
pub struct TestContext {
    pub backend: Arc<DummyBackend>,
    pub loader: Arc<FakeImageLoader>,
    pub renderer: Renderer,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(RendererSettings::default(), 1920, 1080)
    }

    pub fn with_settings(settings: RendererSettings, width: u32, height: u32) -> Self {
        Self::with_loader(settings, FakeImageLoader::default(), width, height)
    }

    pub fn with_loader(
        settings: RendererSettings,
        loader: FakeImageLoader,
        width: u32,
        height: u32,
    ) -> Self {
        init_logging();
        let backend = Arc::new(DummyBackend::new());
        let loader = Arc::new(loader);
        let renderer = Renderer::setup(backend.clone(), loader.clone(), settings, width, height)
            .expect("renderer setup");
        Self {
            backend,
            loader,
            renderer,
        }
    }

    /// Run one complete frame and return what the backend executed.
    pub fn frame(&mut self) -> RecordedFrame {
        self.renderer.prepare_new_frame().expect("prepare frame");
        self.renderer.render_static_meshes();
        self.renderer.render_frame().expect("render frame");
        self.backend.last_frame().expect("a rendered frame")
    }
}
