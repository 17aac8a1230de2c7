//! Frame driver.
//!
//! [`Renderer`] owns all orchestration state and sequences every frame:
//!
//! ```text
//! set_resolution ─┐
//! set_camera_extrinsic ─┤ (any time, also while minimized)
//! add_static_meshes ────┘
//!
//! prepare_new_frame ──► resize ─► reconcile shaders ─► new_frame ─► frame graph
//! render_static_meshes ──► cull ─► draws (forward, prepass, cascades, debug)
//! render_frame ──► sky draw ─► backend.render_frame(present)
//! ```
//!
//! While the window is minimized the per-frame calls return without touching
//! the backend. The first frame after setup also runs the IBL precompute
//! chain.

use std::sync::Arc;
use std::time::Instant;

use glam::{Mat4, UVec3, Vec2, Vec3};
use plain_core::bounds::AxisAlignedBoundingBox;
use plain_core::camera::{Camera, CameraExtrinsic, CameraIntrinsic};
use plain_core::frustum::{view_projection_around_bb, ViewFrustum};
use plain_core::math::{
    direction_to_vector, hammersley_2d, next_power_of_two_f32, uniform_hemisphere_direction,
};
use plain_core::mesh::MeshBinary;
use plain_core::texture::ImageLoader;

use crate::backend::{MeshMaterial, RenderBackend};
use crate::bindings::PassBindings;
use crate::catalog::{sky_occlusion_volume_description, FrameResources, Passes, TextureCache};
use crate::culling::{self, StaticMesh};
use crate::dispatch;
use crate::error::GraphicsError;
use crate::frame::{FrameBuilder, FrameParameters};
use crate::resize::{ResizeEvent, ResolutionState};
use crate::settings::{DebugSettings, LightingSettings, RendererSettings};
use crate::shading::{
    depth_pyramid_shader_description, ShaderVariantTracker, ShadingConfig, ShadingOption,
    TaaSettings,
};
use crate::types::{DrawcallStats, DynamicMeshHandle, MemoryStats, RenderPassTime};
use crate::uniforms::{DrawTransform, GlobalShaderInfo, SkyOcclusionRenderData};

/// Length of the TAA jitter sequence.
const JITTER_SAMPLE_COUNT: u32 = 16;

/// Seconds between two render pass timing queries.
const TIMING_REFRESH_INTERVAL: f32 = 0.2;

/// Padding around the scene box of the sky occlusion volume.
const SKY_OCCLUSION_SCENE_PADDING: f32 = 1.0;

/// Render pass timings, queried from the backend at a fixed interval.
#[derive(Debug, Default)]
struct TimingCache {
    since_refresh: f32,
    timings: Vec<RenderPassTime>,
}

impl TimingCache {
    fn advance(&mut self, delta_time: f32, backend: &dyn RenderBackend) {
        self.since_refresh += delta_time;
        if self.since_refresh > TIMING_REFRESH_INTERVAL {
            self.timings = backend.render_pass_timings();
            self.since_refresh = 0.0;
        }
    }
}

/// Work submitted with the current frame that must be confirmed once it ran.
///
/// Each entry holds the request or configuration version the frame carries.
#[derive(Debug, Clone, Copy, Default)]
struct InFlight {
    ibl: Option<u64>,
    brdf_lut: Option<u64>,
}

/// Camera matrices of the current and the previous frame.
#[derive(Debug, Clone, Copy)]
struct CameraState {
    camera: Camera,
    view_projection: Mat4,
    previous_view_projection: Mat4,
    jitter: Vec2,
    previous_jitter: Vec2,
    jitter_index: u32,
    frustum: ViewFrustum,
    shadow_frustum: ViewFrustum,
}

/// Orchestrates passes, resources and draws on top of a [`RenderBackend`].
pub struct Renderer {
    backend: Arc<dyn RenderBackend>,
    loader: Arc<dyn ImageLoader>,
    settings: RendererSettings,
    bindings: PassBindings,
    resources: FrameResources,
    passes: Passes,
    shading: ShaderVariantTracker,

    resolution: ResolutionState,
    lighting: LightingSettings,
    debug: DebugSettings,
    view: CameraState,

    static_meshes: Vec<StaticMesh>,
    /// One world space box wireframe per static mesh.
    bounding_box_meshes: Vec<DynamicMeshHandle>,
    textures: TextureCache,

    stats: DrawcallStats,
    timings: TimingCache,
    last_frame_start: Option<Instant>,
    delta_time: f32,

    /// IBL runs while `ibl_requests` is ahead of `ibl_completed`.
    ibl_requests: u64,
    ibl_completed: u64,
    in_flight: InFlight,
    /// Set between `prepare_new_frame` and `render_frame`.
    frame_open: bool,
    shut_down: bool,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("backend", &self.backend.name())
            .field("resolution", &self.resolution)
            .field("static_meshes", &self.static_meshes.len())
            .field("shut_down", &self.shut_down)
            .finish()
    }
}

impl Renderer {
    /// Create every resource and pass.
    ///
    /// Backend failures here are fatal and returned as is.
    pub fn setup(
        backend: Arc<dyn RenderBackend>,
        loader: Arc<dyn ImageLoader>,
        settings: RendererSettings,
        width: u32,
        height: u32,
    ) -> Result<Self, GraphicsError> {
        if width == 0 || height == 0 {
            return Err(GraphicsError::InvalidParameter(format!(
                "initial resolution must be non-zero, got {}x{}",
                width, height
            )));
        }

        let bindings = PassBindings::standard(settings.shadow_cascade_count);
        bindings.validate()?;

        let resources = FrameResources::create(&*backend, &*loader, &settings, width, height)?;
        let shading = ShaderVariantTracker::new(
            ShadingConfig::default(),
            TaaSettings::default(),
            settings.specular_probe_mip_count(),
        );
        let passes = Passes::declare(&*backend, &settings, &resources, &shading, width, height)?;
        warn_if_histogram_too_small(&settings, width, height);

        let camera = Camera {
            extrinsic: CameraExtrinsic::default(),
            intrinsic: CameraIntrinsic {
                aspect_ratio: width as f32 / height as f32,
                ..CameraIntrinsic::default()
            },
        };
        let frustum = ViewFrustum::from_camera(&camera);

        let mut renderer = Self {
            backend,
            loader,
            settings,
            bindings,
            resources,
            passes,
            shading,
            resolution: ResolutionState::new(width, height),
            lighting: LightingSettings::default(),
            debug: DebugSettings::default(),
            view: CameraState {
                camera,
                view_projection: camera.view_projection(),
                previous_view_projection: camera.view_projection(),
                jitter: Vec2::ZERO,
                previous_jitter: Vec2::ZERO,
                jitter_index: 0,
                frustum,
                shadow_frustum: frustum,
            },
            static_meshes: Vec::new(),
            bounding_box_meshes: Vec::new(),
            textures: TextureCache::new(),
            stats: DrawcallStats::default(),
            timings: TimingCache::default(),
            last_frame_start: None,
            delta_time: 0.0,
            ibl_requests: 1,
            ibl_completed: 0,
            in_flight: InFlight::default(),
            frame_open: false,
            shut_down: false,
        };
        renderer.set_camera_extrinsic(CameraExtrinsic::default());

        log::info!(
            "Renderer set up on {} backend at {}x{} with {} passes",
            renderer.backend.name(),
            width,
            height,
            renderer.passes.count()
        );
        Ok(renderer)
    }

    fn ensure_running(&self) -> Result<(), GraphicsError> {
        if self.shut_down {
            return Err(GraphicsError::InvalidState(
                "renderer has been shut down".into(),
            ));
        }
        Ok(())
    }

    fn sun_direction(&self) -> Vec3 {
        direction_to_vector(self.lighting.sun_direction)
    }

    // ===== Window and camera =====

    /// Record a new window size. Resources follow on the next frame.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution.set(width, height);
        if !self.resolution.is_minimized() {
            self.view.camera.intrinsic.aspect_ratio = self.resolution.aspect_ratio();
        }
    }

    pub fn is_minimized(&self) -> bool {
        self.resolution.is_minimized()
    }

    /// Move the camera.
    ///
    /// Advances the TAA jitter sequence and refits both frustums unless the
    /// camera frustum is frozen for debugging.
    pub fn set_camera_extrinsic(&mut self, extrinsic: CameraExtrinsic) {
        if self.shut_down {
            return;
        }
        let view = &mut self.view;
        view.previous_view_projection = view.view_projection;
        view.previous_jitter = view.jitter;
        view.camera.extrinsic = extrinsic;

        let (width, height) = self.resolution.size();
        let sample = hammersley_2d(view.jitter_index % JITTER_SAMPLE_COUNT, JITTER_SAMPLE_COUNT);
        view.jitter_index = view.jitter_index.wrapping_add(1);
        view.jitter = (sample - Vec2::splat(0.5))
            / Vec2::new(width.max(1) as f32, height.max(1) as f32);

        let mut projection = view.camera.projection_matrix();
        projection.z_axis.x = view.jitter.x;
        projection.z_axis.y = view.jitter.y;
        view.view_projection = projection * view.camera.view_matrix();

        if !self.debug.freeze_and_draw_camera_frustum {
            view.frustum = ViewFrustum::from_camera(&view.camera);
            self.backend.update_dynamic_meshes(
                &[self.resources.meshes.camera_frustum],
                &[view.frustum.to_line_mesh()],
            );
        }
        self.refit_shadow_frustum();
    }

    fn refit_shadow_frustum(&mut self) {
        self.view.shadow_frustum =
            ViewFrustum::orthogonal_fitted_to(&self.view.frustum, self.sun_direction());
        self.backend.update_dynamic_meshes(
            &[self.resources.meshes.shadow_frustum],
            &[self.view.shadow_frustum.to_line_mesh()],
        );
    }

    pub fn camera(&self) -> &Camera {
        &self.view.camera
    }

    /// Frustum used for camera culling.
    pub fn camera_frustum(&self) -> &ViewFrustum {
        &self.view.frustum
    }

    pub fn shadow_frustum(&self) -> &ViewFrustum {
        &self.view.shadow_frustum
    }

    /// Jittered view projection of the current frame.
    pub fn view_projection(&self) -> Mat4 {
        self.view.view_projection
    }

    // ===== Configuration =====

    /// Change one shading or TAA option. Returns whether anything changed.
    pub fn set_option(&mut self, option: ShadingOption) -> bool {
        self.shading.set_option(option)
    }

    pub fn shader_variants(&self) -> &ShaderVariantTracker {
        &self.shading
    }

    /// Run the IBL precompute chain again on the next frame.
    pub fn request_ibl_refresh(&mut self) {
        self.ibl_requests += 1;
    }

    pub fn set_lighting(&mut self, lighting: LightingSettings) {
        let sun_moved = lighting.sun_direction != self.lighting.sun_direction;
        self.lighting = lighting;
        if sun_moved && !self.shut_down {
            self.refit_shadow_frustum();
        }
    }

    pub fn lighting(&self) -> &LightingSettings {
        &self.lighting
    }

    pub fn set_debug_settings(&mut self, debug: DebugSettings) {
        self.debug = debug;
    }

    pub fn debug_settings(&self) -> &DebugSettings {
        &self.debug
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn passes(&self) -> &Passes {
        &self.passes
    }

    pub fn resources(&self) -> &FrameResources {
        &self.resources
    }

    // ===== Meshes =====

    /// Upload static meshes placed by `transforms`.
    ///
    /// Missing textures fall back to the placeholders. If the counts differ
    /// only the shorter list is used.
    pub fn add_static_meshes(
        &mut self,
        meshes: &[MeshBinary],
        transforms: &[Mat4],
    ) -> Result<(), GraphicsError> {
        self.ensure_running()?;
        if meshes.len() != transforms.len() {
            log::error!(
                "add_static_meshes: {} meshes but {} transforms",
                meshes.len(),
                transforms.len()
            );
        }

        let defaults = self.resources.defaults;
        let backend = &*self.backend;
        let loader = &*self.loader;
        let materials: Vec<MeshMaterial> = meshes
            .iter()
            .map(|mesh| {
                let paths = &mesh.texture_paths;
                MeshMaterial {
                    albedo: self
                        .textures
                        .get_or_load(backend, loader, &paths.albedo, defaults.diffuse),
                    normal: self
                        .textures
                        .get_or_load(backend, loader, &paths.normal, defaults.normal),
                    specular: self
                        .textures
                        .get_or_load(backend, loader, &paths.specular, defaults.specular),
                }
            })
            .collect();

        let handles = backend.create_meshes(meshes, &materials)?;

        let added: Vec<StaticMesh> = handles
            .iter()
            .zip(transforms)
            .zip(meshes)
            .map(|((&handle, &model), mesh)| StaticMesh::new(handle, model, &mesh.bounding_box))
            .collect();

        let wireframes: Vec<_> = added
            .iter()
            .map(|mesh| mesh.bounding_box_world_space.to_line_mesh())
            .collect();
        let box_meshes = backend.create_dynamic_meshes(&wireframes)?;

        log::debug!("Added {} static meshes", added.len());
        self.static_meshes.extend(added);
        self.bounding_box_meshes.extend(box_meshes);
        Ok(())
    }

    pub fn static_meshes(&self) -> &[StaticMesh] {
        &self.static_meshes
    }

    /// Number of distinct material textures loaded so far.
    pub fn loaded_texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Cull and draw every static mesh into the current frame.
    pub fn render_static_meshes(&mut self) {
        if self.shut_down || self.resolution.is_minimized() {
            return;
        }
        let backend = &*self.backend;
        let passes = &self.passes;
        let view = &self.view;
        self.stats.mesh_count += self.static_meshes.len() as u32;

        let visible = culling::visible_indices(&self.static_meshes, &view.frustum);
        if !visible.is_empty() {
            let mut handles = Vec::with_capacity(visible.len());
            let mut main_transforms = Vec::with_capacity(visible.len());
            let mut prepass_transforms = Vec::with_capacity(visible.len());
            for &i in &visible {
                let mesh = &self.static_meshes[i];
                let mvp = view.view_projection * mesh.model_matrix;
                handles.push(mesh.backend_handle);
                main_transforms.push(DrawTransform::new(mvp, mesh.model_matrix));
                prepass_transforms.push(DrawTransform::new(
                    mvp,
                    view.previous_view_projection * mesh.model_matrix,
                ));
            }
            backend.draw_meshes(passes.forward, &handles, &main_transforms);
            backend.draw_meshes(passes.depth_prepass, &handles, &prepass_transforms);
            self.stats.main_pass_drawcalls += visible.len() as u32;

            if self.debug.draw_bounding_boxes {
                let boxes: Vec<DynamicMeshHandle> = visible
                    .iter()
                    .filter_map(|&i| self.bounding_box_meshes.get(i).copied())
                    .collect();
                let transforms =
                    vec![DrawTransform::new(view.view_projection, Mat4::IDENTITY); boxes.len()];
                backend.draw_dynamic_meshes(passes.debug, &boxes, &transforms);
            }
        }

        let shadow_frustum = culling::shadow_cull_frustum(&view.shadow_frustum, self.sun_direction());
        let casters = culling::visible_indices(&self.static_meshes, &shadow_frustum);
        if !casters.is_empty() {
            let handles: Vec<_> = casters
                .iter()
                .map(|&i| self.static_meshes[i].backend_handle)
                .collect();
            let transforms: Vec<_> = casters
                .iter()
                .map(|&i| DrawTransform::new(Mat4::IDENTITY, self.static_meshes[i].model_matrix))
                .collect();
            for &cascade in &passes.shadow_cascades {
                backend.draw_meshes(cascade, &handles, &transforms);
            }
            self.stats.shadow_map_drawcalls += casters.len() as u32;
        }
    }

    // ===== Frame =====

    /// Start a frame: apply pending resizes, update pipelines and submit the
    /// frame graph.
    pub fn prepare_new_frame(&mut self) -> Result<(), GraphicsError> {
        self.ensure_running()?;
        if self.resolution.is_minimized() {
            return Ok(());
        }

        if let Some(resize) = self.resolution.take_pending() {
            self.apply_resize(resize);
        }
        let (width, height) = self.resolution.size();

        let now = Instant::now();
        self.delta_time = self
            .last_frame_start
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_frame_start = Some(now);
        self.timings.advance(self.delta_time, &*self.backend);

        self.stats = DrawcallStats::default();

        let reconciled = self.shading.reconcile(&*self.backend, &self.passes);
        self.backend.update_shader_code();
        self.backend.new_frame();

        let run_ibl = self.ibl_requests != self.ibl_completed;
        let frame = FrameParameters {
            width,
            height,
            run_ibl,
            run_brdf_lut: run_ibl || self.shading.is_brdf_lut_stale(),
            draw_debug_geometry: self.debug.any(),
        };
        let executions = FrameBuilder::new(
            &self.passes,
            &self.resources,
            &self.bindings,
            &self.settings,
            self.backend.swapchain_input_image(),
        )
        .build(&frame)?;
        for execution in executions {
            self.backend.set_render_pass_execution(execution);
        }
        self.in_flight = InFlight {
            ibl: frame.run_ibl.then_some(self.ibl_requests),
            brdf_lut: frame.run_brdf_lut.then_some(reconciled.brdf_lut_version),
        };
        self.frame_open = true;

        self.draw_debug_frustums();
        self.backend.set_global_shader_info(&self.global_shader_info());
        Ok(())
    }

    fn apply_resize(&mut self, resize: ResizeEvent) {
        let (width, height) = (resize.width, resize.height);
        let (half_width, half_height) = resize.half_size();
        let backend = &*self.backend;
        backend.recreate_swapchain(width, height);
        backend.resize_images(&self.resources.images.screen_sized(), width, height);
        backend.resize_images(&[self.resources.images.depth_pyramid], half_width, half_height);
        backend.update_compute_pass_shader_description(
            self.passes.depth_pyramid,
            &depth_pyramid_shader_description(width, height),
        );
        warn_if_histogram_too_small(&self.settings, width, height);
    }

    fn draw_debug_frustums(&self) {
        let transform = [DrawTransform::new(self.view.view_projection, Mat4::IDENTITY)];
        let meshes = &self.resources.meshes;
        if self.debug.freeze_and_draw_camera_frustum {
            self.backend
                .draw_dynamic_meshes(self.passes.debug, &[meshes.camera_frustum], &transform);
        }
        if self.debug.draw_shadow_frustum {
            self.backend
                .draw_dynamic_meshes(self.passes.debug, &[meshes.shadow_frustum], &transform);
        }
    }

    /// Per-frame shader constants.
    pub fn global_shader_info(&self) -> GlobalShaderInfo {
        let extrinsic = &self.view.camera.extrinsic;
        let intrinsic = &self.view.camera.intrinsic;
        let lighting = &self.lighting;
        GlobalShaderInfo {
            sun_direction: self.sun_direction().extend(0.0),
            sun_color: lighting.sun_color.extend(1.0),
            camera_position: extrinsic.position.extend(1.0),
            camera_right: extrinsic.right.extend(0.0),
            camera_up: extrinsic.up.extend(0.0),
            camera_forward: extrinsic.forward.extend(0.0),
            sun_illuminance_lux: lighting.sun_illuminance_lux,
            sky_illuminance: lighting.sky_illuminance,
            exposure_offset: lighting.exposure_offset,
            exposure_adaption_speed_ev_per_second: lighting.exposure_adaption_speed_ev_per_second,
            delta_time: self.delta_time,
            camera_near: intrinsic.near,
            camera_far: intrinsic.far,
            camera_tan_fov_half: intrinsic.tan_half_fov(),
            camera_aspect_ratio: intrinsic.aspect_ratio,
            current_frame_camera_jitter: self.view.jitter,
            previous_frame_camera_jitter: self.view.previous_jitter,
            ..GlobalShaderInfo::default()
        }
    }

    /// Draw the sky and execute the frame.
    pub fn render_frame(&mut self) -> Result<(), GraphicsError> {
        self.ensure_running()?;
        if self.resolution.is_minimized() {
            return Ok(());
        }
        self.backend.draw_meshes(
            self.passes.sky,
            &[self.resources.meshes.sky_cube],
            &[DrawTransform::new(self.view.view_projection, Mat4::IDENTITY)],
        );
        self.frame_open = false;
        self.backend.render_frame(true)?;

        let in_flight = std::mem::take(&mut self.in_flight);
        if let Some(request) = in_flight.ibl {
            self.ibl_completed = self.ibl_completed.max(request);
            log::info!("Image based lighting precomputed");
        }
        if let Some(version) = in_flight.brdf_lut {
            self.shading.mark_brdf_lut_executed(version);
        }
        Ok(())
    }

    // ===== Sky occlusion =====

    /// Bake the sky occlusion volume for the current static meshes.
    ///
    /// Blocks for one backend frame per sample, so it fails with
    /// [`GraphicsError::InvalidState`] between `prepare_new_frame` and
    /// `render_frame`. Returns the volume resolution, or `None` when there is
    /// nothing to bake.
    pub fn bake_sky_occlusion(&mut self) -> Result<Option<UVec3>, GraphicsError> {
        self.bake_sky_occlusion_with_progress(|_, _| {})
    }

    /// [`bake_sky_occlusion`](Self::bake_sky_occlusion) reporting
    /// `(finished, total)` samples after each one.
    pub fn bake_sky_occlusion_with_progress(
        &mut self,
        mut progress: impl FnMut(u32, u32),
    ) -> Result<Option<UVec3>, GraphicsError> {
        self.ensure_running()?;
        if self.frame_open {
            return Err(GraphicsError::InvalidState(
                "sky occlusion cannot be baked while a frame is being prepared".into(),
            ));
        }

        let sample_count = self.settings.sky_occlusion_sample_count;
        let scene = AxisAlignedBoundingBox::combine(
            self.static_meshes.iter().map(|m| &m.bounding_box_world_space),
        );
        let scene = match scene {
            Some(scene) if sample_count > 0 => scene.padded(SKY_OCCLUSION_SCENE_PADDING),
            _ => {
                log::warn!("Sky occlusion bake skipped: no static meshes or no samples");
                return Ok(None);
            }
        };

        let extent = scene.extent();
        let max_resolution = self.settings.sky_occlusion_volume_max_resolution;
        let density = self.settings.sky_occlusion_target_density;
        let resolution = (extent / density)
            .to_array()
            .map(|axis| next_power_of_two_f32(axis).clamp(1, max_resolution));
        let resolution = UVec3::from_array(resolution);

        let volume = self.backend.create_image(&sky_occlusion_volume_description(
            resolution.x,
            resolution.y,
            resolution.z,
        ))?;
        self.resources.images.sky_occlusion_volume = volume;

        let [shadow, gather] = FrameBuilder::new(
            &self.passes,
            &self.resources,
            &self.bindings,
            &self.settings,
            self.backend.swapchain_input_image(),
        )
        .sky_occlusion(volume, resolution)?;

        let mut data = SkyOcclusionRenderData {
            offset: scene.center().extend(0.0),
            extends: extent.extend(0.0),
            weight: 1.0 / sample_count as f32,
            ..SkyOcclusionRenderData::default()
        };

        let backend = &*self.backend;
        for sample in 0..sample_count {
            let direction = uniform_hemisphere_direction(hammersley_2d(sample, sample_count));
            data.shadow_matrix = view_projection_around_bb(&scene, direction);
            data.sample_direction = direction.extend(0.0);

            backend.new_frame();
            let handles: Vec<_> = self.static_meshes.iter().map(|m| m.backend_handle).collect();
            let transforms: Vec<_> = self
                .static_meshes
                .iter()
                .map(|m| DrawTransform::new(data.shadow_matrix * m.model_matrix, Mat4::IDENTITY))
                .collect();
            backend.draw_meshes(self.passes.sky_shadow, &handles, &transforms);
            backend.set_uniform_buffer_data(
                self.resources.buffers.sky_occlusion_data,
                bytemuck::bytes_of(&data),
            );
            backend.set_render_pass_execution(shadow.clone());
            backend.set_render_pass_execution(gather.clone());
            backend.render_frame(false)?;

            progress(sample + 1, sample_count);
        }

        log::info!(
            "Sky occlusion baked: {}x{}x{} volume, {} samples",
            resolution.x,
            resolution.y,
            resolution.z,
            sample_count
        );
        Ok(Some(resolution))
    }

    // ===== Statistics =====

    pub fn stats(&self) -> DrawcallStats {
        self.stats
    }

    pub fn memory_stats(&self) -> MemoryStats {
        self.backend.memory_stats()
    }

    /// Pass timings, refreshed at most every 0.2 seconds.
    pub fn render_pass_timings(&self) -> &[RenderPassTime] {
        &self.timings.timings
    }

    /// Seconds between the last two frame starts.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    // ===== Teardown =====

    /// Stop issuing work. Later calls fail with
    /// [`GraphicsError::InvalidState`] or do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        log::info!(
            "Renderer shut down after {} static meshes",
            self.static_meshes.len()
        );
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

fn warn_if_histogram_too_small(settings: &RendererSettings, width: u32, height: u32) {
    let needed = dispatch::histogram_tile_count(width, height, settings.histogram_tile_size);
    let allocated = settings.histogram_settings().max_tile_count;
    if needed > allocated {
        log::warn!(
            "Histogram needs {} tiles at {}x{} but only {} are allocated",
            needed,
            width,
            height,
            allocated
        );
    }
}
