//! GPU resources owned by the renderer.

use std::collections::HashMap;
use std::mem::size_of;
use std::path::{Path, PathBuf};

use plain_core::frustum::ViewFrustum;
use plain_core::mesh::{generators, meshes_to_binary};
use plain_core::texture::ImageLoader;

use crate::backend::{MeshMaterial, RenderBackend};
use crate::error::GraphicsError;
use crate::settings::{HistogramSettings, RendererSettings};
use crate::types::{
    DynamicMeshHandle, ImageDescription, ImageFormat, ImageHandle, ImageType, ImageUsageFlags,
    MeshHandle, SamplerBorderColor, SamplerDescription, SamplerHandle, SamplerWrapping,
    StorageBufferDescription, StorageBufferHandle, UniformBufferDescription, UniformBufferHandle,
};
use crate::uniforms::SkyOcclusionRenderData;

/// Highest mip the clamped depth sampler reads.
const DEPTH_SAMPLER_MAX_MIP: u32 = 11;

/// 1×1 placeholder textures used when a material texture is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultTextures {
    pub diffuse: ImageHandle,
    pub specular: ImageHandle,
    pub normal: ImageHandle,
    pub sky: ImageHandle,
}

impl DefaultTextures {
    fn create(backend: &dyn RenderBackend) -> Result<Self, GraphicsError> {
        Ok(Self {
            diffuse: backend.create_image(&ImageDescription::single_texel(
                ImageFormat::RGBA8,
                &[255, 255, 255, 255],
            ))?,
            specular: backend.create_image(&ImageDescription::single_texel(
                ImageFormat::RGBA8,
                &[0, 128, 255, 0],
            ))?,
            normal: backend
                .create_image(&ImageDescription::single_texel(ImageFormat::RG8, &[128, 128]))?,
            sky: backend.create_image(&ImageDescription::single_texel(
                ImageFormat::RGBA8,
                &[255, 255, 255, 255],
            ))?,
        })
    }

    /// Material made only of placeholders.
    pub fn material(&self) -> MeshMaterial {
        MeshMaterial {
            albedo: self.diffuse,
            normal: self.normal,
            specular: self.specular,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Samplers {
    pub shadow: SamplerHandle,
    pub cube: SamplerHandle,
    pub lut: SamplerHandle,
    pub color: SamplerHandle,
    pub hdri: SamplerHandle,
    pub sky_with_mips: SamplerHandle,
    /// Nearest, clamped; for reading single texels.
    pub texel: SamplerHandle,
    pub clamped_depth: SamplerHandle,
    pub sky_occlusion: SamplerHandle,
}

impl Samplers {
    fn create(backend: &dyn RenderBackend, settings: &RendererSettings) -> Result<Self, GraphicsError> {
        use SamplerBorderColor::{Black, White};
        use SamplerWrapping::{Clamp, Color};

        Ok(Self {
            shadow: backend
                .create_sampler(&SamplerDescription::nearest(Color).with_border_color(White))?,
            cube: backend
                .create_sampler(&SamplerDescription::linear(Clamp).with_border_color(Black))?,
            lut: backend.create_sampler(&SamplerDescription::linear(Clamp))?,
            color: backend.create_sampler(&SamplerDescription::linear(Clamp))?,
            hdri: backend
                .create_sampler(&SamplerDescription::linear(Clamp).with_border_color(Black))?,
            sky_with_mips: backend.create_sampler(
                &SamplerDescription::linear(Clamp)
                    .with_border_color(Black)
                    .with_max_mip(settings.sky_texture_mip_count),
            )?,
            texel: backend
                .create_sampler(&SamplerDescription::nearest(Clamp).with_border_color(Black))?,
            clamped_depth: backend.create_sampler(
                &SamplerDescription::nearest(Clamp).with_max_mip(DEPTH_SAMPLER_MAX_MIP),
            )?,
            sky_occlusion: backend
                .create_sampler(&SamplerDescription::linear(Color).with_border_color(White))?,
        })
    }
}

/// Images the frame graph reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImages {
    /// Equirectangular source of the sky cubemap.
    pub environment_map: ImageHandle,
    pub color: ImageHandle,
    pub depth: ImageHandle,
    pub motion_vectors: ImageHandle,
    /// Previous TAA output.
    pub history: ImageHandle,
    pub shadow_maps: Vec<ImageHandle>,
    pub specular_probe: ImageHandle,
    pub diffuse_probe: ImageHandle,
    pub sky_cubemap: ImageHandle,
    pub brdf_lut: ImageHandle,
    /// Half resolution min/max depth with a full mip chain.
    pub depth_pyramid: ImageHandle,
    pub sky_shadow_map: ImageHandle,
    /// Replaced by the sky occlusion bake.
    pub sky_occlusion_volume: ImageHandle,
}

impl FrameImages {
    fn create(
        backend: &dyn RenderBackend,
        loader: &dyn ImageLoader,
        settings: &RendererSettings,
        defaults: &DefaultTextures,
        width: u32,
        height: u32,
    ) -> Result<Self, GraphicsError> {
        use ImageFormat::*;

        let attachment_sampled = ImageUsageFlags::ATTACHMENT | ImageUsageFlags::SAMPLED;
        let storage_sampled = ImageUsageFlags::STORAGE | ImageUsageFlags::SAMPLED;

        let environment_map = match &settings.environment_map_path {
            Some(path) => load_or(backend, loader, path, defaults.sky),
            None => defaults.sky,
        };

        let color = backend.create_image(&ImageDescription::new_2d(
            width,
            height,
            R11G11B10_uFloat,
            attachment_sampled | ImageUsageFlags::STORAGE,
        ))?;
        let depth =
            backend.create_image(&ImageDescription::new_2d(width, height, Depth32, attachment_sampled))?;
        let motion_vectors = backend.create_image(&ImageDescription::new_2d(
            width,
            height,
            RG16_sFloat,
            attachment_sampled,
        ))?;
        let history = backend.create_image(&ImageDescription::new_2d(
            width,
            height,
            R11G11B10_uFloat,
            storage_sampled,
        ))?;

        let shadow_map_desc = ImageDescription::new_2d(
            settings.shadow_map_resolution,
            settings.shadow_map_resolution,
            Depth16,
            attachment_sampled,
        );
        let shadow_maps = (0..settings.shadow_cascade_count)
            .map(|_| backend.create_image(&shadow_map_desc))
            .collect::<Result<Vec<_>, _>>()?;

        let specular_res = settings.specular_probe_resolution;
        let specular_probe = backend.create_image(
            &ImageDescription::new_2d(specular_res, specular_res, R11G11B10_uFloat, storage_sampled)
                .with_type(ImageType::TypeCube)
                .with_full_mip_chain(),
        )?;
        let diffuse_res = settings.diffuse_probe_resolution;
        let diffuse_probe = backend.create_image(
            &ImageDescription::new_2d(diffuse_res, diffuse_res, R11G11B10_uFloat, storage_sampled)
                .with_type(ImageType::TypeCube),
        )?;
        let sky_res = settings.sky_texture_resolution;
        let sky_cubemap = backend.create_image(
            &ImageDescription::new_2d(sky_res, sky_res, R11G11B10_uFloat, storage_sampled)
                .with_type(ImageType::TypeCube)
                .with_manual_mips(settings.sky_texture_mip_count),
        )?;
        let lut_res = settings.brdf_lut_resolution;
        let brdf_lut = backend.create_image(&ImageDescription::new_2d(
            lut_res,
            lut_res,
            RGBA16_sFloat,
            storage_sampled,
        ))?;
        let depth_pyramid = backend.create_image(
            &ImageDescription::new_2d(
                (width / 2).max(1),
                (height / 2).max(1),
                RG32_sFloat,
                storage_sampled,
            )
            .with_full_mip_chain(),
        )?;
        let sky_shadow_res = settings.sky_shadow_map_resolution;
        let sky_shadow_map = backend.create_image(&ImageDescription::new_2d(
            sky_shadow_res,
            sky_shadow_res,
            Depth16,
            attachment_sampled,
        ))?;
        let sky_occlusion_volume = backend.create_image(&sky_occlusion_volume_description(1, 1, 1))?;

        Ok(Self {
            environment_map,
            color,
            depth,
            motion_vectors,
            history,
            shadow_maps,
            specular_probe,
            diffuse_probe,
            sky_cubemap,
            brdf_lut,
            depth_pyramid,
            sky_shadow_map,
            sky_occlusion_volume,
        })
    }

    /// Full resolution images resized with the window.
    pub fn screen_sized(&self) -> [ImageHandle; 4] {
        [self.color, self.depth, self.motion_vectors, self.history]
    }
}

/// 3D sky occlusion volume of the given texel resolution.
pub fn sky_occlusion_volume_description(width: u32, height: u32, depth: u32) -> ImageDescription {
    ImageDescription::new_2d(
        width,
        height,
        ImageFormat::RGBA16_sNorm,
        ImageUsageFlags::STORAGE | ImageUsageFlags::SAMPLED,
    )
    .with_type(ImageType::Type3D)
    .with_depth(depth)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBuffers {
    pub histogram: StorageBufferHandle,
    pub histogram_per_tile: StorageBufferHandle,
    /// Pre-exposed light values written by the exposure passes.
    pub light: StorageBufferHandle,
    /// Completion counter of the depth pyramid shader.
    pub depth_pyramid_sync: StorageBufferHandle,
    /// Cascade splits followed by one light matrix per cascade.
    pub sun_shadow_info: StorageBufferHandle,
    pub sky_occlusion_data: UniformBufferHandle,
}

impl FrameBuffers {
    fn create(
        backend: &dyn RenderBackend,
        settings: &RendererSettings,
        histogram: &HistogramSettings,
    ) -> Result<Self, GraphicsError> {
        let u32_size = size_of::<u32>() as u64;
        let bins = settings.histogram_bin_count as u64;

        let split_size = size_of::<glam::Vec4>() as u64;
        let light_matrices_size = size_of::<glam::Mat4>() as u64 * settings.shadow_cascade_count as u64;

        Ok(Self {
            histogram: backend.create_storage_buffer(&StorageBufferDescription::new(bins * u32_size))?,
            histogram_per_tile: backend.create_storage_buffer(&StorageBufferDescription::new(
                histogram.max_tile_count as u64 * bins * u32_size,
            ))?,
            light: backend.create_storage_buffer(
                &StorageBufferDescription::new(3 * u32_size)
                    .with_initial_data(bytemuck::cast_slice(&[0.0f32; 3])),
            )?,
            depth_pyramid_sync: backend.create_storage_buffer(
                &StorageBufferDescription::new(u32_size).with_initial_data(&0u32.to_le_bytes()),
            )?,
            sun_shadow_info: backend
                .create_storage_buffer(&StorageBufferDescription::new(split_size + light_matrices_size))?,
            sky_occlusion_data: backend.create_uniform_buffer(&UniformBufferDescription::new(
                size_of::<SkyOcclusionRenderData>() as u64,
            ))?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMeshes {
    pub sky_cube: MeshHandle,
    pub camera_frustum: DynamicMeshHandle,
    pub shadow_frustum: DynamicMeshHandle,
}

impl FrameMeshes {
    fn create(backend: &dyn RenderBackend, defaults: &DefaultTextures) -> Result<Self, GraphicsError> {
        let frustum_mesh = ViewFrustum::default().to_line_mesh();
        let frustums = backend.create_dynamic_meshes(&[frustum_mesh.clone(), frustum_mesh])?;
        let (camera_frustum, shadow_frustum) = match frustums.as_slice() {
            [camera, shadow] => (*camera, *shadow),
            _ => {
                return Err(GraphicsError::ResourceCreationFailed(format!(
                    "expected 2 frustum meshes, backend returned {}",
                    frustums.len()
                )))
            }
        };

        let cube = meshes_to_binary(&[generators::generate_sky_cube()]);
        let sky_cube = backend
            .create_meshes(&cube, &[defaults.material()])?
            .last()
            .copied()
            .ok_or_else(|| {
                GraphicsError::ResourceCreationFailed("backend returned no sky cube mesh".into())
            })?;

        Ok(Self {
            sky_cube,
            camera_frustum,
            shadow_frustum,
        })
    }
}

/// Everything the renderer creates once at setup.
#[derive(Debug, Clone)]
pub struct FrameResources {
    pub defaults: DefaultTextures,
    pub samplers: Samplers,
    pub images: FrameImages,
    pub buffers: FrameBuffers,
    pub meshes: FrameMeshes,
}

impl FrameResources {
    pub fn create(
        backend: &dyn RenderBackend,
        loader: &dyn ImageLoader,
        settings: &RendererSettings,
        width: u32,
        height: u32,
    ) -> Result<Self, GraphicsError> {
        let defaults = DefaultTextures::create(backend)?;
        let samplers = Samplers::create(backend, settings)?;
        let images = FrameImages::create(backend, loader, settings, &defaults, width, height)?;
        let buffers = FrameBuffers::create(backend, settings, &settings.histogram_settings())?;
        let meshes = FrameMeshes::create(backend, &defaults)?;

        Ok(Self {
            defaults,
            samplers,
            images,
            buffers,
            meshes,
        })
    }
}

/// Load `path` or fall back to `fallback`, logging the failure.
fn load_or(
    backend: &dyn RenderBackend,
    loader: &dyn ImageLoader,
    path: &Path,
    fallback: ImageHandle,
) -> ImageHandle {
    let desc = match loader.load_image(path) {
        Ok(desc) => desc,
        Err(err) => {
            log::warn!("Failed to load image {}: {}", path.display(), err);
            return fallback;
        }
    };
    match backend.create_image(&desc) {
        Ok(image) => image,
        Err(err) => {
            log::warn!("Failed to upload image {}: {}", path.display(), err);
            fallback
        }
    }
}

/// Material textures by path, each loaded once.
///
/// Failed loads are not cached, so a later registration retries them.
#[derive(Debug, Default)]
pub struct TextureCache {
    images: HashMap<PathBuf, ImageHandle>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image for `path`; empty paths and failed loads resolve to `fallback`.
    pub fn get_or_load(
        &mut self,
        backend: &dyn RenderBackend,
        loader: &dyn ImageLoader,
        path: &Path,
        fallback: ImageHandle,
    ) -> ImageHandle {
        if path.as_os_str().is_empty() {
            return fallback;
        }
        if let Some(&image) = self.images.get(path) {
            return image;
        }
        let image = load_or(backend, loader, path, fallback);
        if image != fallback {
            self.images.insert(path.to_path_buf(), image);
        }
        image
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::DummyBackend;
    use crate::types::MipCount;
    use plain_core::texture::ImageLoadError;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Loader that decodes every path except those containing "missing".
    #[derive(Default)]
    struct CountingLoader {
        loads: AtomicU32,
    }

    impl ImageLoader for CountingLoader {
        fn load_image(&self, path: &Path) -> Result<ImageDescription, ImageLoadError> {
            self.loads.fetch_add(1, Ordering::Relaxed);
            if path.to_string_lossy().contains("missing") {
                return Err(ImageLoadError::Decode {
                    path: path.to_path_buf(),
                    reason: "not found".into(),
                });
            }
            Ok(ImageDescription::single_texel(ImageFormat::RGBA8, &[1, 2, 3, 4]))
        }
    }

    fn create() -> (DummyBackend, FrameResources) {
        let backend = DummyBackend::new();
        let resources = FrameResources::create(
            &backend,
            &CountingLoader::default(),
            &RendererSettings::default(),
            1920,
            1080,
        )
        .unwrap();
        (backend, resources)
    }

    #[test]
    fn test_default_textures() {
        let (backend, resources) = create();
        let specular = backend.image(resources.defaults.specular).unwrap();
        assert_eq!((specular.width, specular.height), (1, 1));
        assert_eq!(specular.mip_count, MipCount::FullChain);
        assert!(specular.auto_create_mips);
        assert_eq!(specular.usage, ImageUsageFlags::SAMPLED);

        let normal = backend.image(resources.defaults.normal).unwrap();
        assert_eq!(normal.format, ImageFormat::RG8);
    }

    #[test]
    fn test_environment_map_defaults_to_sky() {
        let (_, resources) = create();
        assert_eq!(resources.images.environment_map, resources.defaults.sky);
    }

    #[test]
    fn test_environment_map_load_failure_falls_back() {
        let backend = DummyBackend::new();
        let settings = RendererSettings::default().with_environment_map("missing.hdr");
        let resources =
            FrameResources::create(&backend, &CountingLoader::default(), &settings, 64, 64).unwrap();
        assert_eq!(resources.images.environment_map, resources.defaults.sky);
    }

    #[test]
    fn test_image_layouts() {
        let (backend, resources) = create();
        let images = &resources.images;

        let pyramid = backend.image(images.depth_pyramid).unwrap();
        assert_eq!((pyramid.width, pyramid.height), (960, 540));
        assert_eq!(pyramid.resolved_mip_count(), 10);

        let sky = backend.image(images.sky_cubemap).unwrap();
        assert_eq!(sky.image_type, ImageType::TypeCube);
        assert_eq!(sky.resolved_mip_count(), 8);

        let specular = backend.image(images.specular_probe).unwrap();
        assert_eq!(specular.resolved_mip_count(), 10);

        let volume = backend.image(images.sky_occlusion_volume).unwrap();
        assert_eq!(volume.image_type, ImageType::Type3D);
        assert_eq!((volume.width, volume.height, volume.depth), (1, 1, 1));

        assert_eq!(images.shadow_maps.len(), 4);
    }

    #[test]
    fn test_sky_occlusion_buffer_size() {
        let (backend, resources) = create();
        let data = backend
            .uniform_buffer_data(resources.buffers.sky_occlusion_data)
            .unwrap();
        assert_eq!(data.len(), size_of::<SkyOcclusionRenderData>());
    }

    #[test]
    fn test_texture_cache_loads_once() {
        let backend = DummyBackend::new();
        let loader = CountingLoader::default();
        let fallback = ImageHandle::from_raw(0);
        let mut cache = TextureCache::new();

        let first = cache.get_or_load(&backend, &loader, Path::new("albedo.png"), fallback);
        let second = cache.get_or_load(&backend, &loader, Path::new("albedo.png"), fallback);
        assert_eq!(first, second);
        assert_ne!(first, fallback);
        assert_eq!(loader.loads.load(Ordering::Relaxed), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_texture_cache_fallbacks() {
        let backend = DummyBackend::new();
        let loader = CountingLoader::default();
        let fallback = ImageHandle::from_raw(0);
        let mut cache = TextureCache::new();

        assert_eq!(cache.get_or_load(&backend, &loader, Path::new(""), fallback), fallback);
        assert_eq!(
            cache.get_or_load(&backend, &loader, Path::new("missing.png"), fallback),
            fallback
        );
        assert!(cache.is_empty());
        assert_eq!(loader.loads.load(Ordering::Relaxed), 1);
    }
}
