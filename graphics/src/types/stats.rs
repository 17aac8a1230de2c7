//! Statistics reported by a backend.

/// GPU memory usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Bytes reserved from the device.
    pub allocated_bytes: u64,
    /// Bytes actually in use by resources.
    pub used_bytes: u64,
}

impl MemoryStats {
    const BYTES_PER_MEGABYTE: f32 = 1_048_576.0;

    pub fn allocated_megabytes(&self) -> f32 {
        self.allocated_bytes as f32 / Self::BYTES_PER_MEGABYTE
    }

    pub fn used_megabytes(&self) -> f32 {
        self.used_bytes as f32 / Self::BYTES_PER_MEGABYTE
    }
}

/// GPU time spent in one pass during the last measured frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPassTime {
    /// Pass name as given at creation.
    pub name: String,
    /// Duration in milliseconds.
    pub time_ms: f32,
}

/// Draw counts of the current frame, reset by
/// [`prepare_new_frame`](crate::renderer::Renderer::prepare_new_frame).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawcallStats {
    /// Static meshes submitted to culling.
    pub mesh_count: u32,
    pub main_pass_drawcalls: u32,
    /// Shadow casters drawn, counted once across all cascades.
    pub shadow_map_drawcalls: u32,
}
