//! Backend that records frame statistics instead of drawing

use std::collections::HashSet;

use super::{FrameDescriptor, RenderBackend};

/// Statistics of the last submitted frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames submitted so far
    pub frames: u64,
    /// Draw items in the last frame
    pub draw_count: usize,
    /// Distinct materials in the last frame
    pub material_count: usize,
}

/// Render backend without a GPU
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    stats: FrameStats,
}

impl HeadlessBackend {
    /// Create a backend with empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics so far
    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

impl RenderBackend for HeadlessBackend {
    fn submit(&mut self, frame: &FrameDescriptor) {
        let materials: HashSet<_> = frame.items.iter().map(|item| item.material).collect();
        self.stats = FrameStats {
            frames: self.stats.frames + 1,
            draw_count: frame.items.len(),
            material_count: materials.len(),
        };
        log::trace!(
            "Frame {}: {} draws, {} materials",
            self.stats.frames,
            self.stats.draw_count,
            self.stats.material_count
        );
    }
}
