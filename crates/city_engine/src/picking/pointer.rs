//! Pointer state for picking operations
//!
//! Converts screen-space pixel coordinates to Normalized Device Coordinates.

use crate::core::config::ViewportConfig;

/// A pick request in NDC
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickEvent {
    /// Pointer position in NDC, x right and y up, both in [-1, 1]
    pub ndc: (f32, f32),
    /// The pointer was over UI chrome; such events never reach the scene
    pub over_ui: bool,
}

/// Pointer position over the render surface
#[derive(Debug, Clone)]
pub struct PointerState {
    /// Screen-space X position (pixels from left)
    pub screen_x: f32,
    /// Screen-space Y position (pixels from top)
    pub screen_y: f32,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
}

impl PointerState {
    /// Create a pointer at the top-left corner of a viewport
    pub fn new(viewport: ViewportConfig) -> Self {
        Self {
            screen_x: 0.0,
            screen_y: 0.0,
            viewport_width: viewport.width,
            viewport_height: viewport.height,
        }
    }

    /// Update pointer position
    pub fn update_position(&mut self, x: f32, y: f32) {
        self.screen_x = x;
        self.screen_y = y;
    }

    /// Update viewport size
    pub fn update_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Convert the pointer position to NDC
    ///
    /// X: -1 = left, +1 = right. Y: -1 = bottom, +1 = top.
    #[allow(clippy::cast_precision_loss)]
    pub fn screen_to_ndc(&self) -> (f32, f32) {
        let width = self.viewport_width.max(1) as f32;
        let height = self.viewport_height.max(1) as f32;
        let ndc_x = (self.screen_x / width) * 2.0 - 1.0;
        let ndc_y = 1.0 - (self.screen_y / height) * 2.0;
        (ndc_x, ndc_y)
    }

    /// Build a pick event at the current position
    pub fn pick_event(&self, over_ui: bool) -> PickEvent {
        PickEvent { ndc: self.screen_to_ndc(), over_ui }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pointer() -> PointerState {
        PointerState::new(ViewportConfig { width: 800, height: 600 })
    }

    #[test]
    fn test_center_is_origin() {
        let mut p = pointer();
        p.update_position(400.0, 300.0);
        let (x, y) = p.screen_to_ndc();
        assert_relative_eq!(x, 0.0);
        assert_relative_eq!(y, 0.0);
    }

    #[test]
    fn test_corners_flip_y() {
        let mut p = pointer();
        assert_eq!(p.screen_to_ndc(), (-1.0, 1.0));

        p.update_position(800.0, 600.0);
        assert_eq!(p.screen_to_ndc(), (1.0, -1.0));
    }

    #[test]
    fn test_resize_and_event() {
        let mut p = pointer();
        p.update_viewport(1000, 1000);
        p.update_position(750.0, 250.0);
        let event = p.pick_event(true);
        assert!(event.over_ui);
        assert_relative_eq!(event.ndc.0, 0.5);
        assert_relative_eq!(event.ndc.1, 0.5);
    }
}
