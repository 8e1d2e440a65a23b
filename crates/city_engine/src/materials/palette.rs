//! Named and graded material palettes

use crate::foundation::math::{Vec3, utils::lerp};

/// Fallback color for unknown material names (magenta)
pub const ERROR_COLOR: u32 = 0xff00ff;

/// Graded palette color at height fraction 0
pub const GRADED_LOW_COLOR: u32 = 0xd4c4a0;

/// Graded palette color at height fraction 1
pub const GRADED_HIGH_COLOR: u32 = 0x6688aa;

/// Highlight base color
pub const HIGHLIGHT_COLOR: u32 = 0x00ffaa;

/// Highlight emission color
pub const HIGHLIGHT_EMISSIVE: u32 = 0x00ff88;

/// Highlight emission strength
pub const HIGHLIGHT_EMISSIVE_INTENSITY: f32 = 0.6;

/// Highlight roughness
pub const HIGHLIGHT_ROUGHNESS: f32 = 0.3;

/// One entry of the named palette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry {
    /// Material name as used in scene documents
    pub name: &'static str,
    /// sRGB color as `0xRRGGBB`
    pub color: u32,
    /// Metallic factor
    pub metallic: f32,
    /// Roughness factor
    pub roughness: f32,
}

const fn entry(name: &'static str, color: u32, metallic: f32, roughness: f32) -> PaletteEntry {
    PaletteEntry { name, color, metallic, roughness }
}

/// Materials recognised by name
pub const NAMED_PALETTE: [PaletteEntry; 9] = [
    entry("concrete", 0xb0b0b0, 0.0, 0.9),
    entry("glass", 0x88ccee, 0.3, 0.1),
    entry("brick", 0xc45a3c, 0.0, 0.85),
    entry("steel", 0x8899aa, 0.6, 0.3),
    entry("copper", 0xcc7733, 0.7, 0.4),
    entry("fiber", 0xffcc00, 0.0, 0.6),
    entry("asphalt", 0x444444, 0.0, 0.95),
    entry("paver", 0x999988, 0.0, 0.8),
    entry("grass", 0x3a7a3a, 0.0, 0.95),
];

/// Look up a named palette entry
pub fn lookup(name: &str) -> Option<&'static PaletteEntry> {
    NAMED_PALETTE.iter().find(|entry| entry.name == name)
}

/// Convert `0xRRGGBB` to an RGB vector in [0, 1]
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    let channel = |shift: u32| f32::from(((hex >> shift) & 0xff) as u8) / 255.0;
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Quantize a height fraction into one of `steps` bands
///
/// `t` is clamped to [0, 1]; NaN maps to step 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn graded_step(t: f32, steps: u32) -> u32 {
    let steps = steps.max(1);
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    ((t * steps as f32).floor() as u32).min(steps - 1)
}

/// Color, metallic and roughness for one graded step
#[allow(clippy::cast_precision_loss)]
pub fn graded_params(step: u32, steps: u32) -> (Vec3, f32, f32) {
    let fraction = if steps > 1 { step as f32 / (steps - 1) as f32 } else { 0.0 };
    let low = hex_to_rgb(GRADED_LOW_COLOR);
    let high = hex_to_rgb(GRADED_HIGH_COLOR);
    let color = Vec3::new(
        lerp(low.x, high.x, fraction),
        lerp(low.y, high.y, fraction),
        lerp(low.z, high.z, fraction),
    );
    // Fine palettes run past the linear ramp; PBR factors stay in [0, 1]
    let roughness = 0.05f32.mul_add(-(step as f32), 0.85).clamp(0.0, 1.0);
    let metallic = (0.03 * step as f32).clamp(0.0, 1.0);
    (color, metallic, roughness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hex_to_rgb() {
        let magenta = hex_to_rgb(ERROR_COLOR);
        assert_relative_eq!(magenta, Vec3::new(1.0, 0.0, 1.0));

        let grey = hex_to_rgb(0x444444);
        assert_relative_eq!(grey.x, 68.0 / 255.0);
        assert_relative_eq!(grey.x, grey.z);
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let steel = lookup("steel").unwrap();
        assert_relative_eq!(steel.metallic, 0.6);
        assert!(lookup("unobtainium").is_none());
        assert!(lookup("Steel").is_none());
    }

    #[test]
    fn test_graded_step_bounds() {
        assert_eq!(graded_step(0.0, 8), 0);
        assert_eq!(graded_step(0.124, 8), 0);
        assert_eq!(graded_step(0.125, 8), 1);
        assert_eq!(graded_step(0.5, 8), 4);
        assert_eq!(graded_step(0.999, 8), 7);
        assert_eq!(graded_step(1.0, 8), 7);
        assert_eq!(graded_step(3.0, 8), 7);
        assert_eq!(graded_step(-1.0, 8), 0);
        assert_eq!(graded_step(f32::NAN, 8), 0);
    }

    #[test]
    fn test_graded_params_endpoints() {
        let (low, metallic_low, rough_low) = graded_params(0, 8);
        let (high, metallic_high, rough_high) = graded_params(7, 8);

        assert_relative_eq!(low, hex_to_rgb(GRADED_LOW_COLOR), epsilon = 1e-6);
        assert_relative_eq!(high, hex_to_rgb(GRADED_HIGH_COLOR), epsilon = 1e-6);
        assert_relative_eq!(rough_low, 0.85);
        assert_relative_eq!(rough_high, 0.5, epsilon = 1e-6);
        assert_relative_eq!(metallic_low, 0.0);
        assert_relative_eq!(metallic_high, 0.21, epsilon = 1e-6);
    }

    #[test]
    fn test_graded_params_stay_in_unit_range_for_fine_palettes() {
        for steps in [18, 19, 35, 40, 256] {
            for step in 0..steps {
                let (_, metallic, roughness) = graded_params(step, steps);
                assert!((0.0..=1.0).contains(&metallic), "metallic {metallic} at {step}/{steps}");
                assert!((0.0..=1.0).contains(&roughness), "roughness {roughness} at {step}/{steps}");
            }
        }
        let (_, metallic, roughness) = graded_params(39, 40);
        assert_relative_eq!(roughness, 0.0);
        assert_relative_eq!(metallic, 1.0);
    }

    #[test]
    fn test_graded_roughness_decreases_with_step() {
        let roughness: Vec<f32> = (0..8).map(|step| graded_params(step, 8).2).collect();
        assert!(roughness.windows(2).all(|pair| pair[1] < pair[0]));
    }
}
