//! Theme and Colors
//!
//! Vivian's stage: a flat salmon backdrop with a dark caption underneath.

use ratatui::style::Color;

// ============================================================================
// Stage
// ============================================================================

/// Backdrop behind the character (#FA8072)
pub const STAGE_SALMON: [u8; 3] = [0xFA, 0x80, 0x72];

/// Caption text under the character
pub const CAPTION_TEXT: Color = Color::Rgb(70, 30, 40);

/// Active set name in the caption
pub const CAPTION_SET: Color = Color::Rgb(255, 240, 235);

/// Convert an RGB triple to a terminal color
pub const fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

/// Blend `src` over `dst` with straight alpha
pub fn blend(src: [u8; 4], dst: [u8; 3]) -> [u8; 3] {
    let alpha = u16::from(src[3]);
    let mix = |s: u8, d: u8| ((u16::from(s) * alpha + u16::from(d) * (255 - alpha) + 127) / 255) as u8;
    [mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blend_extremes() {
        assert_eq!(blend([10, 20, 30, 255], STAGE_SALMON), [10, 20, 30]);
        assert_eq!(blend([10, 20, 30, 0], STAGE_SALMON), STAGE_SALMON);
    }

    #[test]
    fn test_blend_half() {
        assert_eq!(blend([0, 0, 0, 128], [255, 255, 255]), [127, 127, 127]);
    }
}
