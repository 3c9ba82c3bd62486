//! Render Positioner
//!
//! Pure placement math: given a frame's natural size and the current
//! viewport, compute the size the frame should be scaled to and where its
//! top-left corner goes. The sprite is centered, then nudged upward by half
//! of `vertical_offset` to leave room for a caption underneath.

use serde::{Deserialize, Serialize};

/// Surface dimensions in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Not laid out yet (either side ≤ 1 pixel)
    pub fn is_degenerate(&self) -> bool {
        self.width <= 1 || self.height <= 1
    }
}

/// How a frame is scaled into the viewport
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleMode {
    /// Padded viewport width drives the size; height follows the aspect
    /// ratio and may overflow the viewport
    #[default]
    FitWidth,
    /// Largest size that fits inside the padded viewport on both axes
    Contain,
}

/// Placement tuning
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Percentage of the viewport left empty around the sprite (0-100)
    pub padding_percent: u32,
    /// Pixels reserved below the sprite for text
    pub vertical_offset: u32,
    /// Scaling policy
    pub scale_mode: ScaleMode,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            padding_percent: 10,
            vertical_offset: 0,
            scale_mode: ScaleMode::FitWidth,
        }
    }
}

/// Where and how large to draw a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Scaled width in pixels
    pub width: u32,
    /// Scaled height in pixels
    pub height: u32,
    /// Left edge (may be negative when the sprite overflows)
    pub x: i32,
    /// Top edge (may be negative when the sprite overflows)
    pub y: i32,
}

/// Compute the placement of an `image_width × image_height` frame
///
/// Returns `None` when nothing should be drawn: the viewport is degenerate,
/// the image has no area, or scaling rounds the sprite down to nothing.
pub fn place_frame(
    image_width: u32,
    image_height: u32,
    viewport: Viewport,
    options: &LayoutOptions,
) -> Option<Placement> {
    if viewport.is_degenerate() || image_width == 0 || image_height == 0 {
        return None;
    }

    let keep = u64::from(100 - options.padding_percent.min(100));
    let avail_width = u64::from(viewport.width) * keep / 100;

    let (width, height) = match options.scale_mode {
        ScaleMode::FitWidth => {
            let width = avail_width;
            (width, scale_round(width, image_height, image_width))
        }
        ScaleMode::Contain => {
            let reserved = u64::from(options.vertical_offset);
            let avail_height =
                u64::from(viewport.height).saturating_sub(reserved) * keep / 100;
            // Compare avail_w / iw against avail_h / ih without floats
            if avail_width * u64::from(image_height) <= avail_height * u64::from(image_width) {
                (avail_width, scale_round(avail_width, image_height, image_width))
            } else {
                (scale_round(avail_height, image_width, image_height), avail_height)
            }
        }
    };

    if width == 0 || height == 0 {
        return None;
    }

    let width = u32::try_from(width).ok()?;
    let height = u32::try_from(height).ok()?;

    let x = (i64::from(viewport.width) - i64::from(width)) / 2;
    let y = (i64::from(viewport.height) - i64::from(height)) / 2
        - i64::from(options.vertical_offset) / 2;

    Some(Placement {
        width,
        height,
        x: i32::try_from(x).ok()?,
        y: i32::try_from(y).ok()?,
    })
}

/// `round(value × num / den)` in integers
fn scale_round(value: u64, num: u32, den: u32) -> u64 {
    let den = u64::from(den);
    (value * u64::from(num) + den / 2) / den
}
