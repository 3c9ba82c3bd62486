//! Frame Images
//!
//! PNG decoding and scaling for the terminal surface. Decoded frames are
//! shared `RgbaImage`s so the engine can hold the same frame in several sets
//! and the canvas can keep whatever is on screen without copying pixels.

use std::path::Path;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::trace;

use animator_core::{AnimatorError, DecodedImage, ImageService, Result};

/// A decoded (or scaled) frame, cheap to clone
pub type Sprite = Arc<RgbaImage>;

/// Image service backed by the `image` crate
#[derive(Clone, Copy, Debug)]
pub struct ImageFileDecoder {
    filter: FilterType,
}

impl Default for ImageFileDecoder {
    fn default() -> Self {
        Self {
            filter: FilterType::Triangle,
        }
    }
}

impl ImageFileDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different resampling filter when scaling
    #[must_use]
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }
}

impl ImageService for ImageFileDecoder {
    type Handle = Sprite;

    fn decode(&self, path: &Path) -> Result<DecodedImage<Sprite>> {
        let decode_error = |reason: String| AnimatorError::ImageDecode {
            path: path.to_path_buf(),
            reason,
        };

        let image = image::open(path)
            .map_err(|e| decode_error(e.to_string()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(decode_error("image has no pixels".to_string()));
        }

        Ok(DecodedImage {
            handle: Arc::new(image),
            width,
            height,
        })
    }

    fn resize(&self, handle: &Sprite, target_width: u32) -> Result<Sprite> {
        let (width, height) = handle.dimensions();
        if target_width == width {
            return Ok(Arc::clone(handle));
        }

        let target_width = target_width.max(1);
        let target_height = scaled_height(width, height, target_width);
        trace!(width, height, target_width, target_height, "Scaling frame");
        Ok(Arc::new(imageops::resize(
            handle.as_ref(),
            target_width,
            target_height,
            self.filter,
        )))
    }
}

/// Height for `target_width` keeping the aspect ratio, rounded, at least 1
fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let width = u64::from(width.max(1));
    let scaled = (u64::from(target_width) * u64::from(height) + width / 2) / width;
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}
