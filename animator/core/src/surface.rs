//! Collaborator Seams
//!
//! The engine never touches pixels, files, or windows directly. It talks to
//! an image service (decode once, resize on demand) and a display surface
//! (immediate-mode canvas that also reports the current viewport). Surfaces
//! implement these traits; the TUI crate provides the terminal versions.

use std::path::Path;

use crate::error::Result;
use crate::layout::Viewport;

/// Opaque handle for something drawn on a surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawTag(pub u64);

/// A decoded image and its natural size
#[derive(Clone, Debug)]
pub struct DecodedImage<H> {
    pub handle: H,
    pub width: u32,
    pub height: u32,
}

/// Decodes frame images and produces scaled copies
pub trait ImageService {
    /// Renderable image handle
    type Handle: Clone;

    /// Decode the image at `path`
    fn decode(&self, path: &Path) -> Result<DecodedImage<Self::Handle>>;

    /// Scale `handle` to `target_width`, preserving its aspect ratio
    fn resize(&self, handle: &Self::Handle, target_width: u32) -> Result<Self::Handle>;
}

/// Immediate-mode canvas plus the host window's size query
pub trait DisplaySurface<H> {
    /// Current viewport size in pixels
    fn viewport(&self) -> Viewport;

    /// Remove something previously drawn; unknown tags are ignored
    fn clear(&mut self, tag: DrawTag);

    /// Draw `image` with its top-left corner at `(x, y)`
    fn draw_image(&mut self, image: &H, x: i32, y: i32) -> DrawTag;
}
