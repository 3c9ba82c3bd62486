//! Test Utilities
//!
//! In-memory collaborators for driving the engine without a terminal:
//!
//! - [`FakeImages`]: an image service whose "pixels" are just a label and a size
//! - [`RecordingSurface`]: a display surface that records every call
//!
//! Combined with [`crate::TimerQueue`] as the fake clock these make every
//! scheduling decision observable and deterministic.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{AnimatorError, Result};
use crate::layout::Viewport;
use crate::surface::{DecodedImage, DisplaySurface, DrawTag, ImageService};

/// A fake decoded image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FakeImage {
    /// Label identifying the source image (the file stem)
    pub label: String,
    pub width: u32,
    pub height: u32,
}

/// Image service backed by a table of known paths
#[derive(Clone, Debug, Default)]
pub struct FakeImages {
    sizes: HashMap<String, (u32, u32)>,
}

impl FakeImages {
    /// Create an empty service; unknown paths fail to decode
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path with its natural size
    #[must_use]
    pub fn with_image(mut self, path: &str, width: u32, height: u32) -> Self {
        self.sizes.insert(path.to_string(), (width, height));
        self
    }
}

impl ImageService for FakeImages {
    type Handle = FakeImage;

    fn decode(&self, path: &Path) -> Result<DecodedImage<FakeImage>> {
        let key = path.to_string_lossy();
        let &(width, height) =
            self.sizes
                .get(key.as_ref())
                .ok_or_else(|| AnimatorError::ImageDecode {
                    path: path.to_path_buf(),
                    reason: "no such file".to_string(),
                })?;
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(DecodedImage {
            handle: FakeImage {
                label,
                width,
                height,
            },
            width,
            height,
        })
    }

    fn resize(&self, handle: &FakeImage, target_width: u32) -> Result<FakeImage> {
        let height = if handle.width == 0 {
            0
        } else {
            let w = u64::from(handle.width);
            ((u64::from(target_width) * u64::from(handle.height) + w / 2) / w) as u32
        };
        Ok(FakeImage {
            label: handle.label.clone(),
            width: target_width,
            height,
        })
    }
}

/// One call made against a [`RecordingSurface`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceCall {
    Clear(DrawTag),
    Draw {
        tag: DrawTag,
        label: String,
        width: u32,
        height: u32,
        x: i32,
        y: i32,
    },
}

/// Display surface that records draws and clears
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    viewport: Viewport,
    next_tag: u64,
    /// Every call in order
    pub calls: Vec<SurfaceCall>,
    /// Tags currently on screen
    pub visible: Vec<DrawTag>,
}

impl RecordingSurface {
    /// Create a surface with the given viewport
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            next_tag: 1,
            calls: Vec::new(),
            visible: Vec::new(),
        }
    }

    /// Simulate the host window changing size
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
    }

    /// All draw calls, in order
    pub fn draws(&self) -> Vec<&SurfaceCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Draw { .. }))
            .collect()
    }

    /// Labels of drawn images, in order
    pub fn drawn_labels(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Draw { label, .. } => Some(label.clone()),
                SurfaceCall::Clear(_) => None,
            })
            .collect()
    }

    /// Most recent draw call
    pub fn last_draw(&self) -> Option<&SurfaceCall> {
        self.calls
            .iter()
            .rev()
            .find(|c| matches!(c, SurfaceCall::Draw { .. }))
    }

    /// Forget recorded calls (keeps what is visible)
    pub fn reset_calls(&mut self) {
        self.calls.clear();
    }
}

impl DisplaySurface<FakeImage> for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self, tag: DrawTag) {
        self.visible.retain(|t| *t != tag);
        self.calls.push(SurfaceCall::Clear(tag));
    }

    fn draw_image(&mut self, image: &FakeImage, x: i32, y: i32) -> DrawTag {
        let tag = DrawTag(self.next_tag);
        self.next_tag += 1;
        self.visible.push(tag);
        self.calls.push(SurfaceCall::Draw {
            tag,
            label: image.label.clone(),
            width: image.width,
            height: image.height,
            x,
            y,
        });
        tag
    }
}
