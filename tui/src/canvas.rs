//! Half-Block Canvas
//!
//! The terminal display surface. Each cell shows two vertically stacked
//! pixels using the upper half block: foreground is the top pixel,
//! background the bottom one. A `cols x rows` terminal is therefore a
//! `cols x rows*2` pixel viewport for the engine.
//!
//! The canvas is immediate mode from the engine's point of view (draw and
//! clear by tag) but retains what is drawn so ratatui can repaint it on
//! every frame. The bottom row carries the caption.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use animator_core::{DisplaySurface, DrawTag, Viewport};

use crate::imaging::Sprite;
use crate::theme::{blend, rgb, CAPTION_SET, CAPTION_TEXT, STAGE_SALMON};

/// Upper half block
const HALF_BLOCK: &str = "▀";

/// Something drawn on the canvas
struct Placed {
    tag: DrawTag,
    x: i32,
    y: i32,
    sprite: Sprite,
}

/// Terminal display surface
pub struct TerminalCanvas {
    cols: u16,
    rows: u16,
    placed: Vec<Placed>,
    next_tag: u64,
    name: String,
    set: String,
    background: [u8; 3],
}

impl TerminalCanvas {
    /// Canvas for a terminal of `cols x rows` cells
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            placed: Vec::new(),
            next_tag: 1,
            name: String::new(),
            set: String::new(),
            background: STAGE_SALMON,
        }
    }

    /// Track a terminal resize, returning the new pixel viewport
    pub fn resize(&mut self, cols: u16, rows: u16) -> Viewport {
        self.cols = cols;
        self.rows = rows;
        self.viewport()
    }

    /// Set the caption under the character
    pub fn set_caption(&mut self, name: &str, set: &str) {
        if self.name != name {
            self.name = name.to_string();
        }
        if self.set != set {
            self.set = set.to_string();
        }
    }

    /// Number of images currently on the canvas
    pub fn drawn_count(&self) -> usize {
        self.placed.len()
    }

    /// Composited color of pixel `(px, py)`
    pub fn pixel(&self, px: i64, py: i64) -> [u8; 3] {
        let mut color = self.background;
        for placed in &self.placed {
            let sx = px - i64::from(placed.x);
            let sy = py - i64::from(placed.y);
            let (width, height) = placed.sprite.dimensions();
            if sx < 0 || sy < 0 || sx >= i64::from(width) || sy >= i64::from(height) {
                continue;
            }
            // In bounds, so both fit in u32
            let pixel = placed.sprite.get_pixel(sx as u32, sy as u32);
            color = blend(pixel.0, color);
        }
        color
    }

    fn caption_line(&self) -> Line<'_> {
        if self.set.is_empty() {
            return Line::from(Span::styled(
                self.name.as_str(),
                Style::new().fg(CAPTION_TEXT).add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(vec![
            Span::styled(
                self.name.as_str(),
                Style::new().fg(CAPTION_TEXT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" · ", Style::new().fg(CAPTION_TEXT)),
            Span::styled(self.set.as_str(), Style::new().fg(CAPTION_SET)),
        ])
    }
}

impl DisplaySurface<Sprite> for TerminalCanvas {
    fn viewport(&self) -> Viewport {
        Viewport::new(u32::from(self.cols), u32::from(self.rows) * 2)
    }

    fn clear(&mut self, tag: DrawTag) {
        self.placed.retain(|placed| placed.tag != tag);
    }

    fn draw_image(&mut self, image: &Sprite, x: i32, y: i32) -> DrawTag {
        let tag = DrawTag(self.next_tag);
        self.next_tag += 1;
        self.placed.push(Placed {
            tag,
            x,
            y,
            sprite: Sprite::clone(image),
        });
        tag
    }
}

impl Widget for &TerminalCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let top = self.pixel(i64::from(col), i64::from(row) * 2);
                let bottom = self.pixel(i64::from(col), i64::from(row) * 2 + 1);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(HALF_BLOCK)
                        .set_fg(rgb(top))
                        .set_bg(rgb(bottom));
                }
            }
        }

        if area.height == 0 || self.name.is_empty() {
            return;
        }
        let caption = self.caption_line();
        let width = u16::try_from(caption.width()).unwrap_or(u16::MAX).min(area.width);
        let x = area.x + (area.width - width) / 2;
        let y = area.y + area.height - 1;
        for col in x..x + width {
            if let Some(cell) = buf.cell_mut((col, y)) {
                cell.set_symbol(" ").set_bg(rgb(self.background));
            }
        }
        buf.set_line(x, y, &caption, width);
    }
}
