//! Terminal Surface Integration Tests
//!
//! The engine driven against the real image decoder and the half-block
//! canvas, with the engine clock advanced by hand instead of a terminal.

use std::path::Path;

use animator_core::{AnimatorConfig, Application, DisplaySurface, FrameConfig, SetConfig};
use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use vivian_tui::theme::STAGE_SALMON;
use vivian_tui::{ImageFileDecoder, TerminalCanvas};

const NEUTRAL: [u8; 4] = [20, 20, 60, 255];
const BLINK: [u8; 4] = [240, 240, 240, 255];

fn write_png(dir: &Path, name: &str, rgba: [u8; 4]) {
    RgbaImage::from_pixel(50, 50, Rgba(rgba))
        .save(dir.join(name))
        .unwrap();
}

fn stage(dir: &Path, cols: u16, rows: u16) -> Application<ImageFileDecoder, TerminalCanvas> {
    write_png(dir, "neutral.png", NEUTRAL);
    write_png(dir, "blink.png", BLINK);

    let config = AnimatorConfig {
        asset_dir: Some(dir.to_path_buf()),
        vertical_offset: 0,
        seed: Some(3),
        sets: vec![
            SetConfig {
                name: "idle".to_string(),
                frames: vec![
                    FrameConfig::fixed("neutral.png", 1_000),
                    FrameConfig::fixed("blink.png", 200),
                ],
            },
            SetConfig {
                name: "talking".to_string(),
                frames: vec![FrameConfig::ranged("blink.png", 80, 200)],
            },
        ],
        ..AnimatorConfig::default()
    };

    Application::from_config(
        &config,
        ImageFileDecoder::new(),
        TerminalCanvas::new(cols, rows),
    )
    .unwrap()
}

fn rgb(rgba: [u8; 4]) -> [u8; 3] {
    [rgba[0], rgba[1], rgba[2]]
}

#[test]
fn test_first_frame_is_centered() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = stage(dir.path(), 50, 25);
    app.start().unwrap();

    // 50x50 viewport, 10% padding: 45x45 at (2, 2)
    let canvas = app.surface();
    assert_eq!(canvas.drawn_count(), 1);
    assert_eq!(canvas.pixel(25, 25), rgb(NEUTRAL));
    assert_eq!(canvas.pixel(2, 2), rgb(NEUTRAL));
    assert_eq!(canvas.pixel(1, 1), STAGE_SALMON);
    assert_eq!(canvas.pixel(47, 47), STAGE_SALMON);
}

#[test]
fn test_frames_replace_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = stage(dir.path(), 50, 25);
    app.start().unwrap();

    app.advance(1_000).unwrap();
    assert_eq!(app.surface().drawn_count(), 1);
    assert_eq!(app.surface().pixel(25, 25), rgb(BLINK));

    app.advance(1_200).unwrap();
    assert_eq!(app.surface().drawn_count(), 1);
    assert_eq!(app.surface().pixel(25, 25), rgb(NEUTRAL));
}

#[test]
fn test_resize_redraws_at_new_size_after_settling() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = stage(dir.path(), 50, 25);
    app.start().unwrap();

    let viewport = app.surface_mut().resize(100, 50);
    app.handle_resize(viewport.width, viewport.height);

    // Before the settle delay the old placement is still on screen
    app.advance(100).unwrap();
    assert_eq!(app.surface().pixel(60, 60), STAGE_SALMON);

    // 100x100 viewport: 90x90 at (5, 5)
    app.advance(300).unwrap();
    let canvas = app.surface();
    assert_eq!(canvas.drawn_count(), 1);
    assert_eq!(canvas.pixel(60, 60), rgb(NEUTRAL));
    assert_eq!(canvas.pixel(5, 5), rgb(NEUTRAL));
    assert_eq!(canvas.pixel(4, 4), STAGE_SALMON);
}

#[test]
fn test_rendered_buffer_has_caption() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = stage(dir.path(), 30, 10);
    app.start().unwrap();
    app.play("talking").unwrap();

    let viewport = app.surface().viewport();
    assert_eq!((viewport.width, viewport.height), (30, 20));

    app.surface_mut().set_caption("Vivian", "talking");
    let area = Rect::new(0, 0, 30, 10);
    let mut buf = Buffer::empty(area);
    app.surface().render(area, &mut buf);

    let bottom: String = (0..30).map(|x| buf[(x, 9)].symbol().to_string()).collect();
    assert!(bottom.contains("Vivian · talking"), "bottom row was {bottom:?}");
}
