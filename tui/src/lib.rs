//! Vivian TUI - Terminal surface for the animation engine
//!
//! Plays Vivian's animation sets full-screen in a terminal, painting each
//! frame with half-block cells on a salmon stage.
//!
//! # Architecture
//!
//! - **App**: tokio event loop driving the engine's `Application`
//! - **Canvas**: the engine's display surface, rendered as a ratatui widget
//! - **Imaging**: PNG decoding and scaling with the `image` crate
//! - **Logging**: file-backed tracing so logs stay off the screen

pub mod app;
pub mod canvas;
pub mod cli;
pub mod imaging;
pub mod logging;
pub mod theme;

pub use app::App;
pub use canvas::TerminalCanvas;
pub use imaging::{ImageFileDecoder, Sprite};
