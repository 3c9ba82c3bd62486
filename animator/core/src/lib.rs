//! Animator Core - Timed Animation Sets for Vivian
//!
//! A headless engine that plays a character's named animation sets on a
//! cooperative timer loop. It is independent of any rendering surface: the
//! host supplies an image service and a display surface, forwards resize
//! notifications, and advances the clock.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────── Application ─────────────────────────────┐
//! │                                                                       │
//! │  BehaviorController ──change_set + tick──▶ Entity (scheduler)         │
//! │                                              │  ├─ AnimationRegistry  │
//! │                                              │  ├─ ResizeDebouncer    │
//! │                                              │  └─ place_frame        │
//! │                                              ▼                        │
//! │  TimerQueue ◀──schedule / cancel──── DisplaySurface / ImageService    │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Entity`]: owns the sets, the active set, the frame index, and the
//!   one outstanding frame timer
//! - [`ResizeDebouncer`]: turns resize bursts into a single trailing redraw
//! - [`place_frame`]: pure placement math
//! - [`TimerQueue`]: single-threaded timer queue with a logical clock
//! - [`Application`]: context object tying it all to one surface
//!
//! # Quick Start
//!
//! ```ignore
//! use animator_core::{AnimatorConfig, Application};
//!
//! let config = AnimatorConfig::discover(None)?;
//! let mut app = Application::from_config(&config, images, surface)?;
//! app.start()?;
//!
//! loop {
//!     // wait for a resize or until app.next_deadline()
//!     app.advance(elapsed_ms)?;
//! }
//! ```

pub mod animation_set;
pub mod application;
pub mod assets;
pub mod behavior;
pub mod config;
pub mod debounce;
pub mod entity;
pub mod error;
pub mod events;
pub mod frame;
pub mod layout;
pub mod surface;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod timer;

pub use animation_set::{AnimationRegistry, AnimationSet};
pub use application::Application;
pub use assets::load_sets;
pub use behavior::{BehaviorConfig, BehaviorController};
pub use config::{default_config_path, AnimatorConfig, FrameConfig, SetConfig};
pub use debounce::{DebounceState, ResizeDebouncer, SettleOutcome};
pub use entity::{CurrentFrame, Entity, TickReport};
pub use error::{AnimatorError, Result};
pub use events::TimerEvent;
pub use frame::{Frame, FrameDuration};
pub use layout::{place_frame, LayoutOptions, Placement, ScaleMode, Viewport};
pub use surface::{DecodedImage, DisplaySurface, DrawTag, ImageService};
pub use timer::{TimerQueue, TimerService, TimerToken};
