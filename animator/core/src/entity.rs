//! Animated Entity and Scheduler
//!
//! The entity owns the animation sets of one on-screen character and drives
//! them from the shared timer queue. Each [`Entity::tick`] shows the frame at
//! the current index, advances the index, and schedules the next tick after
//! that frame's duration. Switching sets cancels the pending tick and bumps
//! the generation counter, so a tick callback that raced the switch finds a
//! stale generation and does nothing.
//!
//! # Invariants
//!
//! - `frame_index < active_set.len()` whenever a set is active
//! - at most one frame timer and one settle timer are pending at any time
//!
//! Resize handling goes through the embedded [`ResizeDebouncer`]; settle
//! redraws reuse the current frame and never touch the frame timer.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace, warn};

use crate::animation_set::{AnimationRegistry, AnimationSet};
use crate::debounce::{ResizeDebouncer, SettleOutcome};
use crate::error::{AnimatorError, Result};
use crate::events::TimerEvent;
use crate::layout::{place_frame, LayoutOptions, Placement, Viewport};
use crate::surface::{DisplaySurface, DrawTag, ImageService};
use crate::timer::{TimerService, TimerToken};

/// The frame currently on screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentFrame {
    /// Set the frame belongs to
    pub set: String,
    /// Index of the frame within the set
    pub index: usize,
    /// Where it was drawn
    pub placement: Placement,
}

/// What a single tick did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Index of the frame that was shown (or skipped while invisible)
    pub frame_index: Option<usize>,
    /// Whether anything was drawn
    pub drawn: bool,
    /// Delay until the next tick, if one was scheduled
    pub delay_ms: Option<u64>,
}

impl TickReport {
    /// Report for a tick with no active set
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Scaled copies of frame images, keyed by (set, index)
type ScaleCache<H> = HashMap<(String, usize), (u32, H)>;

/// An animated character
pub struct Entity<I: ImageService> {
    images: I,
    registry: AnimationRegistry<I::Handle>,
    layout: LayoutOptions,
    /// Name of the set being played
    active: Option<String>,
    /// Index of the next frame to show
    frame_index: usize,
    /// Frame currently on screen
    current: Option<CurrentFrame>,
    /// Surface tag of the last drawn image
    drawn: Option<DrawTag>,
    /// Bumped on every set change
    generation: u64,
    /// The one outstanding frame timer
    pending_tick: Option<TimerToken>,
    debouncer: ResizeDebouncer,
    rng: StdRng,
    scaled: ScaleCache<I::Handle>,
}

impl<I: ImageService> Entity<I> {
    /// Create an entity with no sets and nothing active
    pub fn new(images: I, layout: LayoutOptions, settle_delay_ms: u64) -> Self {
        Self {
            images,
            registry: AnimationRegistry::new(),
            layout,
            active: None,
            frame_index: 0,
            current: None,
            drawn: None,
            generation: 0,
            pending_tick: None,
            debouncer: ResizeDebouncer::new(settle_delay_ms),
            rng: StdRng::from_entropy(),
            scaled: HashMap::new(),
        }
    }

    /// Use a deterministic random source for ranged durations
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Register an animation set
    pub fn register(&mut self, set: AnimationSet<I::Handle>) -> Result<()> {
        debug!(set = set.name(), frames = set.len(), "Registering animation set");
        self.registry.register(set)
    }

    /// Name of the active set
    pub fn active_set(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Index of the next frame to show
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Frame currently on screen
    pub fn current_frame(&self) -> Option<&CurrentFrame> {
        self.current.as_ref()
    }

    /// Scheduler generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Token of the outstanding frame timer
    pub fn pending_tick(&self) -> Option<TimerToken> {
        self.pending_tick
    }

    /// Registered set names
    pub fn set_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.registry.names()
    }

    /// Whether a set is registered
    pub fn has_set(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Placement options
    pub fn layout(&self) -> &LayoutOptions {
        &self.layout
    }

    /// Resize debouncer
    pub fn debouncer(&self) -> &ResizeDebouncer {
        &self.debouncer
    }

    /// Switch to another animation set
    ///
    /// No-op when `name` is already active. Otherwise the pending tick is
    /// cancelled, the index resets to 0, and the current frame is forgotten.
    /// Nothing is drawn until the caller ticks.
    pub fn change_set<T>(&mut self, name: &str, timers: &mut T) -> Result<()>
    where
        T: TimerService<TimerEvent>,
    {
        if self.active.as_deref() == Some(name) {
            return Ok(());
        }
        if !self.registry.contains(name) {
            return Err(AnimatorError::UnknownAnimationSet {
                name: name.to_string(),
            });
        }

        if let Some(token) = self.pending_tick.take() {
            timers.cancel(token);
        }
        self.generation += 1;
        self.frame_index = 0;
        self.current = None;

        debug!(
            from = self.active.as_deref().unwrap_or("<none>"),
            to = name,
            generation = self.generation,
            "Animation set changed"
        );
        self.active = Some(name.to_string());
        Ok(())
    }

    /// Show the current frame and schedule the next one
    pub fn tick<S, T>(&mut self, surface: &mut S, timers: &mut T) -> TickReport
    where
        S: DisplaySurface<I::Handle>,
        T: TimerService<TimerEvent>,
    {
        let Some(set_name) = self.active.clone() else {
            return TickReport::idle();
        };
        let Some(set) = self.registry.get(&set_name) else {
            return TickReport::idle();
        };

        let len = set.len();
        let index = self.frame_index % len;
        let Some(frame) = set.frame(index) else {
            return TickReport::idle();
        };
        let handle = frame.image().clone();
        let (image_width, image_height) = (frame.width(), frame.height());
        let delay_ms = frame.duration().sample(&mut self.rng);

        if let Some(tag) = self.drawn.take() {
            surface.clear(tag);
        }

        let viewport = surface.viewport();
        let placement = place_frame(image_width, image_height, viewport, &self.layout);
        let drawn = match placement {
            Some(placement) => {
                let shown = self.draw(&set_name, index, &handle, placement, surface);
                if shown {
                    self.current = Some(CurrentFrame {
                        set: set_name.clone(),
                        index,
                        placement,
                    });
                    self.debouncer.mark_rendered(viewport);
                } else {
                    self.current = None;
                }
                shown
            }
            None => {
                trace!(
                    width = viewport.width,
                    height = viewport.height,
                    "Viewport not drawable, skipping frame"
                );
                self.current = None;
                false
            }
        };

        self.frame_index = (index + 1) % len;

        if let Some(token) = self.pending_tick.take() {
            timers.cancel(token);
        }
        let generation = self.generation;
        self.pending_tick = Some(timers.schedule_after(delay_ms, TimerEvent::Frame { generation }));

        trace!(set = %set_name, index, delay_ms, drawn, "Tick");

        TickReport {
            frame_index: Some(index),
            drawn,
            delay_ms: Some(delay_ms),
        }
    }

    /// Handle a frame timer firing
    ///
    /// Returns `false` if the timer was stale (superseded by a set change or a
    /// direct tick) and was ignored.
    pub fn on_frame_timer<S, T>(
        &mut self,
        token: TimerToken,
        generation: u64,
        surface: &mut S,
        timers: &mut T,
    ) -> bool
    where
        S: DisplaySurface<I::Handle>,
        T: TimerService<TimerEvent>,
    {
        if generation != self.generation || self.pending_tick != Some(token) {
            trace!(generation, current = self.generation, "Stale frame timer ignored");
            return false;
        }
        self.pending_tick = None;
        self.tick(surface, timers);
        true
    }

    /// Forward a resize notification to the debouncer
    pub fn on_resize<T>(&mut self, viewport: Viewport, timers: &mut T) -> bool
    where
        T: TimerService<TimerEvent>,
    {
        self.debouncer.on_resize(viewport, timers)
    }

    /// Handle a settle timer firing; redraws if the viewport changed
    pub fn on_settle<S, T>(&mut self, generation: u64, surface: &mut S, timers: &mut T) -> SettleOutcome
    where
        S: DisplaySurface<I::Handle>,
        T: TimerService<TimerEvent>,
    {
        let outcome = self.debouncer.on_settle(generation, surface.viewport(), timers);
        if let SettleOutcome::Redraw(viewport) = outcome {
            debug!(width = viewport.width, height = viewport.height, "Redrawing after resize");
            self.redraw(surface);
        }
        outcome
    }

    /// Re-place and redraw the current frame for the present viewport
    ///
    /// Returns `true` if something was drawn. Leaves the frame timer alone.
    pub fn redraw<S>(&mut self, surface: &mut S) -> bool
    where
        S: DisplaySurface<I::Handle>,
    {
        let Some(current) = self.current.clone() else {
            return false;
        };
        let Some(frame) = self
            .registry
            .get(&current.set)
            .and_then(|set| set.frame(current.index))
        else {
            return false;
        };
        let handle = frame.image().clone();
        let (image_width, image_height) = (frame.width(), frame.height());

        let viewport = surface.viewport();
        let Some(placement) = place_frame(image_width, image_height, viewport, &self.layout) else {
            return false;
        };

        if let Some(tag) = self.drawn.take() {
            surface.clear(tag);
        }
        if !self.draw(&current.set, current.index, &handle, placement, surface) {
            self.current = None;
            return false;
        }
        self.debouncer.mark_rendered(viewport);
        self.current = Some(CurrentFrame {
            placement,
            ..current
        });
        true
    }

    /// Cancel every outstanding timer owned by this entity
    pub fn stop<T>(&mut self, timers: &mut T)
    where
        T: TimerService<TimerEvent>,
    {
        if let Some(token) = self.pending_tick.take() {
            timers.cancel(token);
        }
        self.generation += 1;
        self.debouncer.cancel(timers);
    }

    fn draw<S>(
        &mut self,
        set: &str,
        index: usize,
        handle: &I::Handle,
        placement: Placement,
        surface: &mut S,
    ) -> bool
    where
        S: DisplaySurface<I::Handle>,
    {
        let scaled = match scaled_image(&self.images, &mut self.scaled, set, index, handle, placement.width) {
            Ok(scaled) => scaled,
            Err(e) => {
                warn!(error = %e, set, index, "Failed to scale frame, skipping draw");
                return false;
            }
        };
        self.drawn = Some(surface.draw_image(&scaled, placement.x, placement.y));
        true
    }
}

/// Fetch the frame scaled to `width`, resizing on a cache miss
fn scaled_image<I: ImageService>(
    images: &I,
    cache: &mut ScaleCache<I::Handle>,
    set: &str,
    index: usize,
    handle: &I::Handle,
    width: u32,
) -> Result<I::Handle> {
    let key = (set.to_string(), index);
    if let Some((cached_width, scaled)) = cache.get(&key) {
        if *cached_width == width {
            return Ok(scaled.clone());
        }
    }
    let scaled = images.resize(handle, width)?;
    cache.insert(key, (width, scaled.clone()));
    Ok(scaled)
}
