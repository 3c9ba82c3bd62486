//! Application Context
//!
//! One `Application` per displayed character. It owns the display surface,
//! the entity, the behavior controller and the timer queue, and is the only
//! thing the host event loop talks to:
//!
//! ```text
//! host loop ──resize──▶ Application::handle_resize ──▶ debouncer
//!     │
//!     └──now───▶ Application::advance ──▶ frame ticks / settle checks / behavior
//! ```
//!
//! Nothing here is global; the host owns the `Application` and calls into it
//! from a single task.

use tracing::{debug, info, warn};

use crate::assets::load_sets;
use crate::behavior::{BehaviorConfig, BehaviorController};
use crate::config::AnimatorConfig;
use crate::entity::Entity;
use crate::error::Result;
use crate::events::TimerEvent;
use crate::layout::Viewport;
use crate::surface::{DisplaySurface, ImageService};
use crate::timer::{TimerQueue, TimerService};

/// Upper bound on timers dispatched by a single `advance` call
///
/// Zero-length frames reschedule themselves at the current instant; the cap
/// keeps such a set from starving the host loop.
const MAX_DISPATCH_PER_ADVANCE: usize = 256;

/// The animation engine bound to one surface
pub struct Application<I: ImageService, S> {
    surface: S,
    entity: Entity<I>,
    timers: TimerQueue<TimerEvent>,
    behavior: Option<BehaviorController>,
    initial_set: String,
    started: bool,
}

impl<I, S> Application<I, S>
where
    I: ImageService,
    S: DisplaySurface<I::Handle>,
{
    /// Assemble an application from an already populated entity
    ///
    /// A behavior naming a set the entity does not have is dropped.
    pub fn new(
        surface: S,
        entity: Entity<I>,
        initial_set: impl Into<String>,
        behavior: Option<BehaviorConfig>,
    ) -> Self {
        let behavior = behavior.filter(|config| {
            match config.sets.iter().find(|name| !entity.has_set(name)) {
                Some(missing) => {
                    warn!(set = %missing, "Behavior names an unknown set, disabling it");
                    false
                }
                None => true,
            }
        });

        Self {
            surface,
            entity,
            timers: TimerQueue::new(),
            behavior: behavior.map(BehaviorController::new),
            initial_set: initial_set.into(),
            started: false,
        }
    }

    /// Build an application from configuration, decoding every frame
    pub fn from_config(config: &AnimatorConfig, images: I, surface: S) -> Result<Self> {
        config.validate()?;
        let sets = load_sets(config, &images)?;

        let mut entity = Entity::new(images, config.layout(), config.settle_delay_ms);
        if let Some(seed) = config.seed {
            entity = entity.with_seed(seed);
        }
        for set in sets {
            entity.register(set)?;
        }

        let behavior = config.behavior.enabled.then(|| config.behavior.clone());
        Ok(Self::new(surface, entity, config.initial_set.clone(), behavior))
    }

    /// Select the initial set, show its first frame, arm the behavior
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.entity.change_set(&self.initial_set, &mut self.timers)?;
        self.entity.tick(&mut self.surface, &mut self.timers);
        if let Some(behavior) = self.behavior.as_mut() {
            behavior.start(&mut self.timers);
        }
        self.started = true;

        info!(
            set = %self.initial_set,
            sets = self.entity.set_names().count(),
            behavior = self.behavior.is_some(),
            "Animation started"
        );
        Ok(())
    }

    /// Switch to another set and start playing it immediately
    pub fn play(&mut self, name: &str) -> Result<()> {
        if self.entity.active_set() == Some(name) {
            return Ok(());
        }
        self.entity.change_set(name, &mut self.timers)?;
        self.entity.tick(&mut self.surface, &mut self.timers);
        Ok(())
    }

    /// Forward a resize notification from the host window
    ///
    /// The surface is expected to already report the new size.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height);
        if self.entity.on_resize(viewport, &mut self.timers) {
            debug!(width, height, "Resize burst started");
        }
    }

    /// Run every timer due at or before `now_ms`
    ///
    /// Returns the number of timers dispatched.
    pub fn advance(&mut self, now_ms: u64) -> Result<usize> {
        let mut dispatched = 0;
        while dispatched < MAX_DISPATCH_PER_ADVANCE {
            let Some((token, event)) = self.timers.pop_next_until(now_ms) else {
                break;
            };
            dispatched += 1;

            match event {
                TimerEvent::Frame { generation } => {
                    self.entity
                        .on_frame_timer(token, generation, &mut self.surface, &mut self.timers);
                }
                TimerEvent::Settle { generation } => {
                    self.entity
                        .on_settle(generation, &mut self.surface, &mut self.timers);
                }
                TimerEvent::Behavior => {
                    if let Some(behavior) = self.behavior.as_mut() {
                        behavior.on_heartbeat(
                            token,
                            &mut self.entity,
                            &mut self.surface,
                            &mut self.timers,
                        )?;
                    }
                }
            }
        }

        if dispatched == MAX_DISPATCH_PER_ADVANCE {
            warn!(now_ms, "Timer dispatch limit reached, deferring the rest");
        } else {
            self.timers.advance_to(now_ms);
        }
        Ok(dispatched)
    }

    /// Stop every timer; the surface keeps whatever is drawn
    pub fn shutdown(&mut self) {
        self.entity.stop(&mut self.timers);
        if let Some(behavior) = self.behavior.as_mut() {
            behavior.stop(&mut self.timers);
        }
        self.started = false;
        debug!("Animation stopped");
    }

    /// Deadline of the next timer on the application clock
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Application clock in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Whether `start` has run
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The display surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The display surface, mutably (hosts update its size here)
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The animated entity
    pub fn entity(&self) -> &Entity<I> {
        &self.entity
    }

    /// The timer queue
    pub fn timers(&self) -> &TimerQueue<TimerEvent> {
        &self.timers
    }

    /// The behavior controller, if enabled
    pub fn behavior(&self) -> Option<&BehaviorController> {
        self.behavior.as_ref()
    }
}
