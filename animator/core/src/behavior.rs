//! Behavior Controller
//!
//! A deliberately simple policy: every `interval_ms` it bumps a counter, and
//! once the counter reaches `threshold` it flips the entity between two
//! animation sets (idle ↔ talking by default). It shows the calling
//! convention for the scheduler: `change_set` followed by `tick`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::Entity;
use crate::error::Result;
use crate::events::TimerEvent;
use crate::surface::{DisplaySurface, ImageService};
use crate::timer::{TimerService, TimerToken};

/// Behavior tuning
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Whether the controller runs at all
    pub enabled: bool,
    /// Heartbeat interval
    pub interval_ms: u64,
    /// Heartbeats between toggles
    pub threshold: u32,
    /// The two sets to alternate between
    pub sets: [String; 2],
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 250,
            threshold: 30,
            sets: ["idle".to_string(), "talking".to_string()],
        }
    }
}

/// Periodic idle/talking toggler
#[derive(Debug)]
pub struct BehaviorController {
    config: BehaviorConfig,
    counter: u32,
    token: Option<TimerToken>,
}

impl BehaviorController {
    /// Create a stopped controller
    pub fn new(config: BehaviorConfig) -> Self {
        Self {
            config,
            counter: 0,
            token: None,
        }
    }

    /// Heartbeats since the last toggle
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Configuration in use
    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    /// Arm the first heartbeat
    pub fn start<T>(&mut self, timers: &mut T)
    where
        T: TimerService<TimerEvent>,
    {
        if let Some(token) = self.token.take() {
            timers.cancel(token);
        }
        self.counter = 0;
        self.token = Some(timers.schedule_after(self.config.interval_ms, TimerEvent::Behavior));
    }

    /// Cancel the heartbeat; idempotent
    pub fn stop<T>(&mut self, timers: &mut T)
    where
        T: TimerService<TimerEvent>,
    {
        if let Some(token) = self.token.take() {
            timers.cancel(token);
        }
    }

    /// Handle a heartbeat
    ///
    /// Returns the name of the set switched to, if this heartbeat toggled.
    pub fn on_heartbeat<I, S, T>(
        &mut self,
        token: TimerToken,
        entity: &mut Entity<I>,
        surface: &mut S,
        timers: &mut T,
    ) -> Result<Option<String>>
    where
        I: ImageService,
        S: DisplaySurface<I::Handle>,
        T: TimerService<TimerEvent>,
    {
        if self.token != Some(token) {
            return Ok(None);
        }
        self.token = Some(timers.schedule_after(self.config.interval_ms, TimerEvent::Behavior));

        self.counter += 1;
        if self.counter < self.config.threshold {
            return Ok(None);
        }
        self.counter = 0;

        let [first, second] = &self.config.sets;
        let target = if entity.active_set() == Some(first.as_str()) {
            second
        } else {
            first
        };

        entity.change_set(target, timers)?;
        entity.tick(surface, timers);
        debug!(set = %target, "Behavior toggled animation set");
        Ok(Some(target.clone()))
    }
}
