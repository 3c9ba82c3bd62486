//! Resize Debouncer
//!
//! Absorbs bursts of resize notifications and asks for one redraw once the
//! viewport stops changing. The first notification that differs from the
//! last rendered size arms a settle timer; later notifications are ignored
//! while it is pending. When the timer fires the debouncer reads the host's
//! *current* size:
//!
//! - same as last rendered: the viewport has settled, go idle
//! - different: request a redraw at the new size and schedule a confirmation
//!   check, so a user who is still dragging the window edge gets an adaptive
//!   polling loop that converges when they let go
//!
//! Degenerate sizes (not laid out yet) never arm a timer.

use tracing::{debug, trace};

use crate::events::TimerEvent;
use crate::layout::Viewport;
use crate::timer::{TimerService, TimerToken};

/// Default settle delay
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 200;

/// Debouncer state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebounceState {
    /// No settle check outstanding
    Idle,
    /// Waiting for the settle timer
    PendingSettle { token: TimerToken, generation: u64 },
}

/// Result of a settle timer firing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Stale timer; nothing happened
    Ignored,
    /// Viewport matches what was last rendered; back to idle
    Stable,
    /// Viewport changed; redraw at this size (a confirmation check is armed)
    Redraw(Viewport),
    /// Viewport collapsed while pending; back to idle without drawing
    Abandoned,
}

/// Resize debounce state machine
#[derive(Debug)]
pub struct ResizeDebouncer {
    settle_delay_ms: u64,
    state: DebounceState,
    /// Bumped whenever a pending check is superseded or cancelled
    generation: u64,
    /// Viewport the displayed frame was last laid out for
    last_rendered: Option<Viewport>,
}

impl ResizeDebouncer {
    /// Create an idle debouncer
    pub fn new(settle_delay_ms: u64) -> Self {
        Self {
            settle_delay_ms,
            state: DebounceState::Idle,
            generation: 0,
            last_rendered: None,
        }
    }

    /// Current state
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Whether a settle check is outstanding
    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::PendingSettle { .. })
    }

    /// Viewport of the last render
    pub fn last_rendered(&self) -> Option<Viewport> {
        self.last_rendered
    }

    /// Configured settle delay
    pub fn settle_delay_ms(&self) -> u64 {
        self.settle_delay_ms
    }

    /// Record that a frame was laid out for `viewport`
    pub fn mark_rendered(&mut self, viewport: Viewport) {
        self.last_rendered = Some(viewport);
    }

    /// Handle a resize notification from the host
    ///
    /// Returns `true` if a settle timer was armed.
    pub fn on_resize<T>(&mut self, viewport: Viewport, timers: &mut T) -> bool
    where
        T: TimerService<TimerEvent>,
    {
        if viewport.is_degenerate() {
            trace!(width = viewport.width, height = viewport.height, "Ignoring degenerate resize");
            return false;
        }

        match self.state {
            DebounceState::PendingSettle { .. } => false,
            DebounceState::Idle => {
                if self.last_rendered == Some(viewport) {
                    return false;
                }
                self.arm(timers);
                debug!(
                    width = viewport.width,
                    height = viewport.height,
                    delay_ms = self.settle_delay_ms,
                    "Resize settle armed"
                );
                true
            }
        }
    }

    /// Handle a settle timer firing with the host's current viewport
    pub fn on_settle<T>(&mut self, generation: u64, current: Viewport, timers: &mut T) -> SettleOutcome
    where
        T: TimerService<TimerEvent>,
    {
        match self.state {
            DebounceState::PendingSettle {
                generation: pending, ..
            } if pending == generation => {}
            _ => {
                trace!(generation, "Stale settle timer ignored");
                return SettleOutcome::Ignored;
            }
        }

        self.state = DebounceState::Idle;

        if current.is_degenerate() {
            return SettleOutcome::Abandoned;
        }

        if self.last_rendered == Some(current) {
            trace!(width = current.width, height = current.height, "Viewport settled");
            return SettleOutcome::Stable;
        }

        self.last_rendered = Some(current);
        self.arm(timers);
        SettleOutcome::Redraw(current)
    }

    /// Drop any pending settle check; idempotent
    pub fn cancel<T>(&mut self, timers: &mut T)
    where
        T: TimerService<TimerEvent>,
    {
        if let DebounceState::PendingSettle { token, .. } = self.state {
            timers.cancel(token);
        }
        self.generation += 1;
        self.state = DebounceState::Idle;
    }

    fn arm<T>(&mut self, timers: &mut T)
    where
        T: TimerService<TimerEvent>,
    {
        self.generation += 1;
        let generation = self.generation;
        let token = timers.schedule_after(self.settle_delay_ms, TimerEvent::Settle { generation });
        self.state = DebounceState::PendingSettle { token, generation };
    }
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_DELAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerQueue;
    use pretty_assertions::assert_eq;

    fn fire(
        debouncer: &mut ResizeDebouncer,
        timers: &mut TimerQueue<TimerEvent>,
        current: Viewport,
    ) -> Vec<SettleOutcome> {
        let mut outcomes = Vec::new();
        while let Some((_, event)) = timers.pop_due() {
            if let TimerEvent::Settle { generation } = event {
                outcomes.push(debouncer.on_settle(generation, current, timers));
            }
        }
        outcomes
    }

    #[test]
    fn test_burst_yields_single_redraw_at_final_size() {
        let mut timers = TimerQueue::new();
        let mut debouncer = ResizeDebouncer::new(200);
        debouncer.mark_rendered(Viewport::new(1280, 720));

        let sizes = [(1200, 700), (1100, 680), (1000, 660), (900, 620), (800, 600)];
        for (i, (w, h)) in sizes.into_iter().enumerate() {
            timers.advance_to(i as u64 * 10);
            debouncer.on_resize(Viewport::new(w, h), &mut timers);
        }
        assert_eq!(timers.pending_count(), 1);

        let final_size = Viewport::new(800, 600);
        timers.advance_to(200);
        assert_eq!(
            fire(&mut debouncer, &mut timers, final_size),
            vec![SettleOutcome::Redraw(final_size)]
        );

        // Confirmation check finds nothing new
        timers.advance_to(400);
        assert_eq!(
            fire(&mut debouncer, &mut timers, final_size),
            vec![SettleOutcome::Stable]
        );
        assert_eq!(debouncer.state(), DebounceState::Idle);
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_still_resizing_keeps_polling() {
        let mut timers = TimerQueue::new();
        let mut debouncer = ResizeDebouncer::new(100);
        debouncer.mark_rendered(Viewport::new(500, 500));

        debouncer.on_resize(Viewport::new(600, 500), &mut timers);
        timers.advance_to(100);
        assert_eq!(
            fire(&mut debouncer, &mut timers, Viewport::new(650, 500)),
            vec![SettleOutcome::Redraw(Viewport::new(650, 500))]
        );

        timers.advance_to(200);
        assert_eq!(
            fire(&mut debouncer, &mut timers, Viewport::new(700, 500)),
            vec![SettleOutcome::Redraw(Viewport::new(700, 500))]
        );

        timers.advance_to(300);
        assert_eq!(
            fire(&mut debouncer, &mut timers, Viewport::new(700, 500)),
            vec![SettleOutcome::Stable]
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_same_size_does_not_arm() {
        let mut timers = TimerQueue::new();
        let mut debouncer = ResizeDebouncer::new(200);
        debouncer.mark_rendered(Viewport::new(800, 600));

        assert!(!debouncer.on_resize(Viewport::new(800, 600), &mut timers));
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_degenerate_sizes_ignored() {
        let mut timers = TimerQueue::new();
        let mut debouncer = ResizeDebouncer::new(200);

        assert!(!debouncer.on_resize(Viewport::new(0, 0), &mut timers));
        assert!(!debouncer.on_resize(Viewport::new(1, 400), &mut timers));
        assert_eq!(debouncer.state(), DebounceState::Idle);
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_collapse_while_pending_abandons() {
        let mut timers = TimerQueue::new();
        let mut debouncer = ResizeDebouncer::new(50);
        debouncer.on_resize(Viewport::new(300, 300), &mut timers);

        timers.advance_to(50);
        assert_eq!(
            fire(&mut debouncer, &mut timers, Viewport::new(1, 1)),
            vec![SettleOutcome::Abandoned]
        );
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_cancelled_settle_is_stale() {
        let mut timers = TimerQueue::new();
        let mut debouncer = ResizeDebouncer::new(50);
        debouncer.on_resize(Viewport::new(300, 300), &mut timers);

        let DebounceState::PendingSettle { generation, .. } = debouncer.state() else {
            panic!("expected a pending settle");
        };
        debouncer.cancel(&mut timers);
        debouncer.cancel(&mut timers);

        assert_eq!(
            debouncer.on_settle(generation, Viewport::new(300, 300), &mut timers),
            SettleOutcome::Ignored
        );
        assert_eq!(timers.pending_count(), 0);
    }
}
