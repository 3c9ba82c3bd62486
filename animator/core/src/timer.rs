//! Cooperative Timer Queue
//!
//! Every timer in the engine (frame ticks, resize settle checks, behavior
//! ticks) lives in one queue driven by a single event loop. The queue keeps
//! its own logical millisecond clock: the host advances it with
//! [`TimerQueue::advance_to`] and drains whatever became due. Tests drive the
//! same clock by hand, which makes the queue the fake clock as well.
//!
//! Cancellation is idempotent: cancelling an unknown, fired, or already
//! cancelled token does nothing.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Handle to a scheduled timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Raw sequence number (unique per queue)
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Scheduling seam used by the entity, debouncer and behavior controller
pub trait TimerService<E> {
    /// Run `event` after `delay_ms` milliseconds
    fn schedule_after(&mut self, delay_ms: u64, event: E) -> TimerToken;

    /// Cancel a timer; safe to call repeatedly or after it fired
    fn cancel(&mut self, token: TimerToken);

    /// Whether the timer is still waiting to fire
    fn is_pending(&self, token: TimerToken) -> bool;
}

#[derive(Debug)]
struct Scheduled<E> {
    deadline_ms: u64,
    event: E,
}

/// Single-threaded timer queue with a logical clock
#[derive(Debug)]
pub struct TimerQueue<E> {
    /// Current logical time
    now_ms: u64,
    /// Next token sequence number
    next_seq: u64,
    /// (deadline, seq) min-heap; may hold cancelled entries
    heap: BinaryHeap<Reverse<(u64, u64)>>,
    /// Live timers keyed by seq
    live: HashMap<u64, Scheduled<E>>,
}

impl<E> TimerQueue<E> {
    /// Create an empty queue at time zero
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            heap: BinaryHeap::new(),
            live: HashMap::new(),
        }
    }

    /// Current logical time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Move the clock forward; never moves backwards
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Move the clock forward by `delta_ms`
    pub fn advance_by(&mut self, delta_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
    }

    /// Remove and return the earliest timer whose deadline has passed
    ///
    /// Timers sharing a deadline fire in the order they were scheduled.
    pub fn pop_due(&mut self) -> Option<(TimerToken, E)> {
        while let Some(&Reverse((deadline_ms, seq))) = self.heap.peek() {
            if !self.live.contains_key(&seq) {
                // Cancelled; drop the tombstone
                self.heap.pop();
                continue;
            }
            if deadline_ms > self.now_ms {
                return None;
            }
            self.heap.pop();
            return self
                .live
                .remove(&seq)
                .map(|scheduled| (TimerToken(seq), scheduled.event));
        }
        None
    }

    /// Pop the earliest timer due at or before `target_ms`, moving the clock
    /// to its deadline first
    ///
    /// Draining with this instead of `advance_to(target_ms)` + `pop_due`
    /// makes timers rescheduled from a callback count from the moment that
    /// callback fired, as they would on a real event loop.
    pub fn pop_next_until(&mut self, target_ms: u64) -> Option<(TimerToken, E)> {
        let deadline = self.next_deadline()?;
        if deadline > target_ms {
            return None;
        }
        self.advance_to(deadline);
        self.pop_due()
    }

    /// Deadline of the earliest live timer
    pub fn next_deadline(&self) -> Option<u64> {
        self.live.values().map(|s| s.deadline_ms).min()
    }

    /// Number of live timers
    pub fn pending_count(&self) -> usize {
        self.live.len()
    }

    /// Number of live timers whose event matches `pred`
    pub fn pending_where(&self, mut pred: impl FnMut(&E) -> bool) -> usize {
        self.live.values().filter(|s| pred(&s.event)).count()
    }

    /// Deadline of a live timer
    pub fn deadline_of(&self, token: TimerToken) -> Option<u64> {
        self.live.get(&token.0).map(|s| s.deadline_ms)
    }
}

impl<E> TimerService<E> for TimerQueue<E> {
    fn schedule_after(&mut self, delay_ms: u64, event: E) -> TimerToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        let deadline_ms = self.now_ms.saturating_add(delay_ms);
        self.heap.push(Reverse((deadline_ms, seq)));
        self.live.insert(seq, Scheduled { deadline_ms, event });
        TimerToken(seq)
    }

    fn cancel(&mut self, token: TimerToken) {
        self.live.remove(&token.0);
    }

    fn is_pending(&self, token: TimerToken) -> bool {
        self.live.contains_key(&token.0)
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_only_when_due() {
        let mut timers = TimerQueue::new();
        timers.schedule_after(100, "a");

        assert_eq!(timers.pop_due(), None);
        timers.advance_to(99);
        assert_eq!(timers.pop_due(), None);
        timers.advance_to(100);
        assert_eq!(timers.pop_due().map(|(_, e)| e), Some("a"));
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_due_order_then_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule_after(50, "late");
        timers.schedule_after(10, "first");
        timers.schedule_after(10, "second");
        timers.advance_to(100);

        let fired: Vec<_> = std::iter::from_fn(|| timers.pop_due().map(|(_, e)| e)).collect();
        assert_eq!(fired, vec!["first", "second", "late"]);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timers = TimerQueue::new();
        let token = timers.schedule_after(10, ());
        assert!(timers.is_pending(token));

        timers.cancel(token);
        timers.cancel(token);
        assert!(!timers.is_pending(token));

        timers.advance_to(20);
        assert_eq!(timers.pop_due(), None);
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut timers = TimerQueue::new();
        let token = timers.schedule_after(0, 1);
        let other = timers.schedule_after(5, 2);
        assert_eq!(timers.pop_due(), Some((token, 1)));

        timers.cancel(token);
        assert!(timers.is_pending(other));
    }

    #[test]
    fn test_pop_next_until_steps_the_clock() {
        let mut timers = TimerQueue::new();
        timers.schedule_after(100, "a");

        let (_, first) = timers.pop_next_until(1000).unwrap();
        assert_eq!(first, "a");
        assert_eq!(timers.now_ms(), 100);

        // Rescheduled from the callback: counts from 100, not 1000
        timers.schedule_after(100, "b");
        assert_eq!(timers.next_deadline(), Some(200));
        assert_eq!(timers.pop_next_until(150), None);
        assert_eq!(timers.pop_next_until(1000).map(|(_, e)| e), Some("b"));
    }

    #[test]
    fn test_clock_never_rewinds() {
        let mut timers: TimerQueue<()> = TimerQueue::new();
        timers.advance_to(500);
        timers.advance_to(200);
        assert_eq!(timers.now_ms(), 500);
        timers.advance_by(25);
        assert_eq!(timers.now_ms(), 525);
    }

    #[test]
    fn test_next_deadline_skips_cancelled() {
        let mut timers = TimerQueue::new();
        let early = timers.schedule_after(10, "early");
        timers.schedule_after(40, "late");
        assert_eq!(timers.next_deadline(), Some(10));

        timers.cancel(early);
        assert_eq!(timers.next_deadline(), Some(40));
        assert_eq!(timers.pending_where(|e| *e == "late"), 1);
    }
}
