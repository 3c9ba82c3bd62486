//! Timer Events
//!
//! What a timer carries back to the application when it fires. Frame and
//! settle events are stamped with the generation they were issued for so a
//! callback that outlived a set change or a superseded settle check becomes a
//! no-op instead of corrupting state.

/// Payload of a scheduled timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    /// Show the next frame of the active animation set
    Frame { generation: u64 },
    /// Re-check the viewport after a resize burst
    Settle { generation: u64 },
    /// Behavior controller heartbeat
    Behavior,
}

impl TimerEvent {
    /// True for frame ticks
    pub fn is_frame(&self) -> bool {
        matches!(self, Self::Frame { .. })
    }

    /// True for settle checks
    pub fn is_settle(&self) -> bool {
        matches!(self, Self::Settle { .. })
    }
}
