//! Frame clock: turns display-frame timestamps into elapsed milliseconds.
//!
//! Game speed depends on wall-clock time, not on how many frames are drawn.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameClock {
    last: Option<u64>,
    running: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or resume) the clock. The next frame reports zero elapsed time.
    pub fn start(&mut self) {
        self.running = true;
        self.last = None;
    }

    /// Stop the clock. Stopping twice is harmless.
    pub fn stop(&mut self) {
        self.running = false;
        self.last = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Milliseconds since the previous frame, or `None` while stopped.
    ///
    /// Timestamps that go backwards count as zero.
    pub fn delta(&mut self, timestamp_ms: u64) -> Option<u32> {
        if !self.running {
            return None;
        }
        let elapsed = match self.last {
            Some(prev) => timestamp_ms.saturating_sub(prev),
            None => 0,
        };
        self.last = Some(timestamp_ms);
        Some(elapsed.min(u32::MAX as u64) as u32)
    }
}
