//=========================================================================
// Frame Timing
//=========================================================================
//
// Converts wall-clock frame boundaries into game time.
//
// Architecture:
//   Instant (per frame) → FrameClock::tick() → GameTime { elapsed, total }
//
// A reset makes the following frame report zero elapsed time, so a
// long blocking load does not show up as one giant simulation step.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

//=== GameTime ============================================================

/// Timing snapshot handed to every screen update and draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameTime {
    /// Time since the previous frame.
    pub elapsed: Duration,

    /// Accumulated game time since the clock started.
    pub total: Duration,
}

impl GameTime {
    /// Creates a snapshot with the given elapsed time and matching total.
    pub fn from_elapsed(elapsed: Duration) -> Self {
        Self { elapsed, total: elapsed }
    }

    /// Elapsed time in seconds.
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

//=== FrameClock ==========================================================

/// Produces a [`GameTime`] for each frame boundary.
#[derive(Debug, Default)]
pub struct FrameClock {
    last_frame: Option<Instant>,
    total: Duration,
    reset_pending: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock to `now` and returns the frame's timing.
    ///
    /// The first tick, and the first tick after [`FrameClock::reset`],
    /// report zero elapsed time.
    pub fn tick(&mut self, now: Instant) -> GameTime {
        let elapsed = match self.last_frame {
            Some(last) if !self.reset_pending => now.saturating_duration_since(last),
            _ => Duration::ZERO,
        };

        self.reset_pending = false;
        self.last_frame = Some(now);
        self.total += elapsed;

        GameTime { elapsed, total: self.total }
    }

    /// Discards the time between the last tick and the next one.
    pub fn reset(&mut self) {
        self.reset_pending = true;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
