use std::time::{Duration, Instant};

use super::clock::{Clock, SystemClock};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds (clamped).
    pub dt: f32,

    /// Timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

/// Produces one `FrameTime` per tick of the frame loop.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// produce a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock<C: Clock = SystemClock> {
    clock: C,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

const DEFAULT_DT_MIN: Duration = Duration::from_micros(100);
const DEFAULT_DT_MAX: Duration = Duration::from_millis(250);

impl FrameClock<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for FrameClock<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FrameClock<C> {
    /// Creates a frame clock reading time from `clock`, with default clamps.
    pub fn with_clock(clock: C) -> Self {
        Self::with_clamps(clock, DEFAULT_DT_MIN, DEFAULT_DT_MAX)
    }

    pub fn with_clamps(clock: C, dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let last = clock.now();
        Self {
            clock,
            last,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Number of ticks taken so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = self.clock.now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::with_clock(ManualClock::new());
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn dt_follows_manual_clock() {
        let manual = ManualClock::new();
        let mut clock = FrameClock::with_clock(manual.clone());

        manual.advance(Duration::from_millis(16));
        let ft = clock.tick();
        assert!((ft.dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn dt_is_clamped_both_ways() {
        let manual = ManualClock::new();
        let mut clock = FrameClock::with_clock(manual.clone());

        // No time passed: raised to the minimum.
        assert!((clock.tick().dt - 0.0001).abs() < 1e-7);

        // Long stall: capped.
        manual.advance(Duration::from_secs(5));
        assert!((clock.tick().dt - 0.25).abs() < 1e-6);
    }
}
