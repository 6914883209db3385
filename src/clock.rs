//! Scheduler Clock
//!
//! Logical "actual time" for the animation timeline. This is not wall-clock
//! system time: it starts at zero, advances only when the host's frame
//! ticker feeds it elapsed wall time, and can run temporarily fast during a
//! catch-up window. All animation start and end times are expressed on this
//! clock.
//!
//! # Catch-Up
//!
//! When the dispatcher declares the client catastrophically behind, it opens
//! a catch-up window: the clock multiplies incoming wall time by the
//! catch-up speed until the window's wall-time budget is spent, then reverts
//! to 1x on its own. A window cannot be re-opened while one is active, which
//! is what makes the policy fire exactly once per lag episode.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

/// Internal clock state
#[derive(Debug)]
struct ClockState {
    /// Current logical time in milliseconds
    now_ms: f64,
    /// Current playback speed multiplier
    speed: f64,
    /// Wall-time budget left in the active catch-up window, if any
    catch_up_wall_remaining_ms: f64,
}

/// Shared handle to the scheduler clock
///
/// Cheap to clone; the dispatcher, sequencing tests, and the host's frame
/// ticker all hold one.
#[derive(Clone, Debug)]
pub struct ClockHandle {
    state: Arc<Mutex<ClockState>>,
}

impl ClockHandle {
    /// Create a clock at logical time zero, speed 1x
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ClockState {
                now_ms: 0.0,
                speed: 1.0,
                catch_up_wall_remaining_ms: 0.0,
            })),
        }
    }

    /// Current logical time in milliseconds
    #[must_use]
    pub fn now(&self) -> u64 {
        let state = self.state.lock();
        state.now_ms as u64
    }

    /// Current playback speed multiplier
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.state.lock().speed
    }

    /// Whether a catch-up window is active
    #[must_use]
    pub fn is_catching_up(&self) -> bool {
        self.state.lock().catch_up_wall_remaining_ms > 0.0
    }

    /// Advance the clock by elapsed wall time
    ///
    /// Inside a catch-up window the elapsed time is multiplied by the
    /// catch-up speed; once the window's wall budget is spent the remainder
    /// of the delta advances at 1x and speed reverts.
    pub fn advance(&self, wall_delta_ms: f64) {
        let mut state = self.state.lock();
        if state.catch_up_wall_remaining_ms > 0.0 {
            let consumed = wall_delta_ms.min(state.catch_up_wall_remaining_ms);
            state.now_ms += consumed * state.speed;
            state.catch_up_wall_remaining_ms -= consumed;
            if state.catch_up_wall_remaining_ms <= 0.0 {
                info!(speed = state.speed, "catch-up window spent; reverting to 1x");
                state.speed = 1.0;
                state.catch_up_wall_remaining_ms = 0.0;
            }
            state.now_ms += wall_delta_ms - consumed;
        } else {
            state.now_ms += wall_delta_ms;
        }
    }

    /// Open a catch-up window: play at `speed` for `window_ms` of wall time
    ///
    /// Returns `false` without changing anything if a window is already
    /// active; catch-up fires at most once per lag episode.
    pub fn begin_catch_up(&self, speed: f64, window_ms: u64) -> bool {
        let mut state = self.state.lock();
        if state.catch_up_wall_remaining_ms > 0.0 {
            return false;
        }
        state.speed = speed;
        state.catch_up_wall_remaining_ms = window_ms as f64;
        true
    }
}

impl Default for ClockHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero_normal_speed() {
        let clock = ClockHandle::new();
        assert_eq!(clock.now(), 0);
        assert!((clock.speed() - 1.0).abs() < f64::EPSILON);
        assert!(!clock.is_catching_up());
    }

    #[test]
    fn test_advances_by_wall_time() {
        let clock = ClockHandle::new();
        clock.advance(16.7);
        clock.advance(16.7);
        assert_eq!(clock.now(), 33);
    }

    #[test]
    fn test_catch_up_multiplies_and_reverts() {
        let clock = ClockHandle::new();
        assert!(clock.begin_catch_up(500.0, 1000));
        assert!(clock.is_catching_up());

        // 1000ms of wall time at 500x = 500_000ms of logical time.
        clock.advance(1000.0);
        assert_eq!(clock.now(), 500_000);
        assert!(!clock.is_catching_up());
        assert!((clock.speed() - 1.0).abs() < f64::EPSILON);

        // Back to 1x afterwards.
        clock.advance(100.0);
        assert_eq!(clock.now(), 500_100);
    }

    #[test]
    fn test_catch_up_window_spans_partial_deltas() {
        let clock = ClockHandle::new();
        assert!(clock.begin_catch_up(10.0, 100));
        clock.advance(60.0);
        assert!(clock.is_catching_up());
        assert_eq!(clock.now(), 600);

        // 40ms remain in the window; the rest of this delta runs at 1x.
        clock.advance(100.0);
        assert_eq!(clock.now(), 600 + 400 + 60);
        assert!(!clock.is_catching_up());
    }

    #[test]
    fn test_catch_up_cannot_be_reopened_while_active() {
        let clock = ClockHandle::new();
        assert!(clock.begin_catch_up(500.0, 1000));
        assert!(!clock.begin_catch_up(500.0, 1000));
        clock.advance(1000.0);
        // After the window closes it may open again.
        assert!(clock.begin_catch_up(500.0, 1000));
    }
}
