//! Stepping and timed replay through the states of a finished run.

use std::time::Duration;

use icp_math::IterationState;

/// Smallest error decrease considered when scaling the frame delay.
const MIN_ERROR_DECREASE: f64 = 1e-4;

/// Delays used for animated playback.
///
/// Frames that remove a lot of error play quickly and nearly stalled frames
/// linger, so the eye lands on the iterations where the alignment changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTiming {
    /// Delay for a frame with negligible error decrease
    pub base_delay: Duration,
    /// Lower bound on any frame delay
    pub min_delay: Duration,
    /// Delay used when there is no next state to compare against
    pub idle_delay: Duration,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(800),
            min_delay: Duration::from_millis(100),
            idle_delay: Duration::from_millis(300),
        }
    }
}

impl PlaybackTiming {
    /// Delay before advancing from `from` to `to`.
    ///
    /// Scales with `log10(1 + 100 * decrease)`, clamped to `[0.1, 1]`.
    pub fn delay_between(&self, from: &IterationState, to: &IterationState) -> Duration {
        let decrease = (from.error - to.error).max(MIN_ERROR_DECREASE);
        let scale = (1.0 + decrease * 100.0).log10().clamp(0.1, 1.0);
        self.base_delay.mul_f64(1.0 - scale).max(self.min_delay)
    }
}

/// Cursor over a run's states, always within `0..len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    len: usize,
    current: usize,
    timing: PlaybackTiming,
}

impl Playback {
    pub fn new(len: usize) -> Self {
        Self::with_timing(len, PlaybackTiming::default())
    }

    pub fn with_timing(len: usize, timing: PlaybackTiming) -> Self {
        Self {
            len,
            current: 0,
            timing,
        }
    }

    /// Cursor over `states`, positioned at iteration 0.
    pub fn for_states(states: &[IterationState]) -> Self {
        Self::new(states.len())
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.current + 1 >= self.len
    }

    /// Moves one state forward. Returns false if already at the last state.
    pub fn step_forward(&mut self) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Moves one state back. Returns false if already at iteration 0.
    pub fn step_back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Jumps to `index`, clamped to the last state.
    pub fn seek(&mut self, index: usize) {
        self.current = index.min(self.len.saturating_sub(1));
    }

    /// How long to show the current state before stepping forward.
    pub fn frame_delay(&self, states: &[IterationState]) -> Duration {
        match (states.get(self.current), states.get(self.current + 1)) {
            (Some(from), Some(to)) => self.timing.delay_between(from, to),
            _ => self.timing.idle_delay,
        }
    }
}
