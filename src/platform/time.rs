//! Frame-time accumulator
//!
//! Converts measured frame deltas into a whole number of fixed simulation
//! ticks.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta fed into the accumulator (seconds)
pub const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's delta and return how many ticks to run now
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Too far behind; drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Fraction of a tick left over, for interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_tick_per_sixtieth() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(SIM_DT), 1);
        assert_eq!(clock.advance(0.04), 2);
        assert!(clock.alpha() > 0.0);
    }

    #[test]
    fn test_long_frames_capped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(0.5), MAX_SUBSTEPS);
        assert!(clock.advance(0.0) <= 1);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.alpha(), 0.0);
    }
}
