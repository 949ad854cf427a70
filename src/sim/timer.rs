//! Named timers measured against the simulation clock

use serde::{Deserialize, Serialize};

/// A one-shot window that starts when armed and lasts `duration` seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub duration: f32,
    started_at: f32,
    armed: bool,
}

impl Timer {
    pub const fn new(duration: f32) -> Self {
        Self {
            duration,
            started_at: 0.0,
            armed: false,
        }
    }

    /// Start (or restart) the window at `now`
    pub fn arm(&mut self, now: f32) {
        self.started_at = now;
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// True while armed and inside the window
    pub fn is_running(&self, now: f32) -> bool {
        self.armed && now - self.started_at < self.duration
    }

    /// True when never armed or the window has passed
    pub fn expired(&self, now: f32) -> bool {
        !self.is_running(now)
    }

    /// Seconds since arming (0 if never armed)
    pub fn elapsed(&self, now: f32) -> f32 {
        if self.armed { now - self.started_at } else { 0.0 }
    }
}
