//! Shared kinematics for moving entities

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position/velocity/acceleration integrated once per tick (px, px/tick, px/tick²)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
}

impl Body {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    pub fn moving(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            accel: Vec2::ZERO,
        }
    }

    /// Semi-implicit Euler step: velocity first, then position
    pub fn integrate(&mut self) {
        self.vel += self.accel;
        self.pos += self.vel;
    }

    /// Zero velocity and acceleration in place
    pub fn halt(&mut self) {
        self.vel = Vec2::ZERO;
        self.accel = Vec2::ZERO;
    }

    pub fn shift(&mut self, delta: Vec2) {
        self.pos += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_ballistic() {
        let mut body = Body::moving(Vec2::ZERO, Vec2::new(4.0, -8.0));
        body.accel = Vec2::new(0.0, 0.25);
        body.integrate();
        assert_eq!(body.vel, Vec2::new(4.0, -7.75));
        assert_eq!(body.pos, Vec2::new(4.0, -7.75));
        body.halt();
        body.integrate();
        assert_eq!(body.pos, Vec2::new(4.0, -7.75));
    }
}
