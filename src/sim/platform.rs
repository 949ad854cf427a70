//! Platforms: static slabs and oscillating movers
//!
//! Platforms are the only terrain. Everything that stands on one (enemies,
//! chests, portals, dropped pickups) refers to it by [`PlatformId`] and picks
//! up its per-tick motion through [`Platform::last_delta`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::PLATFORM_WIDTH;

/// Stable handle to a platform within a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlatformId(pub u32);

/// Back-and-forth motion along one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    /// Midpoint of travel
    pub center: f32,
    /// Half the travel distance
    pub amplitude: f32,
    /// px per tick
    pub speed: f32,
    /// Heading toward `center + amplitude` (down or right)
    pub toward_far: bool,
}

impl Oscillation {
    /// Starts at the center, heading toward the far bound
    pub fn new(center: f32, amplitude: f32, speed: f32) -> Self {
        Self {
            center,
            amplitude: amplitude.abs(),
            speed: speed.abs(),
            toward_far: true,
        }
    }

    pub fn near(&self) -> f32 {
        self.center - self.amplitude
    }

    pub fn far(&self) -> f32 {
        self.center + self.amplitude
    }

    /// Advance `pos` by one tick. Lands exactly on a bound when it would
    /// overshoot and flips direction there.
    pub fn step(&mut self, pos: f32) -> f32 {
        let pos = pos.clamp(self.near(), self.far());
        if self.toward_far {
            let next = pos + self.speed;
            if next >= self.far() {
                self.toward_far = false;
                self.far()
            } else {
                next
            }
        } else {
            let next = pos - self.speed;
            if next <= self.near() {
                self.toward_far = true;
                self.near()
            } else {
                next
            }
        }
    }
}

/// Motion category of a platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    Static,
    /// Oscillates along y
    Vertical(Oscillation),
    /// Oscillates along x
    Horizontal(Oscillation),
}

impl PlatformKind {
    pub fn is_oscillating(&self) -> bool {
        !matches!(self, PlatformKind::Static)
    }
}

/// Where a platform sits in the level's chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformRole {
    Start,
    Normal,
    /// Wide platform carrying the upgrade chest
    Reward,
    /// Final platform carrying the portal
    Exit,
}

/// A platform. `pos` is the top-left corner of its surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub pos: Vec2,
    pub length: f32,
    /// Thickness
    pub width: f32,
    pub kind: PlatformKind,
    pub role: PlatformRole,
    /// Movement applied during the last `step`, inherited by riders
    pub last_delta: Vec2,
}

impl Platform {
    pub fn new(id: PlatformId, pos: Vec2, length: f32, kind: PlatformKind, role: PlatformRole) -> Self {
        Self {
            id,
            pos,
            length,
            width: PLATFORM_WIDTH,
            kind,
            role,
            last_delta: Vec2::ZERO,
        }
    }

    /// Advance oscillation by one tick, recording the delta
    pub fn step(&mut self) -> Vec2 {
        let before = self.pos;
        match &mut self.kind {
            PlatformKind::Static => {}
            PlatformKind::Vertical(osc) => self.pos.y = osc.step(self.pos.y),
            PlatformKind::Horizontal(osc) => self.pos.x = osc.step(self.pos.x),
        }
        self.last_delta = self.pos - before;
        self.last_delta
    }

    /// Camera scroll. Horizontal movers carry their travel window with them.
    pub fn scroll(&mut self, dx: f32) {
        self.pos.x -= dx;
        if let PlatformKind::Horizontal(osc) = &mut self.kind {
            osc.center -= dx;
        }
    }

    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.length
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.length / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.length, self.width)
    }

    /// Thin strip along the walkable surface
    pub fn top_strip(&self) -> Rect {
        Rect::new(self.pos.x + 4.0, self.pos.y - 3.0, self.length - 8.0, 2.0)
    }

    pub fn left_strip(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y + 2.0, 1.0, self.width - 4.0)
    }

    pub fn right_strip(&self) -> Rect {
        Rect::new(self.right_edge() - 1.0, self.pos.y + 2.0, 1.0, self.width - 4.0)
    }

    /// Rightmost x the platform can ever reach
    pub fn anchor_right(&self) -> f32 {
        match self.kind {
            PlatformKind::Horizontal(osc) => osc.far() + self.length,
            _ => self.right_edge(),
        }
    }

    /// Lowest (`downward`) or highest y the platform can reach
    pub fn anchor_y(&self, downward: bool) -> f32 {
        match self.kind {
            PlatformKind::Vertical(osc) if downward => osc.far(),
            PlatformKind::Vertical(osc) => osc.near(),
            _ => self.pos.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vertical(y: f32, amplitude: f32, speed: f32) -> Platform {
        Platform::new(
            PlatformId(1),
            Vec2::new(100.0, y),
            140.0,
            PlatformKind::Vertical(Oscillation::new(y, amplitude, speed)),
            PlatformRole::Normal,
        )
    }

    #[test]
    fn test_vertical_flips_at_far_bound() {
        let mut p = vertical(300.0, 30.0, 1.0);
        for _ in 0..30 {
            p.step();
        }
        assert_eq!(p.pos.y, 330.0);
        let PlatformKind::Vertical(osc) = p.kind else {
            unreachable!()
        };
        assert!(!osc.toward_far);
        let delta = p.step();
        assert_eq!(delta, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_horizontal_scroll_moves_window() {
        let mut p = Platform::new(
            PlatformId(2),
            Vec2::new(500.0, 300.0),
            140.0,
            PlatformKind::Horizontal(Oscillation::new(500.0, 40.0, 1.0)),
            PlatformRole::Normal,
        );
        p.scroll(10.0);
        assert_eq!(p.pos.x, 490.0);
        assert_eq!(p.anchor_right(), 490.0 + 40.0 + 140.0);
    }

    #[test]
    fn test_strips() {
        let p = Platform::new(
            PlatformId(3),
            Vec2::new(0.0, 100.0),
            100.0,
            PlatformKind::Static,
            PlatformRole::Normal,
        );
        assert_eq!(p.top_strip(), Rect::new(4.0, 97.0, 92.0, 2.0));
        assert_eq!(p.right_strip().x, 99.0);
        assert_eq!(p.anchor_y(true), 100.0);
    }

    proptest! {
        #[test]
        fn oscillation_stays_in_bounds_and_flips_once_per_touch(
            center in -500.0f32..1500.0,
            amplitude in 30.0f32..70.0,
            speed in (5u32..20).prop_map(|i| i as f32 / 12.0),
            ticks in 1usize..2000,
            scroll_every in 1usize..50,
        ) {
            let mut p = Platform::new(
                PlatformId(9),
                Vec2::new(center, 300.0),
                140.0,
                PlatformKind::Horizontal(Oscillation::new(center, amplitude, speed)),
                PlatformRole::Normal,
            );
            let mut last_dir = true;
            for t in 0..ticks {
                p.step();
                if t % scroll_every == 0 {
                    p.scroll(1.0);
                }
                let PlatformKind::Horizontal(osc) = p.kind else { unreachable!() };
                prop_assert!(osc.near() <= p.pos.x + 1e-2);
                prop_assert!(p.pos.x <= osc.far() + 1e-2);
                if osc.toward_far != last_dir {
                    // A flip only ever happens on the bound just reached
                    let bound = if last_dir { osc.far() } else { osc.near() };
                    prop_assert!((p.pos.x - bound).abs() < 1e-2);
                }
                last_dir = osc.toward_far;
            }
        }
    }
}
