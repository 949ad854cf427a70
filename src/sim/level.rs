//! Levels: the platform chain, theme and (optionally) a boss
//!
//! Platforms live in a deque ordered by id: new ones are appended at the
//! tail by the generator, old ones popped from the head once they scroll
//! away. Ids only grow, so lookups are a binary search.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::enemy::EnemyKind;
use super::platform::{Platform, PlatformId, PlatformKind, PlatformRole};
use crate::Tuning;
use crate::consts::{FINAL_LEVEL, PLAYER_SIZE, SCREEN_HEIGHT};

/// Right edge past the left side of the screen before a platform is dropped
pub const PLATFORM_CULL_X: f32 = -30.0;
/// Right edge past the left side before a host's riders are dropped
pub const HOST_CULL_X: f32 = -5.0;

/// Art set and physics flavour of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Grassland,
    Underworld,
    Ice,
}

impl Theme {
    pub fn for_level(number: u32) -> Self {
        match number {
            0..=5 => Theme::Grassland,
            6..=10 => Theme::Underworld,
            _ => Theme::Ice,
        }
    }

    /// Player horizontal acceleration
    pub fn accel_x(self) -> f32 {
        match self {
            Theme::Ice => 0.15,
            _ => 0.25,
        }
    }

    pub fn is_slippery(self) -> bool {
        self == Theme::Ice
    }

    /// Enemy type for regular platform squads
    pub fn enemy_kind(self) -> EnemyKind {
        match self {
            Theme::Grassland => EnemyKind::Basic,
            Theme::Underworld => EnemyKind::Underworld,
            Theme::Ice => EnemyKind::Ice,
        }
    }

    /// Enemy type for boss swarms: mostly basic, with the occasional
    /// themed one
    pub fn swarm_kind(self, rng: &mut impl Rng) -> EnemyKind {
        match rng.random_range(1..=8) {
            1 if self == Theme::Ice => EnemyKind::Ice,
            2 if self != Theme::Grassland => EnemyKind::Underworld,
            _ => EnemyKind::Basic,
        }
    }
}

/// Whether level `number` ends in a boss fight
pub fn is_boss_level(number: u32) -> bool {
    number > 0 && number <= FINAL_LEVEL && number % 5 == 0
}

/// How far the generator has got through the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationPhase {
    /// Appending regular platforms
    Open,
    /// Reward platform placed, exit next
    RewardPlaced,
    /// Exit placed; nothing more will be generated
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub number: u32,
    pub theme: Theme,
    pub platforms: VecDeque<Platform>,
    /// Regular platforms to generate; `None` on boss levels
    pub max_platforms: Option<u32>,
    /// Regular platforms generated so far (the start platform is not counted)
    pub generated: u32,
    pub phase: GenerationPhase,
    pub boss: Option<Boss>,
    pub start_platform: PlatformId,
    next_platform_id: u32,
}

impl Level {
    fn with_start(number: u32, max_platforms: Option<u32>, boss: Option<Boss>) -> Self {
        let mut level = Self {
            number,
            theme: Theme::for_level(number),
            platforms: VecDeque::new(),
            max_platforms,
            generated: 0,
            phase: GenerationPhase::Open,
            boss,
            start_platform: PlatformId(0),
            next_platform_id: 1,
        };
        level.start_platform = level.push_platform(
            Vec2::new(200.0, SCREEN_HEIGHT / 2.0 - 100.0),
            100.0,
            PlatformKind::Static,
            PlatformRole::Start,
        );
        level
    }

    /// Regular level generating `max_platforms` platforms
    pub fn new(number: u32, max_platforms: u32) -> Self {
        Self::with_start(number, Some(max_platforms), None)
    }

    /// Boss level that generates until the boss is beaten
    pub fn with_boss(number: u32, boss: Boss) -> Self {
        Self::with_start(number, None, Some(boss))
    }

    /// The level for ordinal `number` under `tuning`
    pub fn for_number(number: u32, tuning: &Tuning) -> Self {
        if is_boss_level(number) {
            Self::with_boss(number, Boss::new(tuning.boss_health, tuning.boss_breakpoint_step))
        } else {
            Self::new(number, tuning.level_budget(number))
        }
    }

    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    /// Boss beaten (always false on regular levels)
    pub fn boss_defeated(&self) -> bool {
        self.boss.as_ref().is_some_and(|b| b.level_over)
    }

    /// Regular budget used up, or boss beaten
    pub fn budget_reached(&self) -> bool {
        match self.max_platforms {
            Some(max) => self.generated >= max,
            None => self.boss_defeated(),
        }
    }

    /// Append a platform at the tail
    pub fn push_platform(
        &mut self,
        pos: Vec2,
        length: f32,
        kind: PlatformKind,
        role: PlatformRole,
    ) -> PlatformId {
        let id = PlatformId(self.next_platform_id);
        self.next_platform_id += 1;
        self.platforms.push_back(Platform::new(id, pos, length, kind, role));
        id
    }

    pub fn platform(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.platforms[i])
    }

    /// Host lookup that also rejects hosts scrolled past the left edge
    pub fn live_host(&self, id: PlatformId) -> Option<&Platform> {
        self.platform(id).filter(|p| p.right_edge() >= HOST_CULL_X)
    }

    pub fn tail(&self) -> Option<&Platform> {
        self.platforms.back()
    }

    /// Advance every oscillating platform one tick
    pub fn step_platforms(&mut self) {
        for platform in &mut self.platforms {
            platform.step();
        }
    }

    /// Pop platforms whose right edge left the screen. Returns how many.
    pub fn cull_platforms(&mut self) -> usize {
        let mut removed = 0;
        while self
            .platforms
            .front()
            .is_some_and(|p| p.right_edge() < PLATFORM_CULL_X)
        {
            self.platforms.pop_front();
            removed += 1;
        }
        removed
    }

    pub fn scroll(&mut self, dx: f32) {
        for platform in &mut self.platforms {
            platform.scroll(dx);
        }
    }

    /// Where the player appears when the level starts
    pub fn spawn_point(&self) -> Vec2 {
        let start_y = SCREEN_HEIGHT / 2.0 - 100.0;
        match self.platform(self.start_platform) {
            Some(p) => Vec2::new(p.center_x(), p.pos.y - 2.0 * PLAYER_SIZE.y),
            None => Vec2::new(250.0, start_y - 2.0 * PLAYER_SIZE.y),
        }
    }
}
