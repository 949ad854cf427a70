//! Procedural platform generation
//!
//! Called once per tick. Appends at most one platform, and only once the
//! tail has scrolled close enough to the right edge. A regular level emits
//! its budget of platforms, then a reward platform and finally an exit; a
//! boss level keeps going until the boss is beaten and then does the same.

use glam::Vec2;
use rand::Rng;

use super::chest::ChestContents;
use super::enemy::EnemyKind;
use super::level::{GenerationPhase, Level};
use super::pickup::Potion;
use super::platform::{Oscillation, Platform, PlatformId, PlatformKind, PlatformRole};
use super::weapon::WeaponKind;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, TILE};

/// The tail's left edge must be at or left of this for generation to run
pub const GENERATION_X: f32 = SCREEN_WIDTH - 60.0;
/// Keep-away distance from the top/bottom before the chain is steered back
pub const EDGE_MARGIN: f32 = 150.0;
pub const BOSS_EDGE_MARGIN: f32 = 300.0;
/// Gap before the reward and exit platforms
const TERMINAL_GAP: f32 = 60.0;
const TERMINAL_LENGTH: f32 = 180.0;
/// Platform centers are kept inside this vertical band
const MIN_Y: f32 = 80.0;
const MAX_Y: f32 = SCREEN_HEIGHT - 80.0;

/// Something to place on a freshly generated platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spawn {
    Enemy { kind: EnemyKind, speed: f32 },
    Chest(ChestContents),
    Portal,
}

/// A newly appended platform and what stands on it
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub platform: PlatformId,
    pub role: PlatformRole,
    pub spawns: Vec<Spawn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Static,
    Vertical,
    Horizontal,
}

fn tiles(rng: &mut impl Rng, lo: u32, hi: u32) -> f32 {
    rng.random_range(lo..=hi) as f32 * TILE
}

/// Extend the level by one platform if it is due
pub fn generate(level: &mut Level, rng: &mut impl Rng) -> Option<Generated> {
    let prev = level.tail()?.clone();
    if prev.pos.x > GENERATION_X {
        return None;
    }

    match level.phase {
        GenerationPhase::Finished => None,
        GenerationPhase::RewardPlaced => {
            let id = push_terminal(level, &prev, PlatformRole::Exit);
            level.phase = GenerationPhase::Finished;
            log::debug!("Level {}: exit platform placed", level.number);
            Some(Generated {
                platform: id,
                role: PlatformRole::Exit,
                spawns: vec![Spawn::Portal],
            })
        }
        GenerationPhase::Open if level.budget_reached() => {
            let id = push_terminal(level, &prev, PlatformRole::Reward);
            level.phase = GenerationPhase::RewardPlaced;
            log::debug!("Level {}: reward platform placed", level.number);
            Some(Generated {
                platform: id,
                role: PlatformRole::Reward,
                spawns: vec![Spawn::Chest(ChestContents::Upgrade(Potion::roll(rng)))],
            })
        }
        GenerationPhase::Open => {
            let id = push_regular(level, &prev, rng);
            level.generated += 1;
            let spawns = if level.is_boss() {
                boss_spawns(level, rng)
            } else {
                regular_spawns(level, rng)
            };
            Some(Generated {
                platform: id,
                role: PlatformRole::Normal,
                spawns,
            })
        }
    }
}

fn push_terminal(level: &mut Level, prev: &Platform, role: PlatformRole) -> PlatformId {
    let pos = Vec2::new(prev.anchor_right() + TERMINAL_GAP, prev.pos.y);
    level.push_platform(pos, TERMINAL_LENGTH, PlatformKind::Static, role)
}

fn push_regular(level: &mut Level, prev: &Platform, rng: &mut impl Rng) -> PlatformId {
    let category = match rng.random_range(1..=4) {
        1 if !matches!(prev.kind, PlatformKind::Horizontal(_)) => Category::Vertical,
        2 if !prev.kind.is_oscillating() => Category::Horizontal,
        _ => Category::Static,
    };

    let margin = if level.is_boss() { BOSS_EDGE_MARGIN } else { EDGE_MARGIN };
    let downward = if prev.pos.y <= margin {
        true
    } else if prev.pos.y >= SCREEN_HEIGHT - margin {
        false
    } else {
        rng.random_bool(0.5)
    };

    let gap = match (category, downward) {
        (Category::Vertical, true) => tiles(rng, 3, 6),
        (Category::Vertical, false) => tiles(rng, 3, 7),
        (Category::Horizontal, true) => tiles(rng, 8, 10),
        (Category::Horizontal, false) => tiles(rng, 9, 10),
        (Category::Static, _) if prev.kind.is_oscillating() => tiles(rng, 5, 8),
        (Category::Static, _) => tiles(rng, 3, 6),
    };
    let dy = match (category, downward) {
        (_, true) => tiles(rng, 2, 4),
        (Category::Vertical, false) => -tiles(rng, 2, 3),
        (_, false) => -tiles(rng, 2, 4),
    };

    let x = prev.anchor_right() + gap;
    let y = (prev.anchor_y(downward) + dy).clamp(MIN_Y, MAX_Y);
    let length = tiles(rng, 7, 10);
    let speed = rng.random_range(5..20) as f32 / 12.0;

    let kind = match category {
        Category::Static => PlatformKind::Static,
        Category::Vertical => {
            let amplitude = rng.random_range(3..=6) as f32 * 10.0;
            PlatformKind::Vertical(Oscillation::new(y, amplitude, speed))
        }
        Category::Horizontal => {
            let amplitude = rng.random_range(4..=7) as f32 * 10.0;
            PlatformKind::Horizontal(Oscillation::new(x, amplitude, speed))
        }
    };

    level.push_platform(Vec2::new(x, y), length, kind, PlatformRole::Normal)
}

/// Half the time a squad of one or two, otherwise maybe a weapon chest
fn regular_spawns(level: &Level, rng: &mut impl Rng) -> Vec<Spawn> {
    let mut spawns = Vec::new();
    if rng.random_range(1..=4) <= 2 {
        let count = rng.random_range(2..=4) / 2;
        for i in 0..count {
            spawns.push(Spawn::Enemy {
                kind: level.theme.enemy_kind(),
                speed: rng.random_range(0.2f32..0.4) + 0.2 * i as f32,
            });
        }
    }
    if spawns.is_empty() && (level.number == 0 || rng.random_range(1..=3) == 1) {
        let weapon = WeaponKind::roll_for_level(level.number, rng);
        spawns.push(Spawn::Chest(ChestContents::Weapon(weapon)));
    }
    spawns
}

/// One swarm enemy while the boss wants them, plus an independent chest roll
fn boss_spawns(level: &mut Level, rng: &mut impl Rng) -> Vec<Spawn> {
    let mut spawns = Vec::new();
    let theme = level.theme;
    if let Some(boss) = level.boss.as_mut() {
        if boss.take_swarm_spawn() {
            spawns.push(Spawn::Enemy {
                kind: theme.swarm_kind(rng),
                speed: rng.random_range(0.3..0.7),
            });
        }
    }
    if rng.random_range(1..=3) == 1 {
        let weapon = WeaponKind::roll_for_level(level.number, rng);
        spawns.push(Spawn::Chest(ChestContents::Weapon(weapon)));
    }
    spawns
}
