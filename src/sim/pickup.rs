//! Coins and potions lying on platforms

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::platform::{Platform, PlatformId};
use super::rect::Rect;
use crate::consts::COLLECTIBLE_SIZE;

/// Upgrade reward held by an upgrade chest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Potion {
    /// Restores this much health
    Health(i32),
    /// Adds this many percent to the damage multiplier
    Strength(u32),
}

impl Potion {
    /// Coin flip between strength and health, then a random strength
    pub fn roll(rng: &mut impl Rng) -> Self {
        if rng.random_bool(0.5) {
            const PERCENTS: [u32; 3] = [3, 5, 10];
            Potion::Strength(PERCENTS[rng.random_range(0..PERCENTS.len())])
        } else {
            const AMOUNTS: [i32; 3] = [10, 20, 25];
            Potion::Health(AMOUNTS[rng.random_range(0..AMOUNTS.len())])
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    HealthPotion(i32),
    StrengthPotion(u32),
}

impl From<Potion> for CollectibleKind {
    fn from(potion: Potion) -> Self {
        match potion {
            Potion::Health(amount) => CollectibleKind::HealthPotion(amount),
            Potion::Strength(percent) => CollectibleKind::StrengthPotion(percent),
        }
    }
}

/// Height of a collectible's center above its platform surface
const RIDE_HEIGHT: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    /// Center
    pub pos: Vec2,
    pub host: PlatformId,
    /// Horizontal offset from the host's left edge
    pub offset_x: f32,
    pub collected: bool,
    pub anim_tick: u32,
}

impl Collectible {
    /// Drop onto `host` at horizontal position `x`
    pub fn drop_at(id: u32, kind: CollectibleKind, x: f32, host: &Platform) -> Self {
        let offset_x = (x - host.pos.x).clamp(0.0, host.length);
        Self {
            id,
            kind,
            pos: Vec2::new(host.pos.x + offset_x, host.pos.y - RIDE_HEIGHT),
            host: host.id,
            offset_x,
            collected: false,
            anim_tick: 0,
        }
    }

    /// Follow the host platform
    pub fn ride(&mut self, host: &Platform) {
        self.pos = Vec2::new(host.pos.x + self.offset_x, host.pos.y - RIDE_HEIGHT);
        self.anim_tick = self.anim_tick.wrapping_add(1);
    }

    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(COLLECTIBLE_SIZE))
    }

    /// Mark collected. Returns false if it already was.
    pub fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }
}
