//! Boss encounter
//!
//! The boss lives off the right edge of the screen. It can only be hurt
//! through its channels: horizontal bands down the right edge that open for
//! a few seconds whenever it fires a missile out of one.
//!
//! Stages cycle `Missile -> Swarm -> Laser -> Missile`:
//! - Missile ends when health drops to the running breakpoint
//! - Swarm ends when the generator has spawned the whole enemy quota
//! - Laser ends by chance once no laser is on screen

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::timer::Timer;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const CHANNEL_HEIGHT: f32 = 50.0;
/// Seconds a channel stays open after firing
pub const CHANNEL_OPEN_SECS: f32 = 6.0;
/// Seconds channels flash after the boss is hit
pub const CHANNEL_FLASH_SECS: f32 = 0.25;
/// Per-tick odds (1 in N) of firing during Missile and Laser stages
pub const FIRE_ODDS: u32 = 50;
/// Per-tick odds (1 in N) of leaving the Laser stage
pub const LASER_EXIT_ODDS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossStage {
    Missile,
    Swarm,
    Laser,
}

/// A damage-accepting band on the boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub index: usize,
    pub open: Timer,
    pub flash: Timer,
}

impl Channel {
    fn new(index: usize) -> Self {
        Self {
            index,
            open: Timer::new(CHANNEL_OPEN_SECS),
            flash: Timer::new(CHANNEL_FLASH_SECS),
        }
    }

    pub fn top(&self) -> f32 {
        self.index as f32 * CHANNEL_HEIGHT
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(SCREEN_WIDTH - 2.0, self.top(), 2.0, CHANNEL_HEIGHT)
    }

    pub fn is_open(&self, now: f32) -> bool {
        self.open.is_running(now)
    }

    /// Open for the full window. Re-opening an open channel is a no-op.
    pub fn open(&mut self, now: f32) -> bool {
        if self.is_open(now) {
            return false;
        }
        self.open.arm(now);
        true
    }
}

/// Something the boss launched this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossAttack {
    /// Missile leaving a channel
    Missile { origin: Vec2 },
    /// Full-height laser sweeping from `start_x` to `target_x`
    Laser { start_x: f32, target_x: f32 },
}

/// Outcome of a projectile reaching a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelHit {
    /// Damage went through
    Hit,
    /// Channel was closed
    Miss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub health: i32,
    pub max_health: i32,
    pub stage: BossStage,
    /// Health at which the next Missile -> Swarm transition fires
    pub breakpoint: i32,
    pub breakpoint_step: i32,
    /// Enemies still to spawn during Swarm
    pub swarm_quota: u32,
    pub channels: Vec<Channel>,
    /// Set once health is gone; unlocks the level exit
    pub level_over: bool,
}

impl Boss {
    pub fn new(health: i32, breakpoint_step: i32) -> Self {
        let count = (SCREEN_HEIGHT / CHANNEL_HEIGHT).floor() as usize;
        Self {
            health,
            max_health: health,
            stage: BossStage::Missile,
            breakpoint: health - breakpoint_step,
            breakpoint_step,
            swarm_quota: 0,
            channels: (0..count).map(Channel::new).collect(),
            level_over: false,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    /// Check death and stage transitions
    pub fn update_stage(&mut self, laser_active: bool, rng: &mut impl Rng) {
        if self.level_over {
            return;
        }
        if self.is_defeated() {
            self.level_over = true;
            for channel in &mut self.channels {
                channel.open.disarm();
            }
            log::info!("Boss defeated");
            return;
        }
        match self.stage {
            BossStage::Missile if self.health <= self.breakpoint => {
                self.breakpoint -= self.breakpoint_step;
                self.swarm_quota = rng.random_range(8..=16);
                self.stage = BossStage::Swarm;
                log::info!(
                    "Boss stage -> Swarm ({} enemies, next breakpoint {})",
                    self.swarm_quota,
                    self.breakpoint
                );
            }
            BossStage::Swarm if self.swarm_quota == 0 => {
                self.stage = BossStage::Laser;
                log::info!("Boss stage -> Laser");
            }
            BossStage::Laser if !laser_active && rng.random_ratio(1, LASER_EXIT_ODDS) => {
                self.stage = BossStage::Missile;
                log::info!("Boss stage -> Missile");
            }
            _ => {}
        }
    }

    /// Maybe launch an attack for the current stage
    pub fn fire(&mut self, now: f32, laser_active: bool, rng: &mut impl Rng) -> Option<BossAttack> {
        if self.level_over {
            return None;
        }
        match self.stage {
            BossStage::Missile if rng.random_ratio(1, FIRE_ODDS) => {
                let index = rng.random_range(0..self.channels.len());
                let channel = &mut self.channels[index];
                channel.open(now);
                Some(BossAttack::Missile {
                    origin: Vec2::new(SCREEN_WIDTH - 10.0, channel.top() + 17.0),
                })
            }
            BossStage::Laser if !laser_active && rng.random_ratio(1, FIRE_ODDS) => {
                let spread = rng.random_range(0.0..=SCREEN_WIDTH / 8.0);
                let (start_x, target_x) = if rng.random_bool(0.5) {
                    (-super::projectile::ENEMY_LASER_WIDTH, SCREEN_WIDTH / 2.0 + spread)
                } else {
                    (SCREEN_WIDTH, SCREEN_WIDTH / 2.0 - spread)
                };
                Some(BossAttack::Laser { start_x, target_x })
            }
            _ => None,
        }
    }

    /// Spend one unit of the swarm quota. Returns false outside Swarm.
    pub fn take_swarm_spawn(&mut self) -> bool {
        if self.level_over || self.stage != BossStage::Swarm || self.swarm_quota == 0 {
            return false;
        }
        self.swarm_quota -= 1;
        true
    }

    /// Index of the first channel `hitbox` touches
    pub fn channel_at(&self, hitbox: &Rect) -> Option<usize> {
        self.channels.iter().position(|c| c.hitbox().intersects(hitbox))
    }

    pub fn is_channel_open(&self, index: usize, now: f32) -> bool {
        self.channels.get(index).is_some_and(|c| c.is_open(now))
    }

    /// Apply `damage / divisor` through channel `index` if it is open
    pub fn hit_channel(&mut self, index: usize, damage: i32, divisor: i32, now: f32) -> ChannelHit {
        if self.level_over || !self.is_channel_open(index, now) {
            return ChannelHit::Miss;
        }
        self.health -= damage / divisor.max(1);
        for channel in &mut self.channels {
            channel.flash.arm(now);
        }
        ChannelHit::Hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_stage_cycle() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut boss = Boss::new(750, 250);
        boss.update_stage(false, &mut rng);
        assert_eq!(boss.stage, BossStage::Missile);

        boss.health = 500;
        boss.update_stage(false, &mut rng);
        assert_eq!(boss.stage, BossStage::Swarm);
        assert!((8..=16).contains(&boss.swarm_quota));
        assert_eq!(boss.breakpoint, 250);

        while boss.take_swarm_spawn() {}
        assert_eq!(boss.swarm_quota, 0);
        boss.update_stage(false, &mut rng);
        assert_eq!(boss.stage, BossStage::Laser);

        // Never leaves Laser while a laser is active
        for _ in 0..500 {
            boss.update_stage(true, &mut rng);
        }
        assert_eq!(boss.stage, BossStage::Laser);
        for _ in 0..500 {
            boss.update_stage(false, &mut rng);
        }
        assert_eq!(boss.stage, BossStage::Missile);
    }

    #[test]
    fn test_channels_span_height() {
        let boss = Boss::new(750, 250);
        assert_eq!(boss.channels.len(), 14);
        let last = boss.channels.last().unwrap();
        assert!(last.hitbox().bottom() <= SCREEN_HEIGHT);
    }

    #[test]
    fn test_missile_opens_channel() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut boss = Boss::new(750, 250);
        let mut attack = None;
        for _ in 0..10_000 {
            attack = boss.fire(1.0, false, &mut rng);
            if attack.is_some() {
                break;
            }
        }
        let Some(BossAttack::Missile { origin }) = attack else {
            panic!("boss never fired");
        };
        let index = (origin.y / CHANNEL_HEIGHT) as usize;
        assert!(boss.is_channel_open(index, 1.0));
        assert!(boss.is_channel_open(index, 6.9));
        assert!(!boss.is_channel_open(index, 7.0));
    }

    #[test]
    fn test_closed_channel_misses() {
        let mut boss = Boss::new(750, 250);
        assert_eq!(boss.hit_channel(0, 90, 3, 0.0), ChannelHit::Miss);
        assert_eq!(boss.health, 750);
        boss.channels[0].open(0.0);
        assert_eq!(boss.hit_channel(0, 90, 3, 0.5), ChannelHit::Hit);
        assert_eq!(boss.health, 720);
        assert!(boss.channels[5].flash.is_running(0.6));
    }

    #[test]
    fn test_death_sets_level_over() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut boss = Boss::new(750, 250);
        boss.channels[2].open(0.0);
        boss.health = 0;
        boss.update_stage(false, &mut rng);
        assert!(boss.level_over);
        assert!(!boss.is_channel_open(2, 0.1));
        assert_eq!(boss.fire(0.1, false, &mut rng), None);
        assert!(!boss.take_swarm_spawn());
    }
}
