//! Patrolling enemies
//!
//! An enemy walks back and forth on its host platform, rides that platform's
//! motion, and passes through `Alive -> Dying -> (removed)`. The short
//! post-hit invincibility window is a timer rather than a state so that a
//! damaged enemy keeps patrolling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::platform::{Platform, PlatformId};
use super::rect::Rect;
use super::timer::Timer;
use crate::consts::ENEMY_DEATH_TICKS;

/// Seconds an enemy ignores further damage after a hit
pub const ENEMY_INVINCIBLE_SECS: f32 = 0.25;
pub const ENEMY_HEALTH: i32 = 100;
/// Damage an enemy takes when stomped
pub const STOMP_DAMAGE: i32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Underworld,
    Ice,
}

impl EnemyKind {
    pub fn size(self) -> Vec2 {
        match self {
            EnemyKind::Basic => Vec2::new(38.0, 46.0),
            EnemyKind::Underworld => Vec2::new(48.0, 60.0),
            EnemyKind::Ice => Vec2::new(56.0, 60.0),
        }
    }

    /// Fraction of incoming damage actually taken
    pub fn damage_multiplier(self) -> f32 {
        match self {
            EnemyKind::Basic => 1.0,
            EnemyKind::Underworld => 0.67,
            EnemyKind::Ice => 0.4,
        }
    }

    /// Damage dealt to the player on flank contact
    pub fn contact_damage(self) -> i32 {
        match self {
            EnemyKind::Basic => 10,
            EnemyKind::Underworld => 15,
            EnemyKind::Ice => 20,
        }
    }

    /// Horizontal speed given to the player on flank contact
    pub fn knockback(self) -> f32 {
        match self {
            EnemyKind::Basic => 3.0,
            EnemyKind::Underworld | EnemyKind::Ice => 4.0,
        }
    }

    /// Number of walk-cycle frames
    pub fn walk_frames(self) -> u32 {
        match self {
            EnemyKind::Basic => 3,
            EnemyKind::Underworld | EnemyKind::Ice => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Alive,
    /// Playing the explosion; `ticks` counts up to the death animation length
    Dying { ticks: u32 },
}

/// Result of one patrol step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatrolOutcome {
    /// Turned around at the right end of the platform this tick
    pub turned_at_right: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Center of the hitbox
    pub pos: Vec2,
    /// Patrol speed (px/tick)
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub facing_left: bool,
    pub damaged: Timer,
    pub state: EnemyState,
    pub host: PlatformId,
    /// Walk-cycle tick counter for the render sink
    pub anim_tick: u32,
}

impl Enemy {
    /// Standing at the middle of `host`
    pub fn spawn(id: u32, kind: EnemyKind, speed: f32, host: &Platform) -> Self {
        let size = kind.size();
        Self {
            id,
            kind,
            pos: Vec2::new(host.center_x(), host.pos.y - size.y / 2.0),
            speed,
            health: ENEMY_HEALTH,
            max_health: ENEMY_HEALTH,
            facing_left: false,
            damaged: Timer::new(ENEMY_INVINCIBLE_SECS),
            state: EnemyState::Alive,
            host: host.id,
            anim_tick: 0,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.kind.size()
    }

    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.pos, self.size())
    }

    /// Full-height column above and below the enemy
    pub fn column(&self, height: f32) -> Rect {
        Rect::new(self.pos.x - self.size().x / 2.0, 0.0, self.size().x, height)
    }

    pub fn is_alive(&self) -> bool {
        self.state == EnemyState::Alive
    }

    /// Alive and outside its post-hit window
    pub fn is_vulnerable(&self, now: f32) -> bool {
        self.is_alive() && self.damaged.expired(now)
    }

    /// Apply `floor(amount * multiplier)`. Ignored while dying or inside the
    /// post-hit window. Returns whether damage landed.
    pub fn take_damage(&mut self, amount: i32, now: f32) -> bool {
        if !self.is_vulnerable(now) {
            return false;
        }
        let taken = (amount as f32 * self.kind.damage_multiplier()).floor() as i32;
        self.health -= taken;
        self.damaged.arm(now);
        true
    }

    /// Blast damage: lands on any live enemy, post-hit window or not, and
    /// re-arms the window
    pub fn take_splash(&mut self, amount: i32, now: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health -= (amount as f32 * self.kind.damage_multiplier()).floor() as i32;
        self.damaged.arm(now);
        true
    }

    /// Switch to dying once health is gone. Returns true exactly once.
    pub fn settle_death(&mut self) -> bool {
        if self.is_alive() && self.health <= 0 {
            self.state = EnemyState::Dying { ticks: 0 };
            return true;
        }
        false
    }

    /// Patrol bounds on `host`
    fn patrol_range(&self, host: &Platform) -> (f32, f32) {
        let quarter = self.size().x / 4.0;
        (host.pos.x + quarter, host.right_edge() - quarter)
    }

    /// Walk, ride the host, advance animation
    pub fn update(&mut self, host: &Platform) -> PatrolOutcome {
        let mut outcome = PatrolOutcome::default();
        self.pos += host.last_delta;
        match &mut self.state {
            EnemyState::Dying { ticks } => {
                *ticks += 1;
                return outcome;
            }
            EnemyState::Alive => {}
        }

        let (lo, hi) = self.patrol_range(host);
        if self.facing_left {
            self.pos.x -= self.speed;
            if self.pos.x < lo {
                self.facing_left = false;
            }
        } else {
            self.pos.x += self.speed;
            if self.pos.x > hi {
                self.facing_left = true;
                outcome.turned_at_right = true;
            }
        }
        self.pos.x = self.pos.x.clamp(host.pos.x, host.right_edge());
        self.pos.y = host.pos.y - self.size().y / 2.0;

        self.anim_tick = (self.anim_tick + 1) % (self.kind.walk_frames() * 10);
        outcome
    }

    pub fn death_finished(&self) -> bool {
        matches!(self.state, EnemyState::Dying { ticks } if ticks >= ENEMY_DEATH_TICKS)
    }

    /// Current animation frame: walk cycle while alive, explosion while dying
    pub fn frame(&self) -> u32 {
        match self.state {
            EnemyState::Alive => self.anim_tick / 10,
            EnemyState::Dying { ticks } => (ticks / crate::consts::TICKS_PER_FRAME).min(9),
        }
    }

    pub fn scroll(&mut self, dx: f32) {
        self.pos.x -= dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::platform::{PlatformKind, PlatformRole};

    fn slab() -> Platform {
        Platform::new(
            PlatformId(1),
            Vec2::new(100.0, 400.0),
            160.0,
            PlatformKind::Static,
            PlatformRole::Normal,
        )
    }

    #[test]
    fn test_spawn_stands_on_host() {
        let host = slab();
        let e = Enemy::spawn(1, EnemyKind::Basic, 0.3, &host);
        assert_eq!(e.pos, Vec2::new(180.0, 377.0));
        assert_eq!(e.hitbox().bottom(), 400.0);
    }

    #[test]
    fn test_patrol_stays_on_host() {
        let host = slab();
        let mut e = Enemy::spawn(1, EnemyKind::Ice, 0.9, &host);
        let mut right_turns = 0;
        for _ in 0..2000 {
            if e.update(&host).turned_at_right {
                right_turns += 1;
            }
            assert!(e.pos.x >= host.pos.x && e.pos.x <= host.right_edge());
        }
        assert!(right_turns > 5);
    }

    #[test]
    fn test_damage_multiplier_and_window() {
        let host = slab();
        let mut e = Enemy::spawn(1, EnemyKind::Underworld, 0.3, &host);
        assert!(e.take_damage(40, 1.0));
        assert_eq!(e.health, 100 - 26);
        assert!(!e.take_damage(40, 1.1));
        assert_eq!(e.health, 74);
        assert!(e.take_damage(40, 1.25));
        assert_eq!(e.health, 48);
    }

    #[test]
    fn test_death_once_then_finishes() {
        let host = slab();
        let mut e = Enemy::spawn(1, EnemyKind::Basic, 0.3, &host);
        e.health = 0;
        assert!(e.settle_death());
        assert!(!e.settle_death());
        assert!(!e.take_damage(50, 10.0));
        for _ in 0..ENEMY_DEATH_TICKS {
            assert!(!e.death_finished());
            e.update(&host);
        }
        assert!(e.death_finished());
    }
}
