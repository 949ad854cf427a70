//! Player kinematics, platform contact and status
//!
//! Movement runs first in a tick from the held inputs; platform contact is
//! resolved afterwards against the (possibly moved) platforms, and is the
//! only place `grounded` gets set.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::pickup::Potion;
use super::platform::Platform;
use super::rect::Rect;
use super::timer::Timer;
use super::weapon::{Weapon, WeaponKind};
use crate::consts::{PLAYER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Seconds of invincibility after taking contact damage
pub const PLAYER_INVINCIBLE_SECS: f32 = 0.35;
/// Strength potions cannot push the multiplier past this
pub const MAX_DAMAGE_MULTIPLIER: f32 = 1.7;
/// Upward speed after stomping an enemy
pub const STOMP_BOUNCE: f32 = 4.0;

/// Animation state picked each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAnim {
    Idle,
    Running,
    Jumping,
    Falling,
    Hurt,
}

/// Movement intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// `body.pos` is the hitbox center
    pub body: Body,
    pub health: i32,
    pub max_health: i32,
    /// Horizontal acceleration (px/tick²)
    pub accel_x: f32,
    /// Initial upward speed of a jump
    pub jump_speed: f32,
    pub max_speed_x: f32,
    pub max_fall_speed: f32,
    pub gravity: f32,
    /// Reduced ground friction
    pub on_ice: bool,
    pub facing_left: bool,
    pub grounded: bool,
    pub invincible: Timer,
    pub weapon: Weapon,
    /// Scales shot damage; raised by strength potions
    pub damage_multiplier: f32,
    pub anim: PlayerAnim,
    pub anim_tick: u32,
}

impl Player {
    pub fn new(spawn: Vec2, health: i32, accel_x: f32, on_ice: bool) -> Self {
        Self {
            body: Body::at(spawn),
            health,
            max_health: health,
            accel_x,
            jump_speed: 5.0,
            max_speed_x: 2.75,
            max_fall_speed: 15.0,
            gravity: 0.10,
            on_ice,
            facing_left: false,
            grounded: false,
            invincible: Timer::new(PLAYER_INVINCIBLE_SECS),
            weapon: Weapon::new(WeaponKind::Pistol),
            damage_multiplier: 1.0,
            anim: PlayerAnim::Idle,
            anim_tick: 0,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.body.pos, PLAYER_SIZE)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_invincible(&self, now: f32) -> bool {
        self.invincible.is_running(now)
    }

    /// Where shots leave the gun, mirrored with facing
    pub fn muzzle(&self) -> Vec2 {
        let dx = if self.facing_left { -4.0 } else { 4.0 };
        self.body.pos + Vec2::new(dx, -4.0)
    }

    /// Horizontal acceleration, jump and gravity, then integrate
    pub fn drive(&mut self, controls: Controls) {
        let vel = &mut self.body.vel;
        let accel = if self.grounded { self.accel_x } else { self.accel_x / 4.0 };

        if controls.right && !controls.left {
            self.facing_left = false;
            if vel.x < self.max_speed_x - self.accel_x {
                vel.x += accel;
            }
        } else if controls.left && !controls.right {
            self.facing_left = true;
            if vel.x > -(self.max_speed_x - self.accel_x) {
                vel.x -= accel;
            }
        } else {
            let decel = if self.grounded && self.on_ice {
                self.accel_x / 6.0
            } else {
                self.accel_x / 2.0
            };
            vel.x -= decel * vel.x.signum();
            if vel.x.abs() < 5.0 * self.accel_x {
                vel.x = 0.0;
            }
        }

        if controls.jump && self.grounded {
            vel.y = -self.jump_speed;
            self.grounded = false;
        }

        if !self.grounded {
            vel.y = (vel.y + self.gravity).min(self.max_fall_speed);
        }

        self.body.integrate();
    }

    /// Land on top strips, stop at side strips. Recomputes `grounded`.
    pub fn resolve_platforms<'a>(&mut self, platforms: impl IntoIterator<Item = &'a Platform>) {
        self.grounded = false;
        for platform in platforms {
            let hitbox = self.hitbox();
            if hitbox.intersects(&platform.top_strip()) {
                self.body.pos.y = platform.pos.y - PLAYER_SIZE.y / 2.0;
                self.body.pos.x += platform.last_delta.x;
                self.body.vel.y = 0.0;
                self.grounded = true;
            }
            let hitbox = self.hitbox();
            if hitbox.intersects(&platform.left_strip()) || hitbox.intersects(&platform.right_strip()) {
                self.body.vel.x = 0.0;
            }
        }
    }

    /// Outside the horizontal screen span or fallen below the level
    pub fn out_of_bounds(&self) -> bool {
        let Vec2 { x, y } = self.body.pos;
        x > SCREEN_WIDTH - PLAYER_SIZE.x / 2.0 || x < 0.0 || y > SCREEN_HEIGHT - PLAYER_SIZE.y / 2.0
    }

    /// Lose health, clamped at zero. Returns whether any was lost.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if amount <= 0 || !self.is_alive() {
            return false;
        }
        self.health = (self.health - amount).max(0);
        true
    }

    /// Flank contact with an enemy: damage, knockback away from it, and a
    /// short invincibility window
    pub fn knock_back(&mut self, damage: i32, push: f32, enemy_pos: Vec2, enemy_size: Vec2, now: f32) {
        self.take_damage(damage);
        self.invincible.arm(now);
        let from_left = push < 0.0;
        self.body.pos.x = if from_left {
            enemy_pos.x - enemy_size.x
        } else {
            enemy_pos.x + enemy_size.x
        };
        self.body.pos.y = enemy_pos.y - PLAYER_SIZE.y - 4.0;
        self.body.vel = Vec2::new(push, -0.05);
        self.grounded = false;
    }

    /// Bounce off an enemy's head
    pub fn bounce(&mut self) {
        self.body.vel.y = -STOMP_BOUNCE;
        self.body.pos.y -= 3.0;
        self.grounded = false;
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).min(self.max_health);
    }

    pub fn apply_potion(&mut self, potion: Potion) {
        match potion {
            Potion::Health(amount) => self.heal(amount),
            Potion::Strength(percent) => {
                self.damage_multiplier =
                    (self.damage_multiplier + percent as f32 / 100.0).min(MAX_DAMAGE_MULTIPLIER);
            }
        }
    }

    /// Pick the animation state from current flags
    pub fn update_anim(&mut self, now: f32) {
        let next = if self.is_invincible(now) {
            PlayerAnim::Hurt
        } else if !self.grounded && self.body.vel.y < 0.0 {
            PlayerAnim::Jumping
        } else if !self.grounded {
            PlayerAnim::Falling
        } else if self.body.vel.x.abs() >= 0.25 {
            PlayerAnim::Running
        } else {
            PlayerAnim::Idle
        };
        if next != self.anim {
            self.anim_tick = 0;
        } else {
            self.anim_tick = self.anim_tick.wrapping_add(1);
        }
        self.anim = next;
    }

    /// Place at a new level's spawn with that level's handling
    pub fn respawn(&mut self, spawn: Vec2, accel_x: f32, on_ice: bool) {
        self.body = Body::moving(spawn, Vec2::new(0.0, 1.0));
        self.accel_x = accel_x;
        self.on_ice = on_ice;
        self.grounded = false;
        self.invincible.disarm();
        self.anim = PlayerAnim::Falling;
        self.anim_tick = 0;
    }

    pub fn scroll(&mut self, dx: f32) {
        self.body.pos.x -= dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::platform::{Oscillation, PlatformId, PlatformKind, PlatformRole};

    fn ground() -> Platform {
        Platform::new(
            PlatformId(1),
            Vec2::new(0.0, 400.0),
            600.0,
            PlatformKind::Static,
            PlatformRole::Normal,
        )
    }

    fn standing() -> Player {
        let mut p = Player::new(Vec2::new(200.0, 380.0), 100, 0.25, false);
        p.resolve_platforms([&ground()]);
        p
    }

    #[test]
    fn test_lands_and_stays_grounded() {
        let mut p = Player::new(Vec2::new(200.0, 300.0), 100, 0.25, false);
        let g = ground();
        for _ in 0..120 {
            p.drive(Controls::default());
            p.resolve_platforms([&g]);
        }
        assert!(p.grounded);
        assert_eq!(p.pos().y, 380.0);
        assert_eq!(p.body.vel.y, 0.0);
    }

    #[test]
    fn test_speed_capped_and_snaps_to_zero() {
        let mut p = standing();
        let g = ground();
        let right = Controls {
            right: true,
            ..Default::default()
        };
        for _ in 0..100 {
            p.drive(right);
            p.resolve_platforms([&g]);
            assert!(p.body.vel.x <= p.max_speed_x);
        }
        assert!(p.body.vel.x > 2.0);
        for _ in 0..30 {
            p.drive(Controls::default());
            p.resolve_platforms([&g]);
        }
        assert_eq!(p.body.vel.x, 0.0);
    }

    #[test]
    fn test_ice_slides_longer() {
        let g = ground();
        let mut ice = Player::new(Vec2::new(200.0, 380.0), 100, 0.15, true);
        let mut grass = Player::new(Vec2::new(200.0, 380.0), 100, 0.15, false);
        for p in [&mut ice, &mut grass] {
            p.resolve_platforms([&g]);
            p.body.vel.x = 2.75;
        }

        for _ in 0..40 {
            for p in [&mut ice, &mut grass] {
                p.drive(Controls::default());
                p.resolve_platforms([&g]);
            }
        }
        assert_eq!(grass.body.vel.x, 0.0);
        assert!(ice.body.vel.x > 1.0);

        for _ in 0..60 {
            ice.drive(Controls::default());
            ice.resolve_platforms([&g]);
        }
        assert_eq!(ice.body.vel.x, 0.0);
        assert!(ice.grounded);
    }

    #[test]
    fn test_side_strip_stops_horizontal_motion() {
        let g = ground();
        let wall = Platform::new(
            PlatformId(3),
            Vec2::new(300.0, 370.0),
            100.0,
            PlatformKind::Static,
            PlatformRole::Normal,
        );
        let mut p = Player::new(Vec2::new(270.0, 380.0), 100, 0.25, false);
        p.resolve_platforms([&g]);
        let right = Controls {
            right: true,
            ..Default::default()
        };

        let mut touched = false;
        for _ in 0..60 {
            p.drive(right);
            p.resolve_platforms([&g, &wall]);
            if p.hitbox().intersects(&wall.left_strip()) {
                touched = true;
                break;
            }
        }
        assert!(touched);
        assert_eq!(p.body.vel.x, 0.0);
        assert_eq!(p.pos().y, 380.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut p = standing();
        let jump = Controls {
            jump: true,
            ..Default::default()
        };
        p.drive(jump);
        assert!(!p.grounded);
        assert!((p.body.vel.y - (-5.0 + 0.1)).abs() < 1e-5);
        let vy = p.body.vel.y;
        p.drive(jump);
        assert!((p.body.vel.y - (vy + 0.1)).abs() < 1e-5);
    }

    #[test]
    fn test_rides_moving_platform() {
        let mut plat = Platform::new(
            PlatformId(2),
            Vec2::new(100.0, 400.0),
            200.0,
            PlatformKind::Horizontal(Oscillation::new(100.0, 50.0, 1.0)),
            PlatformRole::Normal,
        );
        let mut p = Player::new(Vec2::new(200.0, 380.0), 100, 0.25, false);
        p.resolve_platforms([&plat]);
        for _ in 0..10 {
            plat.step();
            p.drive(Controls::default());
            p.resolve_platforms([&plat]);
        }
        assert_eq!(p.pos().x, 210.0);
        assert!(p.grounded);
    }

    #[test]
    fn test_health_clamped() {
        let mut p = standing();
        assert!(p.take_damage(150));
        assert_eq!(p.health, 0);
        assert!(!p.take_damage(10));
        p.health = 95;
        p.apply_potion(Potion::Health(25));
        assert_eq!(p.health, 100);
    }

    #[test]
    fn test_strength_capped() {
        let mut p = standing();
        for _ in 0..20 {
            p.apply_potion(Potion::Strength(10));
        }
        assert_eq!(p.damage_multiplier, MAX_DAMAGE_MULTIPLIER);
    }

    #[test]
    fn test_anim_priority() {
        let mut p = standing();
        p.update_anim(0.0);
        assert_eq!(p.anim, PlayerAnim::Idle);
        p.invincible.arm(1.0);
        p.grounded = false;
        p.body.vel.y = -3.0;
        p.update_anim(1.1);
        assert_eq!(p.anim, PlayerAnim::Hurt);
        p.update_anim(2.0);
        assert_eq!(p.anim, PlayerAnim::Jumping);
    }
}
