//! Projectiles fired by the player, enemies and the boss
//!
//! One struct covers every kind. Collision code branches on the data flags
//! (`faction`, `piercing`, `explosive`) and on [`ProjectileState`], never on
//! the kind itself except for geometry.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::rect::Rect;
use super::weapon::WeaponKind;
use crate::consts::*;

/// Who a projectile hurts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    /// Hurts enemies and the boss
    Player,
    /// Hurts the player
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Bullet,
    ShotgunBlast,
    Flame,
    LaserBolt,
    LaserBeam,
    Grenade,
    Missile,
    PlasmaBall,
    Lightning,
    EnemyBullet,
    Icicle,
    EnemyLaser,
}

/// Lifetime state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    Flying,
    /// Detonated explosive playing its explosion
    Exploding { ticks: u32, splash_applied: bool },
    /// Lightning locked onto an enemy column
    Striking { ticks: u32 },
    /// Consumed; culled at the end of the pass
    Spent,
}

/// Lightning strike animation length
pub const STRIKE_TICKS: u32 = 60;
/// Sweep speed of the boss laser (px/tick)
pub const ENEMY_LASER_SPEED: f32 = 2.0;
pub const ENEMY_LASER_WIDTH: f32 = 27.0;
/// Off-screen slack before a projectile is culled
const CULL_MARGIN: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub body: Body,
    pub damage: i32,
    pub faction: Faction,
    /// Survives hitting an enemy
    pub piercing: bool,
    /// Detonates on contact and deals splash damage
    pub explosive: bool,
    /// Hitboxes are mirrored about `body.pos.x` when set
    pub facing_left: bool,
    /// Ticks alive
    pub age: u32,
    pub state: ProjectileState,
    /// Where a sweeping laser stops
    pub sweep_target: f32,
    /// Already reported as a miss against a closed boss channel
    pub missed_boss: bool,
}

/// Reflect `r` about the vertical line `x = axis`
fn mirror(r: Rect, axis: f32) -> Rect {
    Rect::new(2.0 * axis - r.right(), r.y, r.w, r.h)
}

impl Projectile {
    fn new(id: u32, kind: ProjectileKind, body: Body, damage: i32, faction: Faction) -> Self {
        use ProjectileKind::*;
        Self {
            id,
            kind,
            body,
            damage,
            faction,
            piercing: matches!(kind, LaserBolt | LaserBeam | Lightning | EnemyLaser),
            explosive: matches!(kind, Grenade | Missile | PlasmaBall),
            facing_left: false,
            age: 0,
            state: ProjectileState::Flying,
            sweep_target: 0.0,
            missed_boss: false,
        }
    }

    /// Build the projectile a player weapon emits from `muzzle`
    pub fn player_shot(
        id: u32,
        weapon: WeaponKind,
        muzzle: Vec2,
        facing_left: bool,
        damage: i32,
        rng: &mut impl Rng,
    ) -> Self {
        use WeaponKind::*;
        let dir = if facing_left { -1.0 } else { 1.0 };
        let straight = |speed: f32, dy: f32| Body::moving(muzzle + Vec2::new(0.0, dy), Vec2::new(dir * speed, 0.0));

        let (kind, body) = match weapon {
            Pistol => (ProjectileKind::Bullet, straight(5.0, 5.0)),
            AssaultRifle => (ProjectileKind::Bullet, straight(8.0, 5.0)),
            SubMachineGun | MachineGun => {
                let jitter = rng.random_range(-1..=9) as f32;
                (ProjectileKind::Bullet, straight(8.0, jitter))
            }
            SniperRifle => (ProjectileKind::Bullet, straight(12.0, 5.0)),
            Shotgun | LaserShotgun => (ProjectileKind::ShotgunBlast, Body::at(muzzle)),
            FlameThrower => (ProjectileKind::Flame, Body::at(muzzle)),
            GrenadeLauncher => {
                let mut body = Body::moving(muzzle, Vec2::new(dir * 4.0, -8.0));
                body.accel = Vec2::new(0.0, 0.25);
                (ProjectileKind::Grenade, body)
            }
            MissileLauncher => (ProjectileKind::Missile, straight(8.0, 0.0)),
            PlasmaCannon => (ProjectileKind::PlasmaBall, straight(8.0, 0.0)),
            LaserPistol | LaserAssaultRifle | LaserMachineGun => {
                (ProjectileKind::LaserBolt, straight(8.0, 5.0))
            }
            LaserSniperRifle => (ProjectileKind::LaserBolt, straight(12.0, 5.0)),
            LaserCannon => (ProjectileKind::LaserBeam, Body::at(muzzle + Vec2::new(0.0, 6.0))),
            LightningStaff => (ProjectileKind::Lightning, straight(12.0, 0.0)),
        };

        let mut shot = Self::new(id, kind, body, damage, Faction::Player);
        shot.facing_left = facing_left;
        shot
    }

    /// Icicle thrown leftward by an ice enemy
    pub fn icicle(id: u32, pos: Vec2) -> Self {
        Self::new(
            id,
            ProjectileKind::Icicle,
            Body::moving(pos, Vec2::new(-5.0, 0.0)),
            10,
            Faction::Enemy,
        )
    }

    /// Boss missile leaving a channel on the right edge
    pub fn enemy_bullet(id: u32, pos: Vec2) -> Self {
        Self::new(
            id,
            ProjectileKind::EnemyBullet,
            Body::moving(pos, Vec2::new(-8.0, 0.0)),
            10,
            Faction::Enemy,
        )
    }

    /// Full-height boss laser sweeping from `start_x` to `target_x`
    pub fn enemy_laser(id: u32, start_x: f32, target_x: f32) -> Self {
        let mut laser = Self::new(
            id,
            ProjectileKind::EnemyLaser,
            Body::at(Vec2::new(start_x, 0.0)),
            12,
            Faction::Enemy,
        );
        laser.sweep_target = target_x;
        laser
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    fn facing(&self, r: Rect) -> Rect {
        if self.facing_left { mirror(r, self.body.pos.x) } else { r }
    }

    /// Travel hitbox
    pub fn hitbox(&self) -> Rect {
        use ProjectileKind::*;
        let Vec2 { x, y } = self.body.pos;
        match self.kind {
            Bullet => self.facing(Rect::new(x, y, 10.0, 8.0)),
            ShotgunBlast | Flame => self.facing(Rect::new(x, y - 10.0, 50.0, 50.0)),
            LaserBolt => self.facing(Rect::new(x, y, 25.0, 8.0)),
            LaserBeam => self.facing(Rect::new(x, y, SCREEN_WIDTH, 20.0)),
            Grenade | Missile | Lightning => self.facing(Rect::new(x, y - 20.0, 26.0, 32.0)),
            PlasmaBall => self.facing(Rect::new(x + 30.0, y - 10.0, 46.0, 34.0)),
            EnemyBullet => Rect::new(x, y, 32.0, 16.0),
            Icicle => Rect::new(x, y, 13.0, 8.0),
            EnemyLaser => Rect::new(x, 0.0, ENEMY_LASER_WIDTH, SCREEN_HEIGHT),
        }
    }

    /// Splash region, only while an explosion plays
    pub fn splash_hitbox(&self) -> Option<Rect> {
        if !matches!(self.state, ProjectileState::Exploding { .. }) {
            return None;
        }
        let Vec2 { x, y } = self.body.pos;
        let r = match self.kind {
            ProjectileKind::PlasmaBall => Rect::new(x - 10.0, y - 30.0, 104.0, 84.0),
            _ => Rect::new(x - 20.0, y - 50.0, 66.0, 72.0),
        };
        Some(self.facing(r))
    }

    /// Still travelling and able to hit things
    pub fn is_live(&self) -> bool {
        self.state == ProjectileState::Flying
    }

    /// Fixed lifetime in ticks for stationary kinds
    fn lifetime(&self) -> Option<u32> {
        match self.kind {
            ProjectileKind::ShotgunBlast => Some(TICKS_PER_FRAME),
            ProjectileKind::Flame => Some(1),
            ProjectileKind::LaserBeam => Some(30),
            _ => None,
        }
    }

    /// One tick of motion and animation
    pub fn advance(&mut self) {
        self.age += 1;
        match self.state {
            ProjectileState::Flying if self.kind == ProjectileKind::EnemyLaser => self.sweep(),
            ProjectileState::Flying => self.body.integrate(),
            ProjectileState::Exploding { ref mut ticks, .. }
            | ProjectileState::Striking { ref mut ticks } => *ticks += 1,
            ProjectileState::Spent => {}
        }
    }

    fn sweep(&mut self) {
        let dx = self.sweep_target - self.body.pos.x;
        if dx.abs() <= ENEMY_LASER_SPEED {
            self.body.pos.x = self.sweep_target;
            self.state = ProjectileState::Spent;
        } else {
            self.body.pos.x += ENEMY_LASER_SPEED * dx.signum();
        }
    }

    /// Start the explosion. No-op unless this is a live explosive.
    pub fn detonate(&mut self) -> bool {
        if !self.explosive || !self.is_live() {
            return false;
        }
        self.body.halt();
        self.state = ProjectileState::Exploding {
            ticks: 0,
            splash_applied: false,
        };
        true
    }

    /// Lock a lightning bolt onto a target at height `y`
    pub fn strike(&mut self, y: f32) {
        self.body.halt();
        self.body.pos.y = y;
        self.state = ProjectileState::Striking { ticks: 0 };
    }

    /// Mark as used up
    pub fn consume(&mut self) {
        self.state = ProjectileState::Spent;
    }

    /// Splash still pending for this explosion
    pub fn splash_pending(&self) -> bool {
        matches!(
            self.state,
            ProjectileState::Exploding {
                splash_applied: false,
                ..
            }
        )
    }

    pub fn mark_splash_applied(&mut self) {
        if let ProjectileState::Exploding { splash_applied, .. } = &mut self.state {
            *splash_applied = true;
        }
    }

    /// Whether this projectile should be removed
    pub fn is_finished(&self) -> bool {
        match self.state {
            ProjectileState::Spent => true,
            ProjectileState::Exploding { ticks, .. } => ticks >= EXPLOSION_TICKS,
            ProjectileState::Striking { ticks } => ticks >= STRIKE_TICKS,
            ProjectileState::Flying => {
                if self.lifetime().is_some_and(|l| self.age >= l) {
                    return true;
                }
                if self.kind == ProjectileKind::EnemyLaser {
                    return false;
                }
                let Vec2 { x, y } = self.body.pos;
                x > SCREEN_WIDTH + CULL_MARGIN || x < -CULL_MARGIN || y > SCREEN_HEIGHT + CULL_MARGIN
            }
        }
    }

    /// Camera scroll. The boss laser is screen-anchored.
    pub fn scroll(&mut self, dx: f32) {
        if self.kind != ProjectileKind::EnemyLaser {
            self.body.pos.x -= dx;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn shot(weapon: WeaponKind, facing_left: bool) -> Projectile {
        let mut rng = Pcg32::seed_from_u64(1);
        Projectile::player_shot(1, weapon, Vec2::new(300.0, 300.0), facing_left, 40, &mut rng)
    }

    #[test]
    fn test_flags_follow_kind() {
        assert!(shot(WeaponKind::LaserPistol, false).piercing);
        assert!(!shot(WeaponKind::Pistol, false).piercing);
        assert!(shot(WeaponKind::GrenadeLauncher, false).explosive);
        assert_eq!(shot(WeaponKind::Pistol, false).faction, Faction::Player);
        assert_eq!(Projectile::icicle(2, Vec2::ZERO).faction, Faction::Enemy);
    }

    #[test]
    fn test_hitbox_mirrors_with_facing() {
        let right = shot(WeaponKind::Shotgun, false).hitbox();
        let left = shot(WeaponKind::Shotgun, true).hitbox();
        assert_eq!(right.x, 300.0);
        assert_eq!(left.right(), 300.0);
        assert_eq!(right.w, left.w);
    }

    #[test]
    fn test_grenade_arc_and_detonation() {
        let mut g = shot(WeaponKind::GrenadeLauncher, false);
        g.advance();
        assert_eq!(g.pos(), Vec2::new(304.0, 292.25));
        assert!(g.splash_hitbox().is_none());
        assert!(g.detonate());
        assert!(!g.detonate());
        assert!(g.splash_pending());
        let before = g.pos();
        g.advance();
        assert_eq!(g.pos(), before);
        g.mark_splash_applied();
        assert!(!g.splash_pending());
        for _ in 0..EXPLOSION_TICKS {
            g.advance();
        }
        assert!(g.is_finished());
    }

    #[test]
    fn test_flame_lives_one_tick() {
        let mut f = shot(WeaponKind::FlameThrower, false);
        assert!(!f.is_finished());
        f.advance();
        assert!(f.is_finished());
    }

    #[test]
    fn test_enemy_laser_sweeps_to_target() {
        let mut laser = Projectile::enemy_laser(3, -27.0, 700.0);
        assert_eq!(laser.hitbox().h, SCREEN_HEIGHT);
        laser.scroll(5.0);
        assert_eq!(laser.pos().x, -27.0);
        let mut ticks = 0;
        while !laser.is_finished() {
            laser.advance();
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert_eq!(laser.pos().x, 700.0);
    }

    #[test]
    fn test_off_screen_culled() {
        let mut b = shot(WeaponKind::SniperRifle, false);
        while b.pos().x <= SCREEN_WIDTH + 10.0 {
            assert!(!b.is_finished());
            b.advance();
        }
        assert!(b.is_finished());
    }
}
