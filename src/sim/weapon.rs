//! Weapons: fire-rate gating, magazines and passive reload
//!
//! A weapon never builds projectiles itself; [`Weapon::try_fire`] only decides
//! whether a shot happens. The projectile is created from the weapon kind by
//! [`super::projectile::Projectile::player_shot`].

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Every gun in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
    AssaultRifle,
    SubMachineGun,
    MachineGun,
    Shotgun,
    SniperRifle,
    GrenadeLauncher,
    MissileLauncher,
    FlameThrower,
    PlasmaCannon,
    LaserPistol,
    LaserAssaultRifle,
    LaserMachineGun,
    LaserShotgun,
    LaserSniperRifle,
    LaserCannon,
    LightningStaff,
}

/// Static numbers for one weapon kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    /// Seconds between shots, and the reload time once the magazine is empty
    pub fire_rate: f32,
    /// Minimum spacing between shots within a magazine
    pub shot_interval: f32,
    pub damage: i32,
    pub magazine: u32,
}

impl WeaponStats {
    const fn single(fire_rate: f32, damage: i32) -> Self {
        Self {
            fire_rate,
            shot_interval: fire_rate,
            damage,
            magazine: 1,
        }
    }

    const fn burst(fire_rate: f32, shot_interval: f32, damage: i32, magazine: u32) -> Self {
        Self {
            fire_rate,
            shot_interval,
            damage,
            magazine,
        }
    }
}

/// Available from the first level
pub const DEFAULT_POOL: &[WeaponKind] = &[
    WeaponKind::Pistol,
    WeaponKind::AssaultRifle,
    WeaponKind::SubMachineGun,
    WeaponKind::MachineGun,
    WeaponKind::SniperRifle,
    WeaponKind::Shotgun,
    WeaponKind::GrenadeLauncher,
    WeaponKind::FlameThrower,
    WeaponKind::MissileLauncher,
];

/// Unlocked after level 5
pub const LASER_POOL: &[WeaponKind] = &[
    WeaponKind::LaserPistol,
    WeaponKind::LaserAssaultRifle,
    WeaponKind::LaserMachineGun,
    WeaponKind::LaserSniperRifle,
    WeaponKind::LaserShotgun,
];

/// Unlocked after level 10
pub const MISC_POOL: &[WeaponKind] = &[
    WeaponKind::LaserCannon,
    WeaponKind::LightningStaff,
    WeaponKind::PlasmaCannon,
];

impl WeaponKind {
    pub fn stats(self) -> WeaponStats {
        use WeaponKind::*;
        match self {
            Pistol => WeaponStats::single(1.0, 40),
            AssaultRifle => WeaponStats::single(0.4, 30),
            SubMachineGun => WeaponStats::burst(7.0, 0.03, 18, 30),
            MachineGun => WeaponStats::single(0.08, 20),
            Shotgun => WeaponStats::single(2.5, 200),
            SniperRifle => WeaponStats::single(4.0, 180),
            GrenadeLauncher => WeaponStats::single(6.0, 160),
            MissileLauncher => WeaponStats::burst(7.5, 0.5, 160, 4),
            FlameThrower => WeaponStats::burst(0.015, 0.015, 15, 100),
            PlasmaCannon => WeaponStats::burst(6.5, 0.5, 600, 4),
            LaserPistol => WeaponStats::single(1.5, 60),
            LaserAssaultRifle => WeaponStats::single(0.4, 35),
            LaserMachineGun => WeaponStats::single(0.1, 20),
            LaserShotgun => WeaponStats::single(3.5, 450),
            LaserSniperRifle => WeaponStats::single(5.0, 320),
            LaserCannon => WeaponStats::single(4.0, 240),
            LightningStaff => WeaponStats::single(4.5, 40),
        }
    }

    /// Name shown in chest prompts
    pub fn display_name(self) -> &'static str {
        use WeaponKind::*;
        match self {
            Pistol => "Pistol",
            AssaultRifle => "Assault Rifle",
            SubMachineGun => "Submachine Gun",
            MachineGun => "Machine Gun",
            Shotgun => "Shotgun",
            SniperRifle => "Sniper Rifle",
            GrenadeLauncher => "Grenade Launcher",
            MissileLauncher => "Missile Launcher",
            FlameThrower => "Flamethrower",
            PlasmaCannon => "Plasma Cannon",
            LaserPistol => "Laser Pistol",
            LaserAssaultRifle => "Laser Assault Rifle",
            LaserMachineGun => "Laser Machine Gun",
            LaserShotgun => "Laser Shotgun",
            LaserSniperRifle => "Laser Sniper Rifle",
            LaserCannon => "Laser Cannon",
            LightningStaff => "Lightning Staff",
        }
    }

    /// Pick a chest weapon appropriate for `level`
    pub fn roll_for_level(level: u32, rng: &mut impl Rng) -> Self {
        let pool: &[&[WeaponKind]] = match level {
            0..=5 => &[DEFAULT_POOL],
            6..=10 => &[DEFAULT_POOL, LASER_POOL],
            _ => &[LASER_POOL, MISC_POOL],
        };
        let tier = pool[rng.random_range(0..pool.len())];
        tier[rng.random_range(0..tier.len())]
    }
}

/// A weapon instance carried by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub fire_rate: f32,
    pub shot_interval: f32,
    /// Base damage; buffs are applied per shot, never stored here
    pub damage: i32,
    pub magazine_size: u32,
    pub rounds_remaining: u32,
    pub last_fired_at: Option<f32>,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            fire_rate: stats.fire_rate,
            shot_interval: stats.shot_interval,
            damage: stats.damage,
            magazine_size: stats.magazine,
            rounds_remaining: stats.magazine,
            last_fired_at: None,
        }
    }

    fn since_last_shot(&self, now: f32) -> Option<f32> {
        self.last_fired_at.map(|t| now - t)
    }

    /// Refill an empty magazine once `fire_rate` has passed since the last shot
    pub fn reload(&mut self, now: f32) {
        if self.rounds_remaining == 0
            && self.since_last_shot(now).is_none_or(|dt| dt >= self.fire_rate)
        {
            self.rounds_remaining = self.magazine_size;
        }
    }

    pub fn can_fire(&self, now: f32) -> bool {
        self.rounds_remaining > 0
            && self
                .since_last_shot(now)
                .is_none_or(|dt| dt >= self.shot_interval)
    }

    /// Consume a round if allowed. Returns whether a shot was fired.
    pub fn try_fire(&mut self, now: f32) -> bool {
        self.reload(now);
        if !self.can_fire(now) {
            return false;
        }
        self.rounds_remaining -= 1;
        self.last_fired_at = Some(now);
        true
    }

    /// Damage of the next shot with a strength multiplier applied
    pub fn shot_damage(&self, multiplier: f32) -> i32 {
        (self.damage as f32 * multiplier).round() as i32
    }
}
