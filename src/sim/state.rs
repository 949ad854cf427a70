//! World state and core simulation types
//!
//! Everything the simulation mutates lives in [`World`]. Subsystems take the
//! world (or disjoint pieces of it) explicitly; nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chest::{Chest, ChestContents, Portal};
use super::enemy::Enemy;
use super::generator::{Generated, Spawn};
use super::level::Level;
use super::pickup::Collectible;
use super::player::Player;
use super::projectile::{Projectile, ProjectileKind};
use super::weapon::{Weapon, WeaponKind};
use crate::Tuning;
use crate::consts::FINAL_LEVEL;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    Paused,
    /// Player died
    GameOver,
    /// Final level cleared
    Victory,
}

/// Things that happened during a tick, drained by the host for audio/UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired(WeaponKind),
    PlayerHit,
    EnemyHit,
    EnemyKilled,
    Explosion,
    CoinPickup,
    PotionPickup,
    WeaponPickup,
    NotEnoughCoins,
    BossHit,
    BossMiss,
    PortalEnter,
    LevelStarted(u32),
    PlayerDeath,
    Victory,
}

/// Interaction hint for whatever the player is standing next to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prompt {
    /// Weapon chest; interact to swap
    Weapon(WeaponKind),
    /// Closed upgrade chest and what it costs
    Upgrade { cost: u32 },
    /// Level exit
    Portal,
}

#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    /// Simulation clock (seconds); every timer is measured against it
    pub time: f32,
    pub time_ticks: u64,
    pub phase: SessionPhase,
    pub level: Level,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub collectibles: Vec<Collectible>,
    pub chests: Vec<Chest>,
    pub portals: Vec<Portal>,
    /// Currency, kept across levels
    pub coins: u32,
    /// Set during the tick for the render sink
    pub prompt: Option<Prompt>,
    /// Events raised since the host last drained them
    pub events: Vec<GameEvent>,
    /// Raised by the portal; consumed by the level swap
    pub level_complete: bool,
    next_id: u32,
}

impl World {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let level = Level::for_number(0, &tuning);
        let theme = level.theme;
        let player = Player::new(
            level.spawn_point(),
            tuning.starting_health,
            theme.accel_x(),
            theme.is_slippery(),
        );
        log::info!("New session (seed {seed})");
        Self {
            seed,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            time: 0.0,
            time_ticks: 0,
            phase: SessionPhase::Playing,
            level,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            collectibles: Vec::new(),
            chests: Vec::new(),
            portals: Vec::new(),
            coins: 0,
            prompt: None,
            events: Vec::new(),
            level_complete: false,
            next_id: 1,
        }
    }

    /// Start over from level 0 with the same seed and tuning
    pub fn restart(&mut self) {
        *self = Self::new(self.seed, self.tuning.clone());
    }

    /// Get next entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Sort registries by entity ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.collectibles.sort_by_key(|c| c.id);
        self.chests.sort_by_key(|c| c.id);
        self.portals.sort_by_key(|p| p.id);
    }

    pub fn emit(&mut self, event: GameEvent) {
        log::debug!("event: {event:?}");
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    /// A boss laser is still sweeping
    pub fn laser_active(&self) -> bool {
        self.projectiles
            .iter()
            .any(|p| p.kind == ProjectileKind::EnemyLaser && !p.is_finished())
    }

    /// Total live entities across all transient registries
    pub fn entity_count(&self) -> usize {
        self.enemies.len()
            + self.projectiles.len()
            + self.collectibles.len()
            + self.chests.len()
            + self.portals.len()
    }

    /// Place whatever the generator asked for on its new platform
    pub fn apply_generated(&mut self, generated: Generated) {
        let Some(host) = self.level.platform(generated.platform).cloned() else {
            return;
        };
        for spawn in generated.spawns {
            let id = self.next_entity_id();
            match spawn {
                Spawn::Enemy { kind, speed } => {
                    self.enemies.push(Enemy::spawn(id, kind, speed, &host));
                }
                Spawn::Chest(contents) => {
                    self.chests.push(Chest::new(id, host.id, contents));
                }
                Spawn::Portal => {
                    self.portals.push(Portal::new(id, host.id));
                }
            }
        }
    }

    /// Weapon waiting in a chest
    pub fn chest_weapon(&self, index: usize) -> Option<WeaponKind> {
        match self.chests.get(index)?.contents {
            ChestContents::Weapon(kind) => Some(kind),
            ChestContents::Upgrade(_) => None,
        }
    }

    /// Swap in the level for `number`, or end the run after the last one.
    /// Every transient registry is cleared so nothing can refer to the old
    /// level's platforms.
    pub fn enter_level(&mut self, number: u32) {
        self.level_complete = false;
        self.enemies.clear();
        self.projectiles.clear();
        self.collectibles.clear();
        self.chests.clear();
        self.portals.clear();
        self.prompt = None;

        if number > FINAL_LEVEL {
            self.phase = SessionPhase::Victory;
            self.emit(GameEvent::Victory);
            log::info!("All levels cleared");
            return;
        }

        self.level = Level::for_number(number, &self.tuning);
        let theme = self.level.theme;
        self.player
            .respawn(self.level.spawn_point(), theme.accel_x(), theme.is_slippery());
        if number == 1 {
            self.player.weapon = Weapon::new(WeaponKind::Pistol);
            self.player.health = self.player.max_health;
        }
        self.emit(GameEvent::LevelStarted(number));
        log::info!(
            "Entering level {} ({:?}{})",
            number,
            theme,
            if self.level.is_boss() { ", boss" } else { "" }
        );
    }

    /// Shift everything left by the camera scroll
    pub fn scroll(&mut self, dx: f32) {
        if dx == 0.0 {
            return;
        }
        self.level.scroll(dx);
        self.player.scroll(dx);
        for enemy in &mut self.enemies {
            enemy.scroll(dx);
        }
        for projectile in &mut self.projectiles {
            projectile.scroll(dx);
        }
        for collectible in &mut self.collectibles {
            collectible.pos -= Vec2::new(dx, 0.0);
        }
    }
}
