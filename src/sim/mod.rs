//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (the world owns it)
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod boss;
pub mod chest;
pub mod combat;
pub mod enemy;
pub mod generator;
pub mod level;
pub mod pickup;
pub mod platform;
pub mod player;
pub mod projectile;
pub mod rect;
pub mod state;
pub mod tick;
pub mod timer;
pub mod weapon;

pub use body::Body;
pub use boss::{Boss, BossAttack, BossStage, ChannelHit};
pub use chest::{Chest, ChestContents, ChestState, Portal};
pub use enemy::{Enemy, EnemyKind, EnemyState};
pub use generator::{Generated, Spawn, generate};
pub use level::{GenerationPhase, Level, Theme, is_boss_level};
pub use pickup::{Collectible, CollectibleKind, Potion};
pub use platform::{Oscillation, Platform, PlatformId, PlatformKind, PlatformRole};
pub use player::{Controls, Player, PlayerAnim};
pub use projectile::{Faction, Projectile, ProjectileKind, ProjectileState};
pub use rect::Rect;
pub use state::{GameEvent, Prompt, SessionPhase, World};
pub use tick::{TickInput, tick};
pub use timer::Timer;
pub use weapon::{Weapon, WeaponKind};
