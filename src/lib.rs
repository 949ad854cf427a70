//! Sky Runner - a side-scrolling platformer shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, combat, boss, session)
//! - `renderer`: Render sink interface and frame snapshots
//! - `audio`: Fire-and-forget sound cue dispatch
//! - `platform`: Frame clock and input sources
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz, kinematics are per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Play area dimensions
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Grid unit used for platform placement
    pub const TILE: f32 = 20.0;
    /// Platform thickness
    pub const PLATFORM_WIDTH: f32 = 20.0;

    /// Player hitbox
    pub const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 40.0);
    /// Coins and potions
    pub const COLLECTIBLE_SIZE: f32 = 16.0;
    /// Chest hitbox edge
    pub const CHEST_SIZE: f32 = 64.0;
    /// Portal hitbox edge
    pub const PORTAL_SIZE: f32 = 128.0;

    /// Animation frames are held for this many ticks
    pub const TICKS_PER_FRAME: u32 = 8;
    /// Enemy explosion on death (10 frames)
    pub const ENEMY_DEATH_TICKS: u32 = 10 * TICKS_PER_FRAME;
    /// Grenade/missile/plasma explosion (8 frames)
    pub const EXPLOSION_TICKS: u32 = 8 * TICKS_PER_FRAME;
    /// Chest opening (5 frames)
    pub const CHEST_OPEN_TICKS: u32 = 5 * TICKS_PER_FRAME;

    /// Last regular level; finishing it wins the run
    pub const FINAL_LEVEL: u32 = 15;
}

/// Rectangle center to top-left for a box of `size`
#[inline]
pub fn top_left(center: Vec2, size: Vec2) -> Vec2 {
    center - size / 2.0
}
