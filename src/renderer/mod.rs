//! Render sink interface
//!
//! The simulation never draws. After each frame the host hands the world to
//! a [`RenderSink`], which reads positions, animation frames and health off
//! it. [`FrameSummary`] is the flattened, serializable view used by headless
//! sinks and by the binary's final report.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{BossStage, PlayerAnim, Prompt, SessionPhase, Theme, WeaponKind, World};

/// Something that presents a world snapshot. Must not block the loop.
pub trait RenderSink {
    fn render(&mut self, world: &World);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossSummary {
    pub health: i32,
    pub max_health: i32,
    pub stage: BossStage,
    pub open_channels: usize,
}

/// Flattened per-frame view of the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub tick: u64,
    pub time: f32,
    pub phase: SessionPhase,
    pub level: u32,
    pub theme: Theme,
    pub player_pos: Vec2,
    pub player_health: i32,
    pub player_max_health: i32,
    pub player_anim: PlayerAnim,
    pub weapon: WeaponKind,
    pub rounds: u32,
    pub damage_multiplier: f32,
    pub coins: u32,
    pub platforms: usize,
    pub enemies: usize,
    pub projectiles: usize,
    pub collectibles: usize,
    pub chests: usize,
    pub portals: usize,
    pub prompt: Option<Prompt>,
    pub boss: Option<BossSummary>,
}

impl FrameSummary {
    pub fn capture(world: &World) -> Self {
        let player = &world.player;
        Self {
            tick: world.time_ticks,
            time: world.time,
            phase: world.phase,
            level: world.level.number,
            theme: world.level.theme,
            player_pos: player.pos(),
            player_health: player.health,
            player_max_health: player.max_health,
            player_anim: player.anim,
            weapon: player.weapon.kind,
            rounds: player.weapon.rounds_remaining,
            damage_multiplier: player.damage_multiplier,
            coins: world.coins,
            platforms: world.level.platforms.len(),
            enemies: world.enemies.len(),
            projectiles: world.projectiles.len(),
            collectibles: world.collectibles.len(),
            chests: world.chests.len(),
            portals: world.portals.len(),
            prompt: world.prompt,
            boss: world.level.boss.as_ref().map(|boss| BossSummary {
                health: boss.health,
                max_health: boss.max_health,
                stage: boss.stage,
                open_channels: boss
                    .channels
                    .iter()
                    .filter(|c| c.is_open(world.time))
                    .count(),
            }),
        }
    }
}

/// Headless sink: logs a summary every `every` frames
#[derive(Debug)]
pub struct LogRenderer {
    every: u64,
    frames: u64,
    pub last: Option<FrameSummary>,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
            last: None,
        }
    }
}

impl RenderSink for LogRenderer {
    fn render(&mut self, world: &World) {
        let summary = FrameSummary::capture(world);
        if self.frames % self.every == 0 {
            log::info!(
                "[frame {}] level {} {:?} hp {}/{} coins {} weapon {} | {} platforms, {} enemies, {} shots",
                self.frames,
                summary.level,
                summary.phase,
                summary.player_health,
                summary.player_max_health,
                summary.coins,
                summary.weapon.display_name(),
                summary.platforms,
                summary.enemies,
                summary.projectiles,
            );
            if let Some(boss) = &summary.boss {
                log::info!(
                    "  boss {}/{} {:?}, {} channel(s) open",
                    boss.health,
                    boss.max_health,
                    boss.stage,
                    boss.open_channels
                );
            }
        }
        self.frames += 1;
        self.last = Some(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    #[test]
    fn test_summary_reflects_world() {
        let mut world = World::new(4, Tuning::default());
        world.coins = 7;
        let summary = FrameSummary::capture(&world);
        assert_eq!(summary.level, 0);
        assert_eq!(summary.coins, 7);
        assert_eq!(summary.weapon, WeaponKind::Pistol);
        assert_eq!(summary.platforms, 1);
        assert!(summary.boss.is_none());

        world.enter_level(5);
        let summary = FrameSummary::capture(&world);
        let boss = summary.boss.expect("boss level");
        assert_eq!(boss.health, 750);
        assert_eq!(boss.open_channels, 0);
    }

    #[test]
    fn test_summary_serializes() {
        let world = World::new(4, Tuning::default());
        let json = serde_json::to_string(&FrameSummary::capture(&world)).unwrap();
        let back: FrameSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.player_pos, world.player.pos());
    }

    #[test]
    fn test_log_renderer_keeps_last() {
        let world = World::new(4, Tuning::default());
        let mut sink = LogRenderer::new(60);
        sink.render(&world);
        sink.render(&world);
        assert_eq!(sink.last.as_ref().map(|s| s.tick), Some(0));
    }
}
