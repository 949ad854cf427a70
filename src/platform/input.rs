//! Input sampling
//!
//! Sources are polled once per frame. The same [`TickInput`] is fed to every
//! substep of that frame, except that one-shot inputs only reach the first.

use crate::sim::{Platform, Prompt, TickInput, World};

/// Anything that can produce a frame's input
pub trait InputSource {
    fn poll(&mut self, world: &World) -> TickInput;
}

/// Drop inputs that must act once per press
pub fn clear_one_shots(input: &mut TickInput) {
    input.jump = false;
    input.interact = false;
    input.pause = false;
}

/// Distance from a platform edge at which the autopilot jumps
const EDGE_LOOKAHEAD: f32 = 24.0;
/// Enemies closer than this ahead get shot at
const ENGAGE_RANGE: f32 = 420.0;

/// Autopilot for headless runs: keeps up with the scroll, jumps gaps,
/// shoots what is ahead and takes every chest and portal it can
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    frame: u64,
    /// Request quit after this many frames
    pub max_frames: Option<u64>,
}

impl ScriptedInput {
    pub fn new(max_frames: Option<u64>) -> Self {
        Self {
            frame: 0,
            max_frames,
        }
    }

    fn standing_on<'a>(world: &'a World) -> Option<&'a Platform> {
        let feet = world.player.hitbox();
        world
            .level
            .platforms
            .iter()
            .find(|p| feet.intersects(&p.top_strip()))
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, world: &World) -> TickInput {
        self.frame += 1;
        let player = &world.player;
        let x = player.pos().x;

        let mut input = TickInput {
            right: x < 640.0,
            quit: self.max_frames.is_some_and(|max| self.frame >= max),
            ..Default::default()
        };

        if player.grounded {
            let near_edge = Self::standing_on(world)
                .is_some_and(|p| p.right_edge() - x < EDGE_LOOKAHEAD);
            input.jump = near_edge;
        }

        let enemy_ahead = world
            .enemies
            .iter()
            .any(|e| e.is_alive() && e.pos.x > x && e.pos.x - x < ENGAGE_RANGE);
        input.fire = enemy_ahead || world.level.is_boss();

        input.interact = match world.prompt {
            Some(Prompt::Weapon(kind)) => kind != player.weapon.kind,
            Some(Prompt::Upgrade { cost }) => world.coins >= cost,
            Some(Prompt::Portal) => true,
            None => false,
        };

        input
    }
}
