//! Fixed timestep simulation tick
//!
//! Advances the world by one step in a fixed order; each step sees the
//! mutations of the ones before it:
//!
//! 0. player movement and firing
//! 1. platform motion, culling and generation, boss stage and attacks
//! 2. player vs platform contact
//! 3. enemy patrol, melee contact, deaths
//! 4. projectile motion and hits
//! 5. collectibles ride their hosts and get picked up
//! 6. chest and portal proximity and interaction
//! 7. level completion swaps in the next level
//! 8. camera scroll, screen-bound penalty, game over

use super::boss::BossAttack;
use super::chest::{ChestContents, ChestState};
use super::combat;
use super::generator::generate;
use super::pickup::{Collectible, CollectibleKind, Potion};
use super::player::Controls;
use super::projectile::Projectile;
use super::state::{GameEvent, Prompt, SessionPhase, World};
use super::weapon::Weapon;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump (only acts while grounded)
    pub jump: bool,
    /// Fire the current weapon while held
    pub fire: bool,
    /// Pick up / open / enter
    pub interact: bool,
    /// Pause toggle
    pub pause: bool,
    /// Host should stop; the tick itself ignores it
    pub quit: bool,
}

impl TickInput {
    fn controls(&self) -> Controls {
        Controls {
            left: self.left,
            right: self.right,
            jump: self.jump,
        }
    }
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if input.pause {
        match world.phase {
            SessionPhase::Playing => {
                world.phase = SessionPhase::Paused;
                log::info!("Paused");
                return;
            }
            SessionPhase::Paused => {
                world.phase = SessionPhase::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    if !world.is_running() {
        return;
    }

    world.time += dt;
    world.time_ticks += 1;

    // 0. Player intent
    world.player.drive(input.controls());
    if input.fire {
        fire_weapon(world);
    }

    // 1. Level upkeep
    world.level.step_platforms();
    let culled = world.level.cull_platforms();
    if culled > 0 {
        log::debug!("Culled {culled} platform(s)");
    }
    if let Some(generated) = generate(&mut world.level, &mut world.rng) {
        world.apply_generated(generated);
    }
    update_boss(world);

    // 2. Platform contact
    world.player.resolve_platforms(world.level.platforms.iter());

    // 3. Enemies
    combat::update_enemies(world);
    combat::resolve_melee(world);
    combat::settle_deaths(world);

    // 4. Projectiles
    combat::resolve_projectiles(world);

    // 5. Collectibles
    update_collectibles(world);

    // 6. Chests and portals
    update_interactables(world, input);

    // 7. Level completion
    if world.level_complete {
        let next = world.level.number + 1;
        world.enter_level(next);
        world.normalize_order();
        return;
    }

    // 8. Camera and bounds
    let rate = if world.player.pos().x >= world.tuning.scroll_push_x {
        world.tuning.scroll_fast
    } else {
        world.tuning.scroll_slow
    };
    world.scroll(rate);

    if world.player.out_of_bounds() {
        world.player.take_damage(world.tuning.bound_penalty);
    }
    if !world.player.is_alive() {
        world.phase = SessionPhase::GameOver;
        world.emit(GameEvent::PlayerDeath);
        log::info!(
            "Game over on level {} after {} ticks",
            world.level.number,
            world.time_ticks
        );
    }

    world.player.update_anim(world.time);
    world.normalize_order();
}

fn fire_weapon(world: &mut World) {
    let now = world.time;
    let player = &mut world.player;
    if !player.weapon.try_fire(now) {
        return;
    }
    let kind = player.weapon.kind;
    let damage = player.weapon.shot_damage(player.damage_multiplier);
    let muzzle = player.muzzle();
    let facing_left = player.facing_left;

    let id = world.next_entity_id();
    let shot = Projectile::player_shot(id, kind, muzzle, facing_left, damage, &mut world.rng);
    world.projectiles.push(shot);
    world.emit(GameEvent::ShotFired(kind));
}

fn update_boss(world: &mut World) {
    let now = world.time;
    let laser_active = world.laser_active();
    let Some(boss) = world.level.boss.as_mut() else {
        return;
    };
    boss.update_stage(laser_active, &mut world.rng);
    let Some(attack) = boss.fire(now, laser_active, &mut world.rng) else {
        return;
    };

    let id = world.next_entity_id();
    let projectile = match attack {
        BossAttack::Missile { origin } => Projectile::enemy_bullet(id, origin),
        BossAttack::Laser { start_x, target_x } => Projectile::enemy_laser(id, start_x, target_x),
    };
    log::debug!("Boss fired {:?}", projectile.kind);
    world.projectiles.push(projectile);
}

fn update_collectibles(world: &mut World) {
    let level = &world.level;
    world
        .collectibles
        .retain_mut(|c| match level.live_host(c.host) {
            Some(host) => {
                c.ride(host);
                true
            }
            None => false,
        });

    let player_box = world.player.hitbox();
    let mut picked = Vec::new();
    for collectible in &mut world.collectibles {
        if collectible.hitbox().intersects(&player_box) && collectible.collect() {
            picked.push(collectible.kind);
        }
    }
    world.collectibles.retain(|c| !c.collected);

    for kind in picked {
        match kind {
            CollectibleKind::Coin => {
                world.coins += 1;
                world.emit(GameEvent::CoinPickup);
            }
            CollectibleKind::HealthPotion(amount) => {
                world.player.apply_potion(Potion::Health(amount));
                world.emit(GameEvent::PotionPickup);
            }
            CollectibleKind::StrengthPotion(percent) => {
                world.player.apply_potion(Potion::Strength(percent));
                world.emit(GameEvent::PotionPickup);
            }
        }
    }
}

fn update_interactables(world: &mut World, input: &TickInput) {
    world.prompt = None;
    let level = &world.level;
    world.chests.retain(|c| level.live_host(c.host).is_some());
    world.portals.retain(|p| level.live_host(p.host).is_some());

    let player_box = world.player.hitbox();
    let cost = world.tuning.potion_cost;

    for i in 0..world.chests.len() {
        let chest = &mut world.chests[i];
        let Some(host) = world.level.platform(chest.host) else {
            continue;
        };
        let near = chest.hitbox(host).intersects(&player_box);
        let drop_x = host.center_x();

        if chest.advance() {
            if let ChestContents::Upgrade(potion) = chest.contents {
                chest.collect();
                let host = host.clone();
                let id = world.next_entity_id();
                world
                    .collectibles
                    .push(Collectible::drop_at(id, potion.into(), drop_x, &host));
            }
            continue;
        }
        if !near || chest.state == ChestState::Collected {
            continue;
        }

        match chest.contents {
            ChestContents::Weapon(kind) => {
                chest.begin_opening();
                world.prompt = Some(Prompt::Weapon(kind));
                if input.interact {
                    chest.collect();
                    world.player.weapon = Weapon::new(kind);
                    world.emit(GameEvent::WeaponPickup);
                    log::info!("Picked up {}", kind.display_name());
                }
            }
            ChestContents::Upgrade(_) if chest.state == ChestState::Closed => {
                world.prompt = Some(Prompt::Upgrade { cost });
                if input.interact {
                    if world.coins >= cost {
                        world.coins -= cost;
                        chest.begin_opening();
                    } else {
                        world.emit(GameEvent::NotEnoughCoins);
                    }
                }
            }
            ChestContents::Upgrade(_) => {}
        }
    }

    for portal in &mut world.portals {
        portal.animate();
    }
    let near_portal = world.portals.iter().any(|portal| {
        world
            .level
            .platform(portal.host)
            .is_some_and(|host| portal.hitbox(host).intersects(&player_box))
    });
    if near_portal {
        world.prompt = Some(Prompt::Portal);
        if input.interact && !world.level_complete {
            world.level_complete = true;
            world.emit(GameEvent::PortalEnter);
            log::info!("Level {} complete", world.level.number);
        }
    }
}
