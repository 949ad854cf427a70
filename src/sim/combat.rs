//! Combat resolution
//!
//! Every pass here takes the whole [`World`] and borrows the registries it
//! needs field by field. Events are buffered locally and emitted once the
//! pass is done with its borrows.
//!
//! Damage is idempotent within a tick: a hit arms the enemy's post-hit
//! window, so later passes in the same tick see it as invulnerable, and a
//! dying enemy never takes damage at all. Splash ignores the window; each
//! explosion's own flag keeps it to a single application.

use glam::Vec2;

use super::boss::ChannelHit;
use super::enemy::{Enemy, EnemyKind, STOMP_DAMAGE};
use super::pickup::{Collectible, CollectibleKind};
use super::projectile::{Faction, Projectile, ProjectileKind};
use super::rect::Rect;
use super::state::{GameEvent, World};
use crate::consts::SCREEN_HEIGHT;

/// Contact zones of an enemy body
#[derive(Debug, Clone, Copy)]
struct MeleeZones {
    left: Rect,
    right: Rect,
    /// Thin strip just above the head, inset from both sides
    top: Rect,
}

impl MeleeZones {
    fn around(enemy: &Enemy) -> Self {
        let body = enemy.hitbox();
        let half_w = body.w / 2.0;
        Self {
            top: Rect::new(body.x + 15.0, body.y - 5.0, body.w - 30.0, 2.0),
            left: Rect::new(body.x, body.y, half_w, body.h),
            right: Rect::new(body.x + half_w, body.y, half_w, body.h),
        }
    }
}

/// Patrol every enemy on its host and cull the ones whose host is gone or
/// whose death animation finished. Ice enemies throw an icicle whenever
/// they turn back at the right end of their platform.
pub fn update_enemies(world: &mut World) {
    let level = &world.level;
    let mut icicles = Vec::new();
    world.enemies.retain_mut(|enemy| {
        let Some(host) = level.live_host(enemy.host) else {
            log::debug!("Enemy {} lost its host", enemy.id);
            return false;
        };
        let outcome = enemy.update(host);
        if outcome.turned_at_right && enemy.kind == EnemyKind::Ice && enemy.is_alive() {
            icicles.push(enemy.pos - Vec2::new(enemy.size().x / 2.0, 0.0));
        }
        !enemy.death_finished()
    });

    for pos in icicles {
        let id = world.next_entity_id();
        world.projectiles.push(Projectile::icicle(id, pos));
    }
}

/// Player body against enemy bodies: stomps from above, knockback from
/// the flanks
pub fn resolve_melee(world: &mut World) {
    let now = world.time;
    let mut events = Vec::new();
    let player = &mut world.player;

    for enemy in world.enemies.iter_mut().filter(|e| e.is_alive()) {
        let hitbox = player.hitbox();
        let zones = MeleeZones::around(enemy);

        if player.body.vel.y >= 0.0 && hitbox.intersects(&zones.top) {
            if enemy.take_damage(STOMP_DAMAGE, now) {
                events.push(GameEvent::EnemyHit);
            }
            player.bounce();
            continue;
        }

        if player.is_invincible(now) || !hitbox.intersects(&enemy.hitbox()) {
            continue;
        }
        let push = if hitbox.intersects(&zones.left) {
            -enemy.kind.knockback()
        } else {
            enemy.kind.knockback()
        };
        player.knock_back(enemy.kind.contact_damage(), push, enemy.pos, enemy.size(), now);
        events.push(GameEvent::PlayerHit);
    }

    for event in events {
        world.emit(event);
    }
}

/// Move every projectile and resolve its hits, then cull the finished ones
pub fn resolve_projectiles(world: &mut World) {
    let now = world.time;
    let mut events = Vec::new();

    for projectile in &mut world.projectiles {
        projectile.advance();
    }

    // Explosions that started last tick splash exactly once
    let splash = world.tuning.splash_damage;
    for projectile in world.projectiles.iter_mut().filter(|p| p.splash_pending()) {
        if let Some(area) = projectile.splash_hitbox() {
            for enemy in world.enemies.iter_mut() {
                if area.intersects(&enemy.hitbox()) && enemy.take_splash(splash, now) {
                    events.push(GameEvent::EnemyHit);
                }
            }
        }
        projectile.mark_splash_applied();
    }

    for shot in world
        .projectiles
        .iter_mut()
        .filter(|p| p.faction == Faction::Player && p.is_live())
    {
        hit_enemies(shot, &mut world.enemies, now, &mut events);
        if shot.explosive
            && shot.is_live()
            && world
                .level
                .platforms
                .iter()
                .any(|p| p.rect().intersects(&shot.hitbox()))
            && shot.detonate()
        {
            events.push(GameEvent::Explosion);
        }
    }

    if let Some(boss) = world.level.boss.as_mut() {
        let divisor = world.tuning.boss_damage_divisor;
        for shot in world
            .projectiles
            .iter_mut()
            .filter(|p| p.faction == Faction::Player && p.is_live())
        {
            let Some(index) = boss.channel_at(&shot.hitbox()) else {
                continue;
            };
            if shot.detonate() {
                events.push(GameEvent::Explosion);
            }
            match boss.hit_channel(index, shot.damage, divisor, now) {
                ChannelHit::Hit => {
                    events.push(GameEvent::BossHit);
                    if shot.is_live() {
                        shot.consume();
                    }
                }
                ChannelHit::Miss if !shot.missed_boss => {
                    shot.missed_boss = true;
                    events.push(GameEvent::BossMiss);
                }
                ChannelHit::Miss => {}
            }
        }
    }

    let player = &mut world.player;
    let player_box = player.hitbox();
    for shot in world
        .projectiles
        .iter_mut()
        .filter(|p| p.faction == Faction::Enemy && p.is_live())
    {
        if !shot.hitbox().intersects(&player_box) {
            continue;
        }
        if shot.piercing {
            // Sweeping lasers respect the invincibility window and re-arm it
            if player.is_invincible(now) {
                continue;
            }
            player.take_damage(shot.damage);
            player.invincible.arm(now);
        } else {
            player.take_damage(shot.damage);
            shot.consume();
        }
        events.push(GameEvent::PlayerHit);
    }

    for event in events {
        world.emit(event);
    }
    settle_deaths(world);
    world.projectiles.retain(|p| !p.is_finished());
}

/// One player shot against the enemy registry
fn hit_enemies(shot: &mut Projectile, enemies: &mut [Enemy], now: f32, events: &mut Vec<GameEvent>) {
    let hitbox = shot.hitbox();
    for enemy in enemies.iter_mut().filter(|e| e.is_vulnerable(now)) {
        if shot.kind == ProjectileKind::Lightning {
            if !hitbox.intersects(&enemy.column(SCREEN_HEIGHT)) {
                continue;
            }
            shot.body.pos.x = enemy.pos.x;
            shot.strike(enemy.pos.y);
            if enemy.take_damage(shot.damage, now) {
                events.push(GameEvent::EnemyHit);
            }
            return;
        }

        if !hitbox.intersects(&enemy.hitbox()) {
            continue;
        }
        if shot.explosive {
            if shot.detonate() {
                events.push(GameEvent::Explosion);
            }
            return;
        }
        if enemy.take_damage(shot.damage, now) {
            events.push(GameEvent::EnemyHit);
            if !shot.piercing {
                shot.consume();
                return;
            }
        }
    }
}

/// Move enemies whose health ran out into their death animation and drop
/// one coin for each, riding the same host
pub fn settle_deaths(world: &mut World) {
    let mut drops = Vec::new();
    for enemy in &mut world.enemies {
        if enemy.settle_death() {
            drops.push((enemy.pos.x, enemy.host));
        }
    }

    for (x, host) in drops {
        world.emit(GameEvent::EnemyKilled);
        let id = world.next_entity_id();
        if let Some(host) = world.level.platform(host) {
            world
                .collectibles
                .push(Collectible::drop_at(id, CollectibleKind::Coin, x, host));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::enemy::EnemyState;
    use crate::sim::platform::{PlatformId, PlatformKind, PlatformRole};
    use crate::sim::weapon::WeaponKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// World with one long static platform far from the player
    fn arena() -> (World, PlatformId) {
        let mut world = World::new(7, Tuning::default());
        let id = world.level.push_platform(
            Vec2::new(600.0, 400.0),
            300.0,
            PlatformKind::Static,
            PlatformRole::Normal,
        );
        (world, id)
    }

    fn add_enemy(world: &mut World, host: PlatformId, kind: EnemyKind, x: f32) -> usize {
        let id = world.next_entity_id();
        let platform = world.level.platform(host).unwrap().clone();
        let mut enemy = Enemy::spawn(id, kind, 0.3, &platform);
        enemy.pos.x = x;
        world.enemies.push(enemy);
        world.enemies.len() - 1
    }

    fn fire_at(world: &mut World, weapon: WeaponKind, muzzle: Vec2, damage: i32) {
        let id = world.next_entity_id();
        let mut rng = Pcg32::seed_from_u64(0);
        world
            .projectiles
            .push(Projectile::player_shot(id, weapon, muzzle, false, damage, &mut rng));
    }

    #[test]
    fn test_two_hits_kill_basic_enemy() {
        let (mut world, host) = arena();
        let e = add_enemy(&mut world, host, EnemyKind::Basic, 700.0);

        fire_at(&mut world, WeaponKind::Pistol, Vec2::new(680.0, 370.0), 80);
        resolve_projectiles(&mut world);
        assert_eq!(world.enemies[e].health, 20);
        assert!(world.enemies[e].is_alive());
        assert!(world.projectiles.is_empty());

        world.time += 1.0;
        fire_at(&mut world, WeaponKind::Pistol, Vec2::new(680.0, 370.0), 80);
        resolve_projectiles(&mut world);
        assert!(world.enemies[e].health <= 0);
        assert_eq!(world.enemies[e].state, EnemyState::Dying { ticks: 0 });

        let events = world.drain_events();
        assert_eq!(events.iter().filter(|e| **e == GameEvent::EnemyKilled).count(), 1);
        assert_eq!(world.collectibles.len(), 1);
        assert_eq!(world.collectibles[0].kind, CollectibleKind::Coin);
        assert_eq!(world.collectibles[0].host, host);
    }

    #[test]
    fn test_same_tick_hits_do_not_stack() {
        let (mut world, host) = arena();
        let e = add_enemy(&mut world, host, EnemyKind::Basic, 700.0);
        fire_at(&mut world, WeaponKind::Pistol, Vec2::new(680.0, 370.0), 40);
        fire_at(&mut world, WeaponKind::Pistol, Vec2::new(680.0, 370.0), 40);
        resolve_projectiles(&mut world);
        assert_eq!(world.enemies[e].health, 60);
        // The second bullet passed through the invulnerable enemy
        assert_eq!(world.projectiles.len(), 1);
    }

    #[test]
    fn test_splash_applies_once() {
        let (mut world, host) = arena();
        let a = add_enemy(&mut world, host, EnemyKind::Basic, 700.0);
        let b = add_enemy(&mut world, host, EnemyKind::Basic, 710.0);

        fire_at(&mut world, WeaponKind::GrenadeLauncher, Vec2::new(690.0, 380.0), 160);
        assert!(world.projectiles[0].detonate());
        resolve_projectiles(&mut world);
        assert_eq!(world.enemies[a].health, 100 - 160);
        assert_eq!(world.enemies[b].health, 100 - 160);
        assert!(!world.projectiles[0].splash_pending());

        resolve_projectiles(&mut world);
        assert_eq!(world.enemies[a].health, -60);
        assert_eq!(world.enemies[b].health, -60);
    }

    #[test]
    fn test_splash_not_reapplied_after_window() {
        let (mut world, host) = arena();
        let e = add_enemy(&mut world, host, EnemyKind::Ice, 700.0);
        fire_at(&mut world, WeaponKind::GrenadeLauncher, Vec2::new(690.0, 380.0), 160);
        world.projectiles[0].detonate();
        resolve_projectiles(&mut world);
        assert_eq!(world.enemies[e].health, 100 - 64);

        world.time += 1.0;
        resolve_projectiles(&mut world);
        assert_eq!(world.enemies[e].health, 36);
    }

    #[test]
    fn test_splash_hits_recently_damaged_enemy() {
        let (mut world, host) = arena();
        let e = add_enemy(&mut world, host, EnemyKind::Basic, 700.0);
        assert!(world.enemies[e].take_damage(20, world.time));

        world.time += 0.1;
        assert!(!world.enemies[e].is_vulnerable(world.time));
        fire_at(&mut world, WeaponKind::GrenadeLauncher, Vec2::new(690.0, 380.0), 160);
        world.projectiles[0].detonate();
        resolve_projectiles(&mut world);
        assert_eq!(world.enemies[e].health, 80 - 160);
    }

    #[test]
    fn test_missile_detonates_without_direct_damage() {
        let (mut world, host) = arena();
        let e = add_enemy(&mut world, host, EnemyKind::Basic, 700.0);
        fire_at(&mut world, WeaponKind::MissileLauncher, Vec2::new(660.0, 390.0), 160);

        resolve_projectiles(&mut world);
        assert_eq!(world.enemies[e].health, 100);
        assert!(world.drain_events().contains(&GameEvent::Explosion));
        assert!(world.projectiles[0].splash_pending());

        resolve_projectiles(&mut world);
        assert_eq!(world.enemies[e].health, -60);
    }

    #[test]
    fn test_piercing_laser_hits_both() {
        let (mut world, host) = arena();
        let a = add_enemy(&mut world, host, EnemyKind::Basic, 700.0);
        let b = add_enemy(&mut world, host, EnemyKind::Basic, 720.0);
        fire_at(&mut world, WeaponKind::LaserCannon, Vec2::new(600.0, 370.0), 30);
        resolve_projectiles(&mut world);
        assert_eq!(world.enemies[a].health, 70);
        assert_eq!(world.enemies[b].health, 70);
        assert_eq!(world.projectiles.len(), 1);
    }

    #[test]
    fn test_lightning_locks_on_column() {
        let (mut world, host) = arena();
        let e = add_enemy(&mut world, host, EnemyKind::Basic, 700.0);
        fire_at(&mut world, WeaponKind::LightningStaff, Vec2::new(670.0, 100.0), 40);
        resolve_projectiles(&mut world);
        assert_eq!(world.enemies[e].health, 60);
        let bolt = &world.projectiles[0];
        assert!(!bolt.is_live());
        assert_eq!(bolt.pos().x, 700.0);
    }

    #[test]
    fn test_flank_contact_knocks_player_back() {
        let (mut world, host) = arena();
        let e = add_enemy(&mut world, host, EnemyKind::Underworld, 700.0);
        let enemy_pos = world.enemies[e].pos;
        world.player.body.pos = Vec2::new(680.0, enemy_pos.y + 5.0);
        world.player.body.vel = Vec2::new(1.0, 0.0);

        resolve_melee(&mut world);
        assert_eq!(world.player.health, 85);
        assert_eq!(world.player.pos().x, 700.0 - 48.0);
        assert!(world.player.is_invincible(world.time));
        assert_eq!(world.enemies[e].health, 100);

        // Inside the window, contact does nothing
        world.player.body.pos = Vec2::new(680.0, enemy_pos.y + 5.0);
        resolve_melee(&mut world);
        assert_eq!(world.player.health, 85);
    }

    #[test]
    fn test_walking_into_basic_enemy_hurts_player() {
        let (mut world, host) = arena();
        let e = add_enemy(&mut world, host, EnemyKind::Basic, 700.0);
        world.player.body.pos = Vec2::new(666.0, 380.0);
        world.player.body.vel = Vec2::new(2.0, 0.0);
        world.player.grounded = true;

        resolve_melee(&mut world);
        assert_eq!(world.player.health, 90);
        assert_eq!(world.enemies[e].health, 100);
        assert_eq!(world.player.pos().x, 700.0 - 38.0);
        assert!(world.drain_events().contains(&GameEvent::PlayerHit));
    }

    #[test]
    fn test_stomp_damages_enemy_only() {
        let (mut world, host) = arena();
        let e = add_enemy(&mut world, host, EnemyKind::Basic, 700.0);
        let top = world.enemies[e].hitbox().y;
        world.player.body.pos = Vec2::new(700.0, top - 18.0);
        world.player.body.vel = Vec2::new(0.0, 3.0);

        resolve_melee(&mut world);
        assert_eq!(world.enemies[e].health, 75);
        assert_eq!(world.player.health, 100);
        assert_eq!(world.player.body.vel.y, -4.0);
    }

    #[test]
    fn test_icicle_hits_and_is_consumed() {
        let (mut world, _) = arena();
        let id = world.next_entity_id();
        let target = world.player.pos();
        world
            .projectiles
            .push(Projectile::icicle(id, target + Vec2::new(10.0, 0.0)));
        resolve_projectiles(&mut world);
        assert_eq!(world.player.health, 90);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_enemy_laser_respects_invincibility() {
        let (mut world, _) = arena();
        let x = world.player.pos().x;
        let id = world.next_entity_id();
        world.projectiles.push(Projectile::enemy_laser(id, x - 20.0, x + 200.0));

        resolve_projectiles(&mut world);
        assert_eq!(world.player.health, 88);
        resolve_projectiles(&mut world);
        assert_eq!(world.player.health, 88);
        assert_eq!(world.projectiles.len(), 1);
    }

    #[test]
    fn test_ice_enemy_throws_icicles() {
        let (mut world, host) = arena();
        let e = add_enemy(&mut world, host, EnemyKind::Ice, 880.0);
        world.enemies[e].speed = 1.0;
        for _ in 0..30 {
            update_enemies(&mut world);
        }
        assert!(world.enemies[e].facing_left);
        let icicles = world
            .projectiles
            .iter()
            .filter(|p| p.kind == ProjectileKind::Icicle)
            .count();
        assert_eq!(icicles, 1);
    }

    #[test]
    fn test_enemies_culled_with_host() {
        let (mut world, host) = arena();
        add_enemy(&mut world, host, EnemyKind::Basic, 700.0);
        world.scroll(1000.0);
        update_enemies(&mut world);
        assert!(world.enemies.is_empty());
    }
}
