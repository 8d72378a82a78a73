//! Projectile update: integrate, expire, leash, and collide.
//!
//! Targets are gathered once per tick in registration order, which is also
//! the tie-break when a projectile overlaps more than one entity.

use glam::DVec3;
use hecs::{Entity, World};

use starflight_core::components::KinematicBody;
use starflight_core::enums::{DeactivationReason, EntityKind, Faction, ProjectileLeash};
use starflight_core::events::SimEvent;
use starflight_core::types::{EntityId, ProjectileHandle, Transform};

use crate::engine::{entity_id, resolve};
use crate::projectile_pool::ProjectilePool;
use crate::systems::combat;

struct Target {
    entity: Entity,
    id: EntityId,
    faction: Option<Faction>,
    position: DVec3,
    /// Celestial bodies stop projectiles but take no damage.
    damageable: bool,
    alive: bool,
}

pub fn run(
    world: &mut World,
    roster: &[Entity],
    pool: &mut ProjectilePool,
    now: f64,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    let mut targets = collect_targets(world, roster);
    let max_travel = pool.max_travel_distance();
    let radius = pool.collision_radius();
    let leash = pool.leash();

    for (index, projectile) in pool.slots_mut().iter_mut().enumerate() {
        if !projectile.active {
            continue;
        }
        let handle = ProjectileHandle::new(index as u32, projectile.generation());
        projectile.position += projectile.velocity * dt;

        if now - projectile.created_at > projectile.lifetime_secs {
            projectile.active = false;
            events.push(SimEvent::ProjectileDeactivated {
                handle,
                reason: DeactivationReason::Expired,
            });
            continue;
        }

        let anchor = match leash {
            ProjectileLeash::Shooter => resolve(world, projectile.shooter)
                .and_then(|shooter| world.get::<&Transform>(shooter).ok().map(|t| t.position))
                .unwrap_or(projectile.origin),
            ProjectileLeash::SpawnPoint => projectile.origin,
        };
        if projectile.position.distance(anchor) > max_travel {
            projectile.active = false;
            events.push(SimEvent::ProjectileDeactivated {
                handle,
                reason: DeactivationReason::OutOfRange,
            });
            continue;
        }

        let hit = targets.iter_mut().find(|t| {
            t.alive
                && t.id != projectile.shooter
                && !(t.faction.is_some() && t.faction == projectile.faction)
                && t.position.distance(projectile.position) < radius
        });
        let Some(target) = hit else {
            continue;
        };

        projectile.active = false;
        events.push(SimEvent::ProjectileDeactivated {
            handle,
            reason: DeactivationReason::Hit,
        });
        if target.damageable {
            let outcome = combat::apply_damage(world, target.entity, projectile.damage, events);
            if outcome.is_some_and(|o| o.destroyed_now) {
                target.alive = false;
            }
        }
    }
}

fn collect_targets(world: &World, roster: &[Entity]) -> Vec<Target> {
    roster
        .iter()
        .filter_map(|&entity| {
            let kind = *world.get::<&EntityKind>(entity).ok()?;
            let position = world.get::<&Transform>(entity).ok()?.position;
            let body = world.get::<&KinematicBody>(entity).ok();
            if body.as_ref().is_some_and(|b| b.destroyed) {
                return None;
            }
            Some(Target {
                entity,
                id: entity_id(entity),
                faction: kind.faction(),
                position,
                damageable: body.is_some(),
                alive: true,
            })
        })
        .collect()
}
