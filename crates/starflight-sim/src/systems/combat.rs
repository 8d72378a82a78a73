//! Weapon firing and damage dispatch, shared by every armed ship.

use hecs::{Entity, World};
use tracing::{debug, info};

use starflight_core::components::{KinematicBody, Weapon};
use starflight_core::enums::EntityKind;
use starflight_core::events::SimEvent;
use starflight_core::types::Transform;

use crate::capabilities::{DamageOutcome, Damageable, Weaponized};
use crate::engine::entity_id;
use crate::projectile_pool::{ProjectilePool, Shooter};

/// Fire both guns if the weapon is off cooldown. Returns how many
/// projectiles the pool accepted. The cooldown only restarts when at least
/// one was accepted, so a saturated pool can be retried next tick.
pub fn fire(
    pool: &mut ProjectilePool,
    shooter: Shooter,
    transform: &Transform,
    weapon: &mut Weapon,
    now: f64,
    events: &mut Vec<SimEvent>,
) -> u32 {
    if !weapon.ready(now) {
        return 0;
    }

    let forward = transform.forward();
    let mut spawned = 0;
    for muzzle in weapon.muzzles(transform) {
        if let Some(handle) = pool.spawn(shooter, forward, &weapon.projectile, Some(muzzle), now) {
            events.push(SimEvent::ProjectileActivated {
                handle,
                shooter: shooter.id,
            });
            spawned += 1;
        }
    }

    if spawned > 0 {
        weapon.mark_fired(now);
        events.push(SimEvent::WeaponFired {
            shooter: shooter.id,
            projectiles: spawned,
        });
    } else {
        debug!(shooter = %shooter.id, "projectile pool exhausted, shot dropped");
    }
    spawned
}

/// Apply damage to a ship. `None` if the entity is gone or cannot be damaged.
pub fn apply_damage(
    world: &mut World,
    entity: Entity,
    amount: f64,
    events: &mut Vec<SimEvent>,
) -> Option<DamageOutcome> {
    let (kind, outcome) = {
        let (kind, body) = world
            .query_one_mut::<(&EntityKind, &mut KinematicBody)>(entity)
            .ok()?;
        (*kind, body.take_damage(amount))
    };

    let id = entity_id(entity);
    if outcome.applied > 0.0 {
        debug!(%id, amount = outcome.applied, remaining = outcome.remaining, "ship hit");
        events.push(SimEvent::ShipDamaged {
            id,
            amount: outcome.applied,
            remaining: outcome.remaining,
        });
    }
    if outcome.destroyed_now {
        info!(%id, ?kind, "ship destroyed");
        events.push(SimEvent::EntityDestroyed { id, kind });
    }
    Some(outcome)
}
