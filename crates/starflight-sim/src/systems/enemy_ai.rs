//! Enemy AI system. Runs the FSM for every AI-driven ship each tick.
//!
//! Calls the FSM from starflight-ai for the decision, then applies the
//! resulting steering, thrust and fire through the ship's capabilities.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use starflight_core::components::{AiAgent, KinematicBody, Weapon};
use starflight_core::enums::EntityKind;
use starflight_core::events::SimEvent;
use starflight_core::types::{Transform, Velocity};

use starflight_ai::fsm::{evaluate, AgentContext};
use starflight_ai::profiles::{get_profile, BehaviorProfile};

use crate::capabilities::{Movable, ShipBody};
use crate::engine::entity_id;
use crate::projectile_pool::{ProjectilePool, Shooter};
use crate::systems::combat;

/// Run the enemy AI. Agents are visited in registration order so patrol
/// draws from the shared RNG are reproducible.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    roster: &[Entity],
    player: Option<Entity>,
    pool: &mut ProjectilePool,
    rng: &mut ChaCha8Rng,
    now: f64,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    let player_position = player
        .and_then(|p| world.get::<&Transform>(p).ok().map(|t| t.position));

    for &entity in roster {
        let Ok((kind, transform, velocity, body, weapon, agent)) = world.query_one_mut::<(
            &EntityKind,
            &mut Transform,
            &mut Velocity,
            &mut KinematicBody,
            &mut Weapon,
            &mut AiAgent,
        )>(entity) else {
            continue;
        };
        if body.destroyed {
            continue;
        }

        let profile = get_profile(*kind).unwrap_or_else(BehaviorProfile::hostile);
        let ctx = AgentContext {
            state: agent.state,
            position: transform.position,
            player_position,
            detection_range: agent.detection_range,
            attack_range: agent.attack_range,
            patrol_point: agent.patrol_point,
            patrol_radius: agent.patrol_radius,
        };
        let update = evaluate(&ctx, &profile, rng);

        let id = entity_id(entity);
        let mut ship = ShipBody::new(transform, velocity, body);
        if let Some(direction) = update.steer {
            ship.turn_toward(direction, dt);
            ship.thrust(direction, dt);
        }
        if update.fire {
            let shooter = Shooter {
                id,
                faction: kind.faction(),
                position: ship.transform().position,
            };
            combat::fire(pool, shooter, ship.transform(), weapon, now, events);
        }

        agent.patrol_point = update.patrol_point;
        if update.state_changed {
            info!(%id, from = ?agent.state, to = ?update.new_state, "enemy state change");
            events.push(SimEvent::AiStateChanged {
                id,
                from: agent.state,
                to: update.new_state,
            });
            agent.state = update.new_state;
            agent.last_state_change = now;
        }
    }
}
