//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs world, the registration-order roster,
//! the projectile pool and the seeded RNG. It runs every system in a fixed
//! order and produces a `SimSnapshot` per tick. Completely headless,
//! enabling deterministic testing.

use glam::DVec3;
use hecs::{Component, Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use starflight_core::components::{KinematicBody, Weapon};
use starflight_core::config::SimConfig;
use starflight_core::enums::EntityKind;
use starflight_core::events::{SimEvent, StatusMessage};
use starflight_core::input::InputSnapshot;
use starflight_core::state::SimSnapshot;
use starflight_core::types::{sanitize_dt, EntityId, SimTime, Transform, Velocity};

use crate::capabilities::DamageOutcome;
use crate::projectile_pool::{ProjectilePool, Shooter};
use crate::scenario;
use crate::systems;
use crate::world_setup::{self, EnemySpawn, PlanetSpawn, PlayerSpawn, StarSpawn};

/// Stable id for a world entity.
pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// Re-validate an id against the world. `None` once the entity is gone.
pub fn resolve(world: &World, id: EntityId) -> Option<Entity> {
    let entity = Entity::from_bits(id.0)?;
    world.contains(entity).then_some(entity)
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    /// Live entities in registration order.
    roster: Vec<Entity>,
    pool: ProjectilePool,
    time: SimTime,
    rng: ChaCha8Rng,
    config: SimConfig,
    player: Option<Entity>,
    events: Vec<SimEvent>,
    status: Option<StatusMessage>,
    despawn_buffer: Vec<Entity>,
}

impl SimulationEngine {
    /// Create an empty engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            roster: Vec::new(),
            pool: ProjectilePool::new(&config.projectiles),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            player: None,
            events: Vec::new(),
            status: None,
            despawn_buffer: Vec::new(),
        }
    }

    /// Create an engine populated with the default solar system.
    pub fn with_sol_system(config: SimConfig) -> Self {
        let mut engine = Self::new(config);
        let spec = scenario::sol_system(&engine.config, &mut engine.rng);
        world_setup::populate(&mut engine, spec);
        engine
    }

    /// Advance the simulation by `dt` seconds and return the resulting snapshot.
    ///
    /// `dt` is sanitised first: non-finite or negative becomes 0, and it is
    /// clamped to `max_delta_time`.
    pub fn tick(&mut self, dt: f64, input: InputSnapshot) -> SimSnapshot {
        let dt = sanitize_dt(dt, self.config.max_delta_time);
        let now = self.time.elapsed_secs;
        let first_event = self.events.len();

        self.run_systems(&input, now, dt);
        self.update_status(first_event, now);
        self.time.advance(dt);

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.roster,
            &self.pool,
            self.player,
            &self.time,
            self.status.as_ref(),
            events,
        )
    }

    /// Run all systems in order.
    fn run_systems(&mut self, input: &InputSnapshot, now: f64, dt: f64) {
        // 1. Player control (autopilot toggle, manual flight or autopilot, fire)
        systems::player_control::run(
            &mut self.world,
            &self.roster,
            self.player,
            input,
            &self.config.autopilot,
            &mut self.pool,
            now,
            dt,
            &mut self.events,
        );
        // 2. Enemy AI
        systems::enemy_ai::run(
            &mut self.world,
            &self.roster,
            self.player,
            &mut self.pool,
            &mut self.rng,
            now,
            dt,
            &mut self.events,
        );
        // 3. Ship integration
        systems::movement::run(&mut self.world, dt);
        // 4. Orbital motion
        systems::orbital::run(&mut self.world, &self.roster, dt);
        // 5. Projectiles (integrate, expire, collide, damage)
        systems::projectiles::run(
            &mut self.world,
            &self.roster,
            &mut self.pool,
            now,
            dt,
            &mut self.events,
        );
        // 6. Targeting, then autopilot release if its target was lost
        systems::targeting::run(
            &mut self.world,
            &self.roster,
            self.player,
            &self.config.targeting,
            &mut self.events,
        );
        systems::autopilot::release_if_untargeted(&mut self.world, self.player, &mut self.events);
        // 7. Cleanup (destroyed ships)
        systems::cleanup::run(
            &mut self.world,
            &mut self.roster,
            &mut self.player,
            &mut self.despawn_buffer,
        );
    }

    /// Turn this tick's autopilot events into the UI banner.
    fn update_status(&mut self, first_event: usize, now: f64) {
        let text = self.events[first_event..]
            .iter()
            .rev()
            .find_map(|event| match event {
                SimEvent::AutopilotEngaged { name, .. } => {
                    Some(format!("Autopilot engaged: {name}"))
                }
                SimEvent::AutopilotDisengaged { .. } => Some("Autopilot disengaged".to_string()),
                SimEvent::AutopilotUnavailable => {
                    Some("No planet targeted for autopilot".to_string())
                }
                _ => None,
            });
        if let Some(text) = text {
            self.status = Some(StatusMessage {
                text,
                expires_at: now + self.config.status_message_secs,
            });
        }
    }

    // --- Spawning ---

    pub fn spawn_player(&mut self, spawn: PlayerSpawn) -> EntityId {
        if let Some(existing) = self.player {
            warn!(existing = %entity_id(existing), "replacing player ship");
        }
        let entity = world_setup::spawn_player(&mut self.world, spawn, &self.config.autopilot);
        self.player = Some(entity);
        self.register(entity, EntityKind::PlayerShip)
    }

    pub fn spawn_enemy(&mut self, spawn: EnemySpawn) -> EntityId {
        let entity = world_setup::spawn_enemy(&mut self.world, spawn);
        self.register(entity, EntityKind::EnemyShip)
    }

    pub fn spawn_planet(&mut self, spawn: PlanetSpawn) -> EntityId {
        let entity = world_setup::spawn_planet(&mut self.world, spawn);
        self.register(entity, EntityKind::Planet)
    }

    pub fn spawn_star(&mut self, spawn: StarSpawn) -> EntityId {
        let entity = world_setup::spawn_star(&mut self.world, spawn);
        self.register(entity, EntityKind::Star)
    }

    fn register(&mut self, entity: Entity, kind: EntityKind) -> EntityId {
        let id = entity_id(entity);
        self.roster.push(entity);
        debug!(%id, ?kind, "entity spawned");
        self.events.push(SimEvent::EntitySpawned { id, kind });
        id
    }

    // --- Direct actions ---

    /// Fire a ship's weapon outside the player/AI flow. Returns the number
    /// of projectiles the pool accepted.
    ///
    /// Between ticks the clock already reads the `now` the next tick runs
    /// at, so a direct shot is stamped exactly like one fired during that
    /// tick and the cooldown lines up with in-tick firing.
    pub fn fire_weapon(&mut self, id: EntityId) -> u32 {
        let Some(entity) = resolve(&self.world, id) else {
            return 0;
        };
        let now = self.time.elapsed_secs;
        let Ok((kind, transform, body, weapon)) = self
            .world
            .query_one_mut::<(&EntityKind, &Transform, &KinematicBody, &mut Weapon)>(entity)
        else {
            return 0;
        };
        if body.destroyed {
            return 0;
        }
        let shooter = Shooter {
            id,
            faction: kind.faction(),
            position: transform.position,
        };
        systems::combat::fire(&mut self.pool, shooter, transform, weapon, now, &mut self.events)
    }

    /// Damage a ship. `None` for missing or non-damageable entities.
    pub fn apply_damage(&mut self, id: EntityId, amount: f64) -> Option<DamageOutcome> {
        let entity = resolve(&self.world, id)?;
        systems::combat::apply_damage(&mut self.world, entity, amount, &mut self.events)
    }

    /// Move an entity. Orbiting bodies continue from the new position.
    pub fn set_transform(&mut self, id: EntityId, transform: Transform) -> bool {
        if !transform.position.is_finite() || !transform.orientation.is_finite() {
            return false;
        }
        self.with_component_mut(id, |t: &mut Transform| {
            t.position = transform.position;
            t.orientation = transform.orientation.normalize();
        })
        .is_some()
    }

    pub fn set_velocity(&mut self, id: EntityId, velocity: DVec3) -> bool {
        if !velocity.is_finite() {
            return false;
        }
        self.with_component_mut(id, |v: &mut Velocity| v.0 = velocity)
            .is_some()
    }

    /// Set a ship's fuel, clamped to its tank.
    pub fn set_fuel(&mut self, id: EntityId, fuel: f64) -> bool {
        if !fuel.is_finite() {
            return false;
        }
        self.with_component_mut(id, |b: &mut KinematicBody| {
            b.fuel = fuel.clamp(0.0, b.max_fuel)
        })
        .is_some()
    }

    fn with_component_mut<T: Component, R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let entity = resolve(&self.world, id)?;
        let mut component = self.world.get::<&mut T>(entity).ok()?;
        let result = f(&mut component);
        Some(result)
    }

    // --- Accessors ---

    /// Copy of one component of an entity.
    pub fn get<T: Component + Clone>(&self, id: EntityId) -> Option<T> {
        let entity = resolve(&self.world, id)?;
        let component = self.world.get::<&T>(entity).ok()?;
        Some((*component).clone())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        resolve(&self.world, id).is_some()
    }

    /// Live entity ids in registration order.
    pub fn roster(&self) -> Vec<EntityId> {
        self.roster.iter().copied().map(entity_id).collect()
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player.map(entity_id)
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn pool(&self) -> &ProjectilePool {
        &self.pool
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }
}
