//! Entity spawn factories for setting up the simulation world.
//!
//! Creates ships and celestial bodies with the appropriate component
//! bundles. Placement is decided by the caller (see `scenario`); these
//! functions only turn spawn parameters into entities.

use glam::DVec3;
use hecs::{Entity, World};

use starflight_core::components::*;
use starflight_core::config::{AiTuning, AutopilotConfig, ShipProfile};
use starflight_core::enums::{AutopilotPhase, EntityKind, PlanetClass};
use starflight_core::types::{EntityId, Transform, Velocity};

use crate::engine::SimulationEngine;

/// Player ship parameters.
#[derive(Debug, Clone)]
pub struct PlayerSpawn {
    pub transform: Transform,
    pub velocity: DVec3,
    pub profile: ShipProfile,
}

impl PlayerSpawn {
    pub fn new(transform: Transform, profile: ShipProfile) -> Self {
        Self {
            transform,
            velocity: DVec3::ZERO,
            profile,
        }
    }
}

/// Enemy ship parameters.
#[derive(Debug, Clone)]
pub struct EnemySpawn {
    pub transform: Transform,
    pub velocity: DVec3,
    pub profile: ShipProfile,
    pub ai: AiTuning,
}

impl EnemySpawn {
    pub fn new(transform: Transform, profile: ShipProfile, ai: AiTuning) -> Self {
        Self {
            transform,
            velocity: DVec3::ZERO,
            profile,
            ai,
        }
    }
}

/// Circular orbit parameters.
#[derive(Debug, Clone, Copy)]
pub struct OrbitSpec {
    pub center: DVec3,
    pub distance: f64,
    /// Angular speed (rad/s).
    pub speed: f64,
}

/// Planet, moon or asteroid parameters.
#[derive(Debug, Clone)]
pub struct PlanetSpawn {
    pub position: DVec3,
    pub radius: f64,
    pub spin_speed: f64,
    pub orbit: Option<OrbitSpec>,
    /// Body whose live position is the orbit centre.
    pub parent: Option<EntityId>,
    pub name: String,
    pub class: PlanetClass,
    pub has_atmosphere: bool,
    pub has_rings: bool,
    pub distance_from_sun: f64,
    pub description: String,
}

impl PlanetSpawn {
    /// A bare stationary rocky body.
    pub fn stationary(name: impl Into<String>, position: DVec3, radius: f64) -> Self {
        Self {
            position,
            radius,
            spin_speed: 0.0,
            orbit: None,
            parent: None,
            name: name.into(),
            class: PlanetClass::Rocky,
            has_atmosphere: false,
            has_rings: false,
            distance_from_sun: 0.0,
            description: String::new(),
        }
    }

    pub fn orbiting(mut self, center: DVec3, distance: f64, speed: f64) -> Self {
        self.orbit = Some(OrbitSpec {
            center,
            distance,
            speed,
        });
        self
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Star parameters. Stars do not orbit.
#[derive(Debug, Clone)]
pub struct StarSpawn {
    pub position: DVec3,
    pub radius: f64,
    pub spin_speed: f64,
    pub name: String,
    pub color: u32,
    pub intensity: f64,
}

/// Moon attached to a planet of the same `WorldSpec` by index.
#[derive(Debug, Clone)]
pub struct MoonSpawn {
    pub parent: usize,
    pub body: PlanetSpawn,
}

/// Everything the world setup supplies at initialization.
#[derive(Debug, Clone, Default)]
pub struct WorldSpec {
    pub stars: Vec<StarSpawn>,
    pub planets: Vec<PlanetSpawn>,
    pub moons: Vec<MoonSpawn>,
    pub asteroids: Vec<PlanetSpawn>,
    pub enemies: Vec<EnemySpawn>,
    pub player: Option<PlayerSpawn>,
}

/// Spawn a whole `WorldSpec` in registration order: stars, planets, moons,
/// asteroids, enemies, then the player. Returns the ids in that order.
pub fn populate(engine: &mut SimulationEngine, spec: WorldSpec) -> Vec<EntityId> {
    let mut ids = Vec::new();

    for star in spec.stars {
        ids.push(engine.spawn_star(star));
    }

    let mut planet_ids = Vec::with_capacity(spec.planets.len());
    for planet in spec.planets {
        let id = engine.spawn_planet(planet);
        planet_ids.push(id);
        ids.push(id);
    }

    for moon in spec.moons {
        let mut body = moon.body;
        if let Some(&parent) = planet_ids.get(moon.parent) {
            body.parent = Some(parent);
        }
        ids.push(engine.spawn_planet(body));
    }

    for asteroid in spec.asteroids {
        ids.push(engine.spawn_planet(asteroid));
    }

    for enemy in spec.enemies {
        ids.push(engine.spawn_enemy(enemy));
    }

    if let Some(player) = spec.player {
        ids.push(engine.spawn_player(player));
    }

    ids
}

/// Spawn the player's ship with autopilot and manual-control state.
pub fn spawn_player(world: &mut World, spawn: PlayerSpawn, autopilot: &AutopilotConfig) -> Entity {
    let control = PlayerControl {
        turbo_multiplier: spawn.profile.turbo_multiplier,
        turbo_active: false,
        braking: false,
    };
    let pilot = Autopilot {
        active: false,
        target: None,
        phase: AutopilotPhase::default(),
        close_distance: autopilot.close_distance,
        follow_distance: autopilot.follow_distance,
    };

    world.spawn((
        EntityKind::PlayerShip,
        spawn.transform,
        Velocity(spawn.velocity),
        kinematics(&spawn.profile),
        weapon(&spawn.profile),
        control,
        pilot,
    ))
}

/// Spawn an AI-driven enemy ship in Patrol.
pub fn spawn_enemy(world: &mut World, spawn: EnemySpawn) -> Entity {
    let agent = AiAgent {
        state: Default::default(),
        detection_range: spawn.ai.detection_range,
        attack_range: spawn.ai.attack_range,
        patrol_point: None,
        patrol_radius: spawn.ai.patrol_radius,
        last_state_change: 0.0,
    };

    world.spawn((
        EntityKind::EnemyShip,
        spawn.transform,
        Velocity(spawn.velocity),
        kinematics(&spawn.profile),
        weapon(&spawn.profile),
        agent,
    ))
}

/// Spawn a planet, moon or asteroid.
pub fn spawn_planet(world: &mut World, spawn: PlanetSpawn) -> Entity {
    let orbit = spawn.orbit.unwrap_or(OrbitSpec {
        center: spawn.position,
        distance: 0.0,
        speed: 0.0,
    });
    let body = OrbitalBody {
        radius: spawn.radius,
        self_rotation_speed: spawn.spin_speed,
        self_rotation: 0.0,
        orbit_speed: orbit.speed,
        orbit_distance: orbit.distance,
        orbit_center: orbit.center,
        parent: spawn.parent,
    };
    let info = PlanetInfo {
        name: spawn.name,
        class: spawn.class,
        has_atmosphere: spawn.has_atmosphere,
        has_rings: spawn.has_rings,
        distance_from_sun: spawn.distance_from_sun,
        description: spawn.description,
        is_targeted: false,
    };

    world.spawn((
        EntityKind::Planet,
        Transform::from_position(spawn.position),
        body,
        info,
    ))
}

pub fn spawn_star(world: &mut World, spawn: StarSpawn) -> Entity {
    let body = OrbitalBody {
        radius: spawn.radius,
        self_rotation_speed: spawn.spin_speed,
        self_rotation: 0.0,
        orbit_speed: 0.0,
        orbit_distance: 0.0,
        orbit_center: spawn.position,
        parent: None,
    };
    let info = StarInfo {
        name: spawn.name,
        color: spawn.color,
        intensity: spawn.intensity,
    };

    world.spawn((
        EntityKind::Star,
        Transform::from_position(spawn.position),
        body,
        info,
    ))
}

/// Flight state for a fresh ship: full health and fuel.
pub fn kinematics(profile: &ShipProfile) -> KinematicBody {
    KinematicBody {
        max_speed: profile.max_speed,
        acceleration: profile.acceleration,
        rotation_speed: profile.rotation_speed,
        deceleration: profile.deceleration,
        health: profile.max_health,
        max_health: profile.max_health,
        fuel: profile.max_fuel,
        max_fuel: profile.max_fuel,
        fuel_consumption: profile.fuel_consumption,
        speed_multiplier: 1.0,
        destroyed: false,
    }
}

pub fn weapon(profile: &ShipProfile) -> Weapon {
    Weapon {
        cooldown_secs: profile.weapon.cooldown_secs,
        last_fire_time: None,
        wing_offset: profile.weapon.wing_offset,
        barrel_offset: profile.weapon.barrel_offset,
        projectile: profile.weapon.projectile,
    }
}
