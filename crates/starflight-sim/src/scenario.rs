//! Scenario definitions: the built-in "Sol" world.
//!
//! Produces a `WorldSpec` for `world_setup::populate`: the Sun, nine planets
//! on circular orbits, Earth's Moon, an asteroid belt, a handful of enemy
//! patrols and the player parked next to Earth. All randomness comes from
//! the supplied RNG, so the same seed always builds the same system.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;

use starflight_core::config::SimConfig;
use starflight_core::constants::*;
use starflight_core::enums::PlanetClass;
use starflight_core::types::{facing, Transform};

use crate::world_setup::{EnemySpawn, MoonSpawn, PlanetSpawn, PlayerSpawn, StarSpawn, WorldSpec};

struct PlanetData {
    name: &'static str,
    class: PlanetClass,
    /// Earth radii.
    size: f64,
    /// Astronomical units.
    distance_au: f64,
    atmosphere: bool,
    rings: bool,
    orbit_speed: f64,
    spin_speed: f64,
    moons: &'static [MoonData],
}

struct MoonData {
    name: &'static str,
    size: f64,
    distance: f64,
    orbit_speed: f64,
    spin_speed: f64,
}

const EARTH_INDEX: usize = 2;
const MARS_INDEX: usize = 3;

const PLANETS: [PlanetData; 9] = [
    PlanetData {
        name: "Mercury",
        class: PlanetClass::Rocky,
        size: 0.38,
        distance_au: 0.4,
        atmosphere: false,
        rings: false,
        orbit_speed: 0.02,
        spin_speed: 0.005,
        moons: &[],
    },
    PlanetData {
        name: "Venus",
        class: PlanetClass::Rocky,
        size: 0.95,
        distance_au: 0.7,
        atmosphere: true,
        rings: false,
        orbit_speed: 0.015,
        spin_speed: 0.002,
        moons: &[],
    },
    PlanetData {
        name: "Earth",
        class: PlanetClass::Rocky,
        size: 1.0,
        distance_au: 1.0,
        atmosphere: true,
        rings: false,
        orbit_speed: 0.01,
        spin_speed: 0.01,
        moons: &[MoonData {
            name: "Moon",
            size: 0.27,
            distance: 90.0,
            orbit_speed: 0.05,
            spin_speed: 0.005,
        }],
    },
    PlanetData {
        name: "Mars",
        class: PlanetClass::Rocky,
        size: 0.53,
        distance_au: 1.5,
        atmosphere: false,
        rings: false,
        orbit_speed: 0.008,
        spin_speed: 0.01,
        moons: &[],
    },
    PlanetData {
        name: "Jupiter",
        class: PlanetClass::Gas,
        size: 11.2,
        distance_au: 5.2,
        atmosphere: true,
        rings: false,
        orbit_speed: 0.004,
        spin_speed: 0.02,
        moons: &[],
    },
    PlanetData {
        name: "Saturn",
        class: PlanetClass::Gas,
        size: 9.45,
        distance_au: 9.5,
        atmosphere: true,
        rings: true,
        orbit_speed: 0.003,
        spin_speed: 0.018,
        moons: &[],
    },
    PlanetData {
        name: "Uranus",
        class: PlanetClass::Ice,
        size: 4.0,
        distance_au: 19.2,
        atmosphere: true,
        rings: true,
        orbit_speed: 0.002,
        spin_speed: 0.015,
        moons: &[],
    },
    PlanetData {
        name: "Neptune",
        class: PlanetClass::Ice,
        size: 3.88,
        distance_au: 30.1,
        atmosphere: true,
        rings: false,
        orbit_speed: 0.001,
        spin_speed: 0.015,
        moons: &[],
    },
    PlanetData {
        name: "Pluto",
        class: PlanetClass::Ice,
        size: 0.18,
        distance_au: 39.5,
        atmosphere: false,
        rings: false,
        orbit_speed: 0.0008,
        spin_speed: 0.004,
        moons: &[],
    },
];

const SUN_RADIUS: f64 = 500.0;
const SUN_COLOR: u32 = 0xffdd00;
const SUN_INTENSITY: f64 = 2.5;

const BELT_DISTANCE_AU: f64 = 2.7;
const BELT_WIDTH_AU: f64 = 0.8;

/// Build the default solar system.
pub fn sol_system<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> WorldSpec {
    let sun_position = DVec3::ZERO;
    let mut spec = WorldSpec {
        stars: vec![StarSpawn {
            position: sun_position,
            radius: SUN_RADIUS,
            spin_speed: 0.0,
            name: "Sun".to_string(),
            color: SUN_COLOR,
            intensity: SUN_INTENSITY,
        }],
        ..WorldSpec::default()
    };

    for (index, data) in PLANETS.iter().enumerate() {
        let distance = data.distance_au * SCENARIO_DISTANCE_SCALE;
        let angle = rng.gen::<f64>() * TAU;
        let position =
            sun_position + DVec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);

        let radius = data.size * SCENARIO_SIZE_SCALE;
        let mut planet = PlanetSpawn::stationary(data.name, position, radius)
            .orbiting(sun_position, distance, data.orbit_speed);
        planet.spin_speed = data.spin_speed;
        planet.class = data.class;
        planet.has_atmosphere = data.atmosphere;
        planet.has_rings = data.rings;
        planet.distance_from_sun = distance;
        planet.description = describe(data.class, data.atmosphere, data.rings, rng);

        for moon in data.moons {
            let angle = rng.gen::<f64>() * TAU;
            let offset = DVec3::new(angle.cos() * moon.distance, 0.0, angle.sin() * moon.distance);
            let radius = moon.size * SCENARIO_SIZE_SCALE;
            let mut body = PlanetSpawn::stationary(moon.name, position + offset, radius)
                .orbiting(position, moon.distance, moon.orbit_speed);
            body.spin_speed = moon.spin_speed;
            body.description = describe(PlanetClass::Rocky, false, false, rng);
            spec.moons.push(MoonSpawn {
                parent: index,
                body,
            });
        }

        spec.planets.push(planet);
    }

    spec.asteroids = asteroid_belt(config.scenario.asteroid_count, rng);
    spec.enemies = enemies(config, &spec.planets, rng);
    spec.player = spec.planets.get(EARTH_INDEX).map(|earth| {
        let position = earth.position
            + DVec3::new(SCENARIO_PLAYER_OFFSET, 20.0, SCENARIO_PLAYER_OFFSET);
        let orientation = facing(earth.position - position).unwrap_or_default();
        PlayerSpawn::new(
            Transform {
                position,
                orientation,
            },
            config.player_ship.clone(),
        )
    });

    spec
}

/// Small non-orbiting rocky bodies scattered around 2.7 AU.
fn asteroid_belt<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<PlanetSpawn> {
    let center = BELT_DISTANCE_AU * SCENARIO_DISTANCE_SCALE;
    let width = BELT_WIDTH_AU * SCENARIO_DISTANCE_SCALE;

    (0..count)
        .map(|_| {
            let distance = center + (rng.gen::<f64>() - 0.5) * width;
            let angle = rng.gen::<f64>() * TAU;
            let height = (rng.gen::<f64>() - 0.5) * width * 0.2;
            let position = DVec3::new(angle.cos() * distance, height, angle.sin() * distance);

            let radius = 1.5 + rng.gen::<f64>() * 9.0;
            let mut asteroid = PlanetSpawn::stationary("Asteroid", position, radius);
            asteroid.spin_speed = (rng.gen::<f64>() - 0.5) * 0.02;
            asteroid.distance_from_sun = distance;
            asteroid.description = describe(PlanetClass::Rocky, false, false, rng);
            asteroid
        })
        .collect()
}

/// Two patrols near Earth or Mars, two in the belt, the rest in deep space.
fn enemies<R: Rng + ?Sized>(
    config: &SimConfig,
    planets: &[PlanetSpawn],
    rng: &mut R,
) -> Vec<EnemySpawn> {
    (0..config.scenario.enemy_count)
        .map(|i| {
            let angle = rng.gen::<f64>() * TAU;
            let ring = DVec3::new(angle.cos(), 0.0, angle.sin());
            let position = match i {
                0 | 1 => {
                    let index = if rng.gen::<bool>() { EARTH_INDEX } else { MARS_INDEX };
                    let (anchor, radius) = planets
                        .get(index)
                        .map(|p| (p.position, p.radius))
                        .unwrap_or((DVec3::ZERO, SUN_RADIUS));
                    let offset = radius + 20.0 + rng.gen::<f64>() * 30.0;
                    anchor + ring * offset + DVec3::Y * (rng.gen::<f64>() - 0.5) * 20.0
                }
                2 | 3 => {
                    let distance = (BELT_DISTANCE_AU + (rng.gen::<f64>() - 0.5) * BELT_WIDTH_AU)
                        * SCENARIO_DISTANCE_SCALE;
                    ring * distance + DVec3::Y * (rng.gen::<f64>() - 0.5) * 30.0
                }
                _ => {
                    let distance = (15.0 + rng.gen::<f64>() * 10.0) * SCENARIO_DISTANCE_SCALE;
                    ring * distance + DVec3::Y * (rng.gen::<f64>() - 0.5) * 50.0
                }
            };
            EnemySpawn::new(
                Transform::from_position(position),
                config.enemy_ship.clone(),
                config.enemy_ai.clone(),
            )
        })
        .collect()
}

const ROCKY_DESCRIPTIONS: [&str; 3] = [
    "A barren rocky world with a cratered surface.",
    "This terrestrial planet has a solid surface with various geological features.",
    "A rocky planet with mountains, valleys, and impact craters scattered across its surface.",
];

const GAS_DESCRIPTIONS: [&str; 3] = [
    "A massive gas giant with swirling colorful clouds in its atmosphere.",
    "This gas giant has no solid surface, consisting primarily of hydrogen and helium.",
    "A huge planet with powerful storms raging through its thick atmosphere.",
];

const ICE_DESCRIPTIONS: [&str; 3] = [
    "A frigid ice world with a frozen surface reflecting distant starlight.",
    "This icy planet has extremely low temperatures and a solid frozen surface.",
    "A cold world covered in various ices including water, methane, and ammonia.",
];

/// Flavour text for the info panel.
pub fn describe<R: Rng + ?Sized>(
    class: PlanetClass,
    atmosphere: bool,
    rings: bool,
    rng: &mut R,
) -> String {
    let options = match class {
        PlanetClass::Rocky => &ROCKY_DESCRIPTIONS,
        PlanetClass::Gas => &GAS_DESCRIPTIONS,
        PlanetClass::Ice => &ICE_DESCRIPTIONS,
    };
    let mut text = options[rng.gen_range(0..options.len())].to_string();
    if atmosphere {
        text.push_str(" It has a significant atmosphere.");
    }
    if rings {
        text.push_str(" The planet is surrounded by a beautiful ring system.");
    }
    text
}
