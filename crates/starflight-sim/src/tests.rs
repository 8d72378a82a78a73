//! Tests for the simulation engine: flight, combat, AI, orbits, targeting
//! and the autopilot.

use glam::{DQuat, DVec3};

use starflight_core::components::{KinematicBody, OrbitalBody, Weapon};
use starflight_core::config::{AiTuning, ShipProfile, SimConfig, TargetingConfig};
use starflight_core::constants::DT;
use starflight_core::enums::*;
use starflight_core::events::SimEvent;
use starflight_core::input::{Control, InputSnapshot};
use starflight_core::state::SimSnapshot;
use starflight_core::types::{facing, EntityId, Transform};

use crate::engine::SimulationEngine;
use crate::systems::targeting::in_targeting_cone;
use crate::world_setup::{self, EnemySpawn, MoonSpawn, PlanetSpawn, PlayerSpawn, WorldSpec};

// ---- Helpers ----

/// Distance a player projectile covers in one tick.
const PLAYER_SHOT_STEP: f64 = 400.0 / 60.0;

fn spawn_player(engine: &mut SimulationEngine, position: DVec3) -> EntityId {
    engine.spawn_player(PlayerSpawn::new(
        Transform::from_position(position),
        ShipProfile::player(),
    ))
}

fn spawn_enemy(engine: &mut SimulationEngine, position: DVec3) -> EntityId {
    engine.spawn_enemy(EnemySpawn::new(
        Transform::from_position(position),
        ShipProfile::enemy(),
        AiTuning::default(),
    ))
}

/// An enemy that can turn but never thrust, so it holds position.
fn spawn_parked_enemy(engine: &mut SimulationEngine, position: DVec3) -> EntityId {
    let id = spawn_enemy(engine, position);
    engine.set_fuel(id, 0.0);
    id
}

fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

fn hold(control: Control) -> InputSnapshot {
    InputSnapshot::default().with(control)
}

fn toggle() -> InputSnapshot {
    InputSnapshot {
        toggle_autopilot: true,
        ..Default::default()
    }
}

fn run_ticks(engine: &mut SimulationEngine, ticks: usize, input: InputSnapshot) -> SimSnapshot {
    let mut snap = engine.tick(DT, input);
    for _ in 1..ticks {
        snap = engine.tick(DT, input);
    }
    snap
}

fn player_speed(snap: &SimSnapshot) -> f64 {
    snap.ships
        .iter()
        .find(|s| Some(s.id) == snap.player)
        .map(|s| s.velocity.length())
        .unwrap()
}

fn health(engine: &SimulationEngine, id: EntityId) -> f64 {
    engine.get::<KinematicBody>(id).unwrap().health
}

fn position(engine: &SimulationEngine, id: EntityId) -> DVec3 {
    engine.get::<Transform>(id).unwrap().position
}

// ---- Flight ----

#[test]
fn test_thrust_accumulates_and_respects_speed_cap() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);

    let snap = run_ticks(&mut engine, 10, hold(Control::Forward));
    let expected = 150.0 * 10.0 / 60.0;
    assert!(
        (player_speed(&snap) - expected).abs() < 1e-9,
        "speed {} after 10 ticks, expected {expected}",
        player_speed(&snap)
    );

    for _ in 0..300 {
        let snap = engine.tick(DT, hold(Control::Forward));
        assert!(player_speed(&snap) <= 250.0 + 1e-9);
    }
    let snap = engine.tick(DT, hold(Control::Forward));
    assert!((player_speed(&snap) - 250.0).abs() < 1e-9);
}

#[test]
fn test_forward_thrust_moves_along_neg_z() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);

    run_ticks(&mut engine, 30, hold(Control::Forward));
    let p = position(&engine, player);
    assert!(p.z < 0.0);
    assert!(p.x.abs() < 1e-9 && p.y.abs() < 1e-9);

    engine.set_velocity(player, DVec3::ZERO);
    run_ticks(&mut engine, 30, hold(Control::Backward));
    assert!(engine.get::<starflight_core::types::Velocity>(player).unwrap().0.z > 0.0);
}

#[test]
fn test_turbo_raises_cap_until_released() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);

    let turbo = InputSnapshot::default()
        .with(Control::Forward)
        .with(Control::Turbo);
    let snap = run_ticks(&mut engine, 600, turbo);
    let speed = player_speed(&snap);
    assert!(speed > 250.0 && speed <= 500.0 + 1e-9, "turbo speed {speed}");

    // Releasing turbo clamps back to the base cap on the next integration.
    let snap = engine.tick(DT, idle());
    assert!((player_speed(&snap) - 250.0).abs() < 1e-9);
}

#[test]
fn test_brake_stops_exactly_at_zero() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);
    engine.set_velocity(player, DVec3::new(0.0, 0.0, -10.0));

    // Deceleration 300/s removes 5 units/s per tick.
    let snap = engine.tick(DT, hold(Control::Brake));
    assert!((player_speed(&snap) - 5.0).abs() < 1e-9);
    let snap = engine.tick(DT, hold(Control::Brake));
    assert_eq!(player_speed(&snap), 0.0);
    let snap = engine.tick(DT, hold(Control::Brake));
    assert_eq!(player_speed(&snap), 0.0);
}

#[test]
fn test_empty_tank_refuses_thrust() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);
    engine.set_fuel(player, 0.0);

    let snap = run_ticks(&mut engine, 30, hold(Control::Forward));
    assert_eq!(player_speed(&snap), 0.0);
    assert!(snap.hud.low_fuel);
}

#[test]
fn test_fuel_burns_only_while_moving() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);

    run_ticks(&mut engine, 60, idle());
    assert_eq!(engine.get::<KinematicBody>(player).unwrap().fuel, 100.0);

    engine.set_velocity(player, DVec3::new(10.0, 0.0, 0.0));
    run_ticks(&mut engine, 60, idle());
    let fuel = engine.get::<KinematicBody>(player).unwrap().fuel;
    assert!((fuel - 99.9).abs() < 1e-9, "fuel {fuel}");
}

#[test]
fn test_set_fuel_clamps_to_tank() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);

    assert!(engine.set_fuel(player, 500.0));
    assert_eq!(engine.get::<KinematicBody>(player).unwrap().fuel, 100.0);
    assert!(engine.set_fuel(player, -3.0));
    assert_eq!(engine.get::<KinematicBody>(player).unwrap().fuel, 0.0);
    assert!(!engine.set_fuel(player, f64::NAN));
}

#[test]
fn test_yaw_left_turns_nose_toward_neg_x() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);

    run_ticks(&mut engine, 20, hold(Control::YawLeft));
    let transform = engine.get::<Transform>(player).unwrap();
    assert!(transform.forward().x < 0.0);
    assert!(transform.forward().y.abs() < 1e-9);
    assert!((transform.orientation.length() - 1.0).abs() < 1e-12);
}

#[test]
fn test_pitch_up_raises_nose() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);

    run_ticks(&mut engine, 20, hold(Control::PitchUp));
    assert!(engine.get::<Transform>(player).unwrap().forward().y > 0.0);
}

#[test]
fn test_delta_time_is_sanitised() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);

    let snap = engine.tick(f64::NAN, hold(Control::Forward));
    assert_eq!(snap.time.elapsed_secs, 0.0);
    assert_eq!(snap.time.tick, 1);
    assert_eq!(player_speed(&snap), 0.0);

    let snap = engine.tick(-1.0, idle());
    assert_eq!(snap.time.elapsed_secs, 0.0);

    let snap = engine.tick(10.0, idle());
    assert!((snap.time.elapsed_secs - 0.25).abs() < 1e-12);
}

// ---- Enemy AI ----

#[test]
fn test_enemy_detects_player_inside_detection_range() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);
    let enemy = spawn_parked_enemy(&mut engine, DVec3::new(600.0, 0.0, 0.0));

    let snap = engine.tick(DT, idle());
    let view = snap.ships.iter().find(|s| s.id == enemy).unwrap();
    assert_eq!(view.ai_state, Some(AiState::Patrol));

    let moved = Transform::from_position(DVec3::new(400.0, 0.0, 0.0));
    assert!(engine.set_transform(enemy, moved));
    let snap = engine.tick(DT, idle());
    let view = snap.ships.iter().find(|s| s.id == enemy).unwrap();
    assert_eq!(view.ai_state, Some(AiState::Chase));
    assert!(snap.events.contains(&SimEvent::AiStateChanged {
        id: enemy,
        from: AiState::Patrol,
        to: AiState::Chase,
    }));
}

#[test]
fn test_enemy_in_attack_range_opens_fire() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);
    let enemy = spawn_parked_enemy(&mut engine, DVec3::new(0.0, 0.0, -150.0));

    let mut fired = false;
    let mut reached_attack = false;
    for _ in 0..5 {
        let snap = engine.tick(DT, idle());
        reached_attack |= snap
            .ships
            .iter()
            .any(|s| s.id == enemy && s.ai_state == Some(AiState::Attack));
        fired |= snap.events.iter().any(|e| {
            matches!(e, SimEvent::WeaponFired { shooter, projectiles: 2 } if *shooter == enemy)
        });
    }
    assert!(reached_attack, "enemy never reached Attack");
    assert!(fired, "enemy in Attack never fired");
}

#[test]
fn test_enemy_without_player_stays_on_patrol() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let enemy = spawn_enemy(&mut engine, DVec3::ZERO);

    let snap = run_ticks(&mut engine, 120, idle());
    let view = snap.ships.iter().find(|s| s.id == enemy).unwrap();
    assert_eq!(view.ai_state, Some(AiState::Patrol));
    // Patrolling ships keep moving between patrol points.
    assert!(view.velocity.length() > 0.0);
}

// ---- Combat ----

#[test]
fn test_weapon_fire_respects_pool_capacity() {
    let mut config = SimConfig::default();
    config.projectiles.capacity = 2;
    let mut engine = SimulationEngine::new(config);
    let player = spawn_player(&mut engine, DVec3::ZERO);

    assert_eq!(engine.fire_weapon(player), 2);
    // Still cooling down.
    assert_eq!(engine.fire_weapon(player), 0);

    engine.tick(0.25, idle());
    assert_eq!(engine.pool().active_count(), 2);

    // Off cooldown, but the pool is saturated: nothing spawns and the
    // cooldown does not restart.
    assert_eq!(engine.fire_weapon(player), 0);
    assert_eq!(engine.get::<Weapon>(player).unwrap().last_fire_time, Some(0.0));
    assert_eq!(engine.pool().len(), 2);
}

#[test]
fn test_projectile_damages_enemy() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);
    // In line with the left muzzle, one tick of travel downrange.
    let enemy = spawn_parked_enemy(&mut engine, DVec3::new(-2.0, 0.0, -1.0 - PLAYER_SHOT_STEP));

    let snap = engine.tick(DT, hold(Control::Fire));
    assert_eq!(health(&engine, enemy), 30.0);
    assert!(snap.events.contains(&SimEvent::ShipDamaged {
        id: enemy,
        amount: 20.0,
        remaining: 30.0,
    }));
    assert!(snap.events.iter().any(|e| matches!(
        e,
        SimEvent::ProjectileDeactivated {
            reason: DeactivationReason::Hit,
            ..
        }
    )));
    assert_eq!(engine.pool().active_count(), 1);
}

#[test]
fn test_same_faction_projectiles_pass_through() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let shooter = spawn_parked_enemy(&mut engine, DVec3::ZERO);
    let wingman = spawn_parked_enemy(&mut engine, DVec3::new(-1.5, 0.0, -5.5));

    assert_eq!(engine.fire_weapon(shooter), 2);
    engine.tick(DT, idle());

    assert_eq!(health(&engine, wingman), 50.0);
    assert_eq!(engine.pool().active_count(), 2);
}

#[test]
fn test_shooter_is_never_hit_by_its_own_fire() {
    let mut config = SimConfig::default();
    config.projectiles.collision_radius = 50.0;
    let mut engine = SimulationEngine::new(config);
    let player = spawn_player(&mut engine, DVec3::ZERO);

    engine.tick(DT, hold(Control::Fire));
    assert_eq!(health(&engine, player), 100.0);
    assert_eq!(engine.pool().active_count(), 2);
}

#[test]
fn test_celestial_bodies_stop_projectiles_without_damage() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);
    let rock = engine.spawn_planet(PlanetSpawn::stationary(
        "Rock",
        DVec3::new(-2.0, 0.0, -1.0 - PLAYER_SHOT_STEP),
        5.0,
    ));

    let snap = engine.tick(DT, hold(Control::Fire));
    assert!(engine.contains(rock));
    assert!(engine.get::<KinematicBody>(rock).is_none());
    assert_eq!(engine.pool().active_count(), 1);
    assert!(!snap.events.iter().any(|e| matches!(e, SimEvent::ShipDamaged { .. })));
}

#[test]
fn test_first_registered_target_takes_the_hit() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);
    let impact = DVec3::new(-2.0, 0.0, -1.0 - PLAYER_SHOT_STEP);
    let first = spawn_parked_enemy(&mut engine, impact + DVec3::new(0.5, 0.0, 0.0));
    let second = spawn_parked_enemy(&mut engine, impact - DVec3::new(0.5, 0.0, 0.0));

    engine.tick(DT, hold(Control::Fire));
    assert_eq!(health(&engine, first), 30.0);
    assert_eq!(health(&engine, second), 50.0);
}

#[test]
fn test_projectile_expires_after_lifetime() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);

    engine.tick(DT, hold(Control::Fire));
    assert_eq!(engine.pool().active_count(), 2);

    let mut expired = 0;
    for _ in 0..130 {
        let snap = engine.tick(DT, idle());
        expired += snap
            .events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    SimEvent::ProjectileDeactivated {
                        reason: DeactivationReason::Expired,
                        ..
                    }
                )
            })
            .count();
    }
    assert_eq!(expired, 2);
    assert_eq!(engine.pool().active_count(), 0);
}

#[test]
fn test_projectiles_leashed_to_moving_shooter() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);

    engine.tick(DT, hold(Control::Fire));
    engine.set_transform(player, Transform::from_position(DVec3::new(0.0, 0.0, 5000.0)));
    let snap = engine.tick(DT, idle());

    assert_eq!(engine.pool().active_count(), 0);
    assert!(snap.events.iter().any(|e| matches!(
        e,
        SimEvent::ProjectileDeactivated {
            reason: DeactivationReason::OutOfRange,
            ..
        }
    )));
}

#[test]
fn test_spawn_point_leash_ignores_shooter_motion() {
    let mut config = SimConfig::default();
    config.projectiles.leash = ProjectileLeash::SpawnPoint;
    let mut engine = SimulationEngine::new(config);
    let player = spawn_player(&mut engine, DVec3::ZERO);

    engine.tick(DT, hold(Control::Fire));
    engine.set_transform(player, Transform::from_position(DVec3::new(0.0, 0.0, 5000.0)));
    engine.tick(DT, idle());

    assert_eq!(engine.pool().active_count(), 2);
}

#[test]
fn test_destroyed_ship_is_cleaned_up() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);
    let enemy = spawn_enemy(&mut engine, DVec3::new(0.0, 0.0, -1000.0));

    let outcome = engine.apply_damage(enemy, 80.0).unwrap();
    assert!(outcome.destroyed_now);
    assert_eq!(outcome.applied, 50.0);
    assert_eq!(outcome.remaining, 0.0);

    // A second hit on a wreck does nothing.
    let again = engine.apply_damage(enemy, 10.0).unwrap();
    assert!(!again.destroyed_now);
    assert_eq!(again.applied, 0.0);

    let snap = engine.tick(DT, idle());
    assert!(snap.events.contains(&SimEvent::EntityDestroyed {
        id: enemy,
        kind: EntityKind::EnemyShip,
    }));
    assert!(!engine.contains(enemy));
    assert!(!engine.roster().contains(&enemy));
    assert_eq!(snap.ships.len(), 1);
    assert!(engine.apply_damage(enemy, 10.0).is_none());
}

#[test]
fn test_destroyed_player_leaves_headless_sim_running() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);
    let enemy = spawn_enemy(&mut engine, DVec3::new(0.0, 0.0, -300.0));

    engine.apply_damage(player, 1000.0);
    let snap = engine.tick(DT, hold(Control::Forward));
    assert_eq!(snap.player, None);
    assert_eq!(engine.player(), None);
    assert_eq!(snap.hud.speed, 0.0);

    // Enemies wind down without a player.
    let snap = run_ticks(&mut engine, 60, idle());
    let view = snap.ships.iter().find(|s| s.id == enemy).unwrap();
    assert_eq!(view.ai_state, Some(AiState::Patrol));
}

#[test]
fn test_negative_or_nan_damage_is_ignored() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);

    engine.apply_damage(player, -5.0);
    engine.apply_damage(player, f64::NAN);
    assert_eq!(health(&engine, player), 100.0);
}

// ---- Orbits ----

#[test]
fn test_planet_orbit_angle_advances_at_orbit_speed() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let planet = engine.spawn_planet(
        PlanetSpawn::stationary("Test", DVec3::new(1000.0, 0.0, 0.0), 10.0)
            .orbiting(DVec3::ZERO, 1000.0, 0.01),
    );

    run_ticks(&mut engine, 600, idle());
    let p = position(&engine, planet);
    let t = engine.time().elapsed_secs;
    let angle = 0.01 * t;

    assert!((p.length() - 1000.0).abs() < 1e-9);
    assert!((p.x - 1000.0 * angle.cos()).abs() < 1e-6);
    assert!((p.z - 1000.0 * angle.sin()).abs() < 1e-6);
    assert_eq!(p.y, 0.0);
}

#[test]
fn test_stationary_bodies_only_spin() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let mut spawn = PlanetSpawn::stationary("Rock", DVec3::new(5.0, 6.0, 7.0), 3.0);
    spawn.spin_speed = 1.0;
    let rock = engine.spawn_planet(spawn);

    run_ticks(&mut engine, 60, idle());
    assert_eq!(position(&engine, rock), DVec3::new(5.0, 6.0, 7.0));
    let spin = engine.get::<OrbitalBody>(rock).unwrap().self_rotation;
    assert!((spin - 1.0).abs() < 1e-9);
}

#[test]
fn test_moon_tracks_live_parent_position() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let spec = WorldSpec {
        planets: vec![PlanetSpawn::stationary("Home", DVec3::new(1000.0, 0.0, 0.0), 20.0)
            .orbiting(DVec3::ZERO, 1000.0, 0.5)],
        moons: vec![MoonSpawn {
            parent: 0,
            body: PlanetSpawn::stationary("Moon", DVec3::new(1090.0, 0.0, 0.0), 5.0)
                .orbiting(DVec3::new(1000.0, 0.0, 0.0), 90.0, 0.05),
        }],
        ..WorldSpec::default()
    };
    let ids = world_setup::populate(&mut engine, spec);
    let (home, moon) = (ids[0], ids[1]);
    assert_eq!(engine.get::<OrbitalBody>(moon).unwrap().parent, Some(home));

    for _ in 0..240 {
        engine.tick(DT, idle());
        let gap = position(&engine, moon).distance(position(&engine, home));
        assert!((gap - 90.0).abs() < 1e-6, "moon drifted to {gap}");
    }
    // The parent really moved.
    assert!(position(&engine, home).distance(DVec3::new(1000.0, 0.0, 0.0)) > 100.0);
}

// ---- Targeting ----

#[test]
fn test_targeting_cone_thresholds() {
    let config = TargetingConfig::default();
    let viewer = Transform::default();
    let at = |yaw_deg: f64, pitch_deg: f64, range: f64| {
        let (yaw, pitch) = (yaw_deg.to_radians(), pitch_deg.to_radians());
        DVec3::new(
            -yaw.sin() * pitch.cos(),
            pitch.sin(),
            -yaw.cos() * pitch.cos(),
        ) * range
    };

    assert!(in_targeting_cone(&viewer, at(0.0, 0.0, 1000.0), &config));
    assert!(in_targeting_cone(&viewer, at(8.0, 0.0, 1000.0), &config));
    assert!(!in_targeting_cone(&viewer, at(12.0, 0.0, 1000.0), &config));
    // Vertical tolerance is wider than horizontal.
    assert!(in_targeting_cone(&viewer, at(0.0, 15.0, 1000.0), &config));
    assert!(!in_targeting_cone(&viewer, at(0.0, 25.0, 1000.0), &config));
    assert!(!in_targeting_cone(&viewer, at(12.0, 15.0, 1000.0), &config));
    // Range is inclusive.
    assert!(in_targeting_cone(&viewer, at(0.0, 0.0, 5000.0), &config));
    assert!(!in_targeting_cone(&viewer, at(0.0, 0.0, 5000.5), &config));
    // Behind, or at the viewer's own position.
    assert!(!in_targeting_cone(&viewer, at(180.0, 0.0, 1000.0), &config));
    assert!(!in_targeting_cone(&viewer, DVec3::ZERO, &config));
}

#[test]
fn test_targeting_cone_looking_straight_up() {
    let config = TargetingConfig::default();
    let viewer = Transform {
        position: DVec3::ZERO,
        orientation: facing(DVec3::Y).unwrap(),
    };
    // The flat projection is degenerate; only the overall cone applies.
    assert!(in_targeting_cone(&viewer, DVec3::new(0.0, 1000.0, 0.0), &config));
    assert!(in_targeting_cone(&viewer, DVec3::new(30.0, 1000.0, 0.0), &config));
    assert!(!in_targeting_cone(&viewer, DVec3::new(200.0, 1000.0, 0.0), &config));
}

#[test]
fn test_targeting_events_only_on_transition() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);
    let planet = engine.spawn_planet(PlanetSpawn::stationary(
        "Ahead",
        DVec3::new(0.0, 0.0, -2000.0),
        50.0,
    ));

    let snap = engine.tick(DT, idle());
    assert!(snap.events.contains(&SimEvent::BodyTargeted {
        id: planet,
        name: "Ahead".to_string(),
    }));
    let view = snap.bodies.iter().find(|b| b.id == planet).unwrap();
    assert!(view.is_targeted);

    let snap = engine.tick(DT, idle());
    assert!(!snap.events.iter().any(|e| matches!(e, SimEvent::BodyTargeted { .. })));

    let away = Transform {
        position: DVec3::ZERO,
        orientation: DQuat::from_rotation_y(std::f64::consts::PI),
    };
    engine.set_transform(player, away);
    let snap = engine.tick(DT, idle());
    assert!(snap.events.contains(&SimEvent::BodyUntargeted { id: planet }));
}

#[test]
fn test_stars_are_never_targeted() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);
    engine.spawn_star(crate::world_setup::StarSpawn {
        position: DVec3::new(0.0, 0.0, -1000.0),
        radius: 100.0,
        spin_speed: 0.0,
        name: "Sun".to_string(),
        color: 0xffdd00,
        intensity: 2.5,
    });

    let snap = engine.tick(DT, idle());
    assert!(snap.bodies.iter().all(|b| !b.is_targeted));
}

/// Hold fire until the player's weapon fires again; returns that tick.
fn next_player_shot(engine: &mut SimulationEngine, player: EntityId) -> u64 {
    for _ in 0..120 {
        let snap = engine.tick(DT, hold(Control::Fire));
        let fired = snap
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::WeaponFired { shooter, .. } if *shooter == player));
        if fired {
            return snap.time.tick;
        }
    }
    panic!("weapon never fired again");
}

#[test]
fn test_direct_fire_shares_the_tick_clock() {
    let mut direct = SimulationEngine::new(SimConfig::default());
    let direct_player = spawn_player(&mut direct, DVec3::ZERO);
    direct.tick(DT, idle());
    assert_eq!(direct.fire_weapon(direct_player), 2);
    let direct_next = next_player_shot(&mut direct, direct_player);

    let mut held = SimulationEngine::new(SimConfig::default());
    let held_player = spawn_player(&mut held, DVec3::ZERO);
    held.tick(DT, idle());
    let snap = held.tick(DT, hold(Control::Fire));
    assert!(snap.events.iter().any(|e| matches!(e, SimEvent::WeaponFired { .. })));
    let held_next = next_player_shot(&mut held, held_player);

    // Both first shots are stamped at the start of tick two.
    assert_eq!(direct_next, held_next);
    // 0.2 s cooldown at 60 Hz.
    assert!((13..=15).contains(&direct_next), "next shot at tick {direct_next}");
}

// ---- Autopilot ----

#[test]
fn test_autopilot_toggle_without_target() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);

    let snap = engine.tick(DT, toggle());
    assert!(snap.events.contains(&SimEvent::AutopilotUnavailable));
    assert!(!snap.hud.autopilot.active);
    assert_eq!(
        snap.hud.status_message.as_deref(),
        Some("No planet targeted for autopilot")
    );

    // Banner expires after three seconds.
    let snap = run_ticks(&mut engine, 200, idle());
    assert_eq!(snap.hud.status_message, None);
}

#[test]
fn test_autopilot_converges_to_follow_distance() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);
    let target = engine.spawn_planet(PlanetSpawn::stationary(
        "Target",
        DVec3::new(0.0, 0.0, -5000.0),
        60.0,
    ));

    engine.tick(DT, idle());
    let snap = engine.tick(DT, toggle());
    assert!(snap.events.contains(&SimEvent::AutopilotEngaged {
        target,
        name: "Target".to_string(),
    }));
    assert_eq!(
        snap.hud.status_message.as_deref(),
        Some("Autopilot engaged: Target")
    );
    assert_eq!(snap.hud.autopilot.target, Some(target));
    assert_eq!(snap.hud.targeted_planet.as_ref().unwrap().name, "Target");

    let mut reached_following = false;
    for tick in 0..(60 * 60) {
        let snap = engine.tick(DT, idle());
        assert!(snap.hud.autopilot.active, "autopilot dropped at tick {tick}");
        if snap.hud.autopilot.phase == Some(AutopilotPhase::Following) {
            reached_following = true;
            assert!(player_speed(&snap) <= 100.0 + 1e-9);
        }
    }
    assert!(reached_following, "never reached Following");

    let gap = position(&engine, player).distance(position(&engine, target));
    assert!((gap - 260.0).abs() < 1.0, "settled at {gap}");
}

/// Engage the autopilot on whatever is under the reticle, fly for a minute
/// and report the gap range and phase changes over the last thirty seconds.
fn follow_for_a_minute(
    engine: &mut SimulationEngine,
    player: EntityId,
    target: EntityId,
) -> (f64, f64, usize) {
    engine.tick(DT, idle());
    let snap = engine.tick(DT, toggle());
    assert_eq!(snap.hud.autopilot.target, Some(target));

    let mut min_gap = f64::INFINITY;
    let mut max_gap = 0.0_f64;
    let mut phase_changes = 0;
    let mut last_phase = snap.hud.autopilot.phase;
    for tick in 0..(60 * 60) {
        let snap = engine.tick(DT, idle());
        assert!(snap.hud.autopilot.active, "autopilot dropped at tick {tick}");
        if tick < 30 * 60 {
            last_phase = snap.hud.autopilot.phase;
            continue;
        }
        let gap = position(engine, player).distance(position(engine, target));
        min_gap = min_gap.min(gap);
        max_gap = max_gap.max(gap);
        if snap.hud.autopilot.phase != last_phase {
            phase_changes += 1;
            last_phase = snap.hud.autopilot.phase;
        }
    }
    assert_eq!(last_phase, Some(AutopilotPhase::Following));
    (min_gap, max_gap, phase_changes)
}

fn spawn_player_facing(engine: &mut SimulationEngine, position: DVec3, at: DVec3) -> EntityId {
    engine.spawn_player(PlayerSpawn::new(
        Transform {
            position,
            orientation: facing(at - position).unwrap(),
        },
        ShipProfile::player(),
    ))
}

#[test]
fn test_autopilot_holds_station_on_orbiting_planet() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let planet_position = DVec3::new(6000.0, 0.0, 0.0);
    // 60 u/s along +Z.
    let target = engine.spawn_planet(
        PlanetSpawn::stationary("Earth", planet_position, 60.0).orbiting(
            DVec3::ZERO,
            6000.0,
            0.01,
        ),
    );
    let player = spawn_player_facing(
        &mut engine,
        planet_position + DVec3::new(250.0, 0.0, 0.0),
        planet_position,
    );

    let (min_gap, max_gap, phase_changes) = follow_for_a_minute(&mut engine, player, target);
    assert!(
        (min_gap - 260.0).abs() < 1.0 && (max_gap - 260.0).abs() < 1.0,
        "gap ranged over [{min_gap}, {max_gap}]"
    );
    assert_eq!(phase_changes, 0);
}

#[test]
fn test_autopilot_holds_station_on_moon() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let earth_position = DVec3::new(6000.0, 0.0, 0.0);
    let earth = engine.spawn_planet(
        PlanetSpawn::stationary("Earth", earth_position, 60.0).orbiting(
            DVec3::ZERO,
            6000.0,
            0.01,
        ),
    );
    // Trailing Earth, where a carried moon settles.
    let moon_position = earth_position + DVec3::new(0.0, 0.0, -90.0);
    let moon = engine.spawn_planet(
        PlanetSpawn::stationary("Moon", moon_position, 20.0)
            .orbiting(earth_position, 90.0, 0.05)
            .with_parent(earth),
    );
    // Off to the side, so Earth stays outside the reticle.
    let player = spawn_player_facing(
        &mut engine,
        moon_position + DVec3::new(250.0, 0.0, 0.0),
        moon_position,
    );

    let (min_gap, max_gap, phase_changes) = follow_for_a_minute(&mut engine, player, moon);
    assert!(
        (min_gap - 220.0).abs() < 1.0 && (max_gap - 220.0).abs() < 1.0,
        "gap ranged over [{min_gap}, {max_gap}]"
    );
    assert_eq!(phase_changes, 0);
}

#[test]
fn test_autopilot_target_velocity_includes_parent_orbit() {
    use crate::systems::autopilot::target_state;

    let mut engine = SimulationEngine::new(SimConfig::default());
    let earth_position = DVec3::new(6000.0, 0.0, 0.0);
    let earth = engine.spawn_planet(
        PlanetSpawn::stationary("Earth", earth_position, 60.0).orbiting(
            DVec3::ZERO,
            6000.0,
            0.01,
        ),
    );
    let moon = engine.spawn_planet(
        PlanetSpawn::stationary("Moon", earth_position + DVec3::new(90.0, 0.0, 0.0), 20.0)
            .orbiting(earth_position, 90.0, 0.05)
            .with_parent(earth),
    );

    let earth_state = target_state(engine.world(), earth).unwrap();
    assert!(earth_state.orbit_velocity.distance(DVec3::new(0.0, 0.0, 60.0)) < 1e-9);

    // Own 4.5 u/s plus Earth's 60 u/s, both along +Z here.
    let moon_state = target_state(engine.world(), moon).unwrap();
    assert!(
        moon_state.orbit_velocity.distance(DVec3::new(0.0, 0.0, 64.5)) < 1e-9,
        "moon velocity {:?}",
        moon_state.orbit_velocity
    );
}

#[test]
fn test_autopilot_toggle_twice_disengages() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_player(&mut engine, DVec3::ZERO);
    engine.spawn_planet(PlanetSpawn::stationary(
        "Target",
        DVec3::new(0.0, 0.0, -3000.0),
        60.0,
    ));

    engine.tick(DT, idle());
    engine.tick(DT, toggle());
    let snap = engine.tick(DT, toggle());
    assert!(snap.events.contains(&SimEvent::AutopilotDisengaged {
        reason: DisengageReason::Toggled,
    }));
    assert!(!snap.hud.autopilot.active);
    assert_eq!(snap.hud.status_message.as_deref(), Some("Autopilot disengaged"));
}

#[test]
fn test_autopilot_releases_when_target_out_of_range() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);
    engine.spawn_planet(PlanetSpawn::stationary(
        "Target",
        DVec3::new(0.0, 0.0, -3000.0),
        60.0,
    ));

    engine.tick(DT, idle());
    engine.tick(DT, toggle());
    engine.set_transform(player, Transform::from_position(DVec3::new(0.0, 0.0, 4000.0)));
    let snap = engine.tick(DT, idle());

    assert!(snap.events.contains(&SimEvent::AutopilotDisengaged {
        reason: DisengageReason::TargetLost,
    }));
    assert!(!snap.hud.autopilot.active);
}

#[test]
fn test_autopilot_forces_turbo_off() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);
    engine.spawn_planet(PlanetSpawn::stationary(
        "Target",
        DVec3::new(0.0, 0.0, -5000.0),
        60.0,
    ));

    engine.tick(DT, idle());
    engine.tick(DT, toggle());
    let turbo = hold(Control::Turbo).with(Control::Forward);
    for _ in 0..600 {
        let snap = engine.tick(DT, turbo);
        assert!(player_speed(&snap) <= 250.0 + 1e-9);
    }
    assert_eq!(engine.get::<KinematicBody>(player).unwrap().speed_multiplier, 1.0);
}

#[test]
fn test_autopilot_without_fuel_only_turns() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);
    engine.spawn_planet(PlanetSpawn::stationary(
        "Target",
        DVec3::new(100.0, 0.0, -3000.0),
        60.0,
    ));

    engine.tick(DT, idle());
    engine.set_fuel(player, 0.0);
    engine.tick(DT, toggle());
    let snap = run_ticks(&mut engine, 30, idle());
    assert!(snap.hud.autopilot.active);
    assert_eq!(player_speed(&snap), 0.0);

    let forward = engine.get::<Transform>(player).unwrap().forward();
    let expected = DVec3::new(100.0, 0.0, -3000.0).normalize();
    assert!(forward.distance(expected) < 1e-9);
}

// ---- HUD ----

#[test]
fn test_hud_readout() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let player = spawn_player(&mut engine, DVec3::ZERO);
    let mut spawn = PlanetSpawn::stationary("Giant", DVec3::new(0.0, 0.0, -3000.0), 672.0);
    spawn.class = PlanetClass::Gas;
    spawn.has_atmosphere = true;
    spawn.distance_from_sun = 31_200.0;
    spawn.description = "Big.".to_string();
    engine.spawn_planet(spawn);

    engine.set_fuel(player, 10.0);
    engine.set_velocity(player, DVec3::new(0.0, 0.0, -10.0));
    let snap = engine.tick(DT, idle());

    assert!((snap.hud.speed - 10.0).abs() < 1e-9);
    assert!((snap.hud.speed_kmh - 36.0).abs() < 1e-9);
    assert!(snap.hud.fuel_percent < 10.0 && snap.hud.fuel_percent > 9.99);
    assert!(snap.hud.low_fuel);
    assert_eq!(snap.hud.health, 100.0);

    let details = snap.hud.targeted_planet.unwrap();
    assert_eq!(details.name, "Giant");
    assert_eq!(details.class, "Gas");
    assert_eq!(details.size, "672 km");
    assert_eq!(details.distance_from_sun, "31,200 km");
    assert_eq!(details.atmosphere, "Present");
    assert_eq!(details.description, "Big.");
}

#[test]
fn test_snapshot_lists_entities_in_registration_order() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let a = spawn_enemy(&mut engine, DVec3::new(0.0, 0.0, -900.0));
    let player = spawn_player(&mut engine, DVec3::ZERO);
    let b = spawn_enemy(&mut engine, DVec3::new(0.0, 0.0, 900.0));

    let snap = engine.tick(DT, idle());
    let ids: Vec<EntityId> = snap.ships.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![a, player, b]);
    assert_eq!(engine.roster(), vec![a, player, b]);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(
            e,
            SimEvent::EntitySpawned { id, kind: EntityKind::PlayerShip } if *id == player
        )));
}
