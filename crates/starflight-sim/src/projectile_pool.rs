//! Fixed-capacity projectile arena.
//!
//! Slots are never freed, only deactivated and reused. Each reuse bumps the
//! slot generation, so a handle kept past its projectile's lifetime stops
//! resolving instead of silently pointing at a newer projectile.

use glam::DVec3;

use starflight_core::components::ProjectileSpec;
use starflight_core::config::ProjectilePoolConfig;
use starflight_core::enums::{Faction, ProjectileLeash};
use starflight_core::types::{safe_normalize, EntityId, ProjectileHandle};

#[derive(Debug, Clone)]
pub struct Projectile {
    pub position: DVec3,
    pub velocity: DVec3,
    pub damage: f64,
    pub active: bool,
    /// Weak reference to whoever fired it.
    pub shooter: EntityId,
    /// Shooter's side, captured at spawn so it outlives the shooter.
    pub faction: Option<Faction>,
    pub origin: DVec3,
    pub created_at: f64,
    pub lifetime_secs: f64,
    pub color: u32,
    generation: u32,
}

impl Projectile {
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Who is firing, for faction exclusion and the leash.
#[derive(Debug, Clone, Copy)]
pub struct Shooter {
    pub id: EntityId,
    pub faction: Option<Faction>,
    pub position: DVec3,
}

pub struct ProjectilePool {
    slots: Vec<Projectile>,
    capacity: usize,
    max_travel_distance: f64,
    collision_radius: f64,
    leash: ProjectileLeash,
}

impl ProjectilePool {
    pub fn new(config: &ProjectilePoolConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.capacity),
            capacity: config.capacity,
            max_travel_distance: config.max_travel_distance,
            collision_radius: config.collision_radius,
            leash: config.leash,
        }
    }

    /// Activate a projectile. Reuses the first inactive slot, grows up to
    /// capacity, and otherwise refuses with `None`. `origin` defaults to the
    /// shooter's position. A direction with no usable length is refused too.
    pub fn spawn(
        &mut self,
        shooter: Shooter,
        direction: DVec3,
        spec: &ProjectileSpec,
        origin: Option<DVec3>,
        now: f64,
    ) -> Option<ProjectileHandle> {
        let dir = safe_normalize(direction)?;
        let origin = origin.unwrap_or(shooter.position);

        let index = match self.slots.iter().position(|p| !p.active) {
            Some(index) => {
                self.slots[index].generation = self.slots[index].generation.wrapping_add(1);
                index
            }
            None if self.slots.len() < self.capacity => {
                self.slots.push(Projectile {
                    position: origin,
                    velocity: DVec3::ZERO,
                    damage: 0.0,
                    active: false,
                    shooter: shooter.id,
                    faction: None,
                    origin,
                    created_at: now,
                    lifetime_secs: 0.0,
                    color: 0,
                    generation: 0,
                });
                self.slots.len() - 1
            }
            None => return None,
        };

        let slot = &mut self.slots[index];
        slot.position = origin;
        slot.origin = origin;
        slot.velocity = dir * spec.speed;
        slot.damage = spec.damage;
        slot.active = true;
        slot.shooter = shooter.id;
        slot.faction = shooter.faction;
        slot.created_at = now;
        slot.lifetime_secs = spec.lifetime_secs;
        slot.color = spec.color;

        Some(ProjectileHandle::new(index as u32, slot.generation))
    }

    /// Resolve a handle. Stale handles (slot reused since) resolve to `None`.
    pub fn get(&self, handle: ProjectileHandle) -> Option<&Projectile> {
        self.slots
            .get(handle.index as usize)
            .filter(|p| p.generation == handle.generation)
    }

    pub fn is_active(&self, handle: ProjectileHandle) -> bool {
        self.get(handle).is_some_and(|p| p.active)
    }

    /// Return a projectile to the pool. False if the handle is stale or it
    /// was already inactive.
    pub fn deactivate(&mut self, handle: ProjectileHandle) -> bool {
        match self.slots.get_mut(handle.index as usize) {
            Some(p) if p.generation == handle.generation && p.active => {
                p.active = false;
                true
            }
            _ => false,
        }
    }

    /// Active projectiles with their handles, in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = (ProjectileHandle, &Projectile)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, p)| p.active)
            .map(|(i, p)| (ProjectileHandle::new(i as u32, p.generation), p))
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Projectile] {
        &mut self.slots
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    /// Slots allocated so far, active or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_travel_distance(&self) -> f64 {
        self.max_travel_distance
    }

    pub fn collision_radius(&self) -> f64 {
        self.collision_radius
    }

    pub fn leash(&self) -> ProjectileLeash {
        self.leash
    }
}
