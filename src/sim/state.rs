//! Live-entity world and side-effect event queue
//!
//! The surrounding game owns all entities; the collision core reads them as
//! snapshots and writes outcomes back here. Side-effect requests (debris,
//! orbs, the death menu) travel through [`GameEvent`] to the collaborators
//! that render, reward and react. Nothing in the core blocks on them.

use glam::Vec2;
use log::debug;

use super::entity::{
    Alien, AlienTier, Asteroid, AsteroidSpawn, EntityId, EntityKind, Player, Projectile,
    ProjectileSpawn,
};
use super::pool::Pool;
use crate::tuning::{PoolTuning, Tuning};

/// Side-effect requests raised during a collision pass, drained once per
/// frame by the reward/visual/game-over collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Scatter experience orbs worth `amount` around `pos`
    ExperienceSpawned { pos: Vec2, amount: u32 },
    /// Spawn impact debris at `pos`, fanning `spread` degrees wide around
    /// `direction` (degrees, heading of the relative impact velocity)
    ImpactDebris { pos: Vec2, direction: f32, spread: f32 },
    /// Flash damage feedback on the entity that was hit
    DamageFlash { entity: EntityId },
    /// The player ran out of health; open the death menu
    PlayerDied,
}

/// One bounded pool per player projectile variant
#[derive(Debug)]
pub struct ProjectilePools {
    pub normal: Pool<Projectile>,
    pub quad: Pool<Projectile>,
    pub homing: Pool<Projectile>,
}

impl ProjectilePools {
    pub fn new(tuning: &PoolTuning) -> Self {
        Self {
            normal: Pool::new(Projectile::new, tuning.normal_projectiles),
            quad: Pool::new(Projectile::new, tuning.quad_projectiles),
            homing: Pool::new(Projectile::new, tuning.homing_projectiles),
        }
    }

    /// Route an acquire to the variant's pool by its category tag
    pub fn acquire(&mut self, spawn: &ProjectileSpawn) -> Option<&mut Projectile> {
        match spawn.kind {
            EntityKind::PlayerProjectileNormal => self.normal.acquire(spawn),
            EntityKind::PlayerProjectileQuad => self.quad.acquire(spawn),
            EntityKind::PlayerProjectileHoming => self.homing.acquire(spawn),
            kind => {
                debug!("no player pool for {kind:?}, spawn dropped");
                None
            }
        }
    }

    /// Look up a live shot by id for resolution write-back
    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut Projectile> {
        self.normal
            .active_mut()
            .iter_mut()
            .chain(self.quad.active_mut())
            .chain(self.homing.active_mut())
            .find(|p| p.id == id)
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Projectile> {
        self.normal
            .active()
            .iter()
            .chain(self.quad.active())
            .chain(self.homing.active())
    }

    pub fn tick(&mut self, dt: f32) {
        self.normal.tick(dt);
        self.quad.tick(dt);
        self.homing.tick(dt);
    }

    pub fn clear(&mut self) {
        self.normal.clear();
        self.quad.clear();
        self.homing.clear();
    }
}

/// Every live entity the collision pass can see
#[derive(Debug)]
pub struct Entities {
    pub player: Option<Player>,
    pub asteroids: Vec<Asteroid>,
    pub aliens: Vec<Alien>,
    pub player_projectiles: ProjectilePools,
    pub alien_projectiles: Pool<Projectile>,
}

impl Entities {
    pub fn new(tuning: &PoolTuning) -> Self {
        Self {
            player: None,
            asteroids: Vec::new(),
            aliens: Vec::new(),
            player_projectiles: ProjectilePools::new(tuning),
            alien_projectiles: Pool::new(Projectile::new, tuning.alien_projectiles),
        }
    }
}

/// Complete simulation state for one run
#[derive(Debug)]
pub struct World {
    pub playfield: Vec2,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub entities: Entities,
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl World {
    pub fn new(playfield: Vec2, tuning: &Tuning) -> Self {
        Self {
            playfield,
            score: 0,
            time_ticks: 0,
            entities: Entities::new(&tuning.pools),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_player(&mut self, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        self.entities.player = Some(Player::new(id, pos));
        id
    }

    pub fn spawn_asteroid(&mut self, spawn: &AsteroidSpawn) -> EntityId {
        let id = self.next_entity_id();
        let playfield = self.playfield;
        self.entities.asteroids.push(Asteroid::new(id, spawn, playfield));
        id
    }

    pub fn spawn_alien(&mut self, pos: Vec2, size: f32, health: f32, tier: AlienTier) -> EntityId {
        let id = self.next_entity_id();
        self.entities.aliens.push(Alien::new(id, pos, size, health, tier));
        id
    }

    /// Acquire a pooled player shot. `None` means that variant's pool is
    /// exhausted and the shot simply doesn't happen this frame.
    pub fn spawn_player_projectile(&mut self, mut spawn: ProjectileSpawn) -> Option<EntityId> {
        spawn.id = self.next_entity_id();
        spawn.playfield = self.playfield;
        self.entities.player_projectiles.acquire(&spawn).map(|p| p.id)
    }

    /// Acquire a pooled alien shot, same exhaustion semantics
    pub fn spawn_alien_projectile(&mut self, mut spawn: ProjectileSpawn) -> Option<EntityId> {
        spawn.id = self.next_entity_id();
        spawn.playfield = self.playfield;
        spawn.kind = EntityKind::AlienProjectile;
        self.entities.alien_projectiles.acquire(&spawn).map(|p| p.id)
    }

    /// Hand this frame's side-effect requests to the collaborators
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Game reset: drop live entities, return every pooled instance to its
    /// free list, zero score and clock.
    pub fn reset(&mut self) {
        self.entities.player = None;
        self.entities.asteroids.clear();
        self.entities.aliens.clear();
        self.entities.player_projectiles.clear();
        self.entities.alien_projectiles.clear();
        self.events.clear();
        self.score = 0;
        self.time_ticks = 0;
    }
}
