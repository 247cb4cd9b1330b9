//! Entity categories and their lifecycle state
//!
//! The collision core never owns entities: it sees per-frame [`Collider`]
//! snapshots and writes interaction outcomes back through the live lists.
//! The types here carry only what the core needs - position, collision
//! radius, velocity, health, category tag, and the destroyed flag every
//! entity maintains itself.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::pool::Poolable;
use crate::consts::{ASTEROID_BASE_SPEED, ASTEROID_MIN_SIZE, PLAYER_IFRAME_TICKS};
use crate::{remap, wrap_position};

pub type EntityId = u32;

/// Closed category tags for collision-rule lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Asteroid,
    AlienBody,
    AlienProjectile,
    PlayerProjectileNormal,
    PlayerProjectileQuad,
    PlayerProjectileHoming,
}

impl EntityKind {
    /// True for every player-owned projectile variant
    pub fn is_player_projectile(self) -> bool {
        matches!(
            self,
            EntityKind::PlayerProjectileNormal
                | EntityKind::PlayerProjectileQuad
                | EntityKind::PlayerProjectileHoming
        )
    }
}

/// Per-frame snapshot of one entity, as stored in the spatial index.
/// Velocity rides along only to compute impact directions.
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub radius: f32,
    pub vel: Vec2,
}

/// Spawn parameters for an asteroid
#[derive(Debug, Clone)]
pub struct AsteroidSpawn {
    pub pos: Vec2,
    pub size: f32,
    pub health: f32,
    pub is_gold: bool,
    /// Seeds the heading jitter so runs stay reproducible
    pub seed: u64,
}

/// A drifting rock. Shrinks as it takes damage; gold ones pay out more.
#[derive(Debug, Clone)]
pub struct Asteroid {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub max_size: f32,
    pub health: f32,
    pub max_health: f32,
    pub is_gold: bool,
    pub is_destroyed: bool,
    max_speed: f32,
    dampening: f32,
}

impl Asteroid {
    pub fn new(id: EntityId, spawn: &AsteroidSpawn, playfield: Vec2) -> Self {
        let mut asteroid = Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 0.0,
            max_size: 0.0,
            health: 0.0,
            max_health: 0.0,
            is_gold: false,
            is_destroyed: false,
            max_speed: 300.0,
            dampening: 0.95,
        };
        asteroid.reset(spawn, playfield);
        asteroid
    }

    /// Re-initialize as freshly spawned: drift toward the playfield center
    /// with seeded heading jitter.
    pub fn reset(&mut self, spawn: &AsteroidSpawn, playfield: Vec2) {
        let mut rng = Pcg32::seed_from_u64(spawn.seed);
        self.pos = spawn.pos;
        self.size = spawn.size;
        self.max_size = spawn.size;
        self.health = spawn.health;
        self.max_health = spawn.health;
        self.is_gold = spawn.is_gold;
        self.is_destroyed = false;

        let to_center = playfield / 2.0 - spawn.pos;
        let angle = to_center.y.atan2(to_center.x) + rng.random_range(-0.35..0.35);
        let speed = ASTEROID_BASE_SPEED / spawn.size.max(1.0)
            * (1.0 + (0.1 * spawn.size.sqrt()).clamp(0.2, 2.0));
        self.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
    }

    /// Collision radius tracks current size
    pub fn radius(&self) -> f32 {
        self.size
    }

    /// Apply projectile damage: health drops, the rock shrinks linearly
    /// toward `ASTEROID_MIN_SIZE`, and the collision radius follows.
    /// Returns true when this hit destroys the asteroid.
    pub fn apply_hit(&mut self, damage: f32) -> bool {
        self.health -= damage;
        self.size = remap(
            self.health.max(0.0),
            self.max_health,
            0.0,
            self.max_size,
            ASTEROID_MIN_SIZE,
        );
        if self.health <= 0.0 {
            self.is_destroyed = true;
        }
        self.is_destroyed
    }

    /// Nudge from a projectile impact, scaled down for big rocks
    pub fn apply_impact_force(&mut self, from: Vec2) {
        let push = (self.pos - from).normalize_or_zero() * (20.0 / self.size.max(1.0));
        self.vel += push;
    }

    pub fn update(&mut self, dt: f32, playfield: Vec2) {
        if self.is_destroyed {
            return;
        }
        if self.vel.length() > self.max_speed {
            self.vel *= self.dampening;
        }
        self.pos += self.vel * dt;
        let radius = self.radius();
        wrap_position(&mut self.pos, radius, playfield);
    }

    pub fn collider(&self) -> Collider {
        Collider {
            id: self.id,
            kind: EntityKind::Asteroid,
            pos: self.pos,
            radius: self.radius(),
            vel: self.vel,
        }
    }
}

/// Alien reward tiers; bosses pay out more when destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlienTier {
    Basic,
    MiniBoss,
    Boss,
}

#[derive(Debug, Clone)]
pub struct Alien {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub tier: AlienTier,
    pub is_destroyed: bool,
}

impl Alien {
    pub fn new(id: EntityId, pos: Vec2, size: f32, health: f32, tier: AlienTier) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            size,
            health,
            max_health: health,
            tier,
            is_destroyed: false,
        }
    }

    /// Returns true when this hit destroys the alien
    pub fn take_damage(&mut self, damage: f32) -> bool {
        self.health -= damage;
        if self.health <= 0.0 {
            self.is_destroyed = true;
        }
        self.is_destroyed
    }

    pub fn update(&mut self, dt: f32, playfield: Vec2) {
        if self.is_destroyed {
            return;
        }
        self.pos += self.vel * dt;
        wrap_position(&mut self.pos, self.size, playfield);
    }

    pub fn collider(&self) -> Collider {
        Collider {
            id: self.id,
            kind: EntityKind::AlienBody,
            pos: self.pos,
            radius: self.size,
            vel: self.vel,
        }
    }
}

/// Spawn parameters shared by every projectile category.
///
/// `id` and `playfield` are filled in by the world's spawn helpers; callers
/// set the ballistic fields and the category tag.
#[derive(Debug, Clone)]
pub struct ProjectileSpawn {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub damage: f32,
    /// Targets the shot can pass through before it is spent
    pub pierce: u32,
    pub kind: EntityKind,
    pub id: EntityId,
    pub playfield: Vec2,
}

impl ProjectileSpawn {
    /// Ballistics defaults matching the basic player shot
    pub fn new(kind: EntityKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            size: 5.0,
            damage: 5.0,
            pierce: 0,
            kind,
            id: 0,
            playfield: Vec2::ZERO,
        }
    }
}

/// A pooled shot. Does not wrap: off the field it is spent.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub damage: f32,
    pub pierce: u32,
    pub is_destroyed: bool,
    playfield: Vec2,
}

impl Projectile {
    pub fn new(spawn: &ProjectileSpawn) -> Self {
        let mut projectile = Self {
            id: 0,
            kind: spawn.kind,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 0.0,
            damage: 0.0,
            pierce: 0,
            is_destroyed: false,
            playfield: Vec2::ZERO,
        };
        projectile.reset(spawn);
        projectile
    }

    pub fn collider(&self) -> Collider {
        Collider {
            id: self.id,
            kind: self.kind,
            pos: self.pos,
            radius: self.size,
            vel: self.vel,
        }
    }
}

impl Poolable for Projectile {
    type Spawn = ProjectileSpawn;

    fn reset(&mut self, spawn: &ProjectileSpawn) {
        self.id = spawn.id;
        self.kind = spawn.kind;
        self.pos = spawn.pos;
        self.vel = spawn.vel;
        self.size = spawn.size;
        self.damage = spawn.damage;
        self.pierce = spawn.pierce;
        self.is_destroyed = false;
        self.playfield = spawn.playfield;
    }

    fn is_destroyed(&self) -> bool {
        self.is_destroyed
    }

    fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        if self.pos.x < 0.0
            || self.pos.x > self.playfield.x
            || self.pos.y < 0.0
            || self.pos.y > self.playfield.y
        {
            self.is_destroyed = true;
        }
    }
}

/// The player ship. Never inserted into the index; it is only ever the
/// querying side of a collision.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    /// Fraction of incoming damage ignored, 0..1
    pub damage_reduction: f32,
    /// Remaining invincibility ticks after a hit
    pub iframes: u32,
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            size: 20.0,
            health: 100.0,
            max_health: 100.0,
            damage_reduction: 0.0,
            iframes: 0,
        }
    }

    /// Apply damage unless inside the invincibility window. Returns true
    /// if the hit landed; a landed hit opens a fresh window.
    pub fn apply_damage(&mut self, damage: f32) -> bool {
        if self.iframes > 0 {
            return false;
        }
        self.health = (self.health - damage * (1.0 - self.damage_reduction)).max(0.0);
        self.iframes = PLAYER_IFRAME_TICKS;
        true
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn update(&mut self, dt: f32, playfield: Vec2) {
        self.iframes = self.iframes.saturating_sub(1);
        self.pos += self.vel * dt;
        wrap_position(&mut self.pos, self.size, playfield);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYFIELD: Vec2 = Vec2::new(800.0, 600.0);

    fn spawn(seed: u64) -> AsteroidSpawn {
        AsteroidSpawn {
            pos: Vec2::new(100.0, 100.0),
            size: 60.0,
            health: 20.0,
            is_gold: false,
            seed,
        }
    }

    #[test]
    fn test_asteroid_reset_is_deterministic() {
        let a = Asteroid::new(1, &spawn(42), PLAYFIELD);
        let b = Asteroid::new(2, &spawn(42), PLAYFIELD);
        assert_eq!(a.vel, b.vel);

        let c = Asteroid::new(3, &spawn(43), PLAYFIELD);
        assert_ne!(a.vel, c.vel, "different seed, different jitter");
    }

    #[test]
    fn test_asteroid_drifts_roughly_toward_center() {
        let asteroid = Asteroid::new(1, &spawn(7), PLAYFIELD);
        let to_center = (PLAYFIELD / 2.0 - asteroid.pos).normalize();
        let heading = asteroid.vel.normalize();
        // Jitter is capped at 0.35 rad, so the headings stay close
        assert!(heading.dot(to_center) > 0.9);
    }

    #[test]
    fn test_asteroid_shrinks_with_damage() {
        let mut asteroid = Asteroid::new(1, &spawn(1), PLAYFIELD);
        assert!(!asteroid.apply_hit(10.0));
        assert!(asteroid.size < 60.0);
        assert!(asteroid.size > ASTEROID_MIN_SIZE);
        assert_eq!(asteroid.radius(), asteroid.size);

        assert!(asteroid.apply_hit(10.0));
        assert!(asteroid.is_destroyed);
        assert_eq!(asteroid.size, ASTEROID_MIN_SIZE);
    }

    #[test]
    fn test_asteroid_reset_clears_damage_state() {
        let mut asteroid = Asteroid::new(1, &spawn(1), PLAYFIELD);
        asteroid.apply_hit(20.0);
        assert!(asteroid.is_destroyed);

        asteroid.reset(&spawn(1), PLAYFIELD);
        assert!(!asteroid.is_destroyed);
        assert_eq!(asteroid.health, 20.0);
        assert_eq!(asteroid.size, 60.0);
    }

    #[test]
    fn test_asteroid_wraps_across_edges() {
        let mut asteroid = Asteroid::new(1, &spawn(1), PLAYFIELD);
        asteroid.pos = Vec2::new(400.0, PLAYFIELD.y + asteroid.radius() + 5.0);
        asteroid.vel = Vec2::ZERO;
        asteroid.update(1.0 / 60.0, PLAYFIELD);
        assert_eq!(asteroid.pos.y, -asteroid.radius());
    }

    #[test]
    fn test_alien_take_damage_reports_death() {
        let mut alien = Alien::new(1, Vec2::new(50.0, 50.0), 25.0, 30.0, AlienTier::Basic);
        assert!(!alien.take_damage(10.0));
        assert!(!alien.is_destroyed);
        assert!(alien.take_damage(25.0));
        assert!(alien.is_destroyed);
    }

    #[test]
    fn test_projectile_expires_off_field() {
        let mut spawn =
            ProjectileSpawn::new(EntityKind::PlayerProjectileNormal, Vec2::new(785.0, 300.0), Vec2::new(600.0, 0.0));
        spawn.playfield = PLAYFIELD;
        let mut projectile = Projectile::new(&spawn);

        projectile.update(1.0 / 60.0);
        assert!(!projectile.is_destroyed);
        projectile.update(1.0 / 60.0);
        assert!(projectile.is_destroyed, "off the right edge");
    }

    #[test]
    fn test_player_iframes_absorb_followup_hits() {
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        assert!(player.apply_damage(10.0));
        assert_eq!(player.health, 90.0);
        assert_eq!(player.iframes, PLAYER_IFRAME_TICKS);

        assert!(!player.apply_damage(10.0), "inside the window");
        assert_eq!(player.health, 90.0);

        for _ in 0..PLAYER_IFRAME_TICKS {
            player.update(1.0 / 60.0, PLAYFIELD);
        }
        assert!(player.apply_damage(10.0));
        assert_eq!(player.health, 80.0);
    }

    #[test]
    fn test_player_damage_reduction() {
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        player.damage_reduction = 0.5;
        player.apply_damage(20.0);
        assert_eq!(player.health, 90.0);
    }
}
