//! Collision and lifecycle core
//!
//! The only part of the game with real algorithmic weight: a quad-tree
//! spatial partition rebuilt every frame, a collision dispatcher with
//! toroidal wrap semantics, and bounded object pools recycling short-lived
//! entities. Everything runs single-threaded and frame-synchronous; the
//! index is rebuilt from the current entity snapshot before any query and
//! discarded at the next pass, so nothing spatial survives a frame.

pub mod collision;
pub mod entity;
pub mod pool;
pub mod quadtree;
pub mod state;
pub mod tick;

pub use collision::{CollisionSystem, DebugRect};
pub use entity::{
    Alien, AlienTier, Asteroid, AsteroidSpawn, Collider, EntityId, EntityKind, Player, Projectile,
    ProjectileSpawn,
};
pub use pool::{Pool, Poolable};
pub use quadtree::{Boundary, QuadTree};
pub use state::{Entities, GameEvent, ProjectilePools, World};
pub use tick::tick;
