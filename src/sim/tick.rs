//! Per-frame orchestration
//!
//! The whole advance → reclaim → collide sequence runs synchronously inside
//! one frame tick: entities move first, pools reclaim what died on its own
//! (off-field shots), then the collision pass rebuilds the index from the
//! surviving snapshot and resolves interactions.

use super::collision::CollisionSystem;
use super::state::World;

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, collisions: &mut CollisionSystem, dt: f32) {
    let playfield = world.playfield;

    if let Some(player) = world.entities.player.as_mut() {
        player.update(dt, playfield);
    }
    for asteroid in &mut world.entities.asteroids {
        asteroid.update(dt, playfield);
    }
    for alien in &mut world.entities.aliens {
        alien.update(dt, playfield);
    }

    // Self-reported deaths go back to their pools before the index is built
    world.entities.player_projectiles.tick(dt);
    world.entities.alien_projectiles.tick(dt);
    world.entities.asteroids.retain(|a| !a.is_destroyed);
    world.entities.aliens.retain(|a| !a.is_destroyed);

    collisions.run(world);

    world.time_ticks += 1;
}
