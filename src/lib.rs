//! Astro Blitz core - collision and entity-lifecycle runtime for a
//! wrap-around arcade shooter
//!
//! Core modules:
//! - `sim`: spatial index, collision dispatch, bounded entity pools
//! - `tuning`: data-driven game balance
//!
//! Per frame the surrounding game rebuilds the spatial index from its live
//! entities, resolves neighbor interactions with toroidal wrap semantics,
//! and recycles destroyed entities through bounded pools instead of
//! allocating fresh ones. Rendering, audio, menus and per-species AI live
//! outside this crate; they consume the side-effect events the core emits.

pub mod sim;
pub mod tuning;

pub use sim::{CollisionSystem, GameEvent, World, tick};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the original frame clock)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 1280.0;
    pub const PLAYFIELD_HEIGHT: f32 = 720.0;

    /// Invincibility window after the player takes a hit, in ticks
    pub const PLAYER_IFRAME_TICKS: u32 = 60;

    /// Fan width of impact debris cones, in degrees
    pub const IMPACT_SPREAD_DEGREES: f32 = 120.0;

    /// How long a collision highlight stays on the debug overlay, in ticks
    pub const HIGHLIGHT_TICKS: u64 = 60;

    /// Smallest size an asteroid shrinks to before it dies
    pub const ASTEROID_MIN_SIZE: f32 = 20.0;

    /// Drift speed scale for asteroids, divided by size (pixels/sec)
    pub const ASTEROID_BASE_SPEED: f32 = 3000.0;
}

/// Linear remap of `value` from `[in_start, in_end]` onto `[out_start, out_end]`
#[inline]
pub fn remap(value: f32, in_start: f32, in_end: f32, out_start: f32, out_end: f32) -> f32 {
    out_start + (value - in_start) / (in_end - in_start) * (out_end - out_start)
}

/// Heading of a velocity vector in degrees
#[inline]
pub fn heading_degrees(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}

/// Toroidal wrap: an entity fully off one edge (by its own radius)
/// re-enters from the opposite edge.
pub fn wrap_position(pos: &mut Vec2, radius: f32, playfield: Vec2) {
    if pos.x > playfield.x + radius {
        pos.x = -radius;
    } else if pos.x < -radius {
        pos.x = playfield.x + radius;
    }
    if pos.y > playfield.y + radius {
        pos.y = -radius;
    } else if pos.y < -radius {
        pos.y = playfield.y + radius;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap() {
        assert!((remap(5.0, 0.0, 10.0, 0.0, 100.0) - 50.0).abs() < 0.001);
        // Reversed output range, the way asteroid shrinking uses it
        assert!((remap(10.0, 10.0, 0.0, 60.0, 20.0) - 60.0).abs() < 0.001);
        assert!((remap(0.0, 10.0, 0.0, 60.0, 20.0) - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_heading_degrees() {
        assert!(heading_degrees(Vec2::new(1.0, 0.0)).abs() < 0.001);
        assert!((heading_degrees(Vec2::new(0.0, 1.0)) - 90.0).abs() < 0.001);
        assert!((heading_degrees(Vec2::new(-1.0, 0.0)).abs() - 180.0).abs() < 0.001);
    }

    #[test]
    fn test_wrap_position() {
        let playfield = Vec2::new(800.0, 600.0);

        let mut pos = Vec2::new(815.0, 300.0);
        wrap_position(&mut pos, 10.0, playfield);
        assert_eq!(pos.x, -10.0);

        let mut pos = Vec2::new(-15.0, 300.0);
        wrap_position(&mut pos, 10.0, playfield);
        assert_eq!(pos.x, 810.0);

        let mut pos = Vec2::new(400.0, 615.0);
        wrap_position(&mut pos, 10.0, playfield);
        assert_eq!(pos.y, -10.0);

        // Inside the field (plus its own radius) stays put
        let mut pos = Vec2::new(805.0, 300.0);
        wrap_position(&mut pos, 10.0, playfield);
        assert_eq!(pos, Vec2::new(805.0, 300.0));
    }
}
