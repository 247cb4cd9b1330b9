//! Collision dispatch over the spatial index
//!
//! Each frame the dispatcher rebuilds the quad-tree from every live
//! collider, queries it around each entity that needs neighbor awareness
//! (re-issuing queries across the playfield seam for wrapped entities), and
//! applies the category-keyed interaction rules. Destroyed entities are
//! compacted out of the live lists after each category pass, never spliced
//! mid-iteration.

use glam::Vec2;
use log::{debug, info};

use super::entity::{AlienTier, Collider, EntityKind};
use super::quadtree::{Boundary, QuadTree};
use super::state::{Entities, GameEvent, World};
use crate::consts::{HIGHLIGHT_TICKS, IMPACT_SPREAD_DEGREES};
use crate::heading_degrees;
use crate::tuning::{RewardTuning, Tuning};

/// What a (subject, neighbor) category pair resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interaction {
    ProjectileHitsAsteroid,
    ProjectileHitsAlien,
}

/// Closed rule table over index-resident categories. Pairs without an entry
/// produce no interaction. The player carries no tag (it is never inserted);
/// its single rule - alien shots hit it - lives in the player pass.
fn interaction_for(subject: EntityKind, neighbor: EntityKind) -> Option<Interaction> {
    use EntityKind::*;
    match (subject, neighbor) {
        (Asteroid, k) if k.is_player_projectile() => Some(Interaction::ProjectileHitsAsteroid),
        (AlienBody, k) if k.is_player_projectile() => Some(Interaction::ProjectileHitsAlien),
        _ => None,
    }
}

/// Impact direction is the heading of the relative velocity between the
/// two bodies, in degrees - what the debris collaborator expects.
fn impact_debris(pos: Vec2, projectile_vel: Vec2, target_vel: Vec2) -> GameEvent {
    GameEvent::ImpactDebris {
        pos,
        direction: heading_degrees(projectile_vel - target_vel),
        spread: IMPACT_SPREAD_DEGREES,
    }
}

/// A node flagged on the debug overlay after a collision
#[derive(Debug, Clone, Copy)]
struct Highlight {
    boundary: Boundary,
    at_tick: u64,
}

/// Rectangle handed to the debug-render collaborator
#[derive(Debug, Clone, Copy)]
pub struct DebugRect {
    pub boundary: Boundary,
    /// 1.0 for node traces; highlights fade from 1.0 to 0.0
    pub strength: f32,
    pub is_highlight: bool,
}

/// The per-frame collision dispatcher.
///
/// The index always exists - constructed covering the playfield plus a
/// margin of the larger screen dimension on every side - so there is no
/// "query before first pass" state to misuse; `begin_pass` resets it to a
/// single empty leaf.
pub struct CollisionSystem {
    tree: QuadTree,
    playfield: Vec2,
    rewards: RewardTuning,
    /// Enables the overlay trace of node boundaries and collision highlights
    pub debug: bool,
    highlights: Vec<Highlight>,
}

impl CollisionSystem {
    pub fn new(playfield: Vec2, tuning: &Tuning) -> Self {
        Self {
            tree: QuadTree::new(
                Self::root_boundary(playfield),
                tuning.index.capacity,
                tuning.index.max_depth,
            ),
            playfield,
            rewards: tuning.rewards.clone(),
            debug: false,
            highlights: Vec::new(),
        }
    }

    /// Root region: the playfield plus a margin of `max(width, height)` on
    /// every side, so entities that wrapped slightly off-screen still insert.
    fn root_boundary(playfield: Vec2) -> Boundary {
        let margin = playfield.x.max(playfield.y);
        Boundary::new(playfield / 2.0, playfield + Vec2::splat(margin))
    }

    /// Discard last frame's partition and start a fresh pass
    pub fn begin_pass(&mut self) {
        self.tree.clear();
    }

    /// Insert one collider snapshot. Returns false if it lies outside the
    /// root region; that entity simply goes untracked this frame.
    pub fn insert(&mut self, collider: Collider) -> bool {
        let tracked = self.tree.insert(collider);
        if !tracked {
            debug!(
                "collider {} at {:?} outside index bounds, untracked this frame",
                collider.id, collider.pos
            );
        }
        tracked
    }

    /// Snapshot every live collider into the index. The player stays out;
    /// it is only ever the querying side.
    pub fn insert_all(&mut self, entities: &Entities) {
        for asteroid in &entities.asteroids {
            if !asteroid.is_destroyed {
                self.insert(asteroid.collider());
            }
        }
        for alien in &entities.aliens {
            if !alien.is_destroyed {
                self.insert(alien.collider());
            }
        }
        for shot in entities.alien_projectiles.active() {
            if !shot.is_destroyed {
                self.insert(shot.collider());
            }
        }
        for shot in entities.player_projectiles.iter_active() {
            if !shot.is_destroyed {
                self.insert(shot.collider());
            }
        }
    }

    /// Circle query at `pos` with radius `size`, re-issued across the wrap
    /// seam when `pos` lies within `size` of a playfield edge, results
    /// de-duplicated by id.
    ///
    /// The wrap margin is the querying entity's own size, as the original
    /// game had it: a large neighbor closing on a small entity across the
    /// seam can still be missed.
    pub fn query_with_wrap(&self, pos: Vec2, size: f32) -> Vec<Collider> {
        let mut found = Vec::new();
        self.tree.query_circle(pos, size, &mut found);

        if pos.x < size {
            self.tree
                .query_circle(Vec2::new(pos.x + self.playfield.x, pos.y), size, &mut found);
        } else if pos.x > self.playfield.x - size {
            self.tree
                .query_circle(Vec2::new(pos.x - self.playfield.x, pos.y), size, &mut found);
        }
        if pos.y < size {
            self.tree
                .query_circle(Vec2::new(pos.x, pos.y + self.playfield.y), size, &mut found);
        } else if pos.y > self.playfield.y - size {
            self.tree
                .query_circle(Vec2::new(pos.x, pos.y - self.playfield.y), size, &mut found);
        }

        found.sort_unstable_by_key(|c| c.id);
        found.dedup_by_key(|c| c.id);
        found
    }

    /// The whole per-frame pass: rebuild, query, resolve, compact
    pub fn run(&mut self, world: &mut World) {
        self.begin_pass();
        self.insert_all(&world.entities);
        let now = world.time_ticks;

        self.resolve_asteroids(world, now);
        self.resolve_player(world, now);
        self.resolve_aliens(world, now);
    }

    /// Asteroids vs. player projectiles. First landed hit per asteroid per
    /// frame wins; a shot spent earlier in the pass stays spent.
    fn resolve_asteroids(&mut self, world: &mut World, now: u64) {
        let entities = &mut world.entities;
        for i in 0..entities.asteroids.len() {
            let probe = entities.asteroids[i].collider();
            let found = self.query_with_wrap(probe.pos, probe.radius);

            for neighbor in found {
                if interaction_for(EntityKind::Asteroid, neighbor.kind)
                    != Some(Interaction::ProjectileHitsAsteroid)
                {
                    continue;
                }
                if neighbor.pos.distance(probe.pos) >= probe.radius + neighbor.radius {
                    continue;
                }
                let Some(shot) = entities.player_projectiles.find_mut(neighbor.id) else {
                    continue;
                };
                if shot.is_destroyed {
                    continue;
                }

                let damage = shot.damage;
                let (shot_pos, shot_vel) = (shot.pos, shot.vel);
                if shot.pierce > 0 {
                    shot.pierce -= 1;
                } else {
                    shot.is_destroyed = true;
                }

                let asteroid = &mut entities.asteroids[i];
                asteroid.apply_impact_force(shot_pos);
                let killed = asteroid.apply_hit(damage);
                world.events.push(GameEvent::DamageFlash { entity: asteroid.id });
                world
                    .events
                    .push(impact_debris(shot_pos, shot_vel, asteroid.vel));
                self.record_highlight(probe.pos, now);

                if killed {
                    let (score, orbs) = if asteroid.is_gold {
                        (self.rewards.gold_asteroid_score, self.rewards.gold_asteroid_orbs)
                    } else {
                        (self.rewards.asteroid_score, self.rewards.asteroid_orbs)
                    };
                    let pos = asteroid.pos;
                    world.score += u64::from(score);
                    world
                        .events
                        .push(GameEvent::ExperienceSpawned { pos, amount: orbs });
                }
                break;
            }
        }
        entities.asteroids.retain(|a| !a.is_destroyed);
    }

    /// Alien projectiles vs. the player. The shot is spent whether or not
    /// the invincibility window absorbed its damage; death is reported
    /// exactly once, on the transition.
    fn resolve_player(&mut self, world: &mut World, now: u64) {
        let entities = &mut world.entities;
        let Some(player) = entities.player.as_mut() else {
            return;
        };
        let found = self.query_with_wrap(player.pos, player.size);

        for neighbor in found {
            if neighbor.kind != EntityKind::AlienProjectile {
                continue;
            }
            if neighbor.pos.distance(player.pos) >= player.size + neighbor.radius {
                continue;
            }
            let Some(shot) = entities
                .alien_projectiles
                .active_mut()
                .iter_mut()
                .find(|s| s.id == neighbor.id)
            else {
                continue;
            };
            if shot.is_destroyed {
                continue;
            }

            shot.is_destroyed = true;
            let was_dead = player.is_dead();
            player.apply_damage(shot.damage);
            world
                .events
                .push(impact_debris(shot.pos, shot.vel, player.vel));
            self.record_highlight(player.pos, now);

            if !was_dead && player.is_dead() {
                info!("player died at tick {now}");
                world.events.push(GameEvent::PlayerDied);
                break;
            }
        }
    }

    /// Aliens vs. player projectiles. Mirrors the asteroid pass, with
    /// tier-scaled rewards.
    fn resolve_aliens(&mut self, world: &mut World, now: u64) {
        let entities = &mut world.entities;
        if entities.player.is_none() {
            return;
        }
        for i in 0..entities.aliens.len() {
            let probe = entities.aliens[i].collider();
            let found = self.query_with_wrap(probe.pos, probe.radius);

            for neighbor in found {
                if interaction_for(EntityKind::AlienBody, neighbor.kind)
                    != Some(Interaction::ProjectileHitsAlien)
                {
                    continue;
                }
                if neighbor.pos.distance(probe.pos) >= probe.radius + neighbor.radius {
                    continue;
                }
                let Some(shot) = entities.player_projectiles.find_mut(neighbor.id) else {
                    continue;
                };
                if shot.is_destroyed {
                    continue;
                }

                let damage = shot.damage;
                let (shot_pos, shot_vel) = (shot.pos, shot.vel);
                if shot.pierce > 0 {
                    shot.pierce -= 1;
                } else {
                    shot.is_destroyed = true;
                }

                let alien = &mut entities.aliens[i];
                let killed = alien.take_damage(damage);
                world
                    .events
                    .push(impact_debris(shot_pos, shot_vel, alien.vel));
                self.record_highlight(probe.pos, now);

                if killed {
                    let (score, orbs) = match alien.tier {
                        AlienTier::Basic => (self.rewards.alien_score, self.rewards.alien_orbs),
                        AlienTier::MiniBoss => {
                            (self.rewards.mini_boss_score, self.rewards.mini_boss_orbs)
                        }
                        AlienTier::Boss => (self.rewards.boss_score, self.rewards.boss_orbs),
                    };
                    let pos = alien.pos;
                    world.score += u64::from(score);
                    world
                        .events
                        .push(GameEvent::ExperienceSpawned { pos, amount: orbs });
                }
                break;
            }
        }
        entities.aliens.retain(|a| !a.is_destroyed);
    }

    /// Remember the index region a collision landed in, for the overlay
    fn record_highlight(&mut self, pos: Vec2, now: u64) {
        if !self.debug {
            return;
        }
        if let Some(boundary) = self.tree.leaf_boundary_for(pos) {
            self.highlights.push(Highlight { boundary, at_tick: now });
        }
    }

    /// Rectangles for the debug renderer: every node boundary at full
    /// strength, plus recent collision highlights fading out over the
    /// highlight window. Expired highlights are pruned here.
    pub fn debug_rects(&mut self, now: u64) -> Vec<DebugRect> {
        if !self.debug {
            return Vec::new();
        }
        let mut rects = Vec::new();
        self.tree.visit_boundaries(&mut |boundary| {
            rects.push(DebugRect {
                boundary: *boundary,
                strength: 1.0,
                is_highlight: false,
            });
        });

        self.highlights
            .retain(|h| now.saturating_sub(h.at_tick) < HIGHLIGHT_TICKS);
        for highlight in &self.highlights {
            let age = now.saturating_sub(highlight.at_tick) as f32 / HIGHLIGHT_TICKS as f32;
            rects.push(DebugRect {
                boundary: highlight.boundary,
                strength: 1.0 - age,
                is_highlight: true,
            });
        }
        rects
    }
}
