//! Data-driven game balance
//!
//! Values designers iterate on live here rather than in code, loadable from
//! JSON at startup. Every field has a shipped default, so a balance file
//! only needs to name what it overrides.

use serde::{Deserialize, Serialize};

/// Score and experience-orb yields per destroyed entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTuning {
    pub asteroid_score: u32,
    pub gold_asteroid_score: u32,
    pub alien_score: u32,
    pub mini_boss_score: u32,
    pub boss_score: u32,
    pub asteroid_orbs: u32,
    pub gold_asteroid_orbs: u32,
    pub alien_orbs: u32,
    pub mini_boss_orbs: u32,
    pub boss_orbs: u32,
}

impl Default for RewardTuning {
    fn default() -> Self {
        Self {
            asteroid_score: 10,
            gold_asteroid_score: 100,
            alien_score: 200,
            mini_boss_score: 1000,
            boss_score: 2000,
            asteroid_orbs: 5,
            gold_asteroid_orbs: 50,
            alien_orbs: 30,
            mini_boss_orbs: 300,
            boss_orbs: 600,
        }
    }
}

/// Hard caps on pooled instances per projectile category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolTuning {
    pub normal_projectiles: usize,
    pub quad_projectiles: usize,
    pub homing_projectiles: usize,
    pub alien_projectiles: usize,
}

impl Default for PoolTuning {
    fn default() -> Self {
        Self {
            normal_projectiles: 500,
            quad_projectiles: 200,
            homing_projectiles: 100,
            alien_projectiles: 300,
        }
    }
}

/// Spatial index parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexTuning {
    /// Points a node holds before subdividing
    pub capacity: usize,
    /// Depth at which leaves stop subdividing and overflow instead
    pub max_depth: u8,
}

impl Default for IndexTuning {
    fn default() -> Self {
        Self {
            capacity: 2,
            max_depth: 8,
        }
    }
}

/// Complete balance configuration for the core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub rewards: RewardTuning,
    pub pools: PoolTuning,
    pub index: IndexTuning,
}

impl Tuning {
    /// Parse a balance file; fields it doesn't name keep shipped values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
