//! Data-driven game balance
//!
//! Defaults mirror [`crate::consts`]. A JSON document may override any subset
//! of fields; missing keys keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{TuningError, TuningResult, validate_chance, validate_positive};

/// Which slice of the target catalog a level draws from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogTier {
    /// Common archetypes only (no rare or hazard targets)
    Basic,
    /// Each spawn rolls: full catalog with `full_chance`, otherwise common only
    Mixed { full_chance: f64 },
    /// Every non-boss archetype
    Full,
}

/// Per-level round budgets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub darts: u32,
    pub time_secs: u32,
    /// Present only on boss levels: the score needed to clear the round
    #[serde(default)]
    pub boss_threshold: Option<u32>,
    pub catalog: CatalogTier,
}

impl LevelConfig {
    pub fn is_boss(&self) -> bool {
        self.boss_threshold.is_some()
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            darts: 15,
            time_secs: 30,
            boss_threshold: None,
            catalog: CatalogTier::Basic,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Level 1 is `levels[0]`; levels past the end reuse the last entry
    pub levels: Vec<LevelConfig>,

    // === Spawning ===
    pub target_spawn_interval_ms: u64,
    pub max_live_targets: usize,
    pub boss_spawn_chance: f64,
    pub powerup_spawn_interval_ms: u64,
    /// Chance that a powerup spawn tick actually produces a powerup
    pub powerup_spawn_chance: f64,
    pub max_visible_powerups: usize,

    // === Motion ===
    pub target_base_speed: f32,
    pub pause_chance: f64,
    pub pause_ms: u64,
    /// Pause length under the Stinky fate
    pub stinky_pause_ms: u64,

    // === Darts ===
    pub projectile_speed: f32,
    pub hit_buffer: f32,

    // === Effects ===
    pub hazard_dart_penalty: u32,
    pub hazard_score_penalty: u32,
    pub extra_darts: u32,
    pub freeze_ms: u64,
    pub score_boost_ms: u64,
    pub lucky_aim_ms: u64,

    // === Round ===
    pub round_end_delay_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        let basic = LevelConfig::default();
        let mixed = LevelConfig {
            catalog: CatalogTier::Mixed { full_chance: 0.3 },
            ..basic
        };
        let boss = LevelConfig {
            darts: 20,
            time_secs: 60,
            boss_threshold: Some(BOSS_SCORE_THRESHOLD),
            catalog: CatalogTier::Full,
        };

        Self {
            levels: vec![basic, basic, mixed, mixed, boss],

            target_spawn_interval_ms: TARGET_SPAWN_INTERVAL_MS,
            max_live_targets: MAX_LIVE_TARGETS,
            boss_spawn_chance: BOSS_SPAWN_CHANCE,
            powerup_spawn_interval_ms: POWERUP_SPAWN_INTERVAL_MS,
            powerup_spawn_chance: 0.3,
            max_visible_powerups: MAX_VISIBLE_POWERUPS,

            target_base_speed: TARGET_BASE_SPEED,
            pause_chance: TARGET_PAUSE_CHANCE,
            pause_ms: 800,
            stinky_pause_ms: 200,

            projectile_speed: PROJECTILE_SPEED,
            hit_buffer: HIT_BUFFER,

            hazard_dart_penalty: HAZARD_DART_PENALTY,
            hazard_score_penalty: HAZARD_SCORE_PENALTY,
            extra_darts: 5,
            freeze_ms: 5000,
            score_boost_ms: 10_000,
            lucky_aim_ms: 8000,

            round_end_delay_ms: ROUND_END_DELAY_MS,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> TuningResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Budgets for a 1-based level (level 0 behaves like level 1)
    pub fn level(&self, level: u32) -> LevelConfig {
        let index = (level.max(1) - 1) as usize;
        self.levels
            .get(index)
            .or_else(|| self.levels.last())
            .copied()
            .unwrap_or_default()
    }

    /// Check that every value can drive a round
    pub fn validate(&self) -> TuningResult<()> {
        if self.levels.is_empty() {
            return Err(TuningError::EmptyLevelTable);
        }

        for (i, level) in self.levels.iter().enumerate() {
            let number = i as u32 + 1;
            if level.darts == 0 {
                return Err(TuningError::InvalidLevel {
                    level: number,
                    reason: "dart budget must be at least 1",
                });
            }
            if level.time_secs == 0 {
                return Err(TuningError::InvalidLevel {
                    level: number,
                    reason: "time budget must be at least 1 second",
                });
            }
            if let CatalogTier::Mixed { full_chance } = level.catalog {
                validate_chance("catalog.full_chance", full_chance)?;
            }
        }

        validate_positive("target_spawn_interval_ms", self.target_spawn_interval_ms as f64)?;
        validate_positive("powerup_spawn_interval_ms", self.powerup_spawn_interval_ms as f64)?;
        validate_positive("max_live_targets", self.max_live_targets as f64)?;
        validate_positive("max_visible_powerups", self.max_visible_powerups as f64)?;
        validate_positive("projectile_speed", self.projectile_speed as f64)?;
        validate_chance("boss_spawn_chance", self.boss_spawn_chance)?;
        validate_chance("powerup_spawn_chance", self.powerup_spawn_chance)?;
        validate_chance("pause_chance", self.pause_chance)?;

        if self.hit_buffer < 0.0 {
            return Err(TuningError::OutOfRange {
                name: "hit_buffer",
                value: self.hit_buffer as f64,
                range: "[0.0, ∞)",
            });
        }
        if self.target_base_speed < 0.0 {
            return Err(TuningError::OutOfRange {
                name: "target_base_speed",
                value: self.target_base_speed as f64,
                range: "[0.0, ∞)",
            });
        }

        Ok(())
    }
}
