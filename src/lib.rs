//! Spin Shot - a fate-wheel dart shooting arcade round
//!
//! Core modules:
//! - `sim`: Fixed-tick round simulation (targets, darts, collisions, effects, round state)
//! - `tuning`: Data-driven game balance (level table, constants)
//! - `settings`: Player preferences the simulation consults
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{TuningError, TuningResult};
pub use settings::Settings;
pub use tuning::{CatalogTier, LevelConfig, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz, the target motion cadence)
    pub const SIM_TICK_MS: u64 = 16;

    /// Round clock cadence
    pub const CLOCK_INTERVAL_MS: u64 = 1000;
    /// Target spawn cadence
    pub const TARGET_SPAWN_INTERVAL_MS: u64 = 1200;
    /// Powerup spawn cadence
    pub const POWERUP_SPAWN_INTERVAL_MS: u64 = 8000;
    /// Wind re-roll cadence (Windy fate only)
    pub const WIND_INTERVAL_MS: u64 = 500;
    /// Delay between round termination and the round-end report
    pub const ROUND_END_DELAY_MS: u64 = 500;

    /// Targets spawn this far from the arena edges
    pub const TARGET_SPAWN_PADDING: f32 = 80.0;
    /// Targets reflect off walls inset by this much
    pub const TARGET_MOTION_PADDING: f32 = 40.0;
    /// Powerups spawn this far from the arena edges
    pub const POWERUP_SPAWN_PADDING: f32 = 100.0;

    /// Most recent live targets kept on screen
    pub const MAX_LIVE_TARGETS: usize = 8;
    /// Most recent powerups kept on screen
    pub const MAX_VISIBLE_POWERUPS: usize = 3;

    /// Base target speed (pixels per motion tick)
    pub const TARGET_BASE_SPEED: f32 = 2.0;
    /// Pattern phase advance per motion tick
    pub const PATTERN_PHASE_STEP: f32 = 0.05;
    /// Per-tick chance that a moving target stops for a moment
    pub const TARGET_PAUSE_CHANCE: f64 = 0.01;

    /// Dart launch speed (pixels per projectile tick)
    pub const PROJECTILE_SPEED: f32 = 200.0;
    /// Launch point is this far above the bottom edge, horizontally centered
    pub const LAUNCH_OFFSET_FROM_BOTTOM: f32 = 50.0;
    /// Added to a target's radius when testing for a hit
    pub const HIT_BUFFER: f32 = 15.0;
    /// Shorter than this, a fire input has no usable direction
    pub const MIN_AIM_DISTANCE: f32 = 0.001;

    /// Aim assist snap radius (pixels)
    pub const AIM_ASSIST_RADIUS: f32 = 60.0;

    /// Hazard penalties
    pub const HAZARD_DART_PENALTY: u32 = 2;
    pub const HAZARD_SCORE_PENALTY: u32 = 50;

    /// Boss round score requirement
    pub const BOSS_SCORE_THRESHOLD: u32 = 2000;
    /// Chance per spawn tick that a boss round spawns the boss archetype
    pub const BOSS_SPAWN_CHANCE: f64 = 0.15;
}

/// Unit direction from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction_between(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let distance = delta.length();
    if distance < consts::MIN_AIM_DISTANCE {
        return None;
    }
    Some(delta / distance)
}

/// Round a fractional score to whole points (ties away from zero)
#[inline]
pub fn round_points(value: f32) -> u32 {
    value.round().max(0.0) as u32
}
