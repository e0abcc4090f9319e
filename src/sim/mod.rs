//! Deterministic round simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod collision;
pub mod effects;
pub mod motion;
pub mod projectile;
pub mod spawner;
pub mod state;
pub mod tick;

pub use catalog::{CATALOG, CatalogEntry, Rarity, choose_entry, weighted_pick};
pub use collision::{HitOutcome, ShotReport, resolve_hits, targets_hit};
pub use effects::{ActiveEffectSet, EffectKind, Expiry, FateEffect, Modifiers};
pub use state::{
    AimIndicator, Archetype, Arena, EndReason, GameEvent, GamePhase, InventoryItem,
    MotionPattern, Powerup, PowerupKind, Projectile, Round, RoundOutcome, RoundSnapshot,
    RoundState, Target, TargetKind,
};
pub use tick::{TickInput, tick};
