//! Target catalog: archetype table and weighted selection
//!
//! Weights need not sum to one; selection normalizes them.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Archetype, MotionPattern, Target, TargetKind};
use crate::tuning::CatalogTier;

/// How early in the campaign an archetype may appear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rarity {
    /// Available from level 1
    Common,
    /// Rare and hazard archetypes, gated behind later tiers
    Rare,
}

/// One row of the catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    pub archetype: Archetype,
    pub kind: TargetKind,
    pub points: i32,
    /// Diameter in pixels
    pub size: f32,
    /// Relative spawn weight
    pub weight: f32,
    pub rarity: Rarity,
    pub pattern: MotionPattern,
}

impl CatalogEntry {
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Build a live target from this entry
    pub fn instantiate(&self, id: u32, pos: Vec2, dir: Vec2) -> Target {
        Target {
            id,
            archetype: self.archetype,
            kind: self.kind,
            points: self.points,
            radius: self.radius(),
            pos,
            dir,
            pattern: self.pattern,
            phase: 0.0,
            paused_at: None,
        }
    }
}

const ZIGZAG: MotionPattern = MotionPattern::Zigzag {
    amplitude: 15.0,
    frequency: 3.0,
};
const SPIRAL: MotionPattern = MotionPattern::Spiral {
    radius: 3.0,
    angular_speed: 2.0,
};
const WAVY: MotionPattern = MotionPattern::Wavy {
    amplitude: 10.0,
    frequency: 2.0,
};

/// Every archetype that can spawn on a regular spawn tick
pub static CATALOG: [CatalogEntry; 11] = [
    CatalogEntry {
        archetype: Archetype::MilkTea,
        kind: TargetKind::Standard,
        points: 100,
        size: 60.0,
        weight: 0.25,
        rarity: Rarity::Common,
        pattern: MotionPattern::Linear,
    },
    CatalogEntry {
        archetype: Archetype::Balloon,
        kind: TargetKind::Standard,
        points: 50,
        size: 70.0,
        weight: 0.25,
        rarity: Rarity::Common,
        pattern: MotionPattern::Linear,
    },
    CatalogEntry {
        archetype: Archetype::StinkyTofu,
        kind: TargetKind::Standard,
        points: 150,
        size: 65.0,
        weight: 0.15,
        rarity: Rarity::Rare,
        pattern: ZIGZAG,
    },
    CatalogEntry {
        archetype: Archetype::LuckyCat,
        kind: TargetKind::Standard,
        points: 300,
        size: 65.0,
        weight: 0.08,
        rarity: Rarity::Rare,
        pattern: MotionPattern::Linear,
    },
    CatalogEntry {
        archetype: Archetype::Splitter,
        kind: TargetKind::Splitter,
        points: 200,
        size: 70.0,
        weight: 0.12,
        rarity: Rarity::Rare,
        pattern: SPIRAL,
    },
    CatalogEntry {
        archetype: Archetype::Trap,
        kind: TargetKind::Hazard,
        points: -100,
        size: 60.0,
        weight: 0.15,
        rarity: Rarity::Rare,
        pattern: MotionPattern::Linear,
    },
    CatalogEntry {
        archetype: Archetype::Dumpling,
        kind: TargetKind::Shield {
            requires_hits: 2,
            hits_absorbed: 0,
        },
        points: 250,
        size: 75.0,
        weight: 0.10,
        rarity: Rarity::Rare,
        pattern: MotionPattern::Linear,
    },
    CatalogEntry {
        archetype: Archetype::Firefly,
        kind: TargetKind::Evasive { dodge_chance: 0.35 },
        points: 180,
        size: 50.0,
        weight: 0.08,
        rarity: Rarity::Rare,
        pattern: WAVY,
    },
    CatalogEntry {
        archetype: Archetype::SnowGlobe,
        kind: TargetKind::AreaDebuff,
        points: 120,
        size: 60.0,
        weight: 0.05,
        rarity: Rarity::Rare,
        pattern: MotionPattern::Linear,
    },
    CatalogEntry {
        archetype: Archetype::Clover,
        kind: TargetKind::AreaBuff,
        points: 120,
        size: 55.0,
        weight: 0.05,
        rarity: Rarity::Rare,
        pattern: WAVY,
    },
    CatalogEntry {
        archetype: Archetype::GoldCoin,
        kind: TargetKind::InstantBonus { bonus: 250 },
        points: 250,
        size: 45.0,
        weight: 0.04,
        rarity: Rarity::Rare,
        pattern: MotionPattern::Linear,
    },
];

/// Boss-round only
pub static BOSS_ENTRY: CatalogEntry = CatalogEntry {
    archetype: Archetype::FortuneLantern,
    kind: TargetKind::Standard,
    points: 500,
    size: 100.0,
    weight: 0.0,
    rarity: Rarity::Rare,
    pattern: MotionPattern::Linear,
};

/// Splitter fragments (left, right)
pub static SPLIT_FRAGMENTS: [CatalogEntry; 2] = [
    CatalogEntry {
        archetype: Archetype::MilkTea,
        kind: TargetKind::Standard,
        points: 50,
        size: 40.0,
        weight: 0.0,
        rarity: Rarity::Common,
        pattern: MotionPattern::Linear,
    },
    CatalogEntry {
        archetype: Archetype::Balloon,
        kind: TargetKind::Standard,
        points: 50,
        size: 40.0,
        weight: 0.0,
        rarity: Rarity::Common,
        pattern: MotionPattern::Linear,
    },
];

pub fn entry_for(archetype: Archetype) -> Option<&'static CatalogEntry> {
    if archetype == Archetype::FortuneLantern {
        return Some(&BOSS_ENTRY);
    }
    CATALOG.iter().find(|e| e.archetype == archetype)
}

fn common_entries() -> Vec<&'static CatalogEntry> {
    CATALOG.iter().filter(|e| e.rarity == Rarity::Common).collect()
}

/// Entries eligible for one spawn tick under `tier`
pub fn eligible_entries(tier: CatalogTier, rng: &mut Pcg32) -> Vec<&'static CatalogEntry> {
    match tier {
        CatalogTier::Basic => common_entries(),
        CatalogTier::Mixed { full_chance } => {
            if rng.random_bool(full_chance.clamp(0.0, 1.0)) {
                CATALOG.iter().collect()
            } else {
                common_entries()
            }
        }
        CatalogTier::Full => CATALOG.iter().collect(),
    }
}

/// Cumulative-probability sampling over normalized weights.
///
/// Returns the first entry whose cumulative weight reaches `roll` (in `[0, 1)`).
/// Float rounding can leave the last cumulative value just under the roll, in
/// which case the first entry is used.
pub fn weighted_pick<'a>(entries: &[&'a CatalogEntry], roll: f32) -> Option<&'a CatalogEntry> {
    let total: f32 = entries.iter().map(|e| e.weight.max(0.0)).sum();
    if total <= 0.0 {
        return entries.first().copied();
    }

    let mut cumulative = 0.0;
    for entry in entries {
        cumulative += entry.weight.max(0.0) / total;
        if roll <= cumulative {
            return Some(*entry);
        }
    }
    entries.first().copied()
}

/// Pick the archetype for one spawn tick
pub fn choose_entry(
    tier: CatalogTier,
    boss_round: bool,
    boss_chance: f64,
    rng: &mut Pcg32,
) -> &'static CatalogEntry {
    if boss_round && rng.random_bool(boss_chance.clamp(0.0, 1.0)) {
        return &BOSS_ENTRY;
    }

    let entries = eligible_entries(tier, rng);
    let roll = rng.random::<f32>();
    weighted_pick(&entries, roll).unwrap_or(&CATALOG[0])
}
