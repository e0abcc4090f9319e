//! Fate effects, timed buffs, and the modifiers they compose into
//!
//! Every round carries exactly one fate effect for its whole duration. Timed
//! buffs (from powerups or area targets) sit next to it in the
//! [`ActiveEffectSet`] with an explicit expiry timestamp, so round teardown is
//! a single `clear()`.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Round-scoped modifier chosen by the wheel before the round starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FateEffect {
    /// Score doubled
    X2,
    /// Score tripled
    X3,
    /// Fired darts drift by a re-rolled wind offset
    Windy,
    /// Hits score 1.5x
    Lucky,
    /// Targets move 1.5x faster
    Chaos,
    /// Targets move at half speed
    Slow,
    /// Hits never score and never remove targets
    Rubber,
    /// Targets pause for shorter stretches
    Stinky,
}

impl FateEffect {
    /// Wheel segments, in wheel order
    pub const ALL: [FateEffect; 8] = [
        FateEffect::X2,
        FateEffect::X3,
        FateEffect::Windy,
        FateEffect::Lucky,
        FateEffect::Chaos,
        FateEffect::Slow,
        FateEffect::Rubber,
        FateEffect::Stinky,
    ];

    /// Spin the wheel: every segment is equally likely
    pub fn spin<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FateEffect::X2 => "x2 Multiplier",
            FateEffect::X3 => "x3 Multiplier",
            FateEffect::Windy => "Windy Aim",
            FateEffect::Lucky => "Lucky Aim",
            FateEffect::Chaos => "Chaos Speed",
            FateEffect::Slow => "Slow Motion",
            FateEffect::Rubber => "Rubber Darts",
            FateEffect::Stinky => "Stinky Curse",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FateEffect::X2 => "Score is doubled this round",
            FateEffect::X3 => "Score is tripled this round",
            FateEffect::Windy => "Darts drift sideways slightly",
            FateEffect::Lucky => "Increased accuracy",
            FateEffect::Chaos => "Targets move faster",
            FateEffect::Slow => "Targets move slower",
            FateEffect::Rubber => "Hits do not score",
            FateEffect::Stinky => "Targets pause less frequently",
        }
    }
}

/// Anything that can sit in the active effect set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Fate(FateEffect),
    /// Targets stop moving (freeze powerup or snow globe target)
    Frozen,
    /// Score x2 (score boost powerup)
    ScoreBoost,
    /// Lucky aim bonus (clover target)
    LuckyAim,
}

/// When an active effect ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expiry {
    /// Round-scoped; removed only when the round is cleared
    Indefinite,
    /// Removed on the first tick at or after this round time (ms)
    At(u64),
}

/// Effect kind to expiry, iterated in a stable order
#[derive(Debug, Clone, Default)]
pub struct ActiveEffectSet {
    entries: BTreeMap<EffectKind, Expiry>,
}

impl ActiveEffectSet {
    /// A set holding only the round's fate effect
    pub fn with_fate(fate: FateEffect) -> Self {
        let mut set = Self::default();
        set.entries.insert(EffectKind::Fate(fate), Expiry::Indefinite);
        set
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn expiry(&self, kind: EffectKind) -> Option<Expiry> {
        self.entries.get(&kind).copied()
    }

    /// Register a timed buff; re-activating keeps the later expiry
    pub fn activate_for(&mut self, kind: EffectKind, now_ms: u64, duration_ms: u64) {
        let until = now_ms + duration_ms;
        let entry = self.entries.entry(kind).or_insert(Expiry::At(until));
        if let Expiry::At(current) = entry {
            *current = (*current).max(until);
        }
    }

    /// Drop every timed entry whose expiry has passed, returning what ended
    pub fn expire(&mut self, now_ms: u64) -> Vec<EffectKind> {
        let expired: Vec<EffectKind> = self
            .entries
            .iter()
            .filter(|(_, expiry)| matches!(expiry, Expiry::At(t) if *t <= now_ms))
            .map(|(kind, _)| *kind)
            .collect();
        for kind in &expired {
            self.entries.remove(kind);
        }
        expired
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn fate(&self) -> Option<FateEffect> {
        self.entries.keys().find_map(|kind| match kind {
            EffectKind::Fate(fate) => Some(*fate),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, Expiry)> + '_ {
        self.entries.iter().map(|(kind, expiry)| (*kind, *expiry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lucky aim bonus, whichever source grants it
pub const LUCKY_BONUS: f32 = 1.5;

/// Values the motion and collision systems consult each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifiers {
    /// Scales target base speed (0 while frozen)
    pub speed_multiplier: f32,
    /// Multiplicative product of every score source
    pub score_multiplier: f32,
    pub lucky_bonus: f32,
    /// How long a randomly paused target stays put
    pub pause_ms: u64,
    /// Rubber darts: hits are acknowledged but never resolved
    pub scoring_disabled: bool,
    pub frozen: bool,
    pub windy: bool,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            score_multiplier: 1.0,
            lucky_bonus: 1.0,
            pause_ms: 800,
            scoring_disabled: false,
            frozen: false,
            windy: false,
        }
    }
}

impl Modifiers {
    /// Fold the fate effect and every active buff into one modifier set
    pub fn compose(effects: &ActiveEffectSet, tuning: &Tuning) -> Self {
        let mut mods = Modifiers {
            pause_ms: tuning.pause_ms,
            ..Default::default()
        };
        let mut lucky = false;

        for (kind, _) in effects.iter() {
            match kind {
                EffectKind::Fate(FateEffect::X2) => mods.score_multiplier *= 2.0,
                EffectKind::Fate(FateEffect::X3) => mods.score_multiplier *= 3.0,
                EffectKind::Fate(FateEffect::Windy) => mods.windy = true,
                EffectKind::Fate(FateEffect::Lucky) => lucky = true,
                EffectKind::Fate(FateEffect::Chaos) => mods.speed_multiplier *= 1.5,
                EffectKind::Fate(FateEffect::Slow) => mods.speed_multiplier *= 0.5,
                EffectKind::Fate(FateEffect::Rubber) => mods.scoring_disabled = true,
                EffectKind::Fate(FateEffect::Stinky) => mods.pause_ms = tuning.stinky_pause_ms,
                EffectKind::Frozen => mods.frozen = true,
                EffectKind::ScoreBoost => mods.score_multiplier *= 2.0,
                EffectKind::LuckyAim => lucky = true,
            }
        }

        // Fate and clover grant the same bonus; they do not stack
        if lucky {
            mods.lucky_bonus = LUCKY_BONUS;
        }
        if mods.frozen {
            mods.speed_multiplier = 0.0;
        }
        mods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_fate_only_modifiers() {
        let tuning = Tuning::default();

        let mods = Modifiers::compose(&ActiveEffectSet::with_fate(FateEffect::Chaos), &tuning);
        assert_eq!(mods.speed_multiplier, 1.5);
        assert_eq!(mods.score_multiplier, 1.0);

        let mods = Modifiers::compose(&ActiveEffectSet::with_fate(FateEffect::Slow), &tuning);
        assert_eq!(mods.speed_multiplier, 0.5);

        let mods = Modifiers::compose(&ActiveEffectSet::with_fate(FateEffect::Stinky), &tuning);
        assert_eq!(mods.pause_ms, 200);

        let mods = Modifiers::compose(&ActiveEffectSet::with_fate(FateEffect::Rubber), &tuning);
        assert!(mods.scoring_disabled);
    }

    #[test]
    fn test_score_multipliers_compose() {
        let tuning = Tuning::default();
        let mut effects = ActiveEffectSet::with_fate(FateEffect::X3);
        effects.activate_for(EffectKind::ScoreBoost, 0, 10_000);

        let mods = Modifiers::compose(&effects, &tuning);
        assert_eq!(mods.score_multiplier, 6.0);
    }

    #[test]
    fn test_lucky_sources_do_not_stack() {
        let tuning = Tuning::default();
        let mut effects = ActiveEffectSet::with_fate(FateEffect::Lucky);
        effects.activate_for(EffectKind::LuckyAim, 0, 8000);

        let mods = Modifiers::compose(&effects, &tuning);
        assert_eq!(mods.lucky_bonus, LUCKY_BONUS);
    }

    #[test]
    fn test_freeze_overrides_speed() {
        let tuning = Tuning::default();
        let mut effects = ActiveEffectSet::with_fate(FateEffect::Chaos);
        effects.activate_for(EffectKind::Frozen, 100, 5000);

        let mods = Modifiers::compose(&effects, &tuning);
        assert!(mods.frozen);
        assert_eq!(mods.speed_multiplier, 0.0);
    }

    #[test]
    fn test_expiry_keeps_fate() {
        let mut effects = ActiveEffectSet::with_fate(FateEffect::X2);
        effects.activate_for(EffectKind::Frozen, 0, 5000);

        assert!(effects.expire(4999).is_empty());
        assert_eq!(effects.expire(5000), vec![EffectKind::Frozen]);
        assert!(!effects.is_active(EffectKind::Frozen));
        assert_eq!(effects.fate(), Some(FateEffect::X2));
    }

    #[test]
    fn test_reactivation_extends() {
        let mut effects = ActiveEffectSet::default();
        effects.activate_for(EffectKind::Frozen, 0, 5000);
        effects.activate_for(EffectKind::Frozen, 3000, 5000);
        assert_eq!(effects.expiry(EffectKind::Frozen), Some(Expiry::At(8000)));

        // An earlier expiry never shortens the buff
        effects.activate_for(EffectKind::Frozen, 0, 1000);
        assert_eq!(effects.expiry(EffectKind::Frozen), Some(Expiry::At(8000)));
    }

    #[test]
    fn test_spin_covers_wheel() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..500 {
            seen.insert(FateEffect::spin(&mut rng));
        }
        assert_eq!(seen.len(), FateEffect::ALL.len());
    }
}
