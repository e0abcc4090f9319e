//! Round state and core simulation types
//!
//! Everything one round reads or writes lives in [`Round`]. Every periodic
//! system takes it by `&mut`; there is no global state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{ActiveEffectSet, EffectKind, Expiry, FateEffect};
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::{LevelConfig, Tuning};

/// Playable surface in host pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Where darts leave from: bottom center
    pub fn launch_origin(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - LAUNCH_OFFSET_FROM_BOTTOM)
    }

    /// Inside the full surface (edges included)
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }

    /// Lower and upper corners of the area inset by `padding`.
    /// Collapses to the center line when the surface is narrower than the padding.
    pub fn inset(&self, padding: f32) -> (Vec2, Vec2) {
        let min = Vec2::new(
            padding.min(self.width / 2.0),
            padding.min(self.height / 2.0),
        );
        let max = Vec2::new(
            (self.width - padding).max(self.width / 2.0),
            (self.height - padding).max(self.height / 2.0),
        );
        (min, max)
    }

    pub fn clamp_inset(&self, pos: Vec2, padding: f32) -> Vec2 {
        let (min, max) = self.inset(padding);
        pos.clamp(min, max)
    }

    /// Uniform random point in the inset area
    pub fn random_point(&self, rng: &mut Pcg32, padding: f32) -> Vec2 {
        use rand::Rng;
        let (min, max) = self.inset(padding);
        Vec2::new(
            min.x + rng.random::<f32>() * (max.x - min.x),
            min.y + rng.random::<f32>() * (max.y - min.y),
        )
    }
}

/// Which catalog entry a target came from (display key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    MilkTea,
    Balloon,
    StinkyTofu,
    LuckyCat,
    Splitter,
    Trap,
    Dumpling,
    Firefly,
    SnowGlobe,
    Clover,
    GoldCoin,
    FortuneLantern,
}

/// Motion pattern layered on top of straight-line travel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum MotionPattern {
    #[default]
    Linear,
    /// Horizontal sinusoidal sway
    Zigzag { amplitude: f32, frequency: f32 },
    /// Small orbit around the travel line
    Spiral { radius: f32, angular_speed: f32 },
    /// Vertical sinusoidal bob
    Wavy { amplitude: f32, frequency: f32 },
}

/// Collision behavior of a target
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum TargetKind {
    #[default]
    Standard,
    /// Costs darts and score, never scores
    Hazard,
    /// Survives until it has absorbed `requires_hits` hits
    Shield { requires_hits: u8, hits_absorbed: u8 },
    /// Ignores a hit with probability `dodge_chance`
    Evasive { dodge_chance: f32 },
    /// Freezes every target when destroyed
    AreaDebuff,
    /// Grants lucky aim when destroyed
    AreaBuff,
    /// Adds a flat bonus outside the multiplier chain
    InstantBonus { bonus: u32 },
    /// Breaks into two small standard targets
    Splitter,
}

/// A live target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub archetype: Archetype,
    pub kind: TargetKind,
    /// Base points (negative for hazards)
    pub points: i32,
    pub radius: f32,
    pub pos: Vec2,
    /// Per-axis travel direction, each component in roughly [-1.5, 1.5]
    pub dir: Vec2,
    pub pattern: MotionPattern,
    /// Advances by a fixed step every motion tick the target moves
    pub phase: f32,
    /// Round time (ms) the current pause began
    #[serde(default)]
    pub paused_at: Option<u64>,
}

impl Target {
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn is_hazard(&self) -> bool {
        matches!(self.kind, TargetKind::Hazard)
    }

    /// Hit test against a dart position
    pub fn is_hit_by(&self, point: Vec2, buffer: f32) -> bool {
        self.pos.distance(point) < self.radius + buffer
    }
}

/// A dart in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub origin: Vec2,
    pub aim: Vec2,
    pub pos: Vec2,
    /// Per-tick displacement (constant)
    pub vel: Vec2,
    pub traveled: f32,
    /// Origin-to-aim distance
    pub budget: f32,
}

impl Projectile {
    pub fn remaining(&self) -> f32 {
        (self.budget - self.traveled).max(0.0)
    }

    pub fn is_spent(&self) -> bool {
        self.traveled >= self.budget
    }
}

/// Collectible powerup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    ExtraDarts,
    FreezeTime,
    ScoreBoost,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [
        PowerupKind::ExtraDarts,
        PowerupKind::FreezeTime,
        PowerupKind::ScoreBoost,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PowerupKind::ExtraDarts => "Extra Darts",
            PowerupKind::FreezeTime => "Freeze Time",
            PowerupKind::ScoreBoost => "Score Boost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerupKind::ExtraDarts => "+5 Darts",
            PowerupKind::FreezeTime => "5s Freeze",
            PowerupKind::ScoreBoost => "2x for 10s",
        }
    }

    /// Display color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            PowerupKind::ExtraDarts => 0x3b82f6,
            PowerupKind::FreezeTime => 0x06b6d4,
            PowerupKind::ScoreBoost => 0xf59e0b,
        }
    }

    /// The timed effect this powerup registers, if any
    pub fn timed_effect(&self) -> Option<EffectKind> {
        match self {
            PowerupKind::ExtraDarts => None,
            PowerupKind::FreezeTime => Some(EffectKind::Frozen),
            PowerupKind::ScoreBoost => Some(EffectKind::ScoreBoost),
        }
    }
}

/// A powerup sitting in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
}

/// A collected powerup waiting to be activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub inventory_id: u32,
    pub kind: PowerupKind,
}

/// Why a round stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TimeUp,
    OutOfDarts,
}

/// Darts, clock and score for the current round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub darts: u32,
    /// Whole seconds left on the round clock
    pub time_left: u32,
    pub score: u32,
    /// Present on boss rounds
    pub boss_threshold: Option<u32>,
    terminal: bool,
    pub end_reason: Option<EndReason>,
}

impl RoundState {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            darts: config.darts,
            time_left: config.time_secs,
            score: 0,
            boss_threshold: config.boss_threshold,
            terminal: false,
            end_reason: None,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.boss_threshold.is_some()
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// One-shot: returns true only for the call that ends the round
    pub fn mark_terminal(&mut self, reason: EndReason) -> bool {
        if self.terminal {
            return false;
        }
        self.terminal = true;
        self.end_reason = Some(reason);
        true
    }

    /// Non-boss rounds always clear; boss rounds need the threshold
    pub fn cleared(&self) -> bool {
        match self.boss_threshold {
            None => true,
            Some(threshold) => self.score >= threshold,
        }
    }

    /// Remove darts and points, never below zero
    pub fn apply_penalty(&mut self, darts: u32, points: u32) {
        self.darts = self.darts.saturating_sub(darts);
        self.score = self.score.saturating_sub(points);
    }

    pub fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Timers running, input accepted
    Playing,
    /// Terminal; waiting out the end delay before reporting
    Settling { remaining_ms: u64 },
    /// Outcome reported
    Ended,
    /// Host view went away before the round finished
    TornDown,
}

/// Final report for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub score: u32,
    pub cleared: bool,
    pub reason: EndReason,
}

/// Presentation hooks produced during a tick (sounds, particles, popups)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    TargetSpawned { id: u32, archetype: Archetype },
    DartFired { projectile_id: u32 },
    /// Target destroyed and scored
    TargetHit { id: u32, points: u32, pos: Vec2 },
    /// Several targets destroyed by one dart
    Combo { count: usize, pos: Vec2 },
    ShieldAbsorbed { id: u32, hits_absorbed: u8, requires_hits: u8 },
    Dodged { id: u32 },
    HazardHit { id: u32, darts_lost: u32, points_lost: u32 },
    TargetSplit { id: u32, children: [u32; 2] },
    /// Rubber darts: contact without effect
    Bounce { projectile_id: u32, pos: Vec2 },
    Miss { projectile_id: u32, aim: Vec2 },
    PowerupSpawned { id: u32, kind: PowerupKind },
    PowerupCollected { id: u32, inventory_id: u32, kind: PowerupKind },
    PowerupActivated { inventory_id: u32, kind: PowerupKind },
    EffectStarted { kind: EffectKind },
    EffectExpired { kind: EffectKind },
    ClockTick { time_left: u32 },
    RoundTerminal { reason: EndReason },
    RoundEnded { score: u32, cleared: bool },
}

/// Current aim indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimIndicator {
    pub pointer: Vec2,
    /// Aim point after aim assist
    pub point: Vec2,
    pub snap_target: Option<u32>,
}

/// Fixed-period timer driven by elapsed milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    pub interval_ms: u64,
    accum_ms: u64,
}

impl Cadence {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            accum_ms: 0,
        }
    }

    /// First `advance` fires immediately
    pub fn primed(interval_ms: u64) -> Self {
        let mut cadence = Self::new(interval_ms);
        cadence.accum_ms = cadence.interval_ms;
        cadence
    }

    /// Add elapsed time; returns how many periods completed
    pub fn advance(&mut self, dt_ms: u64) -> u32 {
        self.accum_ms = self.accum_ms.saturating_add(dt_ms);
        let fired = self.accum_ms / self.interval_ms;
        self.accum_ms %= self.interval_ms;
        fired as u32
    }
}

/// The five round timers, plus wind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timers {
    pub clock: Cadence,
    pub target_spawn: Cadence,
    pub powerup_spawn: Cadence,
    pub motion: Cadence,
    pub projectile: Cadence,
    pub wind: Cadence,
}

impl Timers {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            clock: Cadence::new(CLOCK_INTERVAL_MS),
            target_spawn: Cadence::primed(tuning.target_spawn_interval_ms),
            powerup_spawn: Cadence::new(tuning.powerup_spawn_interval_ms),
            motion: Cadence::new(SIM_TICK_MS),
            projectile: Cadence::new(SIM_TICK_MS),
            wind: Cadence::primed(WIND_INTERVAL_MS),
        }
    }
}

/// One round: configuration, RNG, entities, and round state
#[derive(Debug, Clone)]
pub struct Round {
    pub level: u32,
    pub level_config: LevelConfig,
    pub tuning: Tuning,
    pub settings: Settings,
    pub seed: u64,
    pub rng: Pcg32,
    /// Host surface; systems that need bounds skip their work while it is missing
    pub arena: Option<Arena>,
    /// Round time in milliseconds since start
    pub now_ms: u64,
    pub phase: GamePhase,
    pub state: RoundState,
    /// Live targets (sorted by id)
    pub targets: Vec<Target>,
    /// Darts in flight (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Powerups in the arena (sorted by id)
    pub powerups: Vec<Powerup>,
    /// Collected powerups in pickup order
    pub inventory: Vec<InventoryItem>,
    pub effects: ActiveEffectSet,
    pub aim: Option<AimIndicator>,
    /// Current wind drift added to fired aim points (Windy fate)
    pub wind: Vec2,
    pub timers: Timers,
    pub outcome: Option<RoundOutcome>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl Round {
    /// Start a round for `level` under `fate`, with a seeded RNG
    pub fn start(level: u32, fate: FateEffect, seed: u64) -> Self {
        Self::with_config(level, fate, seed, Tuning::default(), Settings::default())
    }

    /// Start a round with a random seed
    pub fn start_unseeded(level: u32, fate: FateEffect) -> Self {
        Self::start(level, fate, rand::random())
    }

    pub fn with_config(
        level: u32,
        fate: FateEffect,
        seed: u64,
        tuning: Tuning,
        settings: Settings,
    ) -> Self {
        let level_config = tuning.level(level);
        let timers = Timers::new(&tuning);
        log::info!(
            "Round start: level={} fate={:?} darts={} time={}s boss_threshold={:?} seed={}",
            level,
            fate,
            level_config.darts,
            level_config.time_secs,
            level_config.boss_threshold,
            seed
        );

        Self {
            level,
            level_config,
            tuning,
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena: None,
            now_ms: 0,
            phase: GamePhase::Playing,
            state: RoundState::new(&level_config),
            targets: Vec::new(),
            projectiles: Vec::new(),
            powerups: Vec::new(),
            inventory: Vec::new(),
            effects: ActiveEffectSet::with_fate(fate),
            aim: None,
            wind: Vec2::ZERO,
            timers,
            outcome: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Attach (or resize) the host surface
    pub fn set_arena(&mut self, arena: Arena) {
        self.arena = Some(arena);
    }

    pub fn fate(&self) -> Option<FateEffect> {
        self.effects.fate()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Register a timed buff starting now and announce it
    pub fn start_effect(&mut self, kind: EffectKind, duration_ms: u64) {
        self.effects.activate_for(kind, self.now_ms, duration_ms);
        self.push_event(GameEvent::EffectStarted { kind });
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn target(&self, id: u32) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Keep entity lists sorted by id for stable iteration
    pub fn normalize_order(&mut self) {
        self.targets.sort_by_key(|t| t.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.powerups.sort_by_key(|p| p.id);
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            level: self.level,
            fate: self.fate(),
            phase: self.phase,
            darts: self.state.darts,
            time_left: self.state.time_left,
            score: self.state.score,
            boss_threshold: self.state.boss_threshold,
            targets: self.targets.clone(),
            projectiles: self.projectiles.clone(),
            powerups: self.powerups.clone(),
            inventory: self.inventory.clone(),
            effects: self
                .effects
                .iter()
                .map(|(kind, expiry)| ActiveEffectView {
                    kind,
                    expires_at_ms: match expiry {
                        Expiry::Indefinite => None,
                        Expiry::At(t) => Some(t),
                    },
                })
                .collect(),
            aim: self.aim,
            wind: self.wind,
        }
    }
}

/// One entry of the active effect set, flattened for serialization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffectView {
    pub kind: EffectKind,
    /// `None` for the round-scoped fate effect
    pub expires_at_ms: Option<u64>,
}

/// Everything the presentation layer draws
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub level: u32,
    pub fate: Option<FateEffect>,
    pub phase: GamePhase,
    pub darts: u32,
    pub time_left: u32,
    pub score: u32,
    pub boss_threshold: Option<u32>,
    pub targets: Vec<Target>,
    pub projectiles: Vec<Projectile>,
    pub powerups: Vec<Powerup>,
    pub inventory: Vec<InventoryItem>,
    pub effects: Vec<ActiveEffectView>,
    pub aim: Option<AimIndicator>,
    pub wind: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_clamps_at_zero() {
        let mut state = RoundState::new(&LevelConfig::default());
        state.darts = 1;
        state.score = 20;
        state.apply_penalty(2, 50);
        assert_eq!(state.darts, 0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_terminal_is_one_shot() {
        let mut state = RoundState::new(&LevelConfig::default());
        assert!(state.mark_terminal(EndReason::TimeUp));
        assert!(!state.mark_terminal(EndReason::OutOfDarts));
        assert_eq!(state.end_reason, Some(EndReason::TimeUp));
    }

    #[test]
    fn test_boss_clear_threshold() {
        let config = LevelConfig {
            boss_threshold: Some(2000),
            ..LevelConfig::default()
        };
        let mut state = RoundState::new(&config);
        state.score = 1999;
        assert!(!state.cleared());
        state.score = 2000;
        assert!(state.cleared());

        let normal = RoundState::new(&LevelConfig::default());
        assert!(normal.cleared());
    }

    #[test]
    fn test_cadence_handles_uneven_periods() {
        let mut clock = Cadence::new(1000);
        let fired: u32 = (0..125).map(|_| clock.advance(SIM_TICK_MS)).sum();
        // 125 * 16ms = 2000ms
        assert_eq!(fired, 2);

        let mut primed = Cadence::primed(1200);
        assert_eq!(primed.advance(SIM_TICK_MS), 1);
        assert_eq!(primed.advance(SIM_TICK_MS), 0);
    }

    #[test]
    fn test_cadence_survives_huge_interval() {
        let mut primed = Cadence::primed(u64::MAX);
        assert_eq!(primed.advance(SIM_TICK_MS), 1);
        assert_eq!(primed.advance(SIM_TICK_MS), 0);

        let tuning = Tuning {
            target_spawn_interval_ms: u64::MAX,
            ..Tuning::default()
        };
        let mut timers = Timers::new(&tuning);
        assert_eq!(timers.target_spawn.advance(SIM_TICK_MS), 1);
    }

    #[test]
    fn test_arena_inset_and_origin() {
        let arena = Arena::new(800.0, 600.0);
        assert_eq!(arena.launch_origin(), Vec2::new(400.0, 550.0));
        let (min, max) = arena.inset(40.0);
        assert_eq!(min, Vec2::new(40.0, 40.0));
        assert_eq!(max, Vec2::new(760.0, 560.0));
        assert!(arena.contains(Vec2::new(0.0, 600.0)));
        assert!(!arena.contains(Vec2::new(-1.0, 10.0)));
    }

    #[test]
    fn test_round_start_budgets() {
        let round = Round::start(1, FateEffect::X2, 1);
        assert_eq!(round.state.darts, 15);
        assert_eq!(round.state.time_left, 30);
        assert!(!round.state.is_boss());
        assert_eq!(round.fate(), Some(FateEffect::X2));

        let boss = Round::start(5, FateEffect::X2, 1);
        assert_eq!(boss.state.darts, 20);
        assert_eq!(boss.state.time_left, 60);
        assert_eq!(boss.state.boss_threshold, Some(2000));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut round = Round::start(1, FateEffect::Windy, 3);
        round.set_arena(Arena::new(800.0, 600.0));
        let json = serde_json::to_string(&round.snapshot()).unwrap();
        assert!(json.contains("\"darts\":15"));
        assert!(json.contains("Windy"));
    }

    #[test]
    fn test_unseeded_start_matches_level() {
        let round = Round::start_unseeded(2, FateEffect::Slow);
        assert_eq!(round.level, 2);
        assert_eq!(round.state.darts, 15);
        assert_eq!(round.fate(), Some(FateEffect::Slow));
        assert!(round.is_playing());
    }

    #[test]
    fn test_powerup_display_metadata() {
        assert_eq!(PowerupKind::ExtraDarts.label(), "+5 Darts");
        assert_eq!(PowerupKind::FreezeTime.label(), "5s Freeze");
        assert_eq!(PowerupKind::ScoreBoost.label(), "2x for 10s");
        let colors: Vec<u32> = PowerupKind::ALL.iter().map(|k| k.color()).collect();
        assert_eq!(colors, vec![0x3b82f6, 0x06b6d4, 0xf59e0b]);
        assert_eq!(PowerupKind::ExtraDarts.timed_effect(), None);
    }
}
