//! Fixed timestep round tick
//!
//! The round controller: runs every cadence in a fixed order, decides
//! termination, and reports the outcome once the end delay has passed.

use glam::Vec2;

use super::effects::Modifiers;
use super::motion::advance_targets;
use super::projectile::{advance_projectiles, fire, update_aim, update_wind};
use super::spawner::{activate_powerup, collect_powerup, spawn_powerup, spawn_target};
use super::state::{
    AimIndicator, EndReason, GameEvent, GamePhase, InventoryItem, Round, RoundOutcome,
};
use crate::consts::SIM_TICK_MS;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position for the aim indicator
    pub aim: Option<Vec2>,
    /// Fire a dart toward this pointer position
    pub fire: Option<Vec2>,
    /// Powerup ids picked up this tick
    pub collect: Vec<u32>,
    /// Inventory ids activated this tick
    pub activate: Vec<u32>,
}

/// Advance the round by one fixed timestep
pub fn tick(round: &mut Round, input: &TickInput) {
    match round.phase {
        GamePhase::Ended | GamePhase::TornDown => return,
        GamePhase::Settling { remaining_ms } => {
            round.now_ms += SIM_TICK_MS;
            settle(round, remaining_ms.saturating_sub(SIM_TICK_MS));
            return;
        }
        GamePhase::Playing => {}
    }

    round.now_ms += SIM_TICK_MS;

    // Player input lands before any timer runs
    if let Some(pointer) = input.aim {
        update_aim(round, pointer);
    }
    for &id in &input.collect {
        round.collect_powerup(id);
    }
    for &inventory_id in &input.activate {
        round.activate_powerup(inventory_id);
    }
    if let Some(pointer) = input.fire {
        fire(round, pointer);
    }

    for kind in round.effects.expire(round.now_ms) {
        log::debug!("Effect {:?} expired", kind);
        round.push_event(GameEvent::EffectExpired { kind });
    }
    let mods = Modifiers::compose(&round.effects, &round.tuning);

    for _ in 0..round.timers.wind.advance(SIM_TICK_MS) {
        update_wind(round, &mods);
    }
    for _ in 0..round.timers.target_spawn.advance(SIM_TICK_MS) {
        spawn_target(round);
    }
    for _ in 0..round.timers.powerup_spawn.advance(SIM_TICK_MS) {
        spawn_powerup(round);
    }
    for _ in 0..round.timers.motion.advance(SIM_TICK_MS) {
        advance_targets(round, &mods);
    }
    for _ in 0..round.timers.projectile.advance(SIM_TICK_MS) {
        // Hits can start effects, so each step sees the current set
        let mods = Modifiers::compose(&round.effects, &round.tuning);
        advance_projectiles(round, &mods);
    }

    for _ in 0..round.timers.clock.advance(SIM_TICK_MS) {
        if round.state.time_left > 0 {
            round.state.time_left -= 1;
            round.push_event(GameEvent::ClockTick {
                time_left: round.state.time_left,
            });
        }
        if round.state.time_left == 0 {
            end_round(round, EndReason::TimeUp);
            break;
        }
    }

    // Darts still in flight may yet score
    if round.is_playing() && round.state.darts == 0 && round.projectiles.is_empty() {
        end_round(round, EndReason::OutOfDarts);
    }

    round.normalize_order();
}

/// Mark the round terminal (once) and start the end delay
fn end_round(round: &mut Round, reason: EndReason) {
    if !round.state.mark_terminal(reason) {
        return;
    }

    round.targets.clear();
    round.projectiles.clear();
    round.powerups.clear();
    round.effects.clear();
    round.aim = None;
    round.outcome = Some(RoundOutcome {
        score: round.state.score,
        cleared: round.state.cleared(),
        reason,
    });

    log::info!(
        "Round terminal: {:?}, score={} darts={} time_left={}",
        reason,
        round.state.score,
        round.state.darts,
        round.state.time_left
    );
    round.push_event(GameEvent::RoundTerminal { reason });
    settle(round, round.tuning.round_end_delay_ms);
}

/// Count down the end delay; report the outcome when it runs out
fn settle(round: &mut Round, remaining_ms: u64) {
    if remaining_ms > 0 {
        round.phase = GamePhase::Settling { remaining_ms };
        return;
    }
    round.phase = GamePhase::Ended;
    if let Some(outcome) = round.outcome {
        log::info!(
            "Round ended: score={} cleared={}",
            outcome.score,
            outcome.cleared
        );
        round.push_event(GameEvent::RoundEnded {
            score: outcome.score,
            cleared: outcome.cleared,
        });
    }
}

impl Round {
    /// Continuous aim input
    pub fn aim(&mut self, pointer: Vec2) -> Option<AimIndicator> {
        update_aim(self, pointer)
    }

    /// Discrete fire input; the new projectile's id, if one was launched
    pub fn fire(&mut self, pointer: Vec2) -> Option<u32> {
        fire(self, pointer)
    }

    pub fn collect_powerup(&mut self, id: u32) -> Option<InventoryItem> {
        if !self.is_playing() {
            return None;
        }
        collect_powerup(self, id)
    }

    pub fn activate_powerup(&mut self, inventory_id: u32) -> bool {
        self.is_playing() && activate_powerup(self, inventory_id)
    }

    /// The reported outcome, once the end delay has elapsed
    pub fn round_end(&self) -> Option<RoundOutcome> {
        match self.phase {
            GamePhase::Ended => self.outcome,
            _ => None,
        }
    }

    /// Host view went away: stop every timer and drop transient state.
    ///
    /// A round that already went terminal reports its outcome now; one that
    /// was still playing reports nothing.
    pub fn teardown(&mut self) {
        match self.phase {
            GamePhase::Ended | GamePhase::TornDown => {}
            GamePhase::Settling { .. } => settle(self, 0),
            GamePhase::Playing => {
                log::info!("Round torn down while playing, no outcome");
            }
        }
        self.targets.clear();
        self.projectiles.clear();
        self.powerups.clear();
        self.effects.clear();
        self.aim = None;
        self.phase = GamePhase::TornDown;
    }
}
