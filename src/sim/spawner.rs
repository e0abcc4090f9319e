//! Target and powerup spawning, powerup inventory
//!
//! Spawners run on their own cadences (see `tick`). Both keep only the most
//! recent entities on screen; older ones drop off silently.

use glam::Vec2;
use rand::Rng;

use super::catalog::choose_entry;
use super::effects::EffectKind;
use super::state::{GameEvent, InventoryItem, Powerup, PowerupKind, Round};
use crate::consts::*;

/// Keep only the newest `cap` entries (lists are in spawn order)
fn keep_most_recent<T>(list: &mut Vec<T>, cap: usize) {
    if list.len() > cap {
        let excess = list.len() - cap;
        list.drain(..excess);
    }
}

/// Random travel direction, each axis in [-1, 1)
fn random_direction(rng: &mut impl Rng) -> Vec2 {
    Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
}

/// One target spawn tick. No-op until the arena is known.
pub fn spawn_target(round: &mut Round) -> Option<u32> {
    let arena = round.arena?;

    let entry = choose_entry(
        round.level_config.catalog,
        round.state.is_boss(),
        round.tuning.boss_spawn_chance,
        &mut round.rng,
    );
    let pos = arena.random_point(&mut round.rng, TARGET_SPAWN_PADDING);
    let dir = random_direction(&mut round.rng);
    let id = round.next_entity_id();

    round.targets.push(entry.instantiate(id, pos, dir));
    keep_most_recent(&mut round.targets, round.tuning.max_live_targets);

    log::debug!("Spawned {:?} #{} at ({:.0}, {:.0})", entry.archetype, id, pos.x, pos.y);
    round.push_event(GameEvent::TargetSpawned {
        id,
        archetype: entry.archetype,
    });
    Some(id)
}

/// One powerup spawn tick: gated by chance, no-op until the arena is known
pub fn spawn_powerup(round: &mut Round) -> Option<u32> {
    let arena = round.arena?;
    if !round
        .rng
        .random_bool(round.tuning.powerup_spawn_chance.clamp(0.0, 1.0))
    {
        return None;
    }

    let kind = PowerupKind::ALL[round.rng.random_range(0..PowerupKind::ALL.len())];
    let pos = arena.random_point(&mut round.rng, POWERUP_SPAWN_PADDING);
    let id = round.next_entity_id();

    round.powerups.push(Powerup { id, kind, pos });
    keep_most_recent(&mut round.powerups, round.tuning.max_visible_powerups);

    log::debug!("Spawned powerup {:?} #{}", kind, id);
    round.push_event(GameEvent::PowerupSpawned { id, kind });
    Some(id)
}

/// Move a powerup from the arena into the inventory
pub fn collect_powerup(round: &mut Round, id: u32) -> Option<InventoryItem> {
    let index = round.powerups.iter().position(|p| p.id == id)?;
    let powerup = round.powerups.remove(index);

    let item = InventoryItem {
        inventory_id: round.next_entity_id(),
        kind: powerup.kind,
    };
    round.inventory.push(item);

    log::debug!("Collected {:?} (inventory #{})", item.kind, item.inventory_id);
    round.push_event(GameEvent::PowerupCollected {
        id,
        inventory_id: item.inventory_id,
        kind: item.kind,
    });
    Some(item)
}

/// Consume an inventory item and apply it.
///
/// A timed powerup whose effect is already running is refused and stays in
/// the inventory.
pub fn activate_powerup(round: &mut Round, inventory_id: u32) -> bool {
    let Some(index) = round
        .inventory
        .iter()
        .position(|item| item.inventory_id == inventory_id)
    else {
        return false;
    };
    let kind = round.inventory[index].kind;

    if kind
        .timed_effect()
        .is_some_and(|effect| round.effects.is_active(effect))
    {
        log::debug!("{:?} already active, keeping item", kind);
        return false;
    }

    round.inventory.remove(index);
    match kind {
        PowerupKind::ExtraDarts => {
            round.state.darts += round.tuning.extra_darts;
        }
        PowerupKind::FreezeTime => {
            round.start_effect(EffectKind::Frozen, round.tuning.freeze_ms);
        }
        PowerupKind::ScoreBoost => {
            round.start_effect(EffectKind::ScoreBoost, round.tuning.score_boost_ms);
        }
    }

    log::debug!("Activated {:?} (inventory #{})", kind, inventory_id);
    round.push_event(GameEvent::PowerupActivated { inventory_id, kind });
    true
}
