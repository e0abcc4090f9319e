//! Dart/target collision detection and resolution
//!
//! One dart can hit several overlapping targets. Each is resolved by its
//! archetype, then the whole shot is applied to the round at once: penalties
//! first (clamped at zero), then the summed points, then target removal and
//! splitter fragments.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::catalog::SPLIT_FRAGMENTS;
use super::effects::{EffectKind, Modifiers};
use super::state::{GameEvent, Projectile, Round, Target, TargetKind};
use crate::consts::TARGET_MOTION_PADDING;
use crate::round_points;

/// Fragment offsets from the impact point, and their travel directions
const FRAGMENT_OFFSETS: [Vec2; 2] = [Vec2::new(-30.0, -30.0), Vec2::new(30.0, -30.0)];
const FRAGMENT_DIRS: [Vec2; 2] = [Vec2::new(-1.5, -1.5), Vec2::new(1.5, -1.5)];

/// Extra work a destroyed target triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    Freeze,
    LuckyAim,
    Split,
}

/// How a single target reacted to a hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// Removed from the arena, awarding `points`
    Destroyed {
        points: u32,
        side_effect: Option<SideEffect>,
    },
    /// Shield took the hit and survives
    Absorbed { hits_absorbed: u8, requires_hits: u8 },
    /// Evasive target ignored the hit
    Dodged,
    /// Hazard: penalties, target removed
    Hazard { darts: u32, points: u32 },
}

/// What one dart did to the round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotReport {
    pub points: u32,
    pub darts_lost: u32,
    pub points_lost: u32,
    pub removed: Vec<u32>,
    pub spawned: Vec<u32>,
    /// Rubber darts: contact acknowledged, nothing resolved
    pub bounced: bool,
}

/// Ids of every target within hit range of `point`
pub fn targets_hit(targets: &[Target], point: Vec2, buffer: f32) -> Vec<u32> {
    targets
        .iter()
        .filter(|t| t.is_hit_by(point, buffer))
        .map(|t| t.id)
        .collect()
}

/// Multiplied points for a destroyed target
pub fn scored_points(base: i32, mods: &Modifiers) -> u32 {
    round_points(base.max(0) as f32 * mods.score_multiplier * mods.lucky_bonus)
}

/// Resolve one hit against one target, mutating its per-archetype state
pub fn resolve_target(
    target: &mut Target,
    mods: &Modifiers,
    hazard_darts: u32,
    hazard_points: u32,
    rng: &mut Pcg32,
) -> HitOutcome {
    let points = scored_points(target.points, mods);
    let destroyed = |side_effect: Option<SideEffect>| HitOutcome::Destroyed {
        points,
        side_effect,
    };

    match target.kind {
        TargetKind::Standard => destroyed(None),
        TargetKind::Hazard => HitOutcome::Hazard {
            darts: hazard_darts,
            points: hazard_points,
        },
        TargetKind::Shield {
            requires_hits,
            hits_absorbed,
        } => {
            let hits_absorbed = hits_absorbed.saturating_add(1);
            if hits_absorbed >= requires_hits {
                destroyed(None)
            } else {
                target.kind = TargetKind::Shield {
                    requires_hits,
                    hits_absorbed,
                };
                HitOutcome::Absorbed {
                    hits_absorbed,
                    requires_hits,
                }
            }
        }
        TargetKind::Evasive { dodge_chance } => {
            if rng.random::<f32>() < dodge_chance {
                HitOutcome::Dodged
            } else {
                destroyed(None)
            }
        }
        TargetKind::AreaDebuff => destroyed(Some(SideEffect::Freeze)),
        TargetKind::AreaBuff => destroyed(Some(SideEffect::LuckyAim)),
        TargetKind::InstantBonus { bonus } => HitOutcome::Destroyed {
            points: bonus,
            side_effect: None,
        },
        TargetKind::Splitter => destroyed(Some(SideEffect::Split)),
    }
}

/// Resolve every target one dart touched and apply the result to the round
pub fn resolve_hits(
    round: &mut Round,
    projectile: &Projectile,
    hit_ids: &[u32],
    mods: &Modifiers,
) -> ShotReport {
    let mut report = ShotReport::default();

    if mods.scoring_disabled {
        report.bounced = true;
        round.push_event(GameEvent::Bounce {
            projectile_id: projectile.id,
            pos: projectile.pos,
        });
        return report;
    }

    let hazard_darts = round.tuning.hazard_dart_penalty;
    let hazard_points = round.tuning.hazard_score_penalty;
    let mut outcomes = Vec::with_capacity(hit_ids.len());
    for &id in hit_ids {
        let Some(target) = round.targets.iter_mut().find(|t| t.id == id) else {
            continue;
        };
        let outcome = resolve_target(target, mods, hazard_darts, hazard_points, &mut round.rng);
        outcomes.push((id, outcome));
    }

    let mut side_effects = Vec::new();
    let mut destroyed_count = 0;
    for &(id, outcome) in &outcomes {
        match outcome {
            HitOutcome::Destroyed {
                points,
                side_effect,
            } => {
                report.points += points;
                report.removed.push(id);
                destroyed_count += 1;
                if let Some(side_effect) = side_effect {
                    side_effects.push((id, side_effect));
                }
                round.push_event(GameEvent::TargetHit {
                    id,
                    points,
                    pos: projectile.pos,
                });
            }
            HitOutcome::Absorbed {
                hits_absorbed,
                requires_hits,
            } => {
                round.push_event(GameEvent::ShieldAbsorbed {
                    id,
                    hits_absorbed,
                    requires_hits,
                });
            }
            HitOutcome::Dodged => {
                round.push_event(GameEvent::Dodged { id });
            }
            HitOutcome::Hazard { darts, points } => {
                let before = (round.state.darts, round.state.score);
                round.state.apply_penalty(darts, points);
                let darts_lost = before.0 - round.state.darts;
                let points_lost = before.1 - round.state.score;
                report.darts_lost += darts_lost;
                report.points_lost += points_lost;
                report.removed.push(id);
                round.push_event(GameEvent::HazardHit {
                    id,
                    darts_lost,
                    points_lost,
                });
            }
        }
    }

    round.state.add_points(report.points);
    round.targets.retain(|t| !report.removed.contains(&t.id));

    for (id, side_effect) in side_effects {
        match side_effect {
            SideEffect::Freeze => round.start_effect(EffectKind::Frozen, round.tuning.freeze_ms),
            SideEffect::LuckyAim => {
                round.start_effect(EffectKind::LuckyAim, round.tuning.lucky_aim_ms)
            }
            SideEffect::Split => {
                let children = spawn_fragments(round, projectile.pos);
                report.spawned.extend(children);
                round.push_event(GameEvent::TargetSplit { id, children });
            }
        }
    }

    if destroyed_count > 1 && report.points > 0 {
        round.push_event(GameEvent::Combo {
            count: destroyed_count,
            pos: projectile.pos,
        });
    }

    log::debug!(
        "Dart #{} hit {} target(s): +{} pts, -{} darts, -{} pts",
        projectile.id,
        outcomes.len(),
        report.points,
        report.darts_lost,
        report.points_lost
    );
    report
}

/// Two small standard targets diverging from `impact`
fn spawn_fragments(round: &mut Round, impact: Vec2) -> [u32; 2] {
    let mut ids = [0; 2];
    for (i, entry) in SPLIT_FRAGMENTS.iter().enumerate() {
        let mut pos = impact + FRAGMENT_OFFSETS[i];
        if let Some(arena) = round.arena {
            pos = arena.clamp_inset(pos, TARGET_MOTION_PADDING);
        }
        let id = round.next_entity_id();
        round.targets.push(entry.instantiate(id, pos, FRAGMENT_DIRS[i]));
        ids[i] = id;
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::{CATALOG, entry_for};
    use crate::sim::effects::{ActiveEffectSet, FateEffect};
    use crate::sim::projectile::launch;
    use crate::sim::state::{Archetype, Arena};
    use crate::tuning::Tuning;

    const HIT_POS: Vec2 = Vec2::new(300.0, 300.0);

    fn round_with(archetype: Archetype) -> (Round, u32) {
        let mut round = Round::start(3, FateEffect::X2, 21);
        round.set_arena(Arena::new(800.0, 600.0));
        let id = round.next_entity_id();
        let entry = entry_for(archetype).unwrap();
        round.targets.push(entry.instantiate(id, HIT_POS, Vec2::ZERO));
        (round, id)
    }

    fn dart_at(pos: Vec2) -> Projectile {
        let mut projectile = launch(999, Vec2::new(400.0, 550.0), pos, 200.0).unwrap();
        projectile.pos = pos;
        projectile
    }

    fn plain() -> Modifiers {
        Modifiers::default()
    }

    fn fate_mods(fate: FateEffect) -> Modifiers {
        Modifiers::compose(&ActiveEffectSet::with_fate(fate), &Tuning::default())
    }

    #[test]
    fn test_hit_radius_uses_buffer() {
        let target = CATALOG[0].instantiate(1, HIT_POS, Vec2::ZERO);
        // radius 30 + buffer 15
        assert!(target.is_hit_by(HIT_POS + Vec2::new(44.9, 0.0), 15.0));
        assert!(!target.is_hit_by(HIT_POS + Vec2::new(45.0, 0.0), 15.0));
    }

    #[test]
    fn test_standard_hit_scores_with_multiplier() {
        let (mut round, id) = round_with(Archetype::MilkTea);
        let mods = fate_mods(FateEffect::X2);
        let report = resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &mods);
        assert_eq!(report.points, 200);
        assert_eq!(round.state.score, 200);
        assert!(round.targets.is_empty());
    }

    #[test]
    fn test_lucky_bonus_rounds() {
        let (mut round, id) = round_with(Archetype::Balloon);
        let mods = fate_mods(FateEffect::Lucky);
        resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &mods);
        // 50 * 1.5
        assert_eq!(round.state.score, 75);
    }

    #[test]
    fn test_hazard_clamps_darts_and_score() {
        let (mut round, id) = round_with(Archetype::Trap);
        round.state.darts = 1;
        round.state.score = 20;
        let report = resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &plain());
        assert_eq!(round.state.darts, 0);
        assert_eq!(round.state.score, 0);
        assert_eq!(report.darts_lost, 1);
        assert_eq!(report.points_lost, 20);
        assert!(round.targets.is_empty());
    }

    #[test]
    fn test_hazard_full_penalty() {
        let (mut round, id) = round_with(Archetype::Trap);
        round.state.darts = 10;
        round.state.score = 300;
        resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &plain());
        assert_eq!(round.state.darts, 8);
        assert_eq!(round.state.score, 250);
    }

    #[test]
    fn test_shield_needs_two_hits() {
        let (mut round, id) = round_with(Archetype::Dumpling);

        let first = resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &plain());
        assert_eq!(first.points, 0);
        let shield = round.target(id).unwrap();
        assert!(matches!(
            shield.kind,
            TargetKind::Shield { requires_hits: 2, hits_absorbed: 1 }
        ));

        let second = resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &plain());
        assert_eq!(second.points, 250);
        assert!(round.target(id).is_none());
        assert_eq!(round.state.score, 250);
    }

    #[test]
    fn test_evasive_always_dodges_at_full_chance() {
        let (mut round, id) = round_with(Archetype::Firefly);
        round.targets[0].kind = TargetKind::Evasive { dodge_chance: 1.0 };
        let report = resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &plain());
        assert_eq!(report.points, 0);
        assert!(round.target(id).is_some());
        assert!(round.events().contains(&GameEvent::Dodged { id }));
    }

    #[test]
    fn test_evasive_never_dodges_at_zero_chance() {
        let (mut round, id) = round_with(Archetype::Firefly);
        round.targets[0].kind = TargetKind::Evasive { dodge_chance: 0.0 };
        let report = resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &plain());
        assert_eq!(report.points, 180);
        assert!(round.target(id).is_none());
    }

    #[test]
    fn test_area_debuff_freezes() {
        let (mut round, id) = round_with(Archetype::SnowGlobe);
        round.now_ms = 1000;
        resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &plain());
        assert_eq!(
            round.effects.expiry(EffectKind::Frozen),
            Some(crate::sim::effects::Expiry::At(6000))
        );
    }

    #[test]
    fn test_area_buff_grants_lucky_aim() {
        let (mut round, id) = round_with(Archetype::Clover);
        resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &plain());
        assert!(round.effects.is_active(EffectKind::LuckyAim));
    }

    #[test]
    fn test_instant_bonus_ignores_multipliers() {
        let (mut round, id) = round_with(Archetype::GoldCoin);
        let mods = Modifiers {
            score_multiplier: 6.0,
            lucky_bonus: 1.5,
            ..plain()
        };
        let report = resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &mods);
        assert_eq!(report.points, 250);
    }

    #[test]
    fn test_splitter_yields_two_standard_fragments() {
        let (mut round, id) = round_with(Archetype::Splitter);
        let report = resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &plain());

        assert_eq!(report.points, 200);
        assert!(round.target(id).is_none());
        assert_eq!(report.spawned.len(), 2);
        assert_eq!(round.targets.len(), 2);
        for fragment in &round.targets {
            assert_eq!(fragment.kind, TargetKind::Standard);
            assert_eq!(fragment.points, 50);
            assert_eq!(fragment.radius, 20.0);
        }
        assert_eq!(round.targets[0].pos, Vec2::new(270.0, 270.0));
        assert_eq!(round.targets[1].pos, Vec2::new(330.0, 270.0));
    }

    #[test]
    fn test_fragments_clamped_into_arena() {
        let (mut round, id) = round_with(Archetype::Splitter);
        let corner = Vec2::new(45.0, 45.0);
        round.targets[0].pos = corner;
        resolve_hits(&mut round, &dart_at(corner), &[id], &plain());
        for fragment in &round.targets {
            assert!(fragment.pos.x >= TARGET_MOTION_PADDING);
            assert!(fragment.pos.y >= TARGET_MOTION_PADDING);
        }
    }

    #[test]
    fn test_rubber_darts_resolve_nothing() {
        let (mut round, id) = round_with(Archetype::Trap);
        round.state.score = 100;
        let mods = fate_mods(FateEffect::Rubber);
        let report = resolve_hits(&mut round, &dart_at(HIT_POS), &[id], &mods);
        assert!(report.bounced);
        assert_eq!(round.state.score, 100);
        assert_eq!(round.state.darts, 15);
        assert!(round.target(id).is_some());
    }

    #[test]
    fn test_multi_hit_sums_points() {
        let (mut round, first) = round_with(Archetype::MilkTea);
        let second = round.next_entity_id();
        let balloon = entry_for(Archetype::Balloon).unwrap();
        round
            .targets
            .push(balloon.instantiate(second, HIT_POS + Vec2::new(10.0, 0.0), Vec2::ZERO));

        let hits = targets_hit(&round.targets, HIT_POS, 15.0);
        assert_eq!(hits, vec![first, second]);

        let report = resolve_hits(&mut round, &dart_at(HIT_POS), &hits, &plain());
        assert_eq!(report.points, 150);
        assert!(round.targets.is_empty());
        assert!(round
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::Combo { count: 2, .. })));
    }

    #[test]
    fn test_penalty_applies_before_points() {
        let (mut round, trap) = round_with(Archetype::Trap);
        let cat = round.next_entity_id();
        round
            .targets
            .push(entry_for(Archetype::LuckyCat).unwrap().instantiate(cat, HIT_POS, Vec2::ZERO));
        round.state.score = 10;

        resolve_hits(&mut round, &dart_at(HIT_POS), &[trap, cat], &plain());
        // 10 -> 0 (clamped), then +300
        assert_eq!(round.state.score, 300);
    }
}
