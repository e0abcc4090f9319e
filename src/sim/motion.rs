//! Target motion: straight-line travel, pattern perturbation, wall reflection
//!
//! Each pattern is a pure function of its parameters and the target's phase.
//! Reflection is perfectly elastic: the offending direction component flips
//! and the position is clamped back onto the padded wall.

use glam::Vec2;
use rand::Rng;

use super::effects::Modifiers;
use super::state::{MotionPattern, Round, Target};
use crate::consts::*;

/// Pattern displacement for one tick at `phase`
pub fn pattern_offset(pattern: MotionPattern, phase: f32) -> Vec2 {
    match pattern {
        MotionPattern::Linear => Vec2::ZERO,
        MotionPattern::Zigzag {
            amplitude,
            frequency,
        } => Vec2::new((phase * frequency).sin() * amplitude, 0.0),
        MotionPattern::Spiral {
            radius,
            angular_speed,
        } => {
            let angle = phase * angular_speed;
            Vec2::new(angle.cos() * radius, angle.sin() * radius)
        }
        MotionPattern::Wavy {
            amplitude,
            frequency,
        } => Vec2::new(0.0, (phase * frequency).sin() * amplitude),
    }
}

/// Clamp `pos` into `[min, max]`, flipping `dir` on each axis that was out
pub fn reflect_into_bounds(pos: &mut Vec2, dir: &mut Vec2, min: Vec2, max: Vec2) {
    if pos.x < min.x || pos.x > max.x {
        dir.x = -dir.x;
        pos.x = pos.x.clamp(min.x, max.x);
    }
    if pos.y < min.y || pos.y > max.y {
        dir.y = -dir.y;
        pos.y = pos.y.clamp(min.y, max.y);
    }
}

/// Move one target by a single motion tick
pub fn advance_target(target: &mut Target, speed: f32, min: Vec2, max: Vec2) {
    target.phase += PATTERN_PHASE_STEP;
    let mut pos =
        target.pos + target.dir * speed + pattern_offset(target.pattern, target.phase);
    let mut dir = target.dir;
    reflect_into_bounds(&mut pos, &mut dir, min, max);
    target.pos = pos;
    target.dir = dir;
}

/// One motion tick for every live target
pub fn advance_targets(round: &mut Round, mods: &Modifiers) {
    let Some(arena) = round.arena else {
        return;
    };
    // Frozen targets hold position and pause state
    if mods.frozen {
        return;
    }

    let speed = round.tuning.target_base_speed * mods.speed_multiplier;
    let pause_chance = round.tuning.pause_chance.clamp(0.0, 1.0);
    let (min, max) = arena.inset(TARGET_MOTION_PADDING);
    let now = round.now_ms;

    for target in &mut round.targets {
        if let Some(started) = target.paused_at {
            if now.saturating_sub(started) > mods.pause_ms {
                target.paused_at = None;
            }
            continue;
        }

        if round.rng.random_bool(pause_chance) {
            target.paused_at = Some(now);
            continue;
        }

        advance_target(target, speed, min, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::CATALOG;
    use crate::sim::effects::{ActiveEffectSet, EffectKind, FateEffect};
    use crate::sim::state::Arena;
    use crate::tuning::Tuning;

    const MIN: Vec2 = Vec2::new(40.0, 40.0);
    const MAX: Vec2 = Vec2::new(760.0, 560.0);

    fn target_at(pos: Vec2, dir: Vec2) -> Target {
        CATALOG[0].instantiate(1, pos, dir)
    }

    #[test]
    fn test_linear_step() {
        let mut target = target_at(Vec2::new(100.0, 100.0), Vec2::new(1.0, -0.5));
        advance_target(&mut target, 2.0, MIN, MAX);
        assert_eq!(target.pos, Vec2::new(102.0, 99.0));
        assert!((target.phase - PATTERN_PHASE_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_reflection_flips_and_clamps() {
        let mut target = target_at(Vec2::new(759.0, 100.0), Vec2::new(1.0, 0.0));
        advance_target(&mut target, 2.0, MIN, MAX);
        assert_eq!(target.pos.x, 760.0);
        assert_eq!(target.dir.x, -1.0);

        let mut target = target_at(Vec2::new(100.0, 41.0), Vec2::new(0.0, -1.0));
        advance_target(&mut target, 2.0, MIN, MAX);
        assert_eq!(target.pos.y, 40.0);
        assert_eq!(target.dir.y, 1.0);
    }

    #[test]
    fn test_pattern_offsets() {
        assert_eq!(pattern_offset(MotionPattern::Linear, 1.0), Vec2::ZERO);

        let zigzag = pattern_offset(
            MotionPattern::Zigzag {
                amplitude: 15.0,
                frequency: 3.0,
            },
            0.5,
        );
        assert_eq!(zigzag.y, 0.0);
        assert!((zigzag.x - 1.5f32.sin() * 15.0).abs() < 1e-4);

        let spiral = pattern_offset(
            MotionPattern::Spiral {
                radius: 3.0,
                angular_speed: 2.0,
            },
            0.25,
        );
        assert!((spiral.length() - 3.0).abs() < 1e-4);

        let wavy = pattern_offset(
            MotionPattern::Wavy {
                amplitude: 10.0,
                frequency: 2.0,
            },
            0.25,
        );
        assert_eq!(wavy.x, 0.0);
    }

    #[test]
    fn test_frozen_targets_do_not_move() {
        let mut round = Round::start(1, FateEffect::X2, 5);
        round.set_arena(Arena::new(800.0, 600.0));
        round.targets.push(target_at(Vec2::new(300.0, 300.0), Vec2::new(1.0, 1.0)));

        let mut effects = ActiveEffectSet::with_fate(FateEffect::X2);
        effects.activate_for(EffectKind::Frozen, 0, 5000);
        let mods = Modifiers::compose(&effects, &Tuning::default());

        advance_targets(&mut round, &mods);
        assert_eq!(round.targets[0].pos, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn test_paused_target_resumes_after_duration() {
        let mut round = Round::start(1, FateEffect::X2, 5);
        round.set_arena(Arena::new(800.0, 600.0));
        round.tuning.pause_chance = 0.0;
        let mut target = target_at(Vec2::new(300.0, 300.0), Vec2::new(1.0, 0.0));
        target.paused_at = Some(0);
        round.targets.push(target);
        let mods = Modifiers::default();

        round.now_ms = 800;
        advance_targets(&mut round, &mods);
        assert!(round.targets[0].is_paused());
        assert_eq!(round.targets[0].pos.x, 300.0);

        round.now_ms = 801;
        advance_targets(&mut round, &mods);
        assert!(!round.targets[0].is_paused());

        advance_targets(&mut round, &mods);
        assert_eq!(round.targets[0].pos.x, 302.0);
    }

    #[test]
    fn test_missing_arena_is_noop() {
        let mut round = Round::start(1, FateEffect::X2, 5);
        round.targets.push(target_at(Vec2::new(300.0, 300.0), Vec2::new(1.0, 0.0)));
        advance_targets(&mut round, &Modifiers::default());
        assert_eq!(round.targets[0].pos.x, 300.0);
    }
}
