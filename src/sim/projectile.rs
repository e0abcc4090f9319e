//! Darts: aiming, launch, straight-line flight, exit detection
//!
//! A dart flies at constant speed from the launch origin toward its aim
//! point. Its last step is shortened so it lands exactly on the aim point.
//! Hit testing happens at each sampled position, before the exit checks.

use glam::Vec2;
use rand::Rng;

use super::collision::{resolve_hits, targets_hit};
use super::effects::Modifiers;
use super::state::{AimIndicator, GameEvent, Projectile, Round, Target};
use crate::direction_between;

/// Maximum wind drift per axis (Windy fate)
pub const WIND_MAX: Vec2 = Vec2::new(15.0, 7.5);

/// Nearest non-hazard target within `radius` of `pointer`
pub fn snap_target(targets: &[Target], pointer: Vec2, radius: f32) -> Option<&Target> {
    if radius <= 0.0 {
        return None;
    }
    targets
        .iter()
        .filter(|t| !t.is_hazard())
        .map(|t| (t, t.pos.distance(pointer)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(t, _)| t)
}

/// Resolve the pointer into an aim point, applying aim assist if enabled
pub fn aim_indicator(round: &Round, pointer: Vec2) -> AimIndicator {
    let snapped = snap_target(&round.targets, pointer, round.settings.snap_radius());
    AimIndicator {
        pointer,
        point: snapped.map(|t| t.pos).unwrap_or(pointer),
        snap_target: snapped.map(|t| t.id),
    }
}

/// Continuous aim input: refresh the indicator shown by the host
pub fn update_aim(round: &mut Round, pointer: Vec2) -> Option<AimIndicator> {
    if !round.is_playing() || round.state.darts == 0 || round.arena.is_none() {
        round.aim = None;
        return None;
    }
    let indicator = aim_indicator(round, pointer);
    round.aim = Some(indicator);
    Some(indicator)
}

/// Build a dart from `origin` toward `aim`; `None` if they coincide
pub fn launch(id: u32, origin: Vec2, aim: Vec2, speed: f32) -> Option<Projectile> {
    let dir = direction_between(origin, aim)?;
    Some(Projectile {
        id,
        origin,
        aim,
        pos: origin,
        vel: dir * speed,
        traveled: 0.0,
        budget: origin.distance(aim),
    })
}

/// Discrete fire input. Consumes a dart and returns the projectile id.
///
/// Refused (no dart spent) when the round is over, no darts remain, the
/// arena is missing, or the aim point sits on the launch origin.
pub fn fire(round: &mut Round, pointer: Vec2) -> Option<u32> {
    if !round.is_playing() || round.state.darts == 0 {
        return None;
    }
    let arena = round.arena?;

    let indicator = aim_indicator(round, pointer);
    let aim = indicator.point + round.wind;
    let origin = arena.launch_origin();
    if direction_between(origin, aim).is_none() {
        log::debug!("Ignoring zero-distance fire at ({:.1}, {:.1})", aim.x, aim.y);
        return None;
    }

    let id = round.next_entity_id();
    let projectile = launch(id, origin, aim, round.tuning.projectile_speed)?;
    round.state.darts -= 1;
    round.projectiles.push(projectile);
    round.aim = None;

    round.push_event(GameEvent::DartFired { projectile_id: id });
    Some(id)
}

/// Move a dart one projectile tick, never past its aim point
pub fn step(projectile: &mut Projectile) {
    let remaining = projectile.remaining();
    if projectile.vel.length() >= remaining {
        projectile.pos = projectile.aim;
        projectile.traveled = projectile.budget;
        return;
    }
    projectile.pos += projectile.vel;
    projectile.traveled += projectile.vel.length();
}

/// Upper bound on projectile ticks before a dart resolves
pub fn max_flight_ticks(projectile: &Projectile) -> u32 {
    let speed = projectile.vel.length();
    if speed <= 0.0 {
        return 1;
    }
    (projectile.budget / speed).ceil() as u32 + 1
}

/// One projectile tick: advance every dart, resolve contacts, drop misses
pub fn advance_projectiles(round: &mut Round, mods: &Modifiers) {
    let Some(arena) = round.arena else {
        return;
    };
    if round.projectiles.is_empty() {
        return;
    }

    let buffer = round.tuning.hit_buffer;
    let in_flight = std::mem::take(&mut round.projectiles);
    let mut still_flying = Vec::with_capacity(in_flight.len());

    for mut projectile in in_flight {
        step(&mut projectile);

        let hits = targets_hit(&round.targets, projectile.pos, buffer);
        if !hits.is_empty() {
            resolve_hits(round, &projectile, &hits, mods);
            continue;
        }

        if projectile.is_spent() || !arena.contains(projectile.pos) {
            log::trace!(
                "Dart #{} missed at ({:.0}, {:.0})",
                projectile.id,
                projectile.pos.x,
                projectile.pos.y
            );
            round.push_event(GameEvent::Miss {
                projectile_id: projectile.id,
                aim: projectile.aim,
            });
            continue;
        }

        still_flying.push(projectile);
    }

    round.projectiles = still_flying;
}

/// Re-roll the wind drift; calm unless the Windy fate is active
pub fn update_wind(round: &mut Round, mods: &Modifiers) {
    round.wind = if mods.windy {
        Vec2::new(
            round.rng.random_range(-WIND_MAX.x..WIND_MAX.x),
            round.rng.random_range(-WIND_MAX.y..WIND_MAX.y),
        )
    } else {
        Vec2::ZERO
    };
}
