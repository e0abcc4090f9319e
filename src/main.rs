//! Spin Shot headless driver
//!
//! Spins the fate wheel, plays one round with a simple bot and prints the
//! outcome as JSON. Usage: `spin-shot [level] [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod bot {
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use spin_shot::sim::{Arena, FateEffect, GameEvent, GamePhase, Round, TickInput, tick};
    use spin_shot::{Settings, Tuning};

    /// Ticks between shots
    const FIRE_EVERY: u64 = 20;
    /// Hard stop well past any configured round length
    const MAX_TICKS: u64 = 60 * 60 * 10;

    /// Nearest safe target to the launch point
    fn pick_target(round: &Round) -> Option<Vec2> {
        let origin = round.arena?.launch_origin();
        round
            .targets
            .iter()
            .filter(|t| !t.is_hazard())
            .min_by(|a, b| {
                a.pos
                    .distance(origin)
                    .partial_cmp(&b.pos.distance(origin))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|t| t.pos)
    }

    fn next_input(round: &Round, tick_index: u64) -> TickInput {
        let aim = pick_target(round);
        TickInput {
            aim,
            fire: aim.filter(|_| tick_index % FIRE_EVERY == 0),
            collect: round.powerups.iter().map(|p| p.id).collect(),
            activate: round.inventory.iter().map(|i| i.inventory_id).collect(),
        }
    }

    pub fn run(level: u32, seed: u64, tuning: Tuning) -> Result<(), Box<dyn std::error::Error>> {
        let mut wheel = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let fate = FateEffect::spin(&mut wheel);
        log::info!("Fate wheel landed on {} ({})", fate.name(), fate.description());

        let mut round = Round::with_config(level, fate, seed, tuning, Settings::assisted());
        round.set_arena(Arena::new(800.0, 600.0));

        let mut hits = 0u32;
        let mut ticks = 0u64;
        while round.phase != GamePhase::Ended && ticks < MAX_TICKS {
            let input = next_input(&round, ticks);
            tick(&mut round, &input);
            ticks += 1;

            for event in round.drain_events() {
                match event {
                    GameEvent::TargetHit { id, points, .. } => {
                        hits += 1;
                        log::debug!("Hit #{} for {} points", id, points);
                    }
                    GameEvent::HazardHit { darts_lost, points_lost, .. } => {
                        log::warn!("Hazard! -{} darts, -{} points", darts_lost, points_lost);
                    }
                    GameEvent::RoundEnded { score, cleared } => {
                        log::info!(
                            "Round over after {} ticks: {} points, cleared={}",
                            ticks,
                            score,
                            cleared
                        );
                    }
                    _ => {}
                }
            }
        }

        if round.phase != GamePhase::Ended {
            round.teardown();
        }

        println!("fate: {}", fate.name());
        println!("targets hit: {}", hits);
        match round.round_end() {
            Some(outcome) => println!("{}", serde_json::to_string_pretty(&outcome)?),
            None => println!("round did not finish"),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Spin Shot (headless) starting...");

    let mut args = std::env::args().skip(1);
    let level: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(1);
    let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or_else(rand::random);
    let tuning = match args.next() {
        Some(path) => spin_shot::Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => spin_shot::Tuning::default(),
    };

    bot::run(level, seed, tuning)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is host-driven on the web; nothing to run here
}
