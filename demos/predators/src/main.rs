//! predators — a predator/prey/grass ecology for the rust_mas framework.
//!
//! Grass regrows at random spots, prey graze on it and flee hunters,
//! predators chase and eat prey; everyone starves without food and splits
//! when well fed.  The population churns every tick, exercising dynamic
//! spawn and removal mid-run.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;

use mas_behavior::{Action, Mind, WorldView};
use mas_core::{ActorId, ActorRng, Kind, Rect, Vec2};
use mas_sim::{EnvConfig, Environment, NoopObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const WORLD:      f32 = 150.0;
const SEED:       u64 = 2024;
const TICKS:      u64 = 1_000;
const REPORT_EVERY: u64 = 100;

const GRASS_INIT:    usize = 40;
const PREY_INIT:     usize = 25;
const PREDATOR_INIT: usize = 5;

const GRASS_REGROW_P: f64 = 0.5;

const PREY_SPEED:      f32 = 1.2;
const PREY_VIEW:       f32 = 12.0;
const PREY_METABOLISM: f32 = 0.4;
const PREY_START:      f32 = 30.0;
const PREY_BIRTH_AT:   f32 = 60.0;
const GRASS_ENERGY:    f32 = 12.0;

const PREDATOR_SPEED:      f32 = 1.6;
const PREDATOR_METABOLISM: f32 = 0.5;
const PREDATOR_START:      f32 = 50.0;
const PREDATOR_BIRTH_AT:   f32 = 120.0;
const PREY_ENERGY_GAIN:    f32 = 40.0;

const REACH: f32 = 1.5;

const GRASS:    Kind = Kind(1);
const PREY:     Kind = Kind(2);
const PREDATOR: Kind = Kind(3);
const FIELD:    Kind = Kind(4);

// ── Run statistics ────────────────────────────────────────────────────────────

#[derive(Default)]
struct Stats {
    grass_grown: u64,
    grazed:      u64,
    kills:       u64,
    births:      u64,
    starved:     u64,
}

type SharedStats = Rc<RefCell<Stats>>;

// ── Grass seeder ──────────────────────────────────────────────────────────────

/// A stationary field spirit that sprinkles new grass over the world.
struct Seeder(SharedStats);

impl Mind for Seeder {
    fn act(&mut self, _me: ActorId, _view: &WorldView<'_>, rng: &mut ActorRng) -> Vec<Action> {
        if !rng.gen_bool(GRASS_REGROW_P) {
            return Vec::new();
        }
        self.0.borrow_mut().grass_grown += 1;
        let pos = Vec2::new(rng.gen_range(0.0..WORLD), rng.gen_range(0.0..WORLD));
        vec![Action::Spawn { kind: GRASS, pos, mind: None }]
    }
}

// ── Prey ──────────────────────────────────────────────────────────────────────

struct Prey {
    energy: f32,
    stats:  SharedStats,
}

impl Mind for Prey {
    fn act(&mut self, me: ActorId, view: &WorldView<'_>, rng: &mut ActorRng) -> Vec<Action> {
        let Some(pos) = view.actors.position(me) else {
            return Vec::new();
        };

        self.energy -= PREY_METABOLISM;
        if self.energy <= 0.0 {
            self.stats.borrow_mut().starved += 1;
            return vec![Action::Remove(me)];
        }

        // Splitting takes priority over everything but death.
        if self.energy >= PREY_BIRTH_AT {
            self.energy /= 2.0;
            self.stats.borrow_mut().births += 1;
            let nest = pos + Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
            return vec![Action::Spawn {
                kind: PREY,
                pos:  nest,
                mind: Some(Box::new(Prey { energy: self.energy, stats: self.stats.clone() })),
            }];
        }

        // Flee any hunter in sight.
        let hunters: Vec<Vec2> = view
            .perceive(me, PREY_VIEW)
            .into_iter()
            .filter(|e| e.kind == PREDATOR)
            .map(|e| e.pos)
            .collect();
        if !hunters.is_empty() {
            let mut away = Vec2::ZERO;
            for h in &hunters {
                away += pos - *h;
            }
            return vec![Action::MoveTo(pos + away.normalized() * PREY_SPEED)];
        }

        // Otherwise graze.
        match view.nearest_of_kind(me, pos, GRASS) {
            Some(grass) if pos.distance_sq(grass.pos) <= REACH * REACH => {
                self.energy += GRASS_ENERGY;
                self.stats.borrow_mut().grazed += 1;
                vec![Action::Remove(grass.actor)]
            }
            Some(grass) => vec![Action::MoveTo(pos.step_toward(grass.pos, PREY_SPEED))],
            None => {
                let drift = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                vec![Action::MoveTo(pos + drift * PREY_SPEED)]
            }
        }
    }
}

// ── Predator ──────────────────────────────────────────────────────────────────

struct Predator {
    energy: f32,
    stats:  SharedStats,
}

impl Mind for Predator {
    fn act(&mut self, me: ActorId, view: &WorldView<'_>, rng: &mut ActorRng) -> Vec<Action> {
        let Some(pos) = view.actors.position(me) else {
            return Vec::new();
        };

        self.energy -= PREDATOR_METABOLISM;
        if self.energy <= 0.0 {
            self.stats.borrow_mut().starved += 1;
            return vec![Action::Remove(me)];
        }

        if self.energy >= PREDATOR_BIRTH_AT {
            self.energy /= 2.0;
            self.stats.borrow_mut().births += 1;
            let den = pos + Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
            return vec![Action::Spawn {
                kind: PREDATOR,
                pos:  den,
                mind: Some(Box::new(Predator { energy: self.energy, stats: self.stats.clone() })),
            }];
        }

        match view.nearest_of_kind(me, pos, PREY) {
            Some(prey) if pos.distance_sq(prey.pos) <= REACH * REACH => {
                self.energy += PREY_ENERGY_GAIN;
                self.stats.borrow_mut().kills += 1;
                vec![Action::Remove(prey.actor)]
            }
            Some(prey) => vec![Action::MoveTo(pos.step_toward(prey.pos, PREDATOR_SPEED))],
            None => {
                let drift = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                vec![Action::MoveTo(pos + drift * PREDATOR_SPEED)]
            }
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn count_kind(env: &Environment, kind: Kind) -> usize {
    env.actors()
        .ids()
        .filter(|&a| env.actors().kind(a) == Some(kind))
        .count()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== predators — rust_mas multi-agent framework ===");
    println!(
        "Grass: {GRASS_INIT}  |  Prey: {PREY_INIT}  |  Predators: {PREDATOR_INIT}  |  Seed: {SEED}"
    );
    println!();

    let bounds = Rect::new(0.0, 0.0, WORLD, WORLD);
    let mut env = Environment::new(bounds, EnvConfig { seed: SEED, ..EnvConfig::default() });
    let stats: SharedStats = Rc::default();

    env.spawn_agent(
        FIELD,
        bounds.center(),
        Box::new(Seeder(stats.clone())),
    )?;

    // Initial grass on a jittered lattice, prey and predators interleaved.
    for i in 0..GRASS_INIT {
        let pos = Vec2::new(
            10.0 + 21.0 * (i % 7) as f32,
            10.0 + 23.0 * (i / 7) as f32,
        );
        env.spawn_actor(GRASS, bounds.clamp(pos))?;
    }
    for i in 0..PREY_INIT {
        let pos = Vec2::new(15.0 + 25.0 * (i % 5) as f32, 20.0 + 26.0 * (i / 5) as f32);
        env.spawn_agent(
            PREY,
            bounds.clamp(pos),
            Box::new(Prey { energy: PREY_START, stats: stats.clone() }),
        )?;
    }
    for i in 0..PREDATOR_INIT {
        let pos = Vec2::new(30.0 + 22.0 * i as f32, 75.0);
        env.spawn_agent(
            PREDATOR,
            bounds.clamp(pos),
            Box::new(Predator { energy: PREDATOR_START, stats: stats.clone() }),
        )?;
    }

    println!("{:<8} {:<8} {:<8} {:<10}", "Tick", "Grass", "Prey", "Predators");
    println!("{}", "-".repeat(36));

    let t0 = Instant::now();
    for _ in 0..TICKS / REPORT_EVERY {
        env.run(REPORT_EVERY, &mut NoopObserver)?;
        println!(
            "{:<8} {:<8} {:<8} {:<10}",
            env.tick().0,
            count_kind(&env, GRASS),
            count_kind(&env, PREY),
            count_kind(&env, PREDATOR),
        );
    }
    let elapsed = t0.elapsed();

    let stats = stats.borrow();
    println!();
    println!("Ecology ran {TICKS} ticks in {:.3} s", elapsed.as_secs_f64());
    println!("  grass grown : {}", stats.grass_grown);
    println!("  meals grazed: {}", stats.grazed);
    println!("  prey killed : {}", stats.kills);
    println!("  births      : {}", stats.births);
    println!("  starvations : {}", stats.starved);

    Ok(())
}
