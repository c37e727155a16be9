//! boids — reflex flocking agents for the rust_mas framework.
//!
//! Classic separation/alignment/cohesion steering, written directly against
//! the `Mind` trait: no beliefs, no desires, no plans.  Each boid's heading
//! is published in a `Velocity` component (via a self-targeted interaction)
//! so that neighbors can read it for the alignment term.

use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;

use mas_behavior::{Action, Mind, WorldView};
use mas_core::{ActorId, ActorRng, Kind, Rect, Vec2};
use mas_sim::{EnvConfig, Environment, NoopObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const WORLD:       f32 = 200.0;
const SEED:        u64 = 7;
const BOID_COUNT:  usize = 60;
const TICKS:       u64 = 500;

const VIEW_RADIUS: f32 = 12.0;
const SEP_RADIUS:  f32 = 4.0;
const MAX_SPEED:   f32 = 2.0;
const MIN_SPEED:   f32 = 0.8;
const MARGIN:      f32 = 15.0;

const SEP_WEIGHT:  f32 = 0.08;
const ALI_WEIGHT:  f32 = 0.05;
const COH_WEIGHT:  f32 = 0.01;
const TURN_WEIGHT: f32 = 0.15;

const BOID: Kind = Kind(1);

// ── Application components ────────────────────────────────────────────────────

/// Published heading, readable by flockmates.
#[derive(Clone, Copy, Default)]
struct Velocity(Vec2);

// ── Boid mind ─────────────────────────────────────────────────────────────────

struct Boid;

impl Boid {
    fn steer(pos: Vec2, vel: Vec2, view: &WorldView<'_>, me: ActorId) -> Vec2 {
        let flock = view.perceive(me, VIEW_RADIUS);

        let mut separation = Vec2::ZERO;
        let mut heading_sum = Vec2::ZERO;
        let mut center_sum = Vec2::ZERO;
        for mate in &flock {
            let away = pos - mate.pos;
            if away.length_sq() < SEP_RADIUS * SEP_RADIUS {
                separation += away;
            }
            if let Some(v) = view.actors.component_of::<Velocity>(mate.actor) {
                heading_sum += v.0;
            }
            center_sum += mate.pos;
        }

        let mut steering = separation * SEP_WEIGHT;
        if !flock.is_empty() {
            let n = flock.len() as f32;
            steering += (heading_sum * (1.0 / n) - vel) * ALI_WEIGHT;
            steering += (center_sum * (1.0 / n) - pos) * COH_WEIGHT;
        }

        // Soft turn away from the walls.
        if pos.x < MARGIN {
            steering += Vec2::new(TURN_WEIGHT, 0.0);
        } else if pos.x > WORLD - MARGIN {
            steering += Vec2::new(-TURN_WEIGHT, 0.0);
        }
        if pos.y < MARGIN {
            steering += Vec2::new(0.0, TURN_WEIGHT);
        } else if pos.y > WORLD - MARGIN {
            steering += Vec2::new(0.0, -TURN_WEIGHT);
        }

        steering
    }
}

impl Mind for Boid {
    fn act(&mut self, me: ActorId, view: &WorldView<'_>, _rng: &mut ActorRng) -> Vec<Action> {
        let Some(pos) = view.actors.position(me) else {
            return Vec::new();
        };
        let vel = view
            .actors
            .component_of::<Velocity>(me)
            .map_or(Vec2::ZERO, |v| v.0);

        let mut next = vel + Self::steer(pos, vel, view, me);
        let speed = next.length();
        if speed > MAX_SPEED {
            next = next.normalized() * MAX_SPEED;
        } else if speed < MIN_SPEED {
            next = next.normalized() * MIN_SPEED;
        }

        let published = next;
        vec![
            Action::Interact {
                target: me,
                effect: Rc::new(move |boid, _, store| {
                    if let Some(v) = store.component_of_mut::<Velocity>(boid) {
                        v.0 = published;
                    }
                }),
            },
            Action::MoveTo(pos + next),
        ]
    }
}

// ── Metrics ───────────────────────────────────────────────────────────────────

/// Mean distance of each boid to its nearest flockmate — a compactness
/// measure that falls as the flock coheres.
fn mean_nearest_distance(env: &Environment) -> f32 {
    let ids: Vec<ActorId> = env.actors().ids().collect();
    let mut total = 0.0;
    for &boid in &ids {
        let Some(pos) = env.actors().position(boid) else {
            continue;
        };
        if let Some(mate) = env
            .index()
            .nearest(pos, |e| e.actor != boid)
        {
            total += pos.distance(mate.pos);
        }
    }
    total / ids.len() as f32
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== boids — rust_mas multi-agent framework ===");
    println!("Boids: {BOID_COUNT}  |  Ticks: {TICKS}  |  Seed: {SEED}");
    println!();

    let bounds = Rect::new(0.0, 0.0, WORLD, WORLD);
    let mut env = Environment::new(bounds, EnvConfig { seed: SEED, ..EnvConfig::default() });
    env.actors_mut().register_component::<Velocity>();

    // Scatter on a jittered grid so runs are reproducible without a setup RNG.
    let per_row = 8;
    for i in 0..BOID_COUNT {
        let col = (i % per_row) as f32;
        let row = (i / per_row) as f32;
        let pos = Vec2::new(40.0 + 16.0 * col + 3.0 * row, 40.0 + 16.0 * row + 2.0 * col);
        let boid = env.spawn_agent(BOID, bounds.clamp(pos), Box::new(Boid))?;
        // Fan the initial headings out around the circle.
        let angle = i as f32 * std::f32::consts::TAU / BOID_COUNT as f32;
        if let Some(v) = env.actors_mut().component_of_mut::<Velocity>(boid) {
            v.0 = Vec2::new(angle.cos(), angle.sin()) * MAX_SPEED;
        }
    }

    let spread_before = mean_nearest_distance(&env);

    let t0 = Instant::now();
    env.run(TICKS, &mut NoopObserver)?;
    let elapsed = t0.elapsed();

    let spread_after = mean_nearest_distance(&env);
    let inside = env
        .actors()
        .ids()
        .filter(|&b| env.actors().position(b).is_some_and(|p| bounds.contains(p)))
        .count();

    println!("Flight complete in {:.3} s", elapsed.as_secs_f64());
    println!("  mean nearest-mate distance: {spread_before:.2} → {spread_after:.2}");
    println!("  boids inside bounds: {inside}/{BOID_COUNT}");

    Ok(())
}
