//! miners — deliberating gold miners for the rust_mas framework.
//!
//! Three mines hold a finite stock of gems; a camp collects them.  Four
//! miner agents cycle between collecting and delivering, and head back to
//! camp to rest whenever fatigue builds up.  Everything above the framework
//! (gems, hands, fatigue) lives in application components and beliefs.

use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;

use mas_actor::ActorStore;
use mas_behavior::InteractFn;
use mas_bdi::{AgentParams, BdiAgent, Beliefs, Desire, Plan};
use mas_core::{Kind, Rect, Tick, Vec2};
use mas_sim::{EnvConfig, EnvObserver, Environment};

// ── Constants ─────────────────────────────────────────────────────────────────

const WORLD:         f32 = 100.0;
const SEED:          u64 = 42;
const MAX_TICKS:     u64 = 5_000;
const MINER_COUNT:   usize = 4;
const GEMS_PER_MINE: u32 = 10;

const FATIGUE_LIMIT: f32 = 80.0;
const CAMP_POS: Vec2 = Vec2 { x: 90.0, y: 90.0 };
const MINE_POSITIONS: [Vec2; 3] = [
    Vec2 { x: 10.0, y: 10.0 },
    Vec2 { x: 15.0, y: 80.0 },
    Vec2 { x: 80.0, y: 15.0 },
];

const MINE:  Kind = Kind(1);
const CAMP:  Kind = Kind(2);
const MINER: Kind = Kind(3);

// ── Application components ────────────────────────────────────────────────────

#[derive(Clone, Copy, Default)]
struct Gems(u32);

#[derive(Clone, Copy, Default)]
struct Hands(u32);

#[derive(Clone, Copy, Default)]
struct Delivered(u32);

// ── Interaction effects ───────────────────────────────────────────────────────

/// Take one gem out of the mine into the miner's hands.
fn mine_effect() -> InteractFn {
    Rc::new(|miner, mine, store: &mut ActorStore| {
        let Some(gems) = store.component_of_mut::<Gems>(mine) else {
            return;
        };
        if gems.0 == 0 {
            return;
        }
        gems.0 -= 1;
        if let Some(hands) = store.component_of_mut::<Hands>(miner) {
            hands.0 += 1;
        }
    })
}

/// Empty the miner's hands into the camp's tally.
fn deliver_effect() -> InteractFn {
    Rc::new(|miner, camp, store: &mut ActorStore| {
        let carried = store
            .component_of_mut::<Hands>(miner)
            .map(|h| std::mem::take(&mut h.0))
            .unwrap_or(0);
        if let Some(tally) = store.component_of_mut::<Delivered>(camp) {
            tally.0 += carried;
        }
    })
}

// ── Miner agent ───────────────────────────────────────────────────────────────

fn miner_agent() -> BdiAgent {
    let params = AgentParams { perception: 20.0, reach: 1.5, speed: 1.5 };

    BdiAgent::new(params)
        .with_belief("fatigue", 0.0_f32)
        .on_sense(|beliefs, _seen, me, view| {
            let carrying = view
                .actors
                .component_of::<Hands>(me)
                .is_some_and(|h| h.0 > 0);
            beliefs.set("carrying", carrying);

            // Walking the claim is tiring; a stay near camp resets it.
            let here = view.actors.position(me).unwrap_or(CAMP_POS);
            if here.distance(CAMP_POS) < 3.0 {
                beliefs.set("fatigue", 0.0_f32);
            } else {
                let fatigue = beliefs.get_num("fatigue").unwrap_or(0.0);
                beliefs.set("fatigue", fatigue + 1.0);
            }
        })
        .with_desire(Desire::new(
            "collect",
            1.0,
            |b: &Beliefs| b.holds("carrying"),
            |_| {
                Plan::new().interact_nearest_where(
                    MINE,
                    |mine, view| {
                        view.actors
                            .component_of::<Gems>(mine)
                            .is_some_and(|g| g.0 > 0)
                    },
                    mine_effect(),
                )
            },
        ))
        .with_desire(Desire::new(
            "deliver",
            2.0,
            |b: &Beliefs| !b.holds("carrying"),
            |_| Plan::new().interact_nearest(CAMP, deliver_effect()),
        ))
        .with_desire(Desire::new(
            "rest",
            5.0,
            |b: &Beliefs| b.get_num("fatigue").unwrap_or(0.0) < FATIGUE_LIMIT,
            |_| Plan::new().move_toward(CAMP_POS, 2.0),
        ))
}

// ── Progress observer ─────────────────────────────────────────────────────────

struct ProgressPrinter {
    interval: u64,
}

impl EnvObserver for ProgressPrinter {
    fn on_tick_end(&mut self, tick: Tick, acted: usize) {
        if tick.0 % self.interval == 0 {
            println!("  {tick}: {acted} miners busy");
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let total_gems = GEMS_PER_MINE * MINE_POSITIONS.len() as u32;
    println!("=== miners — rust_mas multi-agent framework ===");
    println!("Miners: {MINER_COUNT}  |  Gems: {total_gems}  |  Seed: {SEED}");
    println!();

    let bounds = Rect::new(0.0, 0.0, WORLD, WORLD);
    let mut env = Environment::new(bounds, EnvConfig { seed: SEED, ..EnvConfig::default() });
    env.actors_mut().register_component::<Gems>();
    env.actors_mut().register_component::<Hands>();
    env.actors_mut().register_component::<Delivered>();

    let mut mines = Vec::new();
    for pos in MINE_POSITIONS {
        let mine = env.spawn_actor(MINE, pos)?;
        env.actors_mut()
            .component_of_mut::<Gems>(mine)
            .ok_or_else(|| anyhow::anyhow!("Gems component missing"))?
            .0 = GEMS_PER_MINE;
        mines.push(mine);
    }
    let camp = env.spawn_actor(CAMP, CAMP_POS)?;
    for i in 0..MINER_COUNT {
        let pos = Vec2::new(40.0 + 5.0 * i as f32, 50.0);
        env.spawn_agent(MINER, pos, Box::new(miner_agent()))?;
    }

    let t0 = Instant::now();
    let done = env.run_until(
        move |env| {
            env.actors()
                .component_of::<Delivered>(camp)
                .is_some_and(|d| d.0 == total_gems)
        },
        MAX_TICKS,
        &mut ProgressPrinter { interval: 100 },
    )?;
    let elapsed = t0.elapsed();

    println!();
    if done {
        println!("All {total_gems} gems delivered by {} ({:.3} s)", env.tick(), elapsed.as_secs_f64());
    } else {
        println!("Timed out at {} ({:.3} s)", env.tick(), elapsed.as_secs_f64());
    }

    println!();
    println!("{:<10} {:<12} {:<10}", "Mine", "Position", "Gems left");
    println!("{}", "-".repeat(34));
    for mine in &mines {
        let pos = env.actors().position(*mine).map(|p| p.to_string()).unwrap_or_default();
        let left = env.actors().component_of::<Gems>(*mine).map_or(0, |g| g.0);
        println!("{:<10} {:<12} {:<10}", mine.to_string(), pos, left);
    }
    let delivered = env.actors().component_of::<Delivered>(camp).map_or(0, |d| d.0);
    println!();
    println!("Camp tally: {delivered} gems");

    Ok(())
}
