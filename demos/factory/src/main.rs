//! factory — an engine factory for the rust_mas framework.
//!
//! Storage units receive periodic shipments of one part kind each; assembly
//! units consume one part of every kind to produce an engine.  Worker agents
//! deliberate over what their assembly needs most and ferry parts over from
//! whichever storage has it in stock.  A chairman meta-agent watches the
//! floor and periodically reassigns a worker to the assembly that has been
//! idle the longest.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;

use mas_actor::ActorStore;
use mas_behavior::{Action, InteractFn, Mind, WorldView};
use mas_bdi::{AgentParams, BdiAgent, Beliefs, Desire, Plan};
use mas_core::{ActorId, ActorRng, Kind, Rect, Vec2};
use mas_sim::{EnvConfig, Environment, NoopObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const WORLD:        f32 = 120.0;
const SEED:         u64 = 7;
const MAX_TICKS:    u64 = 6_000;
const REPORT_EVERY: u64 = 250;

const PART_KINDS: usize = 5;
const PART_NAMES: [&str; PART_KINDS] =
    ["sparkplugs", "valves", "crankshaft", "pistons", "carburetor"];

const STORAGE_PER_PART: usize = 2;
const ASSEMBLY_COUNT:   usize = 3;
const WORKER_COUNT:     usize = 8;

const INITIAL_STOCK:  u32 = 4;
const SHIPMENT_SIZE:  u32 = 5;
const SHIPMENT_EVERY: u64 = 25;

const ASSEMBLY_COOLDOWN: u64 = 4;
const REASSIGN_EVERY:    u64 = 50;
const ENGINE_TARGET:     u32 = 24;

const STORAGE:  Kind = Kind(1);
const ASSEMBLY: Kind = Kind(2);
const WORKER:   Kind = Kind(3);
const CHAIRMAN: Kind = Kind(4);

// ── Application components ────────────────────────────────────────────────────

/// Which part kind a storage unit receives shipments of.
#[derive(Clone, Copy, Default)]
struct Ships(usize);

/// Parts currently on a storage unit's shelves.
#[derive(Clone, Copy, Default)]
struct Stock(u32);

/// An assembly's input bins, one per part kind.
#[derive(Clone, Copy, Default)]
struct Bins([u32; PART_KINDS]);

/// Engines produced by an assembly so far.
#[derive(Clone, Copy, Default)]
struct Produced(u32);

/// Ticks an assembly has spent ready but starved of parts.
#[derive(Clone, Copy, Default)]
struct Idle(u32);

/// The single part a worker can carry, if any.
#[derive(Clone, Copy, Default)]
struct Hands(Option<usize>);

/// The assembly a worker is assigned to; `ActorId::INVALID` until the
/// chairman (or the worker's own sensing) picks one.
#[derive(Clone, Copy, Default)]
struct Post(ActorId);

// ── Run statistics ────────────────────────────────────────────────────────────

#[derive(Default)]
struct Stats {
    shipments:     u64,
    ferried:       u64,
    reassignments: u64,
}

type SharedStats = Rc<RefCell<Stats>>;

// ── Storage unit ──────────────────────────────────────────────────────────────

/// Restocks its own shelves on a fixed shipment schedule.
struct StorageMind {
    until_shipment: u64,
    stats: SharedStats,
}

impl Mind for StorageMind {
    fn act(&mut self, me: ActorId, _view: &WorldView<'_>, _rng: &mut ActorRng) -> Vec<Action> {
        if self.until_shipment > 0 {
            self.until_shipment -= 1;
            return Vec::new();
        }
        self.until_shipment = SHIPMENT_EVERY;
        self.stats.borrow_mut().shipments += 1;
        vec![Action::Interact {
            target: me,
            effect: Rc::new(|me, _, store: &mut ActorStore| {
                if let Some(stock) = store.component_of_mut::<Stock>(me) {
                    stock.0 += SHIPMENT_SIZE;
                }
            }),
        }]
    }
}

// ── Assembly unit ─────────────────────────────────────────────────────────────

/// Turns one part of every kind into an engine, then cools down.  Ticks
/// spent ready but missing parts are tallied for the chairman.
struct AssemblyMind {
    cooldown: u64,
}

impl Mind for AssemblyMind {
    fn act(&mut self, me: ActorId, view: &WorldView<'_>, _rng: &mut ActorRng) -> Vec<Action> {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return Vec::new();
        }

        let stocked = view
            .actors
            .component_of::<Bins>(me)
            .is_some_and(|b| b.0.iter().all(|&n| n > 0));

        if !stocked {
            return vec![Action::Interact {
                target: me,
                effect: Rc::new(|me, _, store: &mut ActorStore| {
                    if let Some(idle) = store.component_of_mut::<Idle>(me) {
                        idle.0 += 1;
                    }
                }),
            }];
        }

        self.cooldown = ASSEMBLY_COOLDOWN;
        vec![Action::Interact {
            target: me,
            effect: Rc::new(|me, _, store: &mut ActorStore| {
                if let Some(bins) = store.component_of_mut::<Bins>(me) {
                    for n in &mut bins.0 {
                        *n -= 1;
                    }
                }
                if let Some(produced) = store.component_of_mut::<Produced>(me) {
                    produced.0 += 1;
                }
            }),
        }]
    }
}

// ── Chairman ──────────────────────────────────────────────────────────────────

/// Meta-agent: every so often, posts a randomly chosen worker to whichever
/// assembly has been starved of parts the longest.
struct Chairman {
    until_meeting: u64,
    stats: SharedStats,
}

impl Mind for Chairman {
    fn act(&mut self, _me: ActorId, view: &WorldView<'_>, rng: &mut ActorRng) -> Vec<Action> {
        if self.until_meeting > 0 {
            self.until_meeting -= 1;
            return Vec::new();
        }
        self.until_meeting = REASSIGN_EVERY;

        let workers: Vec<ActorId> = view
            .actors
            .ids()
            .filter(|&a| view.actors.kind(a) == Some(WORKER))
            .collect();
        let Some(&worker) = rng.choose(&workers) else {
            return Vec::new();
        };

        let most_idle = view
            .actors
            .ids()
            .filter(|&a| view.actors.kind(a) == Some(ASSEMBLY))
            .max_by_key(|&a| view.actors.component_of::<Idle>(a).map_or(0, |i| i.0));
        let Some(assembly) = most_idle else {
            return Vec::new();
        };

        self.stats.borrow_mut().reassignments += 1;
        vec![Action::Interact {
            target: worker,
            effect: Rc::new(move |worker, _, store: &mut ActorStore| {
                if let Some(post) = store.component_of_mut::<Post>(worker) {
                    post.0 = assembly;
                }
            }),
        }]
    }
}

// ── Interaction effects ───────────────────────────────────────────────────────

/// Take one part off the storage unit's shelves into the worker's hands.
fn withdraw_effect() -> InteractFn {
    Rc::new(|worker, storage, store: &mut ActorStore| {
        let Some(part) = store.component_of::<Ships>(storage).map(|s| s.0) else {
            return;
        };
        let Some(stock) = store.component_of_mut::<Stock>(storage) else {
            return;
        };
        if stock.0 == 0 {
            return;
        }
        stock.0 -= 1;
        if let Some(hands) = store.component_of_mut::<Hands>(worker) {
            hands.0 = Some(part);
        }
    })
}

/// Drop the carried part into the assembly's matching input bin.
fn deposit_effect(stats: SharedStats) -> InteractFn {
    Rc::new(move |worker, assembly, store: &mut ActorStore| {
        let Some(part) = store.component_of_mut::<Hands>(worker).and_then(|h| h.0.take()) else {
            return;
        };
        if let Some(bins) = store.component_of_mut::<Bins>(assembly) {
            if let Some(bin) = bins.0.get_mut(part) {
                *bin += 1;
                stats.borrow_mut().ferried += 1;
            }
        }
    })
}

// ── Worker agent ──────────────────────────────────────────────────────────────

fn worker_agent(stats: SharedStats) -> BdiAgent {
    let params = AgentParams { perception: 30.0, reach: 2.0, speed: 1.8 };

    BdiAgent::new(params)
        .on_sense(|beliefs, _seen, me, view| {
            let held = view.actors.component_of::<Hands>(me).and_then(|h| h.0);
            beliefs.set("carrying", held.is_some());

            // Posted assembly, falling back to the closest one until the
            // chairman says otherwise.
            let posted = view
                .actors
                .component_of::<Post>(me)
                .map(|p| p.0)
                .filter(|&a| view.actors.is_alive(a));
            let assembly = posted.or_else(|| {
                let here = view.actors.position(me)?;
                view.nearest_of_kind(me, here, ASSEMBLY).map(|e| e.actor)
            });

            match assembly {
                Some(a) => {
                    beliefs.set("assembly", a);
                    if let Some(bins) = view.actors.component_of::<Bins>(a) {
                        let wanted = bins
                            .0
                            .iter()
                            .enumerate()
                            .min_by_key(|&(_, &n)| n)
                            .map_or(0, |(i, _)| i);
                        beliefs.set("wanted", wanted as f32);
                    }
                }
                None => {
                    beliefs.unset("assembly");
                }
            }
        })
        .with_desire(Desire::new(
            "fetch part",
            1.0,
            |b: &Beliefs| b.holds("carrying"),
            |b| {
                let wanted = b.get_num("wanted").unwrap_or(0.0) as usize;
                Plan::new().interact_nearest_where(
                    STORAGE,
                    move |s, view| {
                        view.actors.component_of::<Ships>(s).is_some_and(|k| k.0 == wanted)
                            && view.actors.component_of::<Stock>(s).is_some_and(|st| st.0 > 0)
                    },
                    withdraw_effect(),
                )
            },
        ))
        .with_desire(Desire::new(
            "deliver part",
            2.0,
            |b: &Beliefs| !b.holds("carrying"),
            move |b| {
                let posted = b.get_actor("assembly");
                Plan::new().interact_nearest_where(
                    ASSEMBLY,
                    move |a, _| posted == Some(a),
                    deposit_effect(stats.clone()),
                )
            },
        ))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn engines_produced(env: &Environment) -> u32 {
    env.actors()
        .component::<Produced>()
        .map_or(0, |s| s.iter().map(|p| p.0).sum())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== factory — rust_mas multi-agent framework ===");
    println!(
        "Storages: {}  |  Assemblies: {ASSEMBLY_COUNT}  |  Workers: {WORKER_COUNT}  |  Seed: {SEED}",
        PART_KINDS * STORAGE_PER_PART,
    );
    println!();

    let bounds = Rect::new(0.0, 0.0, WORLD, WORLD);
    let mut env = Environment::new(bounds, EnvConfig { seed: SEED, ..EnvConfig::default() });
    let stats: SharedStats = Rc::default();

    env.actors_mut().register_component::<Ships>();
    env.actors_mut().register_component::<Stock>();
    env.actors_mut().register_component::<Bins>();
    env.actors_mut().register_component::<Produced>();
    env.actors_mut().register_component::<Idle>();
    env.actors_mut().register_component::<Hands>();
    env.actors_mut().register_component::<Post>();

    // Storage units in two columns along the side walls, one pair per part.
    let mut storages = Vec::new();
    for part in 0..PART_KINDS {
        for column in 0..STORAGE_PER_PART {
            let pos = Vec2::new(10.0 + 100.0 * column as f32, 10.0 + 25.0 * part as f32);
            let storage = env.spawn_agent(
                STORAGE,
                pos,
                Box::new(StorageMind { until_shipment: SHIPMENT_EVERY, stats: stats.clone() }),
            )?;
            if let Some(ships) = env.actors_mut().component_of_mut::<Ships>(storage) {
                ships.0 = part;
            }
            if let Some(stock) = env.actors_mut().component_of_mut::<Stock>(storage) {
                stock.0 = INITIAL_STOCK;
            }
            storages.push(storage);
        }
    }

    // Assemblies down the middle of the floor.
    let mut assemblies = Vec::new();
    for i in 0..ASSEMBLY_COUNT {
        let pos = Vec2::new(60.0, 25.0 + 35.0 * i as f32);
        assemblies.push(env.spawn_agent(ASSEMBLY, pos, Box::new(AssemblyMind { cooldown: 0 }))?);
    }

    for i in 0..WORKER_COUNT {
        let pos = Vec2::new(25.0 + 9.0 * i as f32, 60.0);
        env.spawn_agent(WORKER, pos, Box::new(worker_agent(stats.clone())))?;
    }

    env.spawn_agent(
        CHAIRMAN,
        bounds.center(),
        Box::new(Chairman { until_meeting: REASSIGN_EVERY, stats: stats.clone() }),
    )?;

    println!("{:<8} {:<10} {:<10}", "Tick", "Engines", "Ferried");
    println!("{}", "-".repeat(28));

    let t0 = Instant::now();
    while env.tick().0 < MAX_TICKS && engines_produced(&env) < ENGINE_TARGET {
        env.run(REPORT_EVERY, &mut NoopObserver)?;
        println!(
            "{:<8} {:<10} {:<10}",
            env.tick().0,
            engines_produced(&env),
            stats.borrow().ferried,
        );
    }
    let elapsed = t0.elapsed();

    let total = engines_produced(&env);
    println!();
    if total >= ENGINE_TARGET {
        println!("Shipped {total} engines by {} ({:.3} s)", env.tick(), elapsed.as_secs_f64());
    } else {
        println!("Timed out at {} with {total} engines ({:.3} s)", env.tick(), elapsed.as_secs_f64());
    }

    println!();
    println!("{:<12} {:<10} {:<12}", "Assembly", "Engines", "Idle ticks");
    println!("{}", "-".repeat(36));
    for assembly in &assemblies {
        let engines = env.actors().component_of::<Produced>(*assembly).map_or(0, |p| p.0);
        let idle = env.actors().component_of::<Idle>(*assembly).map_or(0, |i| i.0);
        println!("{:<12} {:<10} {:<12}", assembly.to_string(), engines, idle);
    }

    println!();
    println!("{:<12} {:<12} {:<8}", "Part", "Shelved", "Units");
    println!("{}", "-".repeat(34));
    for part in 0..PART_KINDS {
        let shelved: u32 = storages
            .iter()
            .filter(|&&s| env.actors().component_of::<Ships>(s).is_some_and(|k| k.0 == part))
            .map(|&s| env.actors().component_of::<Stock>(s).map_or(0, |st| st.0))
            .sum();
        println!("{:<12} {:<12} {:<8}", PART_NAMES[part], shelved, STORAGE_PER_PART);
    }

    let stats = stats.borrow();
    println!();
    println!("Shipments received : {}", stats.shipments);
    println!("Parts ferried      : {}", stats.ferried);
    println!("Reassignments      : {}", stats.reassignments);

    Ok(())
}
