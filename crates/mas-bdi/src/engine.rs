//! The belief-desire-intention execution loop.
//!
//! Every tick an agent senses, deliberates, and executes at most one real
//! instruction of its current plan.  Deliberation runs before execution on
//! every single tick, so a newly stronger desire preempts the running plan
//! immediately; the abandoned plan is simply dropped and rebuilt from its
//! factory if the desire is ever readopted.

use mas_actor::ActorStore;
use mas_behavior::{Action, InteractFn, Mind, WorldView};
use mas_core::{ActorId, ActorRng, Kind, Vec2};
use mas_spatial::SpatialEntry;

use crate::belief::{Belief, Beliefs};
use crate::desire::{Desire, DesireSet};
use crate::plan::{Filter, Instruction, Plan, Target};

// ── Parameters ────────────────────────────────────────────────────────────────

/// Per-agent tuning knobs, fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct AgentParams {
    /// Sense radius for the per-tick perception query.
    pub perception: f32,
    /// Maximum distance at which an interaction fires.
    pub reach: f32,
    /// Maximum distance moved per tick.
    pub speed: f32,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self { perception: 10.0, reach: 1.0, speed: 1.0 }
    }
}

// ── Phase ─────────────────────────────────────────────────────────────────────

/// What the agent did (or failed to do) on its most recent tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No unsatisfied desire; the agent has nothing to pursue.
    #[default]
    Idle,
    /// A plan is in progress and its current instruction is executable.
    Executing,
    /// The current instruction cannot proceed yet (no target resolvable).
    /// It is retried in full every tick.
    Blocked,
}

// ── BdiAgent ──────────────────────────────────────────────────────────────────

type SenseFn      = Box<dyn FnMut(&mut Beliefs, &[SpatialEntry], ActorId, &WorldView<'_>)>;
type DeliberateFn = Box<dyn FnMut(&mut DesireSet, &Beliefs)>;

struct CurrentIntention {
    /// Name of the desire this plan serves.
    name: String,
    /// Plan frames, innermost last.  Sub-goals push a frame; finishing one
    /// pops back to the enclosing plan.
    stack: Vec<Plan>,
}

/// What the front instruction asks for, extracted so execution can run
/// without holding a borrow on the plan stack.
enum Step {
    Move { target: Target, tolerance: f32 },
    Interact { kind: Kind, filter: Option<Filter>, effect: InteractFn },
}

/// A deliberating mind: beliefs, a desire set, and one intention at a time.
///
/// Implements [`Mind`], so it plugs into the environment exactly like any
/// hand-written reactive mind.
pub struct BdiAgent {
    params:        AgentParams,
    beliefs:       Beliefs,
    desires:       DesireSet,
    on_sense:      Option<SenseFn>,
    on_deliberate: Option<DeliberateFn>,
    current:       Option<CurrentIntention>,
    blocked:       bool,
}

impl BdiAgent {
    pub fn new(params: AgentParams) -> Self {
        Self {
            params,
            beliefs:       Beliefs::new(),
            desires:       DesireSet::new(),
            on_sense:      None,
            on_deliberate: None,
            current:       None,
            blocked:       false,
        }
    }

    // ── Builder ───────────────────────────────────────────────────────────

    pub fn with_desire(mut self, desire: Desire) -> Self {
        self.desires.add(desire);
        self
    }

    pub fn with_belief(mut self, key: impl Into<String>, value: impl Into<Belief>) -> Self {
        self.beliefs.set(key, value);
        self
    }

    /// Install the sensing hook, run every tick on the fresh perception
    /// list before deliberation.  This is the only place beliefs should be
    /// refreshed from the world.
    pub fn on_sense(
        mut self,
        f: impl FnMut(&mut Beliefs, &[SpatialEntry], ActorId, &WorldView<'_>) + 'static,
    ) -> Self {
        self.on_sense = Some(Box::new(f));
        self
    }

    /// Install the deliberation hook, run after sensing.  Lets an agent
    /// add, remove, or retune desires as its beliefs evolve.
    pub fn on_deliberate(mut self, f: impl FnMut(&mut DesireSet, &Beliefs) + 'static) -> Self {
        self.on_deliberate = Some(Box::new(f));
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn params(&self) -> AgentParams {
        self.params
    }

    pub fn beliefs(&self) -> &Beliefs {
        &self.beliefs
    }

    pub fn beliefs_mut(&mut self) -> &mut Beliefs {
        &mut self.beliefs
    }

    pub fn desires(&self) -> &DesireSet {
        &self.desires
    }

    /// Name of the desire currently being pursued, if any.
    pub fn intention(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.name.as_str())
    }

    pub fn phase(&self) -> Phase {
        match (&self.current, self.blocked) {
            (None, _) => Phase::Idle,
            (Some(_), true) => Phase::Blocked,
            (Some(_), false) => Phase::Executing,
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Re-evaluate which desire to pursue.  Called every tick, before
    /// execution, so stronger desires preempt mid-plan.
    fn reconsider(&mut self) {
        // Drop the intention if its desire vanished or became satisfied.
        if let Some(cur) = &self.current {
            let still_wanted = self
                .desires
                .get(&cur.name)
                .is_some_and(|d| !d.is_satisfied(&self.beliefs));
            if !still_wanted {
                self.current = None;
                self.blocked = false;
            }
        }

        let Some(best) = self.desires.select(&self.beliefs) else {
            self.current = None;
            self.blocked = false;
            return;
        };

        let adopt = match &self.current {
            None => true,
            // Strictly stronger: an equal-strength rival never interrupts.
            Some(cur) => {
                cur.name != best.name()
                    && self
                        .desires
                        .get(&cur.name)
                        .is_none_or(|d| best.strength() > d.strength())
            }
        };

        if adopt {
            let plan = best.build_plan(&self.beliefs);
            self.current = Some(CurrentIntention {
                name:  best.name().to_owned(),
                stack: vec![plan],
            });
            self.blocked = false;
        }
    }

    /// Resolve a movement target to a world position, reading beliefs for
    /// indirect targets.  `None` when the belief is missing, ill-typed, or
    /// names a dead actor.
    fn resolve_target(&self, target: &Target, actors: &ActorStore) -> Option<Vec2> {
        match target {
            Target::Point(p) => Some(*p),
            Target::Belief(key) => match self.beliefs.get(key)? {
                Belief::Point(p) => Some(*p),
                Belief::Actor(a) => actors.position(*a),
                _ => None,
            },
        }
    }

    /// Pop the front instruction of the innermost frame, then unwind any
    /// frames it emptied.  Clears the intention when the whole plan is done.
    fn advance(&mut self) {
        let Some(cur) = &mut self.current else {
            return;
        };
        if let Some(frame) = cur.stack.last_mut() {
            frame.pop();
        }
        while cur.stack.last().is_some_and(Plan::is_empty) {
            cur.stack.pop();
        }
        if cur.stack.is_empty() {
            self.current = None;
        }
    }

    /// Walk frame bookkeeping until a real instruction is at the front,
    /// and extract it.  `None` means the plan ran out.
    fn next_step(&mut self) -> Option<Step> {
        loop {
            let cur = self.current.as_mut()?;
            let Some(frame) = cur.stack.last_mut() else {
                self.current = None;
                return None;
            };
            match frame.front() {
                None => {
                    cur.stack.pop();
                    if cur.stack.is_empty() {
                        self.current = None;
                        return None;
                    }
                }
                Some(Instruction::SubGoal(_)) => {
                    let Some(Instruction::SubGoal(inner)) = frame.pop() else {
                        unreachable!("front was a sub-goal");
                    };
                    cur.stack.push(inner);
                }
                Some(Instruction::MoveToward { target, tolerance }) => {
                    return Some(Step::Move {
                        target:    target.clone(),
                        tolerance: *tolerance,
                    });
                }
                Some(Instruction::InteractNearest { kind, filter, effect }) => {
                    return Some(Step::Interact {
                        kind:   *kind,
                        filter: filter.clone(),
                        effect: effect.clone(),
                    });
                }
            }
        }
    }

    /// Execute at most one real instruction of the current plan.  Frame
    /// bookkeeping (finished frames, sub-goal descent) is free; arriving at
    /// a waypoint or firing an interaction consumes the instruction.
    fn execute(&mut self, me: ActorId, view: &WorldView<'_>) -> Vec<Action> {
        let Some(pos) = view.actors.position(me) else {
            return Vec::new();
        };
        let Some(step) = self.next_step() else {
            return Vec::new();
        };

        match step {
            Step::Move { target, tolerance } => {
                let Some(dest) = self.resolve_target(&target, view.actors) else {
                    self.blocked = true;
                    return Vec::new();
                };
                self.blocked = false;
                if pos.distance_sq(dest) <= tolerance * tolerance {
                    self.advance();
                    return Vec::new();
                }
                vec![Action::MoveTo(pos.step_toward(dest, self.params.speed))]
            }

            Step::Interact { kind, filter, effect } => {
                let candidate = view.nearest(pos, |e| {
                    e.actor != me
                        && e.kind == kind
                        && filter.as_ref().is_none_or(|f| f(e.actor, view))
                });
                let Some(found) = candidate else {
                    self.blocked = true;
                    return Vec::new();
                };
                self.blocked = false;
                if pos.distance_sq(found.pos) <= self.params.reach * self.params.reach {
                    self.advance();
                    return vec![Action::Interact { target: found.actor, effect }];
                }
                // Not in reach yet: close the gap, keep the instruction.
                vec![Action::MoveTo(pos.step_toward(found.pos, self.params.speed))]
            }
        }
    }
}

impl Mind for BdiAgent {
    fn act(&mut self, me: ActorId, view: &WorldView<'_>, _rng: &mut ActorRng) -> Vec<Action> {
        // Sense.
        if let Some(sense) = &mut self.on_sense {
            let seen = view.perceive(me, self.params.perception);
            sense(&mut self.beliefs, &seen, me, view);
        }

        // Deliberate.
        if let Some(deliberate) = &mut self.on_deliberate {
            deliberate(&mut self.desires, &self.beliefs);
        }
        self.reconsider();

        // Execute.
        self.execute(me, view)
    }
}
