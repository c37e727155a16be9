//! Plans: ordered instruction queues built by desire factories.
//!
//! An instruction is deliberately coarse — "get near this place", "interact
//! with the nearest such-and-such" — so a plan survives a changing world
//! without replanning.  The fine-grained movement comes out one step per
//! tick when the engine executes it.

use std::collections::VecDeque;
use std::rc::Rc;

use mas_behavior::{InteractFn, WorldView};
use mas_core::{ActorId, Kind, Vec2};

// ── Target ────────────────────────────────────────────────────────────────────

/// Where a movement instruction is headed.
///
/// `Belief` targets are resolved at execution time from the agent's own
/// beliefs, so a plan written before the destination is known still works
/// once sensing fills the belief in.
#[derive(Clone, Debug)]
pub enum Target {
    /// A fixed point in the world.
    Point(Vec2),
    /// A belief key holding either a `Point` or a live `Actor`.
    Belief(String),
}

impl From<Vec2> for Target {
    fn from(v: Vec2) -> Self {
        Target::Point(v)
    }
}

impl From<&str> for Target {
    fn from(key: &str) -> Self {
        Target::Belief(key.to_owned())
    }
}

// ── Instruction ───────────────────────────────────────────────────────────────

/// Extra acceptance test applied to interaction candidates.
pub type Filter = Rc<dyn Fn(ActorId, &WorldView<'_>) -> bool>;

/// One step of a plan.
pub enum Instruction {
    /// Move toward `target` until within `tolerance` of it.
    MoveToward { target: Target, tolerance: f32 },
    /// Approach and interact with the nearest live actor of `kind` that
    /// passes `filter` (when present).
    InteractNearest {
        kind:   Kind,
        filter: Option<Filter>,
        effect: InteractFn,
    },
    /// Descend into a nested plan; the outer plan resumes when it finishes.
    SubGoal(Plan),
}

impl std::fmt::Debug for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::MoveToward { target, tolerance } => f
                .debug_struct("MoveToward")
                .field("target", target)
                .field("tolerance", tolerance)
                .finish(),
            Instruction::InteractNearest { kind, .. } => f
                .debug_struct("InteractNearest")
                .field("kind", kind)
                .finish_non_exhaustive(),
            Instruction::SubGoal(plan) => f.debug_tuple("SubGoal").field(plan).finish(),
        }
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// A queue of instructions, consumed front to back.
#[derive(Debug, Default)]
pub struct Plan {
    steps: VecDeque<Instruction>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    // ── Builders ──────────────────────────────────────────────────────────

    pub fn move_toward(mut self, target: impl Into<Target>, tolerance: f32) -> Self {
        self.steps.push_back(Instruction::MoveToward {
            target: target.into(),
            tolerance,
        });
        self
    }

    pub fn interact_nearest(self, kind: Kind, effect: InteractFn) -> Self {
        self.interact(kind, None, effect)
    }

    pub fn interact_nearest_where(
        self,
        kind: Kind,
        filter: impl Fn(ActorId, &WorldView<'_>) -> bool + 'static,
        effect: InteractFn,
    ) -> Self {
        self.interact(kind, Some(Rc::new(filter)), effect)
    }

    fn interact(mut self, kind: Kind, filter: Option<Filter>, effect: InteractFn) -> Self {
        self.steps.push_back(Instruction::InteractNearest { kind, filter, effect });
        self
    }

    pub fn sub(mut self, inner: Plan) -> Self {
        self.steps.push_back(Instruction::SubGoal(inner));
        self
    }

    pub fn then(mut self, instruction: Instruction) -> Self {
        self.steps.push_back(instruction);
        self
    }

    // ── Engine access ─────────────────────────────────────────────────────

    pub(crate) fn front(&self) -> Option<&Instruction> {
        self.steps.front()
    }

    pub(crate) fn pop(&mut self) -> Option<Instruction> {
        self.steps.pop_front()
    }
}
