//! Desires and the deliberation rule that picks one to pursue.
//!
//! A desire couples a satisfaction predicate with a plan factory.  The
//! predicate is checked against the agent's current beliefs every tick; the
//! factory is invoked only when the desire is (re)adopted as the current
//! intention.

use crate::belief::Beliefs;
use crate::plan::Plan;

// ── Desire ────────────────────────────────────────────────────────────────────

type SatisfiedFn = Box<dyn Fn(&Beliefs) -> bool>;
type PlanFn      = Box<dyn Fn(&Beliefs) -> Plan>;

/// A named goal with a fixed strength.
pub struct Desire {
    name:      String,
    strength:  f32,
    satisfied: SatisfiedFn,
    plan:      PlanFn,
}

impl Desire {
    pub fn new(
        name: impl Into<String>,
        strength: f32,
        satisfied: impl Fn(&Beliefs) -> bool + 'static,
        plan: impl Fn(&Beliefs) -> Plan + 'static,
    ) -> Self {
        Self {
            name:      name.into(),
            strength,
            satisfied: Box::new(satisfied),
            plan:      Box::new(plan),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn is_satisfied(&self, beliefs: &Beliefs) -> bool {
        (self.satisfied)(beliefs)
    }

    /// Build a fresh plan for this desire from the current beliefs.
    pub fn build_plan(&self, beliefs: &Beliefs) -> Plan {
        (self.plan)(beliefs)
    }
}

impl std::fmt::Debug for Desire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desire")
            .field("name", &self.name)
            .field("strength", &self.strength)
            .finish_non_exhaustive()
    }
}

// ── DesireSet ─────────────────────────────────────────────────────────────────

/// An agent's desires, kept in declaration order.
///
/// Declaration order matters: when two unsatisfied desires share the highest
/// strength, the one declared first wins.
#[derive(Default)]
pub struct DesireSet {
    desires: Vec<Desire>,
}

impl DesireSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a desire.  A desire with the same name replaces the old one in
    /// its original slot, keeping the declaration order stable.
    pub fn add(&mut self, desire: Desire) {
        match self.desires.iter().position(|d| d.name == desire.name) {
            Some(i) => self.desires[i] = desire,
            None => self.desires.push(desire),
        }
    }

    /// Drop the desire named `name`.  Returns `false` if it was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.desires.iter().position(|d| d.name == name) {
            Some(i) => {
                self.desires.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Desire> {
        self.desires.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Desire> {
        self.desires.iter()
    }

    pub fn len(&self) -> usize {
        self.desires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.desires.is_empty()
    }

    /// The strongest unsatisfied desire, or `None` when every desire is
    /// satisfied (or there are none).  Ties go to the earliest declared:
    /// the scan only replaces the candidate on strictly greater strength.
    pub fn select(&self, beliefs: &Beliefs) -> Option<&Desire> {
        let mut best: Option<&Desire> = None;
        for d in &self.desires {
            if d.is_satisfied(beliefs) {
                continue;
            }
            if best.is_none_or(|b| d.strength > b.strength) {
                best = Some(d);
            }
        }
        best
    }
}
