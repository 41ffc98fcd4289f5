use crate::material::MaterialId;
use crate::world::position::Offset;

/// A pure description of a local rearrangement, relative to the cell that
/// produced it. Nothing happens until the tick's apply phase executes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Exchange the center cell with the cell at `offset`.
    Swap(Offset),
    /// Set every target cell to `material`.
    Convert {
        targets: Vec<Offset>,
        material: MaterialId,
    },
    /// Run `action` with the given probability. A failed roll re-queues the
    /// originating cell for the next tick.
    Chance {
        action: Box<Action>,
        probability: f64,
    },
    /// Run one child, picked uniformly.
    OneOf(Vec<Action>),
    /// Run every child, in order.
    AllOf(Vec<Action>),
}

impl Action {
    pub fn swap(offset: Offset) -> Self {
        Action::Swap(offset)
    }

    pub fn convert(target: Offset, material: MaterialId) -> Self {
        Action::Convert {
            targets: vec![target],
            material,
        }
    }

    pub fn convert_many(targets: Vec<Offset>, material: MaterialId) -> Self {
        Action::Convert { targets, material }
    }

    pub fn chance(action: Action, probability: f64) -> Self {
        Action::Chance {
            action: Box::new(action),
            probability,
        }
    }

    /// Depth-first walk over this action and every nested child.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Action)) {
        visit(self);
        match self {
            Action::Swap(_) | Action::Convert { .. } => {}
            Action::Chance { action, .. } => action.walk(visit),
            Action::OneOf(children) | Action::AllOf(children) => {
                for child in children {
                    child.walk(visit);
                }
            }
        }
    }

    /// Whether any nested action satisfies `pred`.
    pub fn any(&self, mut pred: impl FnMut(&Action) -> bool) -> bool {
        let mut found = false;
        self.walk(&mut |a| found |= pred(a));
        found
    }
}

/// An action paired with its relative selection weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub action: Action,
    pub weight: f64,
}

impl Candidate {
    pub fn new(action: Action, weight: f64) -> Self {
        Self { action, weight }
    }
}

/// Weighted selection: draws `roll` in `[0, 1)` scaled to the weight sum and
/// walks the running total until it reaches the draw. Candidates with
/// non-positive weight are never selected.
pub fn select(candidates: &[Candidate], roll: f64) -> Option<&Candidate> {
    let total: f64 = candidates.iter().map(|c| c.weight.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let target = roll * total;
    let mut running = 0.0;
    let mut last = None;
    for candidate in candidates.iter().filter(|c| c.weight > 0.0) {
        running += candidate.weight;
        last = Some(candidate);
        if running > target {
            return last;
        }
    }
    // Rounding can leave the running total a hair short of the draw.
    last
}
