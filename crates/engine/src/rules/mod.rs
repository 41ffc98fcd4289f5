pub mod action;
pub mod neighborhood;

pub use action::{Action, Candidate};
pub use neighborhood::Neighborhood;

/// Whether resolution should consult the next rule in the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// A rule function: given a cell's 3x3 neighborhood, append zero or more
/// weighted candidate actions for the center cell.
///
/// Rules must be **pure** functions of the nine material ids. They see no
/// world, no position and no randomness, which is what lets the scheduler
/// memoize their output by neighborhood fingerprint.
pub type RuleFn = fn(&Neighborhood<'_>, &mut Vec<Candidate>) -> Flow;

/// An ordered collection of rules. Resolution walks them in order and stops
/// at the first one that returns [`Flow::Stop`].
#[derive(Clone)]
pub struct RuleSet {
    rules: Vec<RuleFn>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add(&mut self, rule: RuleFn) {
        self.rules.push(rule);
    }

    pub fn with(mut self, rule: RuleFn) -> Self {
        self.add(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn resolve(&self, neighborhood: &Neighborhood<'_>) -> Vec<Candidate> {
        let mut out = Vec::new();
        for rule in &self.rules {
            if rule(neighborhood, &mut out) == Flow::Stop {
                break;
            }
        }
        out
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}
