//! Evaluation Context
//!
//! Per-pass bookkeeping for the readiness check and the evaluator. Gates carry
//! no traversal state of their own; everything a pass learns about a gate is
//! recorded here, keyed by [`GateId`], and thrown away by [`EvalContext::reset`].
//!
//! Only gates actually reached by a pass get a record, so resetting costs as
//! much as the reachable subgraph and nothing more.

use indexmap::IndexMap;

use crate::graph::GateId;

/// Depth-first coloring used by the readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitState {
    /// Not reached yet in this pass.
    #[default]
    Unvisited,
    /// On the current DFS path; reaching it again means a cycle.
    InProgress,
    /// Fully explored; safe to reach again without descending.
    Done,
}

/// Everything a pass knows about one gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visit {
    pub state: VisitState,

    /// Whether `value` and `critical_path` are valid.
    pub evaluated: bool,

    /// Cached output of the gate.
    pub value: bool,

    /// Longest chain of evaluations ending at the gate.
    pub critical_path: usize,
}

/// Transient state for one evaluation batch.
///
/// A context can be reused across batches to keep its allocation; each batch
/// resets it on entry and on exit.
#[derive(Debug, Default)]
pub struct EvalContext {
    /// Records for every gate reached so far, in the order first reached.
    visits: IndexMap<GateId, Visit>,

    /// Number of gates evaluated (not served from cache) since the last reset.
    evaluations: usize,
}

impl EvalContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty context with room for `gates` records.
    pub fn with_capacity(gates: usize) -> Self {
        Self {
            visits: IndexMap::with_capacity(gates),
            evaluations: 0,
        }
    }

    /// The DFS color of a gate in this pass.
    pub fn state(&self, id: GateId) -> VisitState {
        self.visits.get(&id).map_or(VisitState::Unvisited, |visit| visit.state)
    }

    /// The full record of a gate, if the pass reached it.
    pub fn visit(&self, id: GateId) -> Option<&Visit> {
        self.visits.get(&id)
    }

    /// Cached `(value, critical_path)` of a gate evaluated in this pass.
    pub fn cached(&self, id: GateId) -> Option<(bool, usize)> {
        self.visits
            .get(&id)
            .filter(|visit| visit.evaluated)
            .map(|visit| (visit.value, visit.critical_path))
    }

    pub(crate) fn set_state(&mut self, id: GateId, state: VisitState) {
        self.visits.entry(id).or_default().state = state;
    }

    /// Cache the result of evaluating a gate.
    pub(crate) fn record(&mut self, id: GateId, value: bool, critical_path: usize) {
        let visit = self.visits.entry(id).or_default();
        visit.evaluated = true;
        visit.value = value;
        visit.critical_path = critical_path;
        self.evaluations += 1;
    }

    /// Number of gates the pass has reached.
    pub fn visited(&self) -> usize {
        self.visits.len()
    }

    /// Gates reached by the pass, in the order first reached.
    pub fn visited_gates(&self) -> impl Iterator<Item = GateId> + '_ {
        self.visits.keys().copied()
    }

    /// Number of gate evaluations performed since the last reset.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Whether no gate carries transient state.
    pub fn is_clean(&self) -> bool {
        self.visits.is_empty() && self.evaluations == 0
    }

    /// Return every gate to unvisited and unevaluated.
    pub fn reset(&mut self) {
        self.visits.clear();
        self.evaluations = 0;
    }
}
