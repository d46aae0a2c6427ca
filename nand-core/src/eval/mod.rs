//! Batch Evaluation
//!
//! This module runs one evaluation batch over a set of root gates.
//!
//! # Algorithm
//!
//! 1. Validate the batch: it must be non-empty, hold at least one gate, and
//!    name only live gates
//! 2. Run the readiness check from every root. The whole reachable subgraph
//!    is checked before anything is evaluated, so a cycle behind any root
//!    rejects the batch
//! 3. Evaluate every root with the memoized evaluator, collecting outputs and
//!    the longest critical path
//! 4. Reset the context, whether the batch succeeded or not
//!
//! Because the context is reset on entry and exit, a later batch (with other
//! roots, or after signals changed) never sees stale results.

mod context;
mod cycle;
mod evaluate;

pub use context::{EvalContext, Visit, VisitState};

use tracing::{debug, debug_span, warn};

use crate::error::{NandError, Result};
use crate::graph::{Circuit, GateId};

/// Result of one evaluation batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Output per batch entry; `None` where the entry was empty.
    pub outputs: Vec<Option<bool>>,

    /// Longest critical path among the evaluated roots.
    pub critical_path: usize,

    /// Number of distinct gates evaluated.
    pub gates_evaluated: usize,
}

/// Evaluate `roots` using `ctx` for per-pass state.
pub(crate) fn run_batch(
    circuit: &Circuit,
    ctx: &mut EvalContext,
    roots: &[Option<GateId>],
) -> Result<BatchReport> {
    validate(circuit, roots)?;

    let _span = debug_span!("evaluate_batch", roots = roots.len()).entered();

    ctx.reset();
    let result = evaluate_roots(circuit, ctx, roots);
    ctx.reset();

    match &result {
        Ok(report) => debug!(
            critical_path = report.critical_path,
            gates_evaluated = report.gates_evaluated,
            "batch evaluated"
        ),
        Err(err) => warn!(error = %err, "batch rejected"),
    }
    result
}

fn validate(circuit: &Circuit, roots: &[Option<GateId>]) -> Result<()> {
    if roots.is_empty() {
        return Err(NandError::EmptyBatch);
    }

    let mut any = false;
    for id in roots.iter().flatten() {
        if !circuit.contains(*id) {
            return Err(NandError::UnknownGate(*id));
        }
        any = true;
    }

    if !any {
        return Err(NandError::NoRoots);
    }
    Ok(())
}

fn evaluate_roots(
    circuit: &Circuit,
    ctx: &mut EvalContext,
    roots: &[Option<GateId>],
) -> Result<BatchReport> {
    for root in roots.iter().flatten() {
        cycle::check_ready(circuit, ctx, *root)?;
    }

    let mut outputs = Vec::with_capacity(roots.len());
    let mut critical_path = 0;

    for root in roots {
        let output = match root {
            Some(id) => {
                let (value, path) = evaluate::evaluate_gate(circuit, ctx, *id)?;
                critical_path = critical_path.max(path);
                Some(value)
            }
            None => None,
        };
        outputs.push(output);
    }

    Ok(BatchReport {
        outputs,
        critical_path,
        gates_evaluated: ctx.evaluations(),
    })
}
