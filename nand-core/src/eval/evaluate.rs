//! Memoized Evaluator
//!
//! Computes a gate's output and critical path bottom-up, caching both in the
//! [`EvalContext`] so every gate is evaluated at most once per pass no matter
//! how many consumers or roots share it.
//!
//! # Rules
//!
//! - Output is the NAND of all inputs: `true` iff some input is `false`.
//! - A signal input contributes path length 1.
//! - A gate input contributes `1 + critical_path(source)`.
//! - A gate with no inputs outputs `false` with critical path 0.

use smallvec::SmallVec;

use super::context::EvalContext;
use crate::error::{NandError, NotReady, Result};
use crate::graph::{Circuit, GateId, InputSlot};

/// A gate whose inputs are being folded.
#[derive(Debug, Clone, Copy)]
struct Frame {
    id: GateId,
    /// Next input slot to fold.
    next: usize,
    /// Whether a `false` input has been seen.
    found_false: bool,
    /// Longest input path folded so far.
    path: usize,
}

impl Frame {
    fn new(id: GateId) -> Self {
        Self {
            id,
            next: 0,
            found_false: false,
            path: 0,
        }
    }

    fn fold(&mut self, value: bool, path: usize) {
        self.found_false |= !value;
        self.path = self.path.max(path);
        self.next += 1;
    }
}

/// Evaluate `root`, returning its `(value, critical_path)`.
///
/// The subgraph behind `root` must already have passed
/// [`check_ready`](super::cycle::check_ready) in the same context.
pub(crate) fn evaluate_gate(
    circuit: &Circuit,
    ctx: &mut EvalContext,
    root: GateId,
) -> Result<(bool, usize)> {
    if let Some(cached) = ctx.cached(root) {
        return Ok(cached);
    }

    let mut stack: SmallVec<[Frame; 32]> = SmallVec::new();
    stack.push(Frame::new(root));

    while let Some(mut frame) = stack.pop() {
        let gate = circuit.gate(frame.id).ok_or(NandError::UnknownGate(frame.id))?;

        match gate.input(frame.next) {
            // All inputs folded. A generator never sees a false input, so it
            // ends up `false` with path 0.
            None => ctx.record(frame.id, frame.found_false, frame.path),
            Some(InputSlot::Unbound) => {
                return Err(NotReady::Unbound {
                    gate: frame.id,
                    slot: frame.next,
                }
                .into());
            }
            Some(InputSlot::Signal(signal)) => {
                frame.fold(signal.get(), 1);
                stack.push(frame);
            }
            Some(InputSlot::Gate { source, .. }) => match ctx.cached(*source) {
                Some((value, path)) => {
                    frame.fold(value, path + 1);
                    stack.push(frame);
                }
                None => {
                    // An acyclic path visits each gate at most once.
                    if stack.len() >= circuit.gate_count() {
                        return Err(NotReady::Cycle { gate: *source }.into());
                    }
                    stack.push(frame);
                    stack.push(Frame::new(*source));
                }
            },
        }
    }

    ctx.cached(root).ok_or(NandError::UnknownGate(root))
}
