//! Readiness Check
//!
//! Before anything is evaluated, every gate reachable from the batch roots is
//! walked backwards through its gate-to-gate inputs with three-color DFS:
//!
//! - an unbound slot means the wiring is incomplete
//! - reaching an `InProgress` gate means a cycle
//! - `Done` gates are skipped, so shared subgraphs are walked once
//!
//! Signal inputs are leaves. The walk uses an explicit stack, so deep chains
//! do not grow the call stack.

use smallvec::SmallVec;

use super::context::{EvalContext, VisitState};
use crate::error::{NandError, NotReady, Result};
use crate::graph::{Circuit, GateId, InputSlot};

/// Check the subgraph behind `root`, leaving every reached gate `Done`.
pub(crate) fn check_ready(circuit: &Circuit, ctx: &mut EvalContext, root: GateId) -> Result<()> {
    if ctx.state(root) == VisitState::Done {
        return Ok(());
    }

    // (gate, next input slot to inspect)
    let mut stack: SmallVec<[(GateId, usize); 32]> = SmallVec::new();
    ctx.set_state(root, VisitState::InProgress);
    stack.push((root, 0));

    while let Some((id, next)) = stack.pop() {
        let gate = circuit.gate(id).ok_or(NandError::UnknownGate(id))?;

        let Some(slot) = gate.input(next) else {
            ctx.set_state(id, VisitState::Done);
            continue;
        };
        stack.push((id, next + 1));

        match slot {
            InputSlot::Unbound => {
                return Err(NotReady::Unbound { gate: id, slot: next }.into());
            }
            InputSlot::Signal(_) => {}
            InputSlot::Gate { source, .. } => match ctx.state(*source) {
                VisitState::Unvisited => {
                    ctx.set_state(*source, VisitState::InProgress);
                    stack.push((*source, 0));
                }
                VisitState::InProgress => {
                    return Err(NotReady::Cycle { gate: *source }.into());
                }
                VisitState::Done => {}
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Signal;

    #[test]
    fn wired_chain_is_ready() {
        let mut circuit = Circuit::new();
        let signal = Signal::new(true);
        let a = circuit.create_gate(1).unwrap();
        let b = circuit.create_gate(2).unwrap();
        circuit.connect_signal(&signal, a, 0).unwrap();
        circuit.connect_gate(a, b, 0).unwrap();
        circuit.connect_signal(&signal, b, 1).unwrap();

        let mut ctx = EvalContext::new();
        check_ready(&circuit, &mut ctx, b).unwrap();

        assert_eq!(ctx.state(a), VisitState::Done);
        assert_eq!(ctx.state(b), VisitState::Done);
    }

    #[test]
    fn generator_is_ready() {
        let mut circuit = Circuit::new();
        let g = circuit.create_gate(0).unwrap();

        let mut ctx = EvalContext::new();
        check_ready(&circuit, &mut ctx, g).unwrap();
        assert_eq!(ctx.state(g), VisitState::Done);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut circuit = Circuit::new();
        let g = circuit.create_gate(1).unwrap();
        circuit.connect_gate(g, g, 0).unwrap();

        let mut ctx = EvalContext::new();
        assert_eq!(
            check_ready(&circuit, &mut ctx, g),
            Err(NandError::NotReady(NotReady::Cycle { gate: g }))
        );
    }

    #[test]
    fn unbound_slot_is_reported() {
        let mut circuit = Circuit::new();
        let signal = Signal::new(false);
        let upstream = circuit.create_gate(2).unwrap();
        let root = circuit.create_gate(1).unwrap();
        circuit.connect_signal(&signal, upstream, 0).unwrap();
        circuit.connect_gate(upstream, root, 0).unwrap();

        let mut ctx = EvalContext::new();
        assert_eq!(
            check_ready(&circuit, &mut ctx, root),
            Err(NandError::NotReady(NotReady::Unbound { gate: upstream, slot: 1 }))
        );
    }

    #[test]
    fn shared_input_is_not_a_cycle() {
        let mut circuit = Circuit::new();
        let shared = circuit.create_gate(0).unwrap();
        let root = circuit.create_gate(2).unwrap();
        circuit.connect_gate(shared, root, 0).unwrap();
        circuit.connect_gate(shared, root, 1).unwrap();

        let mut ctx = EvalContext::new();
        check_ready(&circuit, &mut ctx, root).unwrap();
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let mut circuit = Circuit::new();
        let mut prev = circuit.create_gate(0).unwrap();
        for _ in 0..100_000 {
            let next = circuit.create_gate(1).unwrap();
            circuit.connect_gate(prev, next, 0).unwrap();
            prev = next;
        }

        let mut ctx = EvalContext::new();
        check_ready(&circuit, &mut ctx, prev).unwrap();
        assert_eq!(ctx.visited(), 100_001);
    }
}
