//! Circuit Arena
//!
//! The circuit owns every gate and is the only place edges are created or
//! destroyed, so both halves of an edge always change together.
//!
//! # Wiring Protocol
//!
//! Binding an input slot always releases whatever occupied it first:
//!
//! 1. Validate the handles and the slot index
//! 2. Reserve room for the new output record on the source (the only
//!    allocation), so a failure leaves the old binding untouched
//! 3. Release the old binding, clearing its mirror record upstream
//! 4. Push the output record on the source and store the input record,
//!    which remembers the output index
//!
//! Destroying a gate walks both of its edge lists and repairs each neighbor
//! before the gate is dropped.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::gate::{Gate, GateId, InputSlot, OutputEdge};
use crate::config::CircuitConfig;
use crate::error::{NandError, Result};
use crate::eval::{self, BatchReport, EvalContext};
use crate::signal::Signal;

/// What an input slot is bound to, as seen from outside the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputBinding<'a> {
    /// Wired to the output of another gate.
    Gate(GateId),
    /// Wired to an external signal.
    Signal(&'a Signal),
    /// Not connected.
    Unbound,
}

/// A combinational circuit of NAND gates.
///
/// A circuit is not reentrant while it is being mutated; the `&mut self`
/// receivers on every wiring operation enforce that. Evaluation only needs
/// `&self` because per-pass state lives in an [`EvalContext`].
#[derive(Debug, Default)]
pub struct Circuit {
    /// All gates, indexed by ID.
    gates: HashMap<GateId, Gate>,

    config: CircuitConfig,
}

impl Circuit {
    /// Create an empty circuit with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty circuit with the given configuration.
    pub fn with_config(config: CircuitConfig) -> Self {
        Self {
            gates: HashMap::new(),
            config,
        }
    }

    /// The configuration this circuit was created with.
    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    /// Add a gate with `inputs` unbound input slots.
    ///
    /// A gate with zero inputs is a constant generator: it evaluates to
    /// `false` with a critical path of 0.
    pub fn create_gate(&mut self, inputs: usize) -> Result<GateId> {
        if let Some(limit) = self.config.max_gate_inputs {
            if inputs > limit {
                return Err(NandError::TooManyInputs {
                    requested: inputs,
                    limit,
                });
            }
        }
        if let Some(max) = self.config.max_gates {
            if self.gates.len() >= max {
                return Err(NandError::GateLimit(max));
            }
        }

        self.gates.try_reserve(1)?;
        let gate = Gate::new(inputs, self.config.initial_fan_out)?;
        let id = gate.id();
        self.gates.insert(id, gate);

        debug!(gate = id.raw(), inputs, "created gate");
        Ok(id)
    }

    /// Remove a gate and every edge touching it.
    ///
    /// Neighbors are repaired: upstream gates lose their output record and
    /// downstream slots become unbound. Returns `false` if the gate was
    /// already gone, in which case nothing happens.
    pub fn destroy_gate(&mut self, id: GateId) -> bool {
        let Some(gate) = self.gates.remove(&id) else {
            return false;
        };

        for slot in gate.inputs() {
            if let InputSlot::Gate { source, output_index } = slot {
                // A self-loop's mirror went away with the gate itself.
                if let Some(upstream) = self.gates.get_mut(source) {
                    upstream.take_output(*output_index);
                }
            }
        }

        // Only after every record is released, so no stored index goes stale.
        for source in gate.sources() {
            self.compact_outputs(source);
        }

        for edge in gate.outputs() {
            if let Some(downstream) = self.gates.get_mut(&edge.dest) {
                let old = downstream.replace_input(edge.slot, InputSlot::Unbound);
                debug_assert_eq!(old.source(), Some(id));
            }
        }

        debug!(
            gate = id.raw(),
            inputs = gate.input_count(),
            fan_out = gate.fan_out(),
            "destroyed gate"
        );
        true
    }

    /// Bind input `slot` of `dest` to the output of `source`.
    ///
    /// Any previous binding of that slot is released first. Self-loops and
    /// longer cycles are accepted here and rejected at evaluation time.
    pub fn connect_gate(&mut self, source: GateId, dest: GateId, slot: usize) -> Result<()> {
        self.check_slot(dest, slot)?;
        self.gate_mut(source)?.reserve_output()?;

        self.release_input(dest, slot);

        let output_index = self.gate_mut(source)?.push_output(OutputEdge { dest, slot });
        self.gate_mut(dest)?
            .replace_input(slot, InputSlot::Gate { source, output_index });

        trace!(
            source = source.raw(),
            dest = dest.raw(),
            slot,
            output_index,
            "connected gate"
        );
        Ok(())
    }

    /// Bind input `slot` of `dest` to an external signal.
    ///
    /// The circuit keeps a clone of the handle and never writes through it.
    pub fn connect_signal(&mut self, signal: &Signal, dest: GateId, slot: usize) -> Result<()> {
        self.check_slot(dest, slot)?;

        self.release_input(dest, slot);
        self.gate_mut(dest)?
            .replace_input(slot, InputSlot::Signal(signal.clone()));

        trace!(signal = signal.id(), dest = dest.raw(), slot, "connected signal");
        Ok(())
    }

    /// Number of consumers currently reading `id`'s output.
    pub fn fan_out(&self, id: GateId) -> Result<usize> {
        Ok(self.gate_ref(id)?.fan_out())
    }

    /// Number of input slots on `id`.
    pub fn input_count(&self, id: GateId) -> Result<usize> {
        Ok(self.gate_ref(id)?.input_count())
    }

    /// What input `slot` of `id` is bound to.
    ///
    /// An unbound slot is `Ok(InputBinding::Unbound)`; a slot past the input
    /// count is an error.
    pub fn input(&self, id: GateId, slot: usize) -> Result<InputBinding<'_>> {
        let gate = self.gate_ref(id)?;
        let binding = gate.input(slot).ok_or(NandError::SlotOutOfRange {
            slot,
            inputs: gate.input_count(),
        })?;

        Ok(match binding {
            InputSlot::Unbound => InputBinding::Unbound,
            InputSlot::Signal(signal) => InputBinding::Signal(signal),
            InputSlot::Gate { source, .. } => InputBinding::Gate(*source),
        })
    }

    /// The `index`-th consumer of `id`'s output, in connection order.
    pub fn output(&self, id: GateId, index: usize) -> Result<GateId> {
        let gate = self.gate_ref(id)?;
        gate.outputs()
            .nth(index)
            .map(|edge| edge.dest)
            .ok_or(NandError::NoSuchOutput {
                index,
                fan_out: gate.fan_out(),
            })
    }

    /// All consumers of `id`'s output, in connection order.
    pub fn outputs(&self, id: GateId) -> Result<impl Iterator<Item = OutputEdge> + '_> {
        Ok(self.gate_ref(id)?.outputs())
    }

    /// Get a gate by ID.
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(&id)
    }

    /// Whether `id` names a live gate.
    pub fn contains(&self, id: GateId) -> bool {
        self.gates.contains_key(&id)
    }

    /// IDs of all live gates, in no particular order.
    pub fn gate_ids(&self) -> impl Iterator<Item = GateId> + '_ {
        self.gates.keys().copied()
    }

    /// Get the total number of gates in the circuit.
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Whether the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Check that every edge is recorded exactly once on both endpoints.
    ///
    /// This walks the whole circuit and is meant for tests and debugging.
    pub fn is_consistent(&self) -> bool {
        let inputs_ok = self.gates.iter().all(|(&id, gate)| {
            gate.inputs().iter().enumerate().all(|(slot, binding)| match binding {
                InputSlot::Gate { source, output_index } => self
                    .gates
                    .get(source)
                    .and_then(|upstream| upstream.output_record(*output_index))
                    == Some(OutputEdge { dest: id, slot }),
                _ => true,
            })
        });

        let outputs_ok = self.gates.iter().all(|(&id, gate)| {
            (0..gate.output_len()).all(|index| match gate.output_record(index) {
                Some(edge) => matches!(
                    self.gates.get(&edge.dest).and_then(|g| g.input(edge.slot)),
                    Some(InputSlot::Gate { source, output_index })
                        if *source == id && *output_index == index
                ),
                None => true,
            })
        });

        inputs_ok && outputs_ok
    }

    /// Evaluate a batch of gates.
    ///
    /// `None` entries are skipped and their slot in `out` is left untouched.
    /// On success each evaluated root's value is written to the matching
    /// position of `out` and the longest critical path among the roots is
    /// returned. On failure `out` is not written.
    pub fn evaluate(&self, roots: &[Option<GateId>], out: &mut [bool]) -> Result<usize> {
        let mut ctx = EvalContext::new();
        self.evaluate_with(&mut ctx, roots, out)
    }

    /// Like [`evaluate`](Self::evaluate), reusing the allocation of `ctx`.
    pub fn evaluate_with(
        &self,
        ctx: &mut EvalContext,
        roots: &[Option<GateId>],
        out: &mut [bool],
    ) -> Result<usize> {
        if out.len() < roots.len() {
            return Err(NandError::OutputTooShort {
                len: out.len(),
                needed: roots.len(),
            });
        }

        let report = eval::run_batch(self, ctx, roots)?;
        for (slot, value) in out.iter_mut().zip(&report.outputs) {
            if let Some(value) = value {
                *slot = *value;
            }
        }
        Ok(report.critical_path)
    }

    /// Evaluate a batch and return the full report.
    pub fn run_batch(&self, roots: &[Option<GateId>]) -> Result<BatchReport> {
        eval::run_batch(self, &mut EvalContext::new(), roots)
    }

    /// Evaluate a single gate, returning its value and critical path.
    pub fn evaluate_gate(&self, id: GateId) -> Result<(bool, usize)> {
        let report = self.run_batch(&[Some(id)])?;
        let value = report.outputs[0].ok_or(NandError::UnknownGate(id))?;
        Ok((value, report.critical_path))
    }

    fn gate_ref(&self, id: GateId) -> Result<&Gate> {
        self.gates.get(&id).ok_or(NandError::UnknownGate(id))
    }

    fn gate_mut(&mut self, id: GateId) -> Result<&mut Gate> {
        self.gates.get_mut(&id).ok_or(NandError::UnknownGate(id))
    }

    fn check_slot(&self, id: GateId, slot: usize) -> Result<()> {
        let inputs = self.gate_ref(id)?.input_count();
        if slot >= inputs {
            return Err(NandError::SlotOutOfRange { slot, inputs });
        }
        Ok(())
    }

    /// Unbind a slot and clear the matching upstream output record.
    fn release_input(&mut self, dest: GateId, slot: usize) {
        let Some(gate) = self.gates.get_mut(&dest) else {
            return;
        };

        if let InputSlot::Gate { source, output_index } = gate.replace_input(slot, InputSlot::Unbound) {
            if let Some(upstream) = self.gates.get_mut(&source) {
                upstream.take_output(output_index);
            }
            self.compact_outputs(source);
            trace!(source = source.raw(), dest = dest.raw(), slot, "released edge");
        }
    }

    /// Squeeze holes out of `id`'s output list once they dominate it, and
    /// relink the consumers whose records moved.
    fn compact_outputs(&mut self, id: GateId) {
        let Some(gate) = self.gates.get_mut(&id) else {
            return;
        };
        if !gate.needs_compaction() {
            return;
        }

        let moved = gate.compact_outputs();
        for (edge, index) in &moved {
            if let Some(consumer) = self.gates.get_mut(&edge.dest) {
                consumer.relink_input(edge.slot, *index);
            }
        }
        trace!(gate = id.raw(), moved = moved.len(), "compacted outputs");
    }
}
