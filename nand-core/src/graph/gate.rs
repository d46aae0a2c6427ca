//! Gates and Edges
//!
//! This module defines the gate node stored in the circuit arena and the two
//! halves of a gate-to-gate edge.
//!
//! An edge from `source` to input `slot` of `dest` is recorded twice:
//!
//! - `dest.inputs[slot]` holds [`InputSlot::Gate`] naming `source` and the
//!   index of the matching record in `source`'s output list.
//! - `source.outputs[output_index]` holds an [`OutputEdge`] naming `dest` and
//!   `slot`.
//!
//! Either half is enough to find and clear the other in O(1).

use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::error::Result;
use crate::signal::Signal;

/// Unique identifier for a gate.
///
/// IDs are drawn from a process-wide counter and never reused, so a handle to
/// a destroyed gate can never alias a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(u64);

impl GateId {
    /// Generate a new unique gate ID.
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for GateId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// What an input slot is bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputSlot {
    /// Never connected, or released.
    #[default]
    Unbound,

    /// An external boolean owned by the caller.
    Signal(Signal),

    /// The output of another gate. `output_index` locates the mirror record
    /// in the source gate's output list.
    Gate { source: GateId, output_index: usize },
}

impl InputSlot {
    /// Whether this slot is bound to anything.
    pub fn is_bound(&self) -> bool {
        !matches!(self, InputSlot::Unbound)
    }

    /// The upstream gate, if this slot is wired to one.
    pub fn source(&self) -> Option<GateId> {
        match self {
            InputSlot::Gate { source, .. } => Some(*source),
            _ => None,
        }
    }
}

/// Output-side half of an edge: which consumer slot reads this gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputEdge {
    /// The consuming gate.
    pub dest: GateId,
    /// The consumer's input slot.
    pub slot: usize,
}

/// A NAND gate in the circuit.
#[derive(Debug)]
pub struct Gate {
    /// Unique identifier for this gate.
    id: GateId,

    /// Input bindings. The length is fixed at construction.
    inputs: Box<[InputSlot]>,

    /// Consumers of this gate's output, in insertion order.
    /// Released edges leave a `None` hole so stored indices stay valid
    /// until the list is compacted.
    outputs: Vec<Option<OutputEdge>>,

    /// Number of `None` entries in `outputs`.
    holes: usize,
}

impl Gate {
    /// Allocate a gate with `inputs` unbound slots and room for
    /// `initial_fan_out` consumers.
    pub(crate) fn new(inputs: usize, initial_fan_out: usize) -> Result<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(inputs)?;
        slots.resize_with(inputs, InputSlot::default);

        let mut outputs = Vec::new();
        outputs.try_reserve_exact(initial_fan_out)?;

        Ok(Self {
            id: GateId::next(),
            inputs: slots.into_boxed_slice(),
            outputs,
            holes: 0,
        })
    }

    /// Get the gate's ID.
    pub fn id(&self) -> GateId {
        self.id
    }

    /// Number of input slots.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// All input bindings, in slot order.
    pub fn inputs(&self) -> &[InputSlot] {
        &self.inputs
    }

    /// The binding of one slot.
    pub fn input(&self, slot: usize) -> Option<&InputSlot> {
        self.inputs.get(slot)
    }

    /// Replace a slot's binding, returning the previous one.
    ///
    /// The caller is responsible for the mirror record on the other side.
    pub(crate) fn replace_input(&mut self, slot: usize, binding: InputSlot) -> InputSlot {
        std::mem::replace(&mut self.inputs[slot], binding)
    }

    /// Point a gate-bound slot at a new index in its source's output list.
    pub(crate) fn relink_input(&mut self, slot: usize, index: usize) {
        if let Some(InputSlot::Gate { output_index, .. }) = self.inputs.get_mut(slot) {
            *output_index = index;
        }
    }

    /// Make sure one more output edge can be pushed without allocating.
    ///
    /// Grows the list by doubling when it is full.
    pub(crate) fn reserve_output(&mut self) -> Result<()> {
        if self.outputs.len() == self.outputs.capacity() {
            let additional = self.outputs.capacity().max(1);
            self.outputs.try_reserve_exact(additional)?;
        }
        Ok(())
    }

    /// Append an output edge and return its index.
    pub(crate) fn push_output(&mut self, edge: OutputEdge) -> usize {
        self.outputs.push(Some(edge));
        self.outputs.len() - 1
    }

    /// Clear the output record at `index`, returning it.
    ///
    /// Trailing holes are trimmed; indices of live records do not change.
    pub(crate) fn take_output(&mut self, index: usize) -> Option<OutputEdge> {
        let edge = self.outputs.get_mut(index).and_then(Option::take);
        if edge.is_some() {
            self.holes += 1;
        }
        while matches!(self.outputs.last(), Some(None)) {
            self.outputs.pop();
            self.holes -= 1;
        }
        edge
    }

    /// Whether holes make up more than half of the output list.
    pub(crate) fn needs_compaction(&self) -> bool {
        self.holes > self.outputs.len() / 2
    }

    /// Squeeze out holes, keeping insertion order.
    ///
    /// Returns every record that moved with its new index. The caller must
    /// relink the consumer slots named by those records.
    pub(crate) fn compact_outputs(&mut self) -> SmallVec<[(OutputEdge, usize); 8]> {
        let mut moved = SmallVec::new();
        let mut write = 0;

        for read in 0..self.outputs.len() {
            if let Some(edge) = self.outputs[read] {
                if read != write {
                    self.outputs[write] = Some(edge);
                    moved.push((edge, write));
                }
                write += 1;
            }
        }

        self.outputs.truncate(write);
        self.holes = 0;
        moved
    }

    /// The raw output record at `index`, holes included.
    pub(crate) fn output_record(&self, index: usize) -> Option<OutputEdge> {
        self.outputs.get(index).copied().flatten()
    }

    /// Length of the output list, holes included.
    pub(crate) fn output_len(&self) -> usize {
        self.outputs.len()
    }

    /// Reserved output capacity.
    pub fn output_capacity(&self) -> usize {
        self.outputs.capacity()
    }

    /// Connected consumers in insertion order.
    pub fn outputs(&self) -> impl Iterator<Item = OutputEdge> + '_ {
        self.outputs.iter().flatten().copied()
    }

    /// Number of connected consumers.
    pub fn fan_out(&self) -> usize {
        self.outputs.len() - self.holes
    }

    /// Upstream gates wired into this one, one entry per slot.
    pub fn sources(&self) -> impl Iterator<Item = GateId> + '_ {
        self.inputs.iter().filter_map(InputSlot::source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_ids_are_unique() {
        let id1 = GateId::next();
        let id2 = GateId::next();
        assert_ne!(id1, id2);
    }

    #[test]
    fn new_gate_is_unbound() {
        let gate = Gate::new(3, 10).unwrap();
        assert_eq!(gate.input_count(), 3);
        assert!(gate.inputs().iter().all(|slot| !slot.is_bound()));
        assert_eq!(gate.fan_out(), 0);
        assert!(gate.output_capacity() >= 10);
    }

    #[test]
    fn generator_gate_has_no_inputs() {
        let gate = Gate::new(0, 10).unwrap();
        assert_eq!(gate.input_count(), 0);
        assert!(gate.input(0).is_none());
    }

    #[test]
    fn outputs_grow_by_doubling() {
        let mut gate = Gate::new(0, 2).unwrap();
        let dest = GateId::from(u64::MAX);

        for slot in 0..2 {
            gate.reserve_output().unwrap();
            gate.push_output(OutputEdge { dest, slot });
        }
        let full = gate.output_capacity();

        gate.reserve_output().unwrap();
        assert!(gate.output_capacity() > gate.output_len());
        if full == 2 {
            assert!(gate.output_capacity() >= 4);
        }
    }

    #[test]
    fn taken_outputs_leave_holes() {
        let mut gate = Gate::new(0, 4).unwrap();
        let dest = GateId::from(u64::MAX);

        let first = gate.push_output(OutputEdge { dest, slot: 0 });
        let second = gate.push_output(OutputEdge { dest, slot: 1 });

        assert_eq!(gate.take_output(first), Some(OutputEdge { dest, slot: 0 }));
        assert_eq!(gate.take_output(first), None);
        assert_eq!(gate.fan_out(), 1);
        assert_eq!(gate.output_len(), 2);
        assert_eq!(gate.output_record(second), Some(OutputEdge { dest, slot: 1 }));
    }

    #[test]
    fn trailing_holes_are_trimmed() {
        let mut gate = Gate::new(0, 4).unwrap();
        let dest = GateId::from(u64::MAX);

        let first = gate.push_output(OutputEdge { dest, slot: 0 });
        let second = gate.push_output(OutputEdge { dest, slot: 1 });
        let third = gate.push_output(OutputEdge { dest, slot: 2 });

        gate.take_output(second);
        assert_eq!(gate.output_len(), 3);

        gate.take_output(third);
        assert_eq!(gate.output_len(), 1);
        assert_eq!(gate.output_record(first), Some(OutputEdge { dest, slot: 0 }));

        assert_eq!(gate.push_output(OutputEdge { dest, slot: 3 }), 1);
    }

    #[test]
    fn compaction_keeps_order() {
        let mut gate = Gate::new(0, 8).unwrap();
        let dest = GateId::from(u64::MAX);

        for slot in 0..5 {
            gate.push_output(OutputEdge { dest, slot });
        }
        gate.take_output(0);
        assert!(!gate.needs_compaction());
        gate.take_output(1);
        gate.take_output(3);
        assert!(gate.needs_compaction());

        let moved = gate.compact_outputs();
        assert_eq!(
            moved.as_slice(),
            &[(OutputEdge { dest, slot: 2 }, 0), (OutputEdge { dest, slot: 4 }, 1)]
        );
        assert_eq!(gate.output_len(), 2);
        assert_eq!(gate.fan_out(), 2);
        assert!(!gate.needs_compaction());
        assert_eq!(
            gate.outputs().map(|edge| edge.slot).collect::<Vec<_>>(),
            vec![2, 4]
        );
    }

    #[test]
    fn replace_input_returns_previous_binding() {
        let mut gate = Gate::new(1, 1).unwrap();
        let signal = Signal::new(true);

        let old = gate.replace_input(0, InputSlot::Signal(signal.clone()));
        assert_eq!(old, InputSlot::Unbound);

        let old = gate.replace_input(0, InputSlot::Unbound);
        assert_eq!(old, InputSlot::Signal(signal));
    }
}
