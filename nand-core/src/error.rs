//! Error types for circuit construction and evaluation.
//!
//! Every fallible operation returns [`Result`]. The variants are grouped into
//! three broad categories (see [`ErrorKind`]) so that drivers which only care
//! about the category can match on [`NandError::kind`].

use std::collections::TryReserveError;

use thiserror::Error;

use crate::graph::GateId;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NandError>;

/// Broad failure category of a [`NandError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A handle, index or batch was malformed.
    InvalidArgument,
    /// Memory for a gate, edge or arena entry could not be reserved.
    Allocation,
    /// The reachable subgraph has a cycle or an unbound input slot.
    NotReady,
}

/// Reason a batch could not be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotReady {
    /// `gate` was reached again while its own inputs were still being walked.
    Cycle { gate: GateId },

    /// Input `slot` of `gate` was never connected.
    Unbound { gate: GateId, slot: usize },
}

impl std::fmt::Display for NotReady {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotReady::Cycle { gate } => write!(f, "cycle through gate {}", gate.raw()),
            NotReady::Unbound { gate, slot } => {
                write!(f, "input {} of gate {} is unbound", slot, gate.raw())
            }
        }
    }
}

/// Errors produced by [`Circuit`](crate::Circuit) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NandError {
    /// The handle does not name a live gate in this circuit.
    #[error("unknown gate {}", .0.raw())]
    UnknownGate(GateId),

    /// Input slot index is past the gate's input count.
    #[error("slot {slot} out of range for gate with {inputs} inputs")]
    SlotOutOfRange { slot: usize, inputs: usize },

    /// Requested output index is past the number of connected consumers.
    #[error("gate has no output {index} ({fan_out} connected)")]
    NoSuchOutput { index: usize, fan_out: usize },

    /// Requested input count exceeds the configured maximum.
    #[error("gate with {requested} inputs exceeds limit of {limit}")]
    TooManyInputs { requested: usize, limit: usize },

    /// The batch contained no entries.
    #[error("evaluation batch is empty")]
    EmptyBatch,

    /// The batch contained only empty entries.
    #[error("evaluation batch has no gates")]
    NoRoots,

    /// The output buffer cannot hold one value per batch entry.
    #[error("output buffer holds {len} values, batch has {needed}")]
    OutputTooShort { len: usize, needed: usize },

    /// A reservation failed.
    #[error("allocation failed")]
    Allocation,

    /// The circuit already holds the configured maximum number of gates.
    #[error("circuit is full ({0} gates)")]
    GateLimit(usize),

    /// The batch cannot be evaluated as wired.
    #[error("circuit not ready: {0}")]
    NotReady(NotReady),
}

impl NandError {
    /// The failure category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NandError::UnknownGate(_)
            | NandError::SlotOutOfRange { .. }
            | NandError::NoSuchOutput { .. }
            | NandError::TooManyInputs { .. }
            | NandError::EmptyBatch
            | NandError::NoRoots
            | NandError::OutputTooShort { .. } => ErrorKind::InvalidArgument,
            NandError::Allocation | NandError::GateLimit(_) => ErrorKind::Allocation,
            NandError::NotReady(_) => ErrorKind::NotReady,
        }
    }

    /// Whether this error came from the readiness pre-pass.
    pub fn is_not_ready(&self) -> bool {
        self.kind() == ErrorKind::NotReady
    }
}

impl From<TryReserveError> for NandError {
    fn from(_: TryReserveError) -> Self {
        NandError::Allocation
    }
}

impl From<NotReady> for NandError {
    fn from(reason: NotReady) -> Self {
        NandError::NotReady(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let gate = GateId::from(7);
        assert_eq!(NandError::UnknownGate(gate).kind(), ErrorKind::InvalidArgument);
        assert_eq!(NandError::EmptyBatch.kind(), ErrorKind::InvalidArgument);
        assert_eq!(NandError::Allocation.kind(), ErrorKind::Allocation);
        assert_eq!(NandError::GateLimit(4).kind(), ErrorKind::Allocation);
        assert!(NandError::from(NotReady::Cycle { gate }).is_not_ready());
    }

    #[test]
    fn messages_name_the_gate() {
        let err = NandError::from(NotReady::Unbound {
            gate: GateId::from(3),
            slot: 1,
        });
        assert_eq!(err.to_string(), "circuit not ready: input 1 of gate 3 is unbound");
    }
}
