//! Gate Graph
//!
//! This module implements the arena of NAND gates and the wiring protocol
//! that keeps both halves of every edge consistent.
//!
//! # Overview
//!
//! The circuit is a directed graph where:
//!
//! - Nodes are gates, each with a fixed number of ordered input slots
//! - Edges run from a gate's single output to one input slot of a consumer
//!
//! Input slots may also be bound to external [`Signal`](crate::Signal)s,
//! which are the primary inputs of the circuit.
//!
//! # Design Decisions
//!
//! 1. Gates live in a central arena addressed by [`GateId`] rather than
//!    pointing at each other, so destroying a gate can repair every neighbor
//!    and a stale handle is detected instead of dereferenced.
//!
//! 2. Every edge is stored on both endpoints, with each half remembering the
//!    index of its mirror, so traversal works in either direction and edge
//!    removal is O(1).
//!
//! 3. The graph holds no evaluation state. Per-pass bookkeeping lives in an
//!    [`EvalContext`](crate::eval::EvalContext).

mod circuit;
mod gate;

pub use circuit::{Circuit, InputBinding};
pub use gate::{Gate, GateId, InputSlot, OutputEdge};
