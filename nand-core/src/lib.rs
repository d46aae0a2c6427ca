//! NAND Core
//!
//! This crate models combinational circuits built from NAND gates and
//! computes their steady-state outputs together with the critical path
//! length (the longest chain of dependent gate evaluations).
//!
//! It implements:
//!
//! - An arena of gates wired by stable handles
//! - A wiring protocol that keeps both ends of every edge consistent
//! - Cycle and unbound-input detection over the reachable subgraph
//! - Memoized evaluation that doubles as critical path analysis
//!
//! The crate is designed to be used both as a native Rust library and, with
//! the `python` feature, as a Python extension module via PyO3.
//!
//! # Architecture
//!
//! - `graph`: gates, edges and the [`Circuit`] arena
//! - `eval`: readiness check, memoized evaluator and batch orchestration
//! - `signal`: externally owned boolean inputs
//! - `config`: sizing and limits
//!
//! # Example
//!
//! ```
//! use nand_core::{Circuit, Signal};
//!
//! let mut circuit = Circuit::new();
//! let a = Signal::new(true);
//! let b = Signal::new(true);
//!
//! // not_a = NAND(a, a), out = NAND(not_a, b)
//! let not_a = circuit.create_gate(2).unwrap();
//! let out = circuit.create_gate(2).unwrap();
//! circuit.connect_signal(&a, not_a, 0).unwrap();
//! circuit.connect_signal(&a, not_a, 1).unwrap();
//! circuit.connect_gate(not_a, out, 0).unwrap();
//! circuit.connect_signal(&b, out, 1).unwrap();
//!
//! let mut values = [false];
//! let critical_path = circuit.evaluate(&[Some(out)], &mut values).unwrap();
//! assert_eq!(values, [true]);
//! assert_eq!(critical_path, 2);
//!
//! // Flip an input and evaluate again.
//! a.set(false);
//! circuit.evaluate(&[Some(out)], &mut values).unwrap();
//! assert_eq!(values, [false]);
//! ```
//!
//! # Concurrency
//!
//! Everything runs synchronously on the caller's thread. Wiring takes
//! `&mut Circuit`; evaluation takes `&Circuit` plus its own [`EvalContext`],
//! so two batches never share transient state.

pub mod config;
pub mod error;
pub mod eval;
pub mod graph;
pub mod signal;

#[cfg(feature = "python")]
mod python;

pub use config::CircuitConfig;
pub use error::{ErrorKind, NandError, NotReady, Result};
pub use eval::{BatchReport, EvalContext};
pub use graph::{Circuit, GateId, InputBinding};
pub use signal::Signal;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition.
///
/// This function is called by Python when importing the module.
/// It registers all Python-exposed types.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyCircuit>()?;
    m.add_class::<python::PySignal>()?;

    // Add version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
