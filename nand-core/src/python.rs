//! Python Bindings
//!
//! Thin wrappers exposing [`Circuit`] and [`Signal`] to Python. Gate handles
//! cross the boundary as plain integers (see [`GateId::raw`]).

use pyo3::exceptions::{PyMemoryError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::{ErrorKind, NandError};
use crate::graph::{Circuit, GateId, InputBinding};
use crate::signal::Signal;

fn to_py_err(err: NandError) -> PyErr {
    match err.kind() {
        ErrorKind::InvalidArgument => PyValueError::new_err(err.to_string()),
        ErrorKind::Allocation => PyMemoryError::new_err(err.to_string()),
        ErrorKind::NotReady => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Python-exposed Signal type.
#[pyclass(name = "Signal")]
#[derive(Clone)]
pub struct PySignal {
    inner: Signal,
}

#[pymethods]
impl PySignal {
    #[new]
    #[pyo3(signature = (value = false))]
    fn new(value: bool) -> Self {
        Self {
            inner: Signal::new(value),
        }
    }

    #[getter]
    fn value(&self) -> bool {
        self.inner.get()
    }

    #[setter]
    fn set_value(&self, value: bool) {
        self.inner.set(value);
    }

    #[getter]
    fn id(&self) -> u64 {
        self.inner.id()
    }

    fn __repr__(&self) -> String {
        format!("Signal(id={}, value={})", self.inner.id(), self.inner.get())
    }
}

/// Python-exposed Circuit type.
#[pyclass(name = "Circuit")]
pub struct PyCircuit {
    inner: Circuit,
}

#[pymethods]
impl PyCircuit {
    #[new]
    fn new() -> Self {
        Self {
            inner: Circuit::new(),
        }
    }

    /// Add a gate with `inputs` unbound slots and return its handle.
    fn create_gate(&mut self, inputs: usize) -> PyResult<u64> {
        self.inner
            .create_gate(inputs)
            .map(|id| id.raw())
            .map_err(to_py_err)
    }

    /// Remove a gate. Returns False if it was already gone.
    fn destroy_gate(&mut self, gate: u64) -> bool {
        self.inner.destroy_gate(GateId::from(gate))
    }

    fn connect_gate(&mut self, source: u64, dest: u64, slot: usize) -> PyResult<()> {
        self.inner
            .connect_gate(GateId::from(source), GateId::from(dest), slot)
            .map_err(to_py_err)
    }

    fn connect_signal(&mut self, signal: PyRef<'_, PySignal>, dest: u64, slot: usize) -> PyResult<()> {
        self.inner
            .connect_signal(&signal.inner, GateId::from(dest), slot)
            .map_err(to_py_err)
    }

    fn fan_out(&self, gate: u64) -> PyResult<usize> {
        self.inner.fan_out(GateId::from(gate)).map_err(to_py_err)
    }

    /// The gate handle or Signal bound to a slot, or None if unbound.
    fn input(&self, py: Python<'_>, gate: u64, slot: usize) -> PyResult<PyObject> {
        let binding = self.inner.input(GateId::from(gate), slot).map_err(to_py_err)?;
        Ok(match binding {
            InputBinding::Gate(source) => source.raw().into_py(py),
            InputBinding::Signal(signal) => Py::new(
                py,
                PySignal {
                    inner: signal.clone(),
                },
            )?
            .into_py(py),
            InputBinding::Unbound => py.None(),
        })
    }

    fn output(&self, gate: u64, index: usize) -> PyResult<u64> {
        self.inner
            .output(GateId::from(gate), index)
            .map(|id| id.raw())
            .map_err(to_py_err)
    }

    /// Evaluate a batch. Returns `(critical_path, outputs)`.
    fn evaluate(&self, roots: Vec<Option<u64>>) -> PyResult<(usize, Vec<Option<bool>>)> {
        let roots: Vec<Option<GateId>> = roots.into_iter().map(|r| r.map(GateId::from)).collect();
        let report = self.inner.run_batch(&roots).map_err(to_py_err)?;
        Ok((report.critical_path, report.outputs))
    }

    fn __len__(&self) -> usize {
        self.inner.gate_count()
    }

    fn __repr__(&self) -> String {
        format!("Circuit(gates={})", self.inner.gate_count())
    }
}
