//! Circuit Configuration
//!
//! Sizing knobs for a [`Circuit`](crate::Circuit). Every field has a default,
//! so a partial JSON document is enough to override a single value.

use serde::{Deserialize, Serialize};

/// Output capacity reserved for a freshly created gate.
pub const DEFAULT_INITIAL_FAN_OUT: usize = 10;

/// Sizing and limits for a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircuitConfig {
    /// Number of output edges reserved when a gate is created.
    /// The output list doubles whenever it fills up.
    pub initial_fan_out: usize,

    /// Maximum number of input slots a single gate may have, or `None` for
    /// no limit.
    pub max_gate_inputs: Option<usize>,

    /// Maximum number of live gates, or `None` for no limit.
    pub max_gates: Option<usize>,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            initial_fan_out: DEFAULT_INITIAL_FAN_OUT,
            max_gate_inputs: None,
            max_gates: None,
        }
    }
}

impl CircuitConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize this configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Set the initial output capacity.
    pub fn with_initial_fan_out(mut self, initial_fan_out: usize) -> Self {
        self.initial_fan_out = initial_fan_out;
        self
    }

    /// Set the per-gate input limit.
    pub fn with_max_gate_inputs(mut self, max_gate_inputs: usize) -> Self {
        self.max_gate_inputs = Some(max_gate_inputs);
        self
    }

    /// Cap the number of live gates.
    pub fn with_max_gates(mut self, max_gates: usize) -> Self {
        self.max_gates = Some(max_gates);
        self
    }
}
