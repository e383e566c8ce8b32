//! # Acquisition board backend
//!
//! This module provides a unified interface to the acquisition board
//! carrying the quadrature counters and the DACs which feed the motor driver
//! board. The control modules only ever see the [`DaqBackend`] trait; which
//! implementation sits behind it is decided at construction time from
//! parameters, so the same executable runs against simulated hardware or
//! none at all.
//!
//! Board open/close sequencing and vendor driver error codes live entirely
//! on the far side of this boundary.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// [`DaqBackend`] implementation simulating the board's counters and DACs.
mod sim;

/// [`DaqBackend`] implementation which does nothing.
mod noop;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

pub use noop::*;
pub use sim::*;

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Trait providing unified access to the acquisition board.
pub trait DaqBackend {
    /// Latch and read the raw count of one encoder counter channel.
    ///
    /// Any value returned is treated as a valid in-range count by the
    /// caller; a backend must not hand out counts above its counter
    /// modulus.
    fn read_encoder(&mut self, channel: EncChannel) -> Result<u32, DaqError>;

    /// Write a voltage to one DAC channel.
    ///
    /// Demands outside the board's output range are rejected.
    fn write_dac(&mut self, channel: DacChannel, volts: f64) -> Result<(), DaqError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for backend construction.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Which backend to construct, either "sim" or "noop".
    pub backend: String,

    /// Board DAC output range, symmetric about zero.
    ///
    /// Units: volts
    pub dac_range_v: f64,

    /// Counter modulus minus one for the simulated counters.
    ///
    /// Units: counts
    pub sim_max_count: u32,

    /// Initial raw counts for the simulated [A, B] counters.
    pub sim_initial_counts: [u32; 2],

    /// Deterministic drift applied to each simulated counter on every read,
    /// so that long runs exercise the counter wraparound.
    ///
    /// Units: counts/read
    pub sim_drift_counts: [i64; 2],
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Encoder counter channels on the board.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum EncChannel {
    MotorA,
    MotorB,
}

/// DAC output channels feeding the driver board.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum DacChannel {
    MotorA,
    MotorB,
}

/// Errors which can occur at the board boundary.
#[derive(thiserror::Error, Debug)]
pub enum DaqError {
    #[error("Voltage demand {0} V is outside the board output range of +/-{1} V")]
    VoltsOutOfRange(f64, f64),
}

/// Errors which can occur while constructing a backend.
#[derive(thiserror::Error, Debug)]
pub enum DaqConfigError {
    #[error("Unknown DAQ backend \"{0}\", expected \"sim\" or \"noop\"")]
    UnknownBackend(String),
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Construct the backend selected by the given parameters.
pub fn from_params(params: &Params) -> Result<Box<dyn DaqBackend>, DaqConfigError> {
    match params.backend.as_str() {
        "sim" => Ok(Box::new(SimDaq::new(params))),
        "noop" => Ok(Box::new(NoopDaq)),
        other => Err(DaqConfigError::UnknownBackend(other.to_string())),
    }
}
