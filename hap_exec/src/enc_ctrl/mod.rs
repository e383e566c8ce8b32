//! Encoder decode module
//!
//! Converts the raw counts latched from the board's free-running quadrature
//! counters into calibrated joint angles in degrees, and captures the zero
//! reference on demand.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod decode;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use decode::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during EncCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum EncCtrlError {
    #[error("Raw count {raw} is outside the counter domain [0, {max_count}]")]
    CountOutOfRange { raw: u32, max_count: u32 },
}
