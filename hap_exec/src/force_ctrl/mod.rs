//! Force control module
//!
//! Maps a demanded planar end effector force into the pair of driver board
//! voltage commands that display it, and records the commanded torques for
//! telemetry.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_drive;
mod cmd;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ForceCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ForceCtrlError {
    #[error("Force command contains a non-finite component: ({0}, {1}) N")]
    InvalidForceCmd(f64, f64),
}

// ---------------------------------------------------------------------------
// TEST UTILITIES
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test_util {
    use super::Params;

    /// Device constants used across the module's tests.
    pub(crate) fn params() -> Params {
        Params {
            jt_mnm_per_n: [[-63.4625, -109.3659], [-173.4330, 257.9403]],
            gear_ratio: 13.0,
            torque_const_mnm_per_a: 23.2,
            current_limit_a: 1.1,
            loop_gain_a_per_v: 0.22,
            vout_cmd_max_v: 5.0,
            vout_drv_max_v: 10.0,
            fx_max_n: 3.0,
            fy_max_n: 0.0,
        }
    }
}
