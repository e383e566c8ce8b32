//! # Data Store
//!
//! All mutable state owned by the executable lives here, in one struct
//! passed around by the main loop. There are no module-level globals: the
//! calibration offsets and the last-commanded drive state sit inside their
//! modules, which sit inside this store.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::{enc_ctrl, force_ctrl};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    // EncCtrl
    pub enc_ctrl: enc_ctrl::EncCtrl,
    pub enc_ctrl_input: enc_ctrl::InputData,
    pub enc_ctrl_output: enc_ctrl::OutputData,
    pub enc_ctrl_status_rpt: enc_ctrl::StatusReport,

    // ForceCtrl
    pub force_ctrl: force_ctrl::ForceCtrl,
    pub force_ctrl_input: force_ctrl::InputData,
    pub force_ctrl_output: force_ctrl::OutputData,
    pub force_ctrl_status_rpt: force_ctrl::StatusReport,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DataStore {
    /// Clear items that need wiping at the start of a cycle.
    ///
    /// Inputs are rebuilt every cycle; outputs and status reports keep their
    /// last values so telemetry between cycles stays meaningful.
    pub fn cycle_start(&mut self) {
        self.enc_ctrl_input = enc_ctrl::InputData::default();
        self.force_ctrl_input = force_ctrl::InputData::default();
    }

    /// Read-only snapshot of the last commanded haptic state.
    pub fn haptic_tm(&self) -> force_ctrl::HapticTm {
        self.force_ctrl.haptic_tm()
    }
}
