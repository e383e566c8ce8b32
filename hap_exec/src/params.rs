//! # Haptic Executable Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Deserialize, Default)]
pub struct HapExecParams {
    /// Target period of one control cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Total duration of the run, after which the exec unpowers the
    /// actuator and exits.
    ///
    /// Units: seconds
    pub run_duration_s: f64,

    /// Capture the pose on the first cycle as the zero reference. The
    /// mechanism must be held at the desired zero pose when the exec starts.
    pub zero_on_start: bool,

    /// Zero-order-hold force profile executed by the exec. Rows must be
    /// time ordered.
    pub profile: Vec<ForceSetpoint>,
}

/// One row of the force profile.
#[derive(Deserialize, Default, Clone, Copy, Debug)]
pub struct ForceSetpoint {
    /// Time from the start of the run at which this demand takes effect.
    ///
    /// Units: seconds
    pub time_s: f64,

    /// Demanded end effector X force.
    ///
    /// Units: newtons
    pub fx_n: f64,

    /// Demanded end effector Y force.
    ///
    /// Units: newtons
    pub fy_n: f64,
}
