//! Parameters structure for ForceCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for force control.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- KINEMATICS ----
    /// Jacobian transpose mapping end effector force to capstan joint
    /// torque, empirically derived for the mechanism geometry. Row-major:
    /// row 0 produces the capstan A torque, row 1 the capstan B torque.
    ///
    /// Units: millinewton-meters/newton
    pub jt_mnm_per_n: [[f64; 2]; 2],

    /// Capstan drive reduction between each motor shaft and its capstan
    /// joint.
    pub gear_ratio: f64,

    // ---- DRIVE ELECTRONICS ----
    /// Motor torque constant.
    ///
    /// Units: millinewton-meters/ampere
    pub torque_const_mnm_per_a: f64,

    /// Current limit as set on the driver amplifier board.
    ///
    /// Units: amperes
    pub current_limit_a: f64,

    /// Loop gain of the driver board (I = loop gain * V input).
    ///
    /// Units: amperes/volt
    pub loop_gain_a_per_v: f64,

    /// Maximum voltage that may be commanded to the driver board.
    ///
    /// Units: volts
    pub vout_cmd_max_v: f64,

    /// Maximum voltage the driver board itself can output.
    ///
    /// Units: volts
    pub vout_drv_max_v: f64,

    // ---- CAPABILITIES ----
    /// Largest force that can be displayed along the end effector X axis.
    ///
    /// Units: newtons
    pub fx_max_n: f64,

    /// Largest force that can be displayed along the end effector Y axis.
    ///
    /// Units: newtons
    pub fy_max_n: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Maximum continuous motor torque under the configured current limit.
    ///
    /// Units: millinewton-meters
    pub fn torque_max_motor_mnm(&self) -> f64 {
        self.current_limit_a * self.torque_const_mnm_per_a
    }

    /// Maximum torque available at a capstan joint through the reduction.
    ///
    /// Units: millinewton-meters
    pub fn torque_max_capstan_mnm(&self) -> f64 {
        self.torque_max_motor_mnm() * self.gear_ratio
    }
}
