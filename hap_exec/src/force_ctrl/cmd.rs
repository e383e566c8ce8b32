//! Commands passed into ForceCtrl

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A demand for a planar force at the end effector.
#[derive(Clone, Copy, Debug)]
pub struct ForceCommand {
    /// Desired force along the end effector X axis.
    ///
    /// Units: newtons
    pub fx_n: f64,

    /// Desired force along the end effector Y axis.
    ///
    /// Units: newtons
    pub fy_n: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ForceCommand {
    /// A zero-force command, used to leave the actuator unpowered.
    pub fn zero() -> Self {
        ForceCommand {
            fx_n: 0.0,
            fy_n: 0.0,
        }
    }

    /// Determine if the command is valid (i.e. both components are finite).
    ///
    /// The magnitude is deliberately not checked here - an over-limit force
    /// is computed through and clamped at the voltage stage.
    pub fn is_valid(&self) -> bool {
        self.fx_n.is_finite() && self.fy_n.is_finite()
    }
}
