//! Implementations for the ForceCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;
use thiserror::Error;

// Internal
use super::{ForceCommand, Params};
use util::{
    archive::{Archived, Archiver},
    module::State,
    params,
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Force control module state
#[derive(Default)]
pub struct ForceCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    /// The command currently being displayed. Retained between cycles since
    /// a DAC holds its output voltage until it is rewritten.
    pub(crate) current_cmd: Option<ForceCommand>,

    pub(crate) tm: HapticTm,
    pub(crate) arch_tm: Archiver,
}

/// Input data to Force Control.
#[derive(Clone, Copy, Default, Debug)]
pub struct InputData {
    /// The force command to execute, or `None` to continue displaying the
    /// last command.
    pub cmd: Option<ForceCommand>,

    /// Calibrated motor A angle this cycle, recorded in telemetry.
    ///
    /// Units: degrees
    pub pos_a_deg: f64,

    /// As above for motor B.
    pub pos_b_deg: f64,
}

/// Voltage commands for the driver board, one channel per motor.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct OutputData {
    /// Voltage command for the motor A driver channel.
    ///
    /// Units: volts
    pub volt_a_v: f64,

    /// As above for motor B.
    pub volt_b_v: f64,
}

/// Status report for ForceCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// The motor A voltage command hit the command ceiling and was clamped.
    pub volt_a_saturated: bool,

    /// As above for motor B.
    pub volt_b_saturated: bool,

    /// The commanded X force exceeded the configured axis capability
    /// (advisory only, the demand is still computed through).
    pub force_x_over_limit: bool,

    /// As above for the Y axis.
    pub force_y_over_limit: bool,
}

/// Snapshot of the last commanded drive state.
///
/// Overwritten in a single assignment on every force control cycle and read
/// back through [`ForceCtrl::haptic_tm`]. Kept flat so it can double as the
/// module's CSV archive row.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct HapticTm {
    /// Motor A torque last commanded.
    ///
    /// Units: millinewton-meters
    pub torque_motor_a_mnm: f64,

    /// Motor B torque last commanded.
    pub torque_motor_b_mnm: f64,

    /// Capstan A torque last commanded.
    pub torque_capstan_a_mnm: f64,

    /// Capstan B torque last commanded.
    pub torque_capstan_b_mnm: f64,

    /// Motor A angle at the time of the command.
    ///
    /// Units: degrees
    pub pos_a_deg: f64,

    /// Motor B angle at the time of the command.
    pub pos_b_deg: f64,

    /// Commanded end effector X force.
    ///
    /// Units: newtons
    pub force_x_n: f64,

    /// Commanded end effector Y force.
    pub force_y_n: f64,

    /// Placeholder, not populated by the control core. Archived rows carry
    /// the session elapsed time here instead.
    pub time_s: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while initialising ForceCtrl.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to load parameters: {0}")]
    ParamLoadError(params::LoadError),

    #[error("Failed to initialise the telemetry archiver: {0}")]
    ArchiveInitError(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ForceCtrl {
    type InitData = &'static str;
    type InitError = InitError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = super::ForceCtrlError;

    /// Initialise the ForceCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), InitError> {
        self.params = params::load(init_data).map_err(InitError::ParamLoadError)?;

        self.arch_tm = Archiver::from_path(session, "force_ctrl/haptic_tm.csv")
            .map_err(|e| InitError::ArchiveInitError(e.to_string()))?;

        debug!(
            "ForceCtrl initialised: max motor torque {:.2} mNm, max capstan torque {:.2} mNm",
            self.params.torque_max_motor_mnm(),
            self.params.torque_max_capstan_mnm()
        );

        Ok(())
    }

    /// Perform cyclic processing of Force Control.
    ///
    /// A new command replaces the current one after validation; with no new
    /// command the current one is recomputed so the output always reflects
    /// what the driver board is being asked to hold.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        // Validate before accepting - a NaN must never reach a DAC write
        if let Some(cmd) = input_data.cmd {
            if !cmd.is_valid() {
                return Err(super::ForceCtrlError::InvalidForceCmd(cmd.fx_n, cmd.fy_n));
            }

            self.current_cmd = Some(cmd);
        }

        let cmd = self.current_cmd.unwrap_or_else(ForceCommand::zero);

        let output = self.calc_drive(&cmd, input_data);

        Ok((output, self.report))
    }
}

impl Archived for ForceCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // The archived row carries the session elapsed time in place of the
        // core's placeholder
        let mut row = self.tm;
        row.time_s = session::get_elapsed_seconds();

        self.arch_tm.serialise(row)?;

        Ok(())
    }
}

impl ForceCtrl {
    /// Read-only snapshot of the last commanded torques, forces and
    /// positions.
    ///
    /// Consistent with the most recent `proc` call under the exec's
    /// single-threaded call ordering.
    pub fn haptic_tm(&self) -> HapticTm {
        self.tm
    }

    #[cfg(test)]
    pub(crate) fn with_params(params: Params) -> Self {
        ForceCtrl {
            params,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::force_ctrl::test_util::params;
    use approx::assert_relative_eq;

    #[test]
    fn test_telemetry_consistent_with_proc() {
        let mut fc = ForceCtrl::with_params(params());

        let input = InputData {
            cmd: Some(ForceCommand {
                fx_n: 1.25,
                fy_n: -0.5,
            }),
            pos_a_deg: 10.0,
            pos_b_deg: -20.0,
        };

        fc.proc(&input).unwrap();
        let tm = fc.haptic_tm();

        // The snapshot must hold exactly the commanded force and the
        // positions supplied in the same call
        assert_eq!(tm.force_x_n, 1.25);
        assert_eq!(tm.force_y_n, -0.5);
        assert_eq!(tm.pos_a_deg, 10.0);
        assert_eq!(tm.pos_b_deg, -20.0);
        assert_eq!(tm.time_s, 0.0);

        // And the torques computed in the same call
        let p = params();
        let tau_a_mnm = p.jt_mnm_per_n[0][0] * 1.25 + p.jt_mnm_per_n[0][1] * -0.5;
        let tau_b_mnm = p.jt_mnm_per_n[1][0] * 1.25 + p.jt_mnm_per_n[1][1] * -0.5;
        assert_relative_eq!(tm.torque_capstan_a_mnm, tau_a_mnm, epsilon = 1e-9);
        assert_relative_eq!(tm.torque_capstan_b_mnm, tau_b_mnm, epsilon = 1e-9);
        assert_relative_eq!(tm.torque_motor_a_mnm, tau_a_mnm / p.gear_ratio, epsilon = 1e-9);
        assert_relative_eq!(tm.torque_motor_b_mnm, tau_b_mnm / p.gear_ratio, epsilon = 1e-9);
    }

    #[test]
    fn test_command_held_between_cycles() {
        let mut fc = ForceCtrl::with_params(params());

        let (first, _) = fc
            .proc(&InputData {
                cmd: Some(ForceCommand { fx_n: 0.8, fy_n: 0.1 }),
                ..Default::default()
            })
            .unwrap();

        // No new command - the driver board holds its voltage, so the
        // output and telemetry must not change
        let (second, _) = fc.proc(&InputData::default()).unwrap();

        assert_eq!(first.volt_a_v, second.volt_a_v);
        assert_eq!(first.volt_b_v, second.volt_b_v);
        assert_eq!(fc.haptic_tm().force_x_n, 0.8);
    }

    #[test]
    fn test_invalid_command_rejected() {
        let mut fc = ForceCtrl::with_params(params());

        fc.proc(&InputData {
            cmd: Some(ForceCommand { fx_n: 1.0, fy_n: 0.0 }),
            ..Default::default()
        })
        .unwrap();

        // A non-finite command is an error and must not displace the
        // currently displayed one
        let result = fc.proc(&InputData {
            cmd: Some(ForceCommand {
                fx_n: std::f64::NAN,
                fy_n: 0.0,
            }),
            ..Default::default()
        });

        assert!(matches!(
            result,
            Err(crate::force_ctrl::ForceCtrlError::InvalidForceCmd(..))
        ));
        assert_eq!(fc.haptic_tm().force_x_n, 1.0);
    }

    #[test]
    fn test_no_command_is_zero_force() {
        let mut fc = ForceCtrl::with_params(params());

        let (output, report) = fc.proc(&InputData::default()).unwrap();

        assert_eq!(output.volt_a_v, 0.0);
        assert_eq!(output.volt_b_v, 0.0);
        assert!(!report.volt_a_saturated);
        assert!(!report.volt_b_saturated);
    }
}
