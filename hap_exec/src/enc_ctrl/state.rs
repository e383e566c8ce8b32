//! Implementations for the EncCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;
use thiserror::Error;

// Internal
use super::{decode, Params};
use util::{
    archive::{Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Encoder decode module state
#[derive(Default)]
pub struct EncCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    /// Angle subtracted from the decoded motor A angle so that the zeroing
    /// pose reads as zero degrees.
    ///
    /// Units: degrees
    pub(crate) zero_offset_a_deg: f64,

    /// As above for motor B.
    pub(crate) zero_offset_b_deg: f64,

    pub(crate) output: Option<OutputData>,
    pub(crate) arch_output: Archiver,
}

/// Input data to the encoder decode module.
#[derive(Clone, Copy, Default, Debug)]
pub struct InputData {
    /// Raw count latched from the motor A counter this cycle.
    pub raw_a: u32,

    /// Raw count latched from the motor B counter this cycle.
    pub raw_b: u32,

    /// When true the current pose is captured as the new zero reference
    /// before positions are produced. The mechanism must be physically held
    /// at the desired zero pose while this is set - the module has no way of
    /// verifying that.
    pub zero: bool,
}

/// Calibrated joint angles produced each cycle.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct OutputData {
    /// Motor A angle relative to the zero reference. Not clamped, angles
    /// beyond +/-180 degrees are reported as-is.
    ///
    /// Units: degrees
    pub pos_a_deg: f64,

    /// As above for motor B.
    pub pos_b_deg: f64,
}

/// Status report for EncCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// True if a zero demand was applied this cycle.
    pub zero_applied: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while initialising EncCtrl.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to load parameters: {0}")]
    ParamLoadError(params::LoadError),

    #[error("Failed to initialise the output archiver: {0}")]
    ArchiveInitError(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for EncCtrl {
    type InitData = &'static str;
    type InitError = InitError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = super::EncCtrlError;

    /// Initialise the EncCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), InitError> {
        self.params = params::load(init_data).map_err(InitError::ParamLoadError)?;

        self.arch_output = Archiver::from_path(session, "enc_ctrl/output.csv")
            .map_err(|e| InitError::ArchiveInitError(e.to_string()))?;

        debug!(
            "EncCtrl initialised: max_count = {}, {:.4} deg/count",
            self.params.max_count,
            self.params.counts_to_deg()
        );

        Ok(())
    }

    /// Perform cyclic processing of the encoder decode module.
    ///
    /// Decodes both raw counts into degrees, applies a zero demand if one is
    /// present in the input, and outputs the calibrated angles.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        // Decode and scale both axes. An out of domain count aborts the
        // cycle before the zero reference or output are touched.
        let ang_a_deg =
            decode(input_data.raw_a, self.params.max_count)? as f64 * self.params.counts_to_deg();
        let ang_b_deg =
            decode(input_data.raw_b, self.params.max_count)? as f64 * self.params.counts_to_deg();

        // A zero demand captures the uncalibrated angles as the new
        // reference, so the position output below reads zero for a held
        // mechanism.
        if input_data.zero {
            self.zero_offset_a_deg = ang_a_deg;
            self.zero_offset_b_deg = ang_b_deg;
            self.report.zero_applied = true;

            debug!(
                "Encoders zeroed: A at {:.4} deg, B at {:.4} deg",
                ang_a_deg, ang_b_deg
            );
        }

        let output = OutputData {
            pos_a_deg: ang_a_deg - self.zero_offset_a_deg,
            pos_b_deg: ang_b_deg - self.zero_offset_b_deg,
        };

        trace!(
            "EncCtrl output: A {:.4} deg, B {:.4} deg",
            output.pos_a_deg,
            output.pos_b_deg
        );

        // Update the output in self
        self.output = Some(output);

        Ok((output, self.report))
    }
}

impl Archived for EncCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_output
            .serialise(self.output.unwrap_or_default())?;

        Ok(())
    }
}

impl EncCtrl {
    /// Current zero reference for both axes.
    ///
    /// Units: degrees
    pub fn zero_offsets_deg(&self) -> (f64, f64) {
        (self.zero_offset_a_deg, self.zero_offset_b_deg)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    /// 24 bit counter, 500 line encoder read at 4x
    fn enc_ctrl() -> EncCtrl {
        EncCtrl {
            params: Params {
                max_count: 0xFF_FFFF,
                counts_per_rev: 2000.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_idempotent() {
        let mut enc = enc_ctrl();
        let input = InputData {
            raw_a: 1200,
            raw_b: 0xFF_FFFF - 399,
            zero: true,
        };

        enc.proc(&input).unwrap();
        let first = enc.zero_offsets_deg();

        // Zeroing again with no intervening motion must not move the
        // reference
        enc.proc(&input).unwrap();
        assert_eq!(first, enc.zero_offsets_deg());
    }

    #[test]
    fn test_position_zero_after_zeroing() {
        let mut enc = enc_ctrl();

        let (output, report) = enc
            .proc(&InputData {
                raw_a: 54_321,
                raw_b: 16_000_000,
                zero: true,
            })
            .unwrap();

        assert!(report.zero_applied);
        assert_relative_eq!(output.pos_a_deg, 0.0);
        assert_relative_eq!(output.pos_b_deg, 0.0);

        // The same pose without a zero demand still reads zero
        let (output, report) = enc
            .proc(&InputData {
                raw_a: 54_321,
                raw_b: 16_000_000,
                zero: false,
            })
            .unwrap();

        assert!(!report.zero_applied);
        assert_relative_eq!(output.pos_a_deg, 0.0);
        assert_relative_eq!(output.pos_b_deg, 0.0);
    }

    #[test]
    fn test_offset_applied_to_later_motion() {
        let mut enc = enc_ctrl();

        // Zero at 2000 counts (one full revolution)
        enc.proc(&InputData {
            raw_a: 2000,
            raw_b: 2000,
            zero: true,
        })
        .unwrap();

        // 100 counts past the reference is 18 degrees at 0.18 deg/count
        let (output, _) = enc
            .proc(&InputData {
                raw_a: 2100,
                raw_b: 1900,
                zero: false,
            })
            .unwrap();

        assert_relative_eq!(output.pos_a_deg, 18.0, epsilon = 1e-9);
        assert_relative_eq!(output.pos_b_deg, -18.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_half_position() {
        let mut enc = enc_ctrl();

        // One count below the wrap point is -1 count = -0.18 degrees with no
        // zero reference set
        let (output, _) = enc
            .proc(&InputData {
                raw_a: 0xFF_FFFF,
                raw_b: 0,
                zero: false,
            })
            .unwrap();

        assert_relative_eq!(output.pos_a_deg, -0.18, epsilon = 1e-9);
        assert_relative_eq!(output.pos_b_deg, 0.0);
    }

    #[test]
    fn test_out_of_domain_leaves_state_untouched() {
        let mut enc = enc_ctrl();

        enc.proc(&InputData {
            raw_a: 500,
            raw_b: 500,
            zero: true,
        })
        .unwrap();
        let offsets = enc.zero_offsets_deg();

        // An out of domain count is an error and must not move the zero
        // reference
        assert!(enc
            .proc(&InputData {
                raw_a: 0x100_0000,
                raw_b: 0,
                zero: true,
            })
            .is_err());
        assert_eq!(offsets, enc.zero_offsets_deg());
    }
}
