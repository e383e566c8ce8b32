//! Force to drive voltage calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::{Matrix2, Vector2};

// Internal
use super::*;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ForceCtrl {
    /// Map an end effector force demand into driver board voltage commands.
    ///
    /// The Jacobian transpose takes the Cartesian force demand into capstan
    /// joint torque space (the duality between the velocity and force
    /// Jacobians), the capstan reduction brings those torques down to the
    /// motor shafts, and each motor torque is scaled against the maximum
    /// continuous torque under the driver's current limit to give a
    /// proportional command voltage. This is an open-loop mapping - any
    /// closed-loop correction is the caller's responsibility.
    ///
    /// The force magnitude is not limited before the transform; the only
    /// hard limit is the clamp of each voltage into the command range.
    /// Intermediate torques are recorded unclamped.
    pub(crate) fn calc_drive(&mut self, cmd: &ForceCommand, input: &InputData) -> OutputData {
        let p = &self.params;

        let jt = Matrix2::new(
            p.jt_mnm_per_n[0][0],
            p.jt_mnm_per_n[0][1],
            p.jt_mnm_per_n[1][0],
            p.jt_mnm_per_n[1][1],
        );
        let force_n = Vector2::new(cmd.fx_n, cmd.fy_n);

        // Capstan joint torques demanded by the force
        let tau_capstan_mnm = jt * force_n;

        // Torques at the motor shafts through the capstan reduction
        let tau_motor_mnm = tau_capstan_mnm / p.gear_ratio;

        // Proportional voltage commands, normalised against the maximum
        // continuous motor torque
        let tau_max_mnm = p.torque_max_motor_mnm();
        let volt_a_raw_v = p.vout_cmd_max_v * tau_motor_mnm[0] / tau_max_mnm;
        let volt_b_raw_v = p.vout_cmd_max_v * tau_motor_mnm[1] / tau_max_mnm;

        // Hard clamp into the command range before anything reaches the
        // driver board
        let volt_a_v = clamp(&volt_a_raw_v, &-p.vout_cmd_max_v, &p.vout_cmd_max_v);
        let volt_b_v = clamp(&volt_b_raw_v, &-p.vout_cmd_max_v, &p.vout_cmd_max_v);

        self.report.volt_a_saturated = volt_a_raw_v.abs() > p.vout_cmd_max_v;
        self.report.volt_b_saturated = volt_b_raw_v.abs() > p.vout_cmd_max_v;
        self.report.force_x_over_limit = cmd.fx_n.abs() > p.fx_max_n;
        self.report.force_y_over_limit = cmd.fy_n.abs() > p.fy_max_n;

        trace!(
            "ForceCtrl: F = ({:.3}, {:.3}) N -> tau_c = ({:.3}, {:.3}) mNm -> V = ({:.3}, {:.3})",
            cmd.fx_n,
            cmd.fy_n,
            tau_capstan_mnm[0],
            tau_capstan_mnm[1],
            volt_a_v,
            volt_b_v
        );

        // Update the telemetry snapshot in a single assignment
        self.tm = HapticTm {
            torque_motor_a_mnm: tau_motor_mnm[0],
            torque_motor_b_mnm: tau_motor_mnm[1],
            torque_capstan_a_mnm: tau_capstan_mnm[0],
            torque_capstan_b_mnm: tau_capstan_mnm[1],
            pos_a_deg: input.pos_a_deg,
            pos_b_deg: input.pos_b_deg,
            force_x_n: cmd.fx_n,
            force_y_n: cmd.fy_n,
            time_s: 0.0,
        };

        OutputData { volt_a_v, volt_b_v }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::force_ctrl::test_util::params;
    use approx::assert_relative_eq;
    use util::module::State;

    #[test]
    fn test_three_newton_x_scenario() {
        let mut fc = ForceCtrl::with_params(params());

        let (output, report) = fc
            .proc(&InputData {
                cmd: Some(ForceCommand { fx_n: 3.0, fy_n: 0.0 }),
                ..Default::default()
            })
            .unwrap();

        let tm = fc.haptic_tm();

        // Capstan torques straight from the Jacobian transpose
        assert_relative_eq!(tm.torque_capstan_a_mnm, -190.3875, epsilon = 1e-9);
        assert_relative_eq!(tm.torque_capstan_b_mnm, -520.299, epsilon = 1e-9);

        // Motor torques through the 13:1 reduction
        assert_relative_eq!(tm.torque_motor_a_mnm, -190.3875 / 13.0, epsilon = 1e-9);
        assert_relative_eq!(tm.torque_motor_b_mnm, -520.299 / 13.0, epsilon = 1e-9);

        // Channel A: 5 * (-190.3875 / 13) / 25.52 = -2.869356 V, in range
        assert_relative_eq!(output.volt_a_v, -2.869356, epsilon = 1e-6);
        assert!(!report.volt_a_saturated);

        // Channel B would be -7.84 V unclamped and must saturate to exactly
        // the command ceiling
        assert_eq!(output.volt_b_v, -5.0);
        assert!(report.volt_b_saturated);

        // 3 N is within the configured X capability
        assert!(!report.force_x_over_limit);
    }

    #[test]
    fn test_saturation_is_exact() {
        let mut fc = ForceCtrl::with_params(params());

        // An absurdly large demand computes through and clamps, it is never
        // rejected
        let (output, report) = fc
            .proc(&InputData {
                cmd: Some(ForceCommand {
                    fx_n: 1.0e6,
                    fy_n: -1.0e6,
                }),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(output.volt_a_v.abs(), 5.0);
        assert_eq!(output.volt_b_v.abs(), 5.0);
        assert!(report.volt_a_saturated);
        assert!(report.volt_b_saturated);
        assert!(report.force_x_over_limit);
        assert!(report.force_y_over_limit);

        // The recorded torques stay unclamped
        assert!(fc.haptic_tm().torque_capstan_a_mnm.abs() > 1.0e6);
    }

    #[test]
    fn test_linearity_before_saturation() {
        let mut fc = ForceCtrl::with_params(params());

        let (small, _) = fc
            .proc(&InputData {
                cmd: Some(ForceCommand { fx_n: 0.4, fy_n: 0.2 }),
                ..Default::default()
            })
            .unwrap();

        let (doubled, report) = fc
            .proc(&InputData {
                cmd: Some(ForceCommand { fx_n: 0.8, fy_n: 0.4 }),
                ..Default::default()
            })
            .unwrap();

        assert!(!report.volt_a_saturated && !report.volt_b_saturated);
        assert_relative_eq!(doubled.volt_a_v, 2.0 * small.volt_a_v, epsilon = 1e-12);
        assert_relative_eq!(doubled.volt_b_v, 2.0 * small.volt_b_v, epsilon = 1e-12);
    }

    #[test]
    fn test_y_axis_limit_flag() {
        let mut fc = ForceCtrl::with_params(params());

        // The device cannot display Y force (fy_max_n = 0), so any Y demand
        // raises the advisory flag while still being computed through
        let (output, report) = fc
            .proc(&InputData {
                cmd: Some(ForceCommand { fx_n: 0.0, fy_n: 0.1 }),
                ..Default::default()
            })
            .unwrap();

        assert!(report.force_y_over_limit);
        assert!(output.volt_a_v != 0.0 || output.volt_b_v != 0.0);
    }
}
