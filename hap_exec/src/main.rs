//! # Haptic Control Executable
//!
//! This executable runs the servo cycle for the two degree of freedom
//! skin-stretch actuator:
//!
//!     - Initialise all modules and the acquisition backend
//!     - Main loop:
//!         - Latch and read both encoder counters
//!         - Decode counts into calibrated joint angles
//!         - Look up the current force demand from the profile
//!         - Map the demand into driver board voltages
//!         - Write the voltages to the DACs
//!         - Archive telemetry
//!
//! # Modules
//!
//! All control modules (e.g. `force_ctrl`) shall provide a public struct
//! implementing the `util::module::State` trait.

// ------------------------------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ------------------------------------------------------------------------------------------------

use hap_lib::{
    daq::{self, DacChannel, EncChannel},
    data_store::DataStore,
    force_ctrl::ForceCommand,
    params::HapExecParams,
};

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{info, warn};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("hap_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger. Per-cycle diagnostics are logged at trace level,
    // which is kept off at the servo rate.
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Skin-Stretch Haptic Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: HapExecParams =
        util::params::load("hap_exec.toml").wrap_err("Could not load exec params")?;

    if exec_params.profile.is_empty() {
        return Err(eyre!("The force profile is empty, nothing to execute"));
    }

    info!("Exec parameters loaded");

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.enc_ctrl
        .init("enc_ctrl.toml", &session)
        .wrap_err("Failed to initialise EncCtrl")?;
    info!("EncCtrl init complete");

    ds.force_ctrl
        .init("force_ctrl.toml", &session)
        .wrap_err("Failed to initialise ForceCtrl")?;
    info!("ForceCtrl init complete");

    // ---- INITIALISE ACQUISITION BACKEND ----

    let daq_params: daq::Params =
        util::params::load("daq.toml").wrap_err("Could not load DAQ params")?;

    let mut board = daq::from_params(&daq_params).wrap_err("Failed to construct the DAQ backend")?;

    info!("DAQ backend initialised (\"{}\")", daq_params.backend);

    // ---- MAIN LOOP ----

    info!("Initialisation complete, beginning servo loop\n");

    let run_epoch = Instant::now();
    let mut profile_idx = 0;

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();
        let elapsed_s = run_epoch.elapsed().as_secs_f64();

        if elapsed_s >= exec_params.run_duration_s {
            info!("End of run reached, stopping");
            break;
        }

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start();

        // ---- SENSING ----

        ds.enc_ctrl_input.raw_a = board
            .read_encoder(EncChannel::MotorA)
            .wrap_err("Motor A encoder read failed")?;
        ds.enc_ctrl_input.raw_b = board
            .read_encoder(EncChannel::MotorB)
            .wrap_err("Motor B encoder read failed")?;
        ds.enc_ctrl_input.zero = exec_params.zero_on_start && ds.num_cycles == 0;

        match ds.enc_ctrl.proc(&ds.enc_ctrl_input) {
            Ok((o, r)) => {
                ds.enc_ctrl_output = o;
                ds.enc_ctrl_status_rpt = r;
            }
            Err(e) => {
                // An out of domain count means this read is unusable, keep
                // the previous angles and carry on
                warn!("Error during EncCtrl processing: {}", e);
            }
        }

        // ---- FORCE DEMAND ----

        // Advance through the zero order hold profile
        while profile_idx < exec_params.profile.len()
            && exec_params.profile[profile_idx].time_s <= elapsed_s
        {
            let sp = exec_params.profile[profile_idx];
            ds.force_ctrl_input.cmd = Some(ForceCommand {
                fx_n: sp.fx_n,
                fy_n: sp.fy_n,
            });
            profile_idx += 1;

            info!("New force demand: ({:.3}, {:.3}) N", sp.fx_n, sp.fy_n);
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        ds.force_ctrl_input.pos_a_deg = ds.enc_ctrl_output.pos_a_deg;
        ds.force_ctrl_input.pos_b_deg = ds.enc_ctrl_output.pos_b_deg;

        let was_saturated =
            ds.force_ctrl_status_rpt.volt_a_saturated || ds.force_ctrl_status_rpt.volt_b_saturated;

        match ds.force_ctrl.proc(&ds.force_ctrl_input) {
            Ok((o, r)) => {
                ds.force_ctrl_output = o;
                ds.force_ctrl_status_rpt = r;
            }
            Err(e) => {
                // An invalid demand leaves the last good output in place
                warn!("Error during ForceCtrl processing: {}", e);
            }
        }

        if !was_saturated
            && (ds.force_ctrl_status_rpt.volt_a_saturated
                || ds.force_ctrl_status_rpt.volt_b_saturated)
        {
            warn!(
                "Voltage command saturated: ({:.3}, {:.3}) V",
                ds.force_ctrl_output.volt_a_v, ds.force_ctrl_output.volt_b_v
            );
        }

        // ---- ACTUATION ----

        board
            .write_dac(DacChannel::MotorA, ds.force_ctrl_output.volt_a_v)
            .wrap_err("Motor A DAC write failed")?;
        board
            .write_dac(DacChannel::MotorB, ds.force_ctrl_output.volt_b_v)
            .wrap_err("Motor B DAC write failed")?;

        // ---- WRITE ARCHIVES ----

        if let Err(e) = ds.enc_ctrl.write() {
            warn!("EncCtrl archive write failed: {}", e);
        }
        if let Err(e) = ds.force_ctrl.write() {
            warn!("ForceCtrl archive write failed: {}", e);
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match Duration::from_secs_f64(exec_params.cycle_period_s).checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - exec_params.cycle_period_s
            ),
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    // Leave the actuator unpowered
    ds.force_ctrl_input.cmd = Some(ForceCommand::zero());

    match ds.force_ctrl.proc(&ds.force_ctrl_input) {
        Ok((o, _)) => {
            board
                .write_dac(DacChannel::MotorA, o.volt_a_v)
                .wrap_err("Motor A DAC write failed")?;
            board
                .write_dac(DacChannel::MotorB, o.volt_b_v)
                .wrap_err("Motor B DAC write failed")?;
        }
        Err(e) => warn!("Could not zero the force demand: {}", e),
    }

    info!("Final haptic state: {:#?}", ds.haptic_tm());

    info!("End of execution");

    Ok(())
}
