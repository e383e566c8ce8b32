//! Simulated acquisition board backend

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;

use super::{DacChannel, DaqBackend, DaqError, EncChannel, Params};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulated board: a pair of free-running counters with deterministic
/// per-read drift, and DAC channels which record the last written voltage.
pub struct SimDaq {
    max_count: u32,
    counts: [u32; 2],
    drift_counts: [i64; 2],
    dac_range_v: f64,
    volts: [f64; 2],
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimDaq {
    /// Create a simulated board from the backend parameters.
    pub fn new(params: &Params) -> Self {
        SimDaq {
            max_count: params.sim_max_count,
            counts: params.sim_initial_counts,
            drift_counts: params.sim_drift_counts,
            dac_range_v: params.dac_range_v,
            volts: [0.0; 2],
        }
    }

    /// Place a counter at an arbitrary raw value.
    pub fn set_counts(&mut self, channel: EncChannel, raw: u32) {
        self.counts[Self::enc_idx(channel)] = raw.min(self.max_count);
    }

    /// Last voltage written to a DAC channel.
    ///
    /// Units: volts
    pub fn dac_v(&self, channel: DacChannel) -> f64 {
        match channel {
            DacChannel::MotorA => self.volts[0],
            DacChannel::MotorB => self.volts[1],
        }
    }

    fn enc_idx(channel: EncChannel) -> usize {
        match channel {
            EncChannel::MotorA => 0,
            EncChannel::MotorB => 1,
        }
    }
}

impl DaqBackend for SimDaq {
    fn read_encoder(&mut self, channel: EncChannel) -> Result<u32, DaqError> {
        let idx = Self::enc_idx(channel);
        let raw = self.counts[idx];

        // Advance the counter for the next read, wrapping over the modulus
        // the way the hardware counter does
        let modulus = self.max_count as i64 + 1;
        self.counts[idx] = (raw as i64 + self.drift_counts[idx]).rem_euclid(modulus) as u32;

        Ok(raw)
    }

    fn write_dac(&mut self, channel: DacChannel, volts: f64) -> Result<(), DaqError> {
        if !volts.is_finite() || volts.abs() > self.dac_range_v {
            return Err(DaqError::VoltsOutOfRange(volts, self.dac_range_v));
        }

        let idx = match channel {
            DacChannel::MotorA => 0,
            DacChannel::MotorB => 1,
        };
        self.volts[idx] = volts;

        trace!("SimDaq: {:?} <- {:.3} V", channel, volts);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> Params {
        Params {
            backend: "sim".into(),
            dac_range_v: 10.0,
            sim_max_count: 99,
            sim_initial_counts: [98, 2],
            sim_drift_counts: [5, -5],
        }
    }

    #[test]
    fn test_counter_wraps_over_modulus() {
        let mut daq = SimDaq::new(&params());

        // First read returns the initial count, advancing 98 by +5 wraps
        // over the 100 count modulus to 3
        assert_eq!(daq.read_encoder(EncChannel::MotorA).unwrap(), 98);
        assert_eq!(daq.read_encoder(EncChannel::MotorA).unwrap(), 3);

        // Negative drift wraps the other way: 2 - 5 -> 97
        assert_eq!(daq.read_encoder(EncChannel::MotorB).unwrap(), 2);
        assert_eq!(daq.read_encoder(EncChannel::MotorB).unwrap(), 97);

        // Repositioning a counter takes effect on the next read
        daq.set_counts(EncChannel::MotorA, 10);
        assert_eq!(daq.read_encoder(EncChannel::MotorA).unwrap(), 10);
    }

    #[test]
    fn test_dac_range_enforced() {
        let mut daq = SimDaq::new(&params());

        daq.write_dac(DacChannel::MotorA, -4.2).unwrap();
        assert_eq!(daq.dac_v(DacChannel::MotorA), -4.2);

        // The full range is inclusive
        daq.write_dac(DacChannel::MotorB, 10.0).unwrap();

        assert!(matches!(
            daq.write_dac(DacChannel::MotorA, 10.5),
            Err(DaqError::VoltsOutOfRange(..))
        ));
        assert!(daq.write_dac(DacChannel::MotorA, std::f64::NAN).is_err());

        // A rejected demand must not disturb the held output
        assert_eq!(daq.dac_v(DacChannel::MotorA), -4.2);
    }
}
