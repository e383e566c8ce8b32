//! No-op acquisition board backend

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use super::{DacChannel, DaqBackend, DaqError, EncChannel};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Backend used when no board is attached: counters read zero and voltage
/// writes are discarded.
pub struct NoopDaq;

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DaqBackend for NoopDaq {
    fn read_encoder(&mut self, _channel: EncChannel) -> Result<u32, DaqError> {
        Ok(0)
    }

    fn write_dac(&mut self, _channel: DacChannel, _volts: f64) -> Result<(), DaqError> {
        Ok(())
    }
}
