//! Parameters structure for EncCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for encoder decoding.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- COUNTER ----
    /// Highest value the free-running quadrature counter reaches before
    /// wrapping back to zero.
    ///
    /// Units: counts
    pub max_count: u32,

    /// Number of counts in one motor output revolution, counting all four
    /// quadrature edges per encoder cycle.
    ///
    /// Units: counts/revolution
    pub counts_per_rev: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Scale factor from decoded counts to degrees.
    ///
    /// Units: degrees/count
    pub fn counts_to_deg(&self) -> f64 {
        360.0 / self.counts_per_rev
    }
}
