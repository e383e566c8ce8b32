//! Raw quadrature count decoding

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::EncCtrlError;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Decode a raw free-running counter value into a signed count.
///
/// The counter holds a signed magnitude encoded as unsigned: values in
/// `[0, (max_count + 1) / 2)` are non-negative positions, values in
/// `[(max_count + 1) / 2, max_count]` are negative positions and are
/// remapped as `raw - max_count - 1`, so the count just below the wrap
/// point reads as -1.
///
/// A raw value above `max_count` cannot have come from the counter and is
/// reported as a domain error rather than being wrapped further.
pub fn decode(raw: u32, max_count: u32) -> Result<i64, EncCtrlError> {
    if raw > max_count {
        return Err(EncCtrlError::CountOutOfRange { raw, max_count });
    }

    let half_count = (max_count as i64 + 1) / 2;

    if (raw as i64) < half_count {
        Ok(raw as i64)
    } else {
        Ok(raw as i64 - max_count as i64 - 1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// 24 bit counter as found on the acquisition board
    const MAX_COUNT: u32 = 0xFF_FFFF;

    #[test]
    fn test_lower_half_identity() {
        // No wraparound correction is applied in the non-negative half
        let half_count = (MAX_COUNT + 1) / 2;

        for raw in &[0u32, 1, 1000, half_count - 1] {
            assert_eq!(decode(*raw, MAX_COUNT).unwrap(), *raw as i64);
        }
    }

    #[test]
    fn test_upper_half_wraparound() {
        let half_count = (MAX_COUNT + 1) / 2;

        for raw in &[half_count, half_count + 1, MAX_COUNT - 10, MAX_COUNT] {
            let decoded = decode(*raw, MAX_COUNT).unwrap();
            assert!(decoded < 0);
            assert_eq!(decoded + MAX_COUNT as i64 + 1, *raw as i64);
        }

        // The count just below the wrap point is one step in the negative
        // direction
        assert_eq!(decode(MAX_COUNT, MAX_COUNT).unwrap(), -1);
    }

    #[test]
    fn test_odd_modulus() {
        // A counter with an even wrap value splits with one fewer negative
        // count than positive
        assert_eq!(decode(49, 99).unwrap(), 49);
        assert_eq!(decode(50, 99).unwrap(), -50);
        assert_eq!(decode(99, 99).unwrap(), -1);
    }

    #[test]
    fn test_out_of_domain() {
        assert!(matches!(
            decode(MAX_COUNT + 1, MAX_COUNT),
            Err(EncCtrlError::CountOutOfRange { .. })
        ));
        assert!(decode(u32::MAX, MAX_COUNT).is_err());
    }
}
