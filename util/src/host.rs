//! Host environment utility functions

use std::path::PathBuf;

/// Get the software root directory from the `SSTRETCH_SW_ROOT` environment
/// variable.
pub fn get_sw_root() -> Result<PathBuf, std::env::VarError> {
    Ok(PathBuf::from(std::env::var("SSTRETCH_SW_ROOT")?))
}
