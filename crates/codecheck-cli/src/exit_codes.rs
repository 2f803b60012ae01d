//! Exit codes of the `codecheck` binary. Part of its public contract.

pub const OK: i32 = 0;
/// Validation failed, files missing, sizes mismatched or paths unsafe.
pub const FAILED: i32 = 1;
/// The configuration could not be loaded or the command could not run.
pub const CONFIG_ERROR: i32 = 2;
