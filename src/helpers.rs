// Standard library imports
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the unix epoch as a float, used to stamp generated readings.
pub fn time() -> f64 {
    // A clock set before 1970 stamps readings with zero rather than failing the run
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let seconds = duration.as_secs() as f64;
    let nanos = duration.subsec_nanos() as f64;
    seconds + nanos / 1_000_000_000.0
}

/// Rounds `value` to `decimals` places, the way readings are reported on the wire.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
