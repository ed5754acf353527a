//! Single-axis deadband filter.

use libm::fabs;

/// Suppress joystick noise around the rest position.
///
/// Returns exactly `0.0` when `|value| < threshold`, otherwise `value`
/// unchanged. The remaining range is not rescaled.
pub fn apply_deadband(value: f64, threshold: f64) -> f64 {
    if fabs(value) < threshold { 0.0 } else { value }
}
