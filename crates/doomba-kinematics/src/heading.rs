//! Stick vector to commanded heading and speed.

use libm::{atan2, sqrt};

use crate::CommandState;

/// Heading reported in place of a literal zero from `atan2`.
pub const FULL_CIRCLE_DEGREES: f64 = 360.0;

/// Resolve two filtered axis values into a [`CommandState`].
///
/// The heading is `atan2(y, x)` in degrees. An exact zero (which includes a
/// released stick) is reported as [`FULL_CIRCLE_DEGREES`]. Negative angles
/// are passed through as-is, so the heading range is `(-180, 360]`.
///
/// The speed is the Euclidean length of `(x, y)`, capped at `1.0`.
///
/// # Returns
///
/// The heading in degrees and the normalized speed.
pub fn resolve(x: f64, y: f64) -> CommandState {
    let mut heading_degrees = atan2(y, x).to_degrees();
    if heading_degrees == 0.0 {
        heading_degrees = FULL_CIRCLE_DEGREES;
    }

    let speed = sqrt(x * x + y * y).min(1.0);

    CommandState::new(heading_degrees, speed)
}
