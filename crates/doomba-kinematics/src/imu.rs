//! Simulated IMU feedback.
//!
//! There is no real inertial sensor on the robot yet. The reading is derived
//! from the commanded wheel RPM: the RPM is encoded as a fake accelerometer
//! value and decoded back, then integrated over the clock to an angle. The
//! decode half is the entry point for a genuine sensor sample later on.

use core::f64::consts::TAU;
use libm::{fmax, sqrt};

use crate::{ImuReading, KinematicsError};

/// Seconds per minute, for RPM to rotations-per-second.
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Synthetic IMU driven by the commanded RPM and the loop clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedImu {
    /// Accelerometer scale `k` in `reading = rpm² · k`.
    constant: f64,
}

impl SimulatedImu {
    /// Construct a simulated IMU with accelerometer scale `constant`.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidImuConstant)` if `constant` is not positive.
    pub const fn new(constant: f64) -> Result<Self, KinematicsError> {
        if !(constant > 0.0) {
            return Err(KinematicsError::InvalidImuConstant("must be positive"));
        }
        Ok(SimulatedImu { constant })
    }

    /// Returns the accelerometer scale.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Forward half: RPM to the accelerometer value a sensor would report.
    pub fn rpm_to_accelerometer(&self, rpm: f64) -> f64 {
        rpm * rpm * self.constant
    }

    /// Inverse half: accelerometer value back to RPM.
    ///
    /// Negative readings are treated as zero.
    pub fn accelerometer_to_rpm(&self, reading: f64) -> f64 {
        sqrt(fmax(reading, 0.0) / self.constant)
    }

    /// Encode then decode `rpm`. Equal to `|rpm|` up to rounding.
    pub fn round_trip(&self, rpm: f64) -> f64 {
        let reading = self.rpm_to_accelerometer(rpm);
        self.accelerometer_to_rpm(reading)
    }

    /// Orientation angle for `target_rpm` at clock value `elapsed_time`.
    ///
    /// `elapsed_time` is the absolute clock value, not a per-tick delta. The
    /// total rotation grows without bound and is folded into `[0, 2π)`.
    ///
    /// # Arguments
    ///
    /// * `target_rpm`: Commanded RPM, passed through the sensor round trip.
    /// * `elapsed_time`: Clock value in milliseconds.
    ///
    /// # Returns
    ///
    /// The orientation angle in radians, never negative.
    pub fn reading(&self, target_rpm: f64, elapsed_time: f64) -> ImuReading {
        let rpm = self.round_trip(target_rpm);
        let rps = rpm / SECONDS_PER_MINUTE;
        let total_rotation = rps * elapsed_time * TAU;
        ImuReading::new(fmax(0.0, total_rotation % TAU))
    }
}
