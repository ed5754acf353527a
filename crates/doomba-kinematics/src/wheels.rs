//! Differential wheel model for the dashboard.
//!
//! This is a display model, not a controller: the IMU angle scales the
//! heading inside the cosine to make the wheels visibly wobble, and the
//! outputs are never clamped.

use libm::cos;

use crate::{KinematicsError, WheelCommand};

/// Maps speed, heading and target RPM onto left/right wheel RPM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialWheelModel {
    /// Scale applied to the normalized stick speed.
    max_speed: f64,
    /// Wheel-size to body-size ratio applied to the target RPM.
    conversion_factor: f64,
}

impl DifferentialWheelModel {
    /// Construct a wheel model.
    ///
    /// # Arguments
    ///
    /// * `max_speed`: Speed scale applied to the normalized stick speed.
    /// * `conversion_factor`: Wheel-size to body-size ratio.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidMaxSpeed)` if `max_speed` is negative or NaN.
    /// Returns `Err(KinematicsError::InvalidConversionFactor)` if `conversion_factor`
    /// is not finite.
    pub const fn new(max_speed: f64, conversion_factor: f64) -> Result<Self, KinematicsError> {
        if !(max_speed >= 0.0) {
            return Err(KinematicsError::InvalidMaxSpeed("must be non-negative"));
        }
        if !conversion_factor.is_finite() {
            return Err(KinematicsError::InvalidConversionFactor("must be finite"));
        }
        Ok(DifferentialWheelModel { max_speed, conversion_factor })
    }

    /// Returns the speed scale.
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Returns the wheel conversion factor.
    pub fn conversion_factor(&self) -> f64 {
        self.conversion_factor
    }

    /// Left and right wheel RPM for one tick.
    ///
    /// ```text
    /// common = speed · max_speed · cos(radians(heading) · imu_angle)
    /// right  =  common + target_rpm · conversion_factor
    /// left   = -common + target_rpm · conversion_factor
    /// ```
    ///
    /// # Arguments
    ///
    /// * `speed`: Normalized stick speed in `[0, 1]`.
    /// * `heading_degrees`: Commanded heading in degrees.
    /// * `target_rpm`: Throttle-derived target RPM.
    /// * `imu_angle`: Simulated IMU angle in radians.
    pub fn wheel_rpms(
        &self,
        speed: f64,
        heading_degrees: f64,
        target_rpm: f64,
        imu_angle: f64,
    ) -> WheelCommand {
        let common = speed * self.max_speed * cos(heading_degrees.to_radians() * imu_angle);
        let base = target_rpm * self.conversion_factor;

        WheelCommand::new(-common + base, common + base)
    }
}
