//! Error types for the kinematics library.
//!
//! The pipeline itself is total over finite inputs, so the only failures are
//! rejected configuration values when a [`crate::DrivePipeline`] is built.

use core::fmt;

/// Errors that can occur when validating a drive configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Returned when the deadband threshold is negative or NaN.
    InvalidDeadband(&'static str),
    /// Returned when the maximum wheel RPM is not positive.
    InvalidMaxRpm(&'static str),
    /// Returned when the maximum speed is negative or NaN.
    InvalidMaxSpeed(&'static str),
    /// Returned when the wheel conversion factor is not finite.
    InvalidConversionFactor(&'static str),
    /// Returned when the simulated IMU constant is not positive.
    InvalidImuConstant(&'static str),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidDeadband(msg) => {
                write!(f, "Invalid deadband threshold: {}", msg)
            }
            KinematicsError::InvalidMaxRpm(msg) => write!(f, "Invalid max RPM: {}", msg),
            KinematicsError::InvalidMaxSpeed(msg) => write!(f, "Invalid max speed: {}", msg),
            KinematicsError::InvalidConversionFactor(msg) => {
                write!(f, "Invalid wheel conversion factor: {}", msg)
            }
            KinematicsError::InvalidImuConstant(msg) => write!(f, "Invalid IMU constant: {}", msg),
        }
    }
}

impl core::error::Error for KinematicsError {}
