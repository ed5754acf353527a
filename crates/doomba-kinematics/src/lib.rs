#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for the Doomba differential-drive telemetry pipeline."]
#![doc = ""]
#![doc = "This crate turns joystick axis samples into a commanded heading and speed,"]
#![doc = "simulates an IMU feedback angle, and derives left/right wheel RPM commands."]

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod deadband;
pub mod error;
pub mod heading;
pub mod imu;
pub mod rotation;
pub mod wheels;

pub use deadband::apply_deadband;
pub use error::KinematicsError;
pub use heading::resolve;
pub use imu::SimulatedImu;
pub use rotation::RotationTransform;
pub use wheels::DifferentialWheelModel;

/// Reference top wheel RPM at full throttle.
pub const DEFAULT_MAX_RPM: f64 = 1300.0;
/// Reference scale for the normalized stick speed.
pub const DEFAULT_MAX_SPEED: f64 = 100.0;
/// Reference deadband threshold.
pub const DEFAULT_DEADBAND_THRESHOLD: f64 = 0.1;
/// Reference wheel-size to robot-size ratio.
pub const DEFAULT_WHEEL_CONVERSION_FACTOR: f64 = 8.0 / 2.0;
/// Reference accelerometer scale of the simulated IMU.
pub const DEFAULT_IMU_CONSTANT: f64 = 8.0 * 1.118e-5;

/// One raw joystick sample, captured once per tick.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSample {
    /// Stick axis feeding the heading's x component, in `[-1, 1]`.
    pub x_axis: f64,
    /// Stick axis feeding the heading's y component, in `[-1, 1]`.
    pub y_axis: f64,
    /// Throttle axis, in `[-1, 1]`.
    pub throttle_axis: f64,
    /// Monotonic clock value when the sample was taken (ms).
    pub timestamp_ms: f64,
}

impl InputSample {
    /// Construct a new input sample.
    ///
    /// # Arguments
    ///
    /// * `x_axis`: Axis feeding the heading's x component.
    /// * `y_axis`: Axis feeding the heading's y component.
    /// * `throttle_axis`: Throttle axis value.
    /// * `timestamp_ms`: Clock value when the sample was taken, in milliseconds.
    pub const fn new(x_axis: f64, y_axis: f64, throttle_axis: f64, timestamp_ms: f64) -> Self {
        InputSample { x_axis, y_axis, throttle_axis, timestamp_ms }
    }
}

/// Commanded heading and normalized speed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CommandState {
    /// Heading (deg). A literal zero is reported as `360`; see [`heading::resolve`].
    pub heading_degrees: f64,
    /// Stick magnitude in `[0, 1]`.
    pub speed: f64,
}

impl CommandState {
    /// Construct a command state.
    pub const fn new(heading_degrees: f64, speed: f64) -> Self {
        CommandState { heading_degrees, speed }
    }
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(heading: {:.1}°, speed: {:.2})", self.heading_degrees, self.speed)
    }
}

/// Target wheel RPM selected by the throttle.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RpmTarget {
    /// Target RPM in `[0, max_rpm]`.
    pub target_rpm: f64,
}

impl RpmTarget {
    /// Map a throttle axis value onto `[0, max_rpm]`.
    ///
    /// The throttle is clamped to `[-1, 1]` first, so `-1` is a standstill,
    /// `0` is half of `max_rpm` and `1` is `max_rpm`.
    ///
    /// # Returns
    ///
    /// The target RPM `((throttle + 1) / 2) · max_rpm`.
    pub fn from_throttle(throttle: f64, max_rpm: f64) -> Self {
        let throttle = throttle.clamp(-1.0, 1.0);
        RpmTarget { target_rpm: ((throttle + 1.0) / 2.0) * max_rpm }
    }
}

/// Simulated IMU orientation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImuReading {
    /// Angle (rad) in `[0, 2π)`.
    pub angle_radians: f64,
}

impl ImuReading {
    /// Construct an IMU reading.
    pub const fn new(angle_radians: f64) -> Self {
        ImuReading { angle_radians }
    }
}

/// Left and right wheel RPM commands. Not clamped.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelCommand {
    /// Left wheel RPM.
    pub left_rpm: f64,
    /// Right wheel RPM.
    pub right_rpm: f64,
}

impl WheelCommand {
    /// Construct a wheel command.
    pub const fn new(left_rpm: f64, right_rpm: f64) -> Self {
        WheelCommand { left_rpm, right_rpm }
    }
}

impl fmt::Display for WheelCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(L: {:.0} rpm, R: {:.0} rpm)", self.left_rpm, self.right_rpm)
    }
}

/// Everything one tick hands to the rendering side.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Telemetry {
    /// Clock value of the sample this telemetry was computed from (ms).
    pub timestamp_ms: f64,
    /// Resolved heading and speed.
    pub command: CommandState,
    /// Throttle-derived target RPM.
    pub target: RpmTarget,
    /// Simulated IMU angle.
    pub imu: ImuReading,
    /// Wheel RPM commands.
    pub wheels: WheelCommand,
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} target: {:.0} rpm, imu: {:.2} rad, wheels: {}",
            self.command, self.target.target_rpm, self.imu.angle_radians, self.wheels
        )
    }
}

/// Tunable constants of the pipeline.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveConfig {
    /// Wheel RPM at full throttle.
    pub max_rpm: f64,
    /// Scale for the normalized stick speed.
    pub max_speed: f64,
    /// Axis values with a smaller magnitude read as zero.
    pub deadband_threshold: f64,
    /// Wheel-size to robot-size ratio.
    pub wheel_conversion_factor: f64,
    /// Accelerometer scale of the simulated IMU.
    pub imu_constant: f64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        DriveConfig {
            max_rpm: DEFAULT_MAX_RPM,
            max_speed: DEFAULT_MAX_SPEED,
            deadband_threshold: DEFAULT_DEADBAND_THRESHOLD,
            wheel_conversion_factor: DEFAULT_WHEEL_CONVERSION_FACTOR,
            imu_constant: DEFAULT_IMU_CONSTANT,
        }
    }
}

impl fmt::Display for DriveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DriveConfig (max_rpm: {}, max_speed: {}, deadband: {}, conversion: {}, k: {:e})",
            self.max_rpm,
            self.max_speed,
            self.deadband_threshold,
            self.wheel_conversion_factor,
            self.imu_constant
        )
    }
}

/// The per-tick computation: deadband, heading/speed, throttle mapping,
/// simulated IMU and wheel model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrivePipeline {
    config: DriveConfig,
    imu: SimulatedImu,
    wheels: DifferentialWheelModel,
}

impl DrivePipeline {
    /// Build a pipeline from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidDeadband)` if the threshold is negative or NaN.
    /// Returns `Err(KinematicsError::InvalidMaxRpm)` if `max_rpm` is not positive.
    /// Errors from [`SimulatedImu::new`] and [`DifferentialWheelModel::new`] are propagated.
    pub fn new(config: DriveConfig) -> Result<Self, KinematicsError> {
        if !(config.deadband_threshold >= 0.0) {
            return Err(KinematicsError::InvalidDeadband("must be non-negative"));
        }
        if !(config.max_rpm > 0.0) || !config.max_rpm.is_finite() {
            return Err(KinematicsError::InvalidMaxRpm("must be positive and finite"));
        }

        Ok(DrivePipeline {
            imu: SimulatedImu::new(config.imu_constant)?,
            wheels: DifferentialWheelModel::new(config.max_speed, config.wheel_conversion_factor)?,
            config,
        })
    }

    /// Returns the configuration this pipeline was built from.
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Returns the simulated IMU.
    pub fn imu(&self) -> &SimulatedImu {
        &self.imu
    }

    /// Returns the wheel model.
    pub fn wheels(&self) -> &DifferentialWheelModel {
        &self.wheels
    }

    /// Run one tick over `sample`.
    pub fn step(&self, sample: &InputSample) -> Telemetry {
        let threshold = self.config.deadband_threshold;
        let x = apply_deadband(sample.x_axis, threshold);
        let y = apply_deadband(sample.y_axis, threshold);

        let command = resolve(x, y);
        let target = RpmTarget::from_throttle(sample.throttle_axis, self.config.max_rpm);
        let imu = self.imu.reading(target.target_rpm, sample.timestamp_ms);
        let wheels = self.wheels.wheel_rpms(
            command.speed,
            command.heading_degrees,
            target.target_rpm,
            imu.angle_radians,
        );

        Telemetry { timestamp_ms: sample.timestamp_ms, command, target, imu, wheels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::TAU;
    const EPSILON: f64 = 1e-9;

    fn pipeline() -> DrivePipeline {
        DrivePipeline::new(DriveConfig::default()).unwrap()
    }

    #[test]
    fn test_default_config_matches_reference() {
        let config = DriveConfig::default();
        assert_eq!(config.max_rpm, 1300.0);
        assert_eq!(config.max_speed, 100.0);
        assert_eq!(config.deadband_threshold, 0.1);
        assert_eq!(config.wheel_conversion_factor, 4.0);
        assert!((config.imu_constant - 8.944e-5).abs() < 1e-15);
    }

    #[test]
    fn test_pipeline_rejects_bad_config() {
        let bad = DriveConfig { deadband_threshold: -0.1, ..DriveConfig::default() };
        assert!(matches!(DrivePipeline::new(bad), Err(KinematicsError::InvalidDeadband(_))));

        let bad = DriveConfig { deadband_threshold: f64::NAN, ..DriveConfig::default() };
        assert!(matches!(DrivePipeline::new(bad), Err(KinematicsError::InvalidDeadband(_))));

        let bad = DriveConfig { max_rpm: 0.0, ..DriveConfig::default() };
        assert!(matches!(DrivePipeline::new(bad), Err(KinematicsError::InvalidMaxRpm(_))));

        let bad = DriveConfig { max_speed: -5.0, ..DriveConfig::default() };
        assert!(matches!(DrivePipeline::new(bad), Err(KinematicsError::InvalidMaxSpeed(_))));

        let bad = DriveConfig { wheel_conversion_factor: f64::NAN, ..DriveConfig::default() };
        assert!(matches!(
            DrivePipeline::new(bad),
            Err(KinematicsError::InvalidConversionFactor(_))
        ));

        let bad = DriveConfig { imu_constant: 0.0, ..DriveConfig::default() };
        assert!(matches!(DrivePipeline::new(bad), Err(KinematicsError::InvalidImuConstant(_))));
    }

    #[test]
    fn test_pipeline_parts_follow_config() {
        let config = DriveConfig { max_speed: 50.0, imu_constant: 2e-5, ..DriveConfig::default() };
        let pipeline = DrivePipeline::new(config).unwrap();
        assert_eq!(pipeline.config(), &config);
        assert_eq!(pipeline.wheels().max_speed(), 50.0);
        assert_eq!(pipeline.wheels().conversion_factor(), config.wheel_conversion_factor);
        assert_eq!(pipeline.imu().constant(), 2e-5);
    }

    #[test]
    fn test_throttle_mapping() {
        assert_eq!(RpmTarget::from_throttle(-1.0, 1300.0).target_rpm, 0.0);
        assert_eq!(RpmTarget::from_throttle(0.0, 1300.0).target_rpm, 650.0);
        assert_eq!(RpmTarget::from_throttle(1.0, 1300.0).target_rpm, 1300.0);
        assert_eq!(RpmTarget::from_throttle(1.5, 1300.0).target_rpm, 1300.0);
        assert_eq!(RpmTarget::from_throttle(-3.0, 1300.0).target_rpm, 0.0);
    }

    #[test]
    fn test_full_stick_on_x_without_throttle() {
        // x=1, y=0, throttle fully released → target 0, IMU 0
        let telemetry = pipeline().step(&InputSample::new(1.0, 0.0, -1.0, 5_000.0));
        assert_eq!(telemetry.command.heading_degrees, 360.0);
        assert!((telemetry.command.speed - 1.0).abs() < EPSILON);
        assert_eq!(telemetry.target.target_rpm, 0.0);
        assert_eq!(telemetry.imu.angle_radians, 0.0);
        // common = 100 · cos(radians(360) · 0) = 100
        assert!((telemetry.wheels.right_rpm - 100.0).abs() < EPSILON);
        assert!((telemetry.wheels.left_rpm - (-100.0)).abs() < EPSILON);
    }

    #[test]
    fn test_deadband_zone_gives_equal_wheels() {
        let pipeline = pipeline();
        for (throttle, t) in [(-1.0, 0.0), (0.0, 17.0), (0.3, 1_234.0), (1.0, 98_765.0)] {
            let telemetry = pipeline.step(&InputSample::new(0.05, -0.09, throttle, t));
            assert_eq!(telemetry.command.speed, 0.0);
            assert_eq!(telemetry.command.heading_degrees, 360.0);
            let expected = telemetry.target.target_rpm * 4.0;
            assert_eq!(telemetry.wheels.left_rpm, expected);
            assert_eq!(telemetry.wheels.right_rpm, expected);
        }
    }

    #[test]
    fn test_deadband_applies_per_axis() {
        // y is noise, x is a real deflection
        let telemetry = pipeline().step(&InputSample::new(-0.5, 0.05, -1.0, 0.0));
        assert!((telemetry.command.heading_degrees - 180.0).abs() < EPSILON);
        assert!((telemetry.command.speed - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_step_carries_timestamp_and_imu() {
        let pipeline = pipeline();
        let sample = InputSample::new(0.0, 1.0, 0.5, 2_500.0);
        let telemetry = pipeline.step(&sample);
        assert_eq!(telemetry.timestamp_ms, 2_500.0);
        let expected_imu = pipeline.imu().reading(telemetry.target.target_rpm, 2_500.0);
        assert_eq!(telemetry.imu, expected_imu);
        assert!((0.0..TAU).contains(&telemetry.imu.angle_radians));
    }

    #[test]
    fn test_step_is_pure() {
        let pipeline = pipeline();
        let sample = InputSample::new(0.4, -0.7, 0.2, 10_001.0);
        assert_eq!(pipeline.step(&sample), pipeline.step(&sample));
    }
}
