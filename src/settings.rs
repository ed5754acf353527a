use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File, FileFormat};
use doomba_kinematics::DriveConfig;
use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment overrides look like `DOOMBA__DRIVE__MAX_RPM=1500`.
const ENV_PREFIX: &str = "DOOMBA";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub drive: DriveConfig,
    pub input: InputSettings,
    pub window: WindowSettings,
    pub headless: HeadlessSettings,
}

/// Gamepad inputs that can drive an axis, named after their usual position
/// on a dual-stick pad.
///
/// `LeftTrigger2`/`RightTrigger2` are the analog triggers of SDL-mapped pads,
/// which gilrs reports as buttons. Their `[0, 1]` travel is read as `[-1, 1]`,
/// so a released trigger is a fully released throttle. `LeftZ`/`RightZ` are
/// raw Z axes for joysticks that expose the throttle as an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PadAxis {
    LeftStickX,
    LeftStickY,
    LeftZ,
    RightStickX,
    RightStickY,
    RightZ,
    LeftTrigger2,
    RightTrigger2,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AxisBinding {
    pub axis: PadAxis,
    #[serde(default)]
    pub invert: bool,
}

impl AxisBinding {
    pub const fn new(axis: PadAxis, invert: bool) -> Self {
        AxisBinding { axis, invert }
    }

    pub fn apply(&self, raw: f64) -> f64 {
        if self.invert { -raw } else { raw }
    }
}

/// Which pad axes feed the pipeline.
///
/// The defaults steer with the right stick (its vertical axis drives the
/// heading's x component) and use the left analog trigger as throttle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub x: AxisBinding,
    pub y: AxisBinding,
    pub throttle: AxisBinding,
}

impl Default for InputSettings {
    fn default() -> Self {
        InputSettings {
            x: AxisBinding::new(PadAxis::RightStickY, false),
            y: AxisBinding::new(PadAxis::RightStickX, false),
            throttle: AxisBinding::new(PadAxis::LeftTrigger2, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub high_dpi: bool,
    pub font_size: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        WindowSettings {
            title: "Doomba Dashboard V1.0".to_string(),
            width: 800,
            height: 600,
            high_dpi: false,
            font_size: 36.0,
        }
    }
}

/// Run the tick loop without a window, logging telemetry instead.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeadlessSettings {
    pub enabled: bool,
    pub tick_rate_hz: f64,
    /// Log one telemetry line every `log_every` ticks; 0 disables it.
    pub log_every: u64,
    /// Stop after this many ticks. Runs until the input fails when unset.
    pub max_ticks: Option<u64>,
}

impl Default for HeadlessSettings {
    fn default() -> Self {
        HeadlessSettings {
            enabled: false,
            tick_rate_hz: 60.0,
            log_every: 60,
            max_ticks: None,
        }
    }
}

/// Load settings from `path` (optional) layered under `DOOMBA__*` environment variables.
pub fn load_settings(path: &str) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let builder = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );

    settings_from(builder)
}

fn settings_from(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    let settings = builder.build().and_then(|config| config.try_deserialize::<Settings>());

    match settings {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        settings_from(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_empty_source_gives_defaults() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings.drive, DriveConfig::default());
        assert_eq!(settings.input, InputSettings::default());
        assert_eq!(settings.window, WindowSettings::default());
        assert_eq!(settings.headless, HeadlessSettings::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = load_settings("config/does-not-exist.toml").unwrap();
        assert_eq!(settings.window.title, "Doomba Dashboard V1.0");
        assert_eq!(settings.headless.max_ticks, None);
    }

    #[test]
    fn test_partial_overrides() {
        let settings = from_toml(
            r#"
            [drive]
            max_rpm = 1500.0
            deadband_threshold = 0.2

            [input.throttle]
            axis = "RightZ"
            invert = true

            [headless]
            enabled = true
            max_ticks = 10
            "#,
        )
        .unwrap();

        assert_eq!(settings.drive.max_rpm, 1500.0);
        assert_eq!(settings.drive.deadband_threshold, 0.2);
        assert_eq!(settings.drive.max_speed, 100.0);
        assert_eq!(settings.input.throttle, AxisBinding::new(PadAxis::RightZ, true));
        assert_eq!(settings.input.x, InputSettings::default().x);
        assert!(settings.headless.enabled);
        assert_eq!(settings.headless.max_ticks, Some(10));
        assert_eq!(settings.headless.tick_rate_hz, 60.0);
    }

    #[test]
    fn test_throttle_defaults_to_left_trigger() {
        assert_eq!(InputSettings::default().throttle.axis, PadAxis::LeftTrigger2);

        let settings = from_toml(
            r#"
            [input.throttle]
            axis = "RightTrigger2"
            "#,
        )
        .unwrap();
        assert_eq!(settings.input.throttle, AxisBinding::new(PadAxis::RightTrigger2, false));
    }

    #[test]
    fn test_unknown_axis_is_rejected() {
        let result = from_toml(
            r#"
            [input.x]
            axis = "Trigger9"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_axis_inversion() {
        let binding = AxisBinding::new(PadAxis::LeftStickX, true);
        assert_eq!(binding.apply(0.4), -0.4);
        assert_eq!(AxisBinding::new(PadAxis::LeftStickX, false).apply(0.4), 0.4);
    }
}
