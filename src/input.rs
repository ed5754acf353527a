use std::fmt;

use doomba_kinematics::InputSample;
use gilrs::{Axis, Button, Event, EventType, Gamepad, Gilrs};
use tracing::{info, warn};

use crate::settings::{AxisBinding, InputSettings, PadAxis};

/// Produces one [`InputSample`] per tick.
pub trait InputSource {
    fn sample(&mut self, timestamp_ms: f64) -> Result<InputSample, InputError>;
}

#[derive(Debug)]
pub enum InputError {
    /// No joystick is connected, so no sample can be produced.
    NoDevice,
    /// The gamepad backend could not be initialised.
    Backend(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NoDevice => write!(f, "No joystick detected"),
            InputError::Backend(msg) => write!(f, "Gamepad backend unavailable: {}", msg),
        }
    }
}

impl std::error::Error for InputError {}

/// Where gilrs keeps the state of a [`PadAxis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PadSource {
    Axis(Axis),
    Trigger(Button),
}

impl From<PadAxis> for PadSource {
    fn from(axis: PadAxis) -> Self {
        match axis {
            PadAxis::LeftStickX => PadSource::Axis(Axis::LeftStickX),
            PadAxis::LeftStickY => PadSource::Axis(Axis::LeftStickY),
            PadAxis::LeftZ => PadSource::Axis(Axis::LeftZ),
            PadAxis::RightStickX => PadSource::Axis(Axis::RightStickX),
            PadAxis::RightStickY => PadSource::Axis(Axis::RightStickY),
            PadAxis::RightZ => PadSource::Axis(Axis::RightZ),
            PadAxis::LeftTrigger2 => PadSource::Trigger(Button::LeftTrigger2),
            PadAxis::RightTrigger2 => PadSource::Trigger(Button::RightTrigger2),
        }
    }
}

/// Trigger travel `[0, 1]` onto the axis range `[-1, 1]`.
fn trigger_to_axis(value: f32) -> f64 {
    value as f64 * 2.0 - 1.0
}

/// Reads the first connected gamepad through gilrs.
pub struct GamepadInput {
    gilrs: Gilrs,
    bindings: InputSettings,
}

impl GamepadInput {
    /// Open the gamepad backend and require at least one connected pad.
    pub fn connect(bindings: &InputSettings) -> Result<Self, InputError> {
        let gilrs = Gilrs::new().map_err(|e| InputError::Backend(e.to_string()))?;
        let mut input = GamepadInput { gilrs, bindings: *bindings };
        input.pump_events();

        let (id, pad) = input.gilrs.gamepads().next().ok_or(InputError::NoDevice)?;
        info!(?id, name = pad.name(), "Using gamepad");
        Ok(input)
    }

    /// Axis state only updates while events are drained.
    fn pump_events(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => info!(?id, "Gamepad connected"),
                EventType::Disconnected => warn!(?id, "Gamepad disconnected"),
                _ => {}
            }
        }
    }
}

fn read_axis(pad: &Gamepad<'_>, binding: &AxisBinding) -> f64 {
    let raw = match PadSource::from(binding.axis) {
        PadSource::Axis(axis) => pad.value(axis) as f64,
        // No data yet means the trigger has not moved since connect.
        PadSource::Trigger(button) => {
            trigger_to_axis(pad.button_data(button).map_or(0.0, |data| data.value()))
        }
    };
    binding.apply(raw)
}

impl InputSource for GamepadInput {
    fn sample(&mut self, timestamp_ms: f64) -> Result<InputSample, InputError> {
        self.pump_events();

        let (_, pad) = self.gilrs.gamepads().next().ok_or(InputError::NoDevice)?;
        Ok(InputSample::new(
            read_axis(&pad, &self.bindings.x),
            read_axis(&pad, &self.bindings.y),
            read_axis(&pad, &self.bindings.throttle),
            timestamp_ms,
        ))
    }
}

/// Replays fixed `(x, y, throttle)` triples, then reports the device gone.
#[cfg(test)]
pub struct ScriptedInput {
    axes: std::collections::VecDeque<(f64, f64, f64)>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new(axes: impl IntoIterator<Item = (f64, f64, f64)>) -> Self {
        ScriptedInput { axes: axes.into_iter().collect() }
    }
}

#[cfg(test)]
impl InputSource for ScriptedInput {
    fn sample(&mut self, timestamp_ms: f64) -> Result<InputSample, InputError> {
        let (x, y, throttle) = self.axes.pop_front().ok_or(InputError::NoDevice)?;
        Ok(InputSample::new(x, y, throttle, timestamp_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_mapping() {
        assert_eq!(PadSource::from(PadAxis::RightStickY), PadSource::Axis(Axis::RightStickY));
        assert_eq!(PadSource::from(PadAxis::LeftZ), PadSource::Axis(Axis::LeftZ));
    }

    #[test]
    fn test_triggers_read_from_button_data() {
        assert_eq!(
            PadSource::from(PadAxis::LeftTrigger2),
            PadSource::Trigger(Button::LeftTrigger2)
        );
        assert_eq!(
            PadSource::from(PadAxis::RightTrigger2),
            PadSource::Trigger(Button::RightTrigger2)
        );
    }

    #[test]
    fn test_trigger_travel_spans_throttle_range() {
        assert_eq!(trigger_to_axis(0.0), -1.0);
        assert_eq!(trigger_to_axis(0.5), 0.0);
        assert_eq!(trigger_to_axis(1.0), 1.0);
    }

    #[test]
    fn test_scripted_input_runs_dry() {
        let mut input = ScriptedInput::new([(0.5, -0.5, 1.0)]);
        let sample = input.sample(42.0).unwrap();
        assert_eq!(sample, InputSample::new(0.5, -0.5, 1.0, 42.0));
        assert!(matches!(input.sample(43.0), Err(InputError::NoDevice)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(InputError::NoDevice.to_string(), "No joystick detected");
        assert_eq!(
            InputError::Backend("no udev".into()).to_string(),
            "Gamepad backend unavailable: no udev"
        );
    }
}
