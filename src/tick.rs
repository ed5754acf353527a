use doomba_kinematics::{DrivePipeline, Telemetry};
use tracing::debug;

use crate::clock::Clock;
use crate::input::{InputError, InputSource};

/// Loop state carried from one tick to the next.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickContext {
    /// Ticks run since the loop started.
    pub ticks: u64,
    /// Frames counted in the current rate window.
    pub frames: u32,
    /// Clock value (ms) at which the current rate window opened.
    pub window_start_ms: f64,
    /// Last measured frame rate, rounded to two decimals.
    pub fps: f64,
}

impl TickContext {
    pub fn new(start_ms: f64) -> Self {
        TickContext { window_start_ms: start_ms, ..Default::default() }
    }

    /// Count one frame at `now_ms`. The rate is refreshed once a window of at
    /// least one second has elapsed.
    pub fn advance(self, now_ms: f64) -> Self {
        let mut next = TickContext {
            ticks: self.ticks + 1,
            frames: self.frames + 1,
            ..self
        };

        let window_secs = (now_ms - self.window_start_ms) / 1000.0;
        if window_secs >= 1.0 {
            next.fps = (next.frames as f64 / window_secs * 100.0).round() / 100.0;
            next.frames = 0;
            next.window_start_ms = now_ms;
            debug!(fps = next.fps, "Frame rate updated");
        }

        next
    }
}

/// Run one frame: read the clock, sample the input, run the pipeline.
pub fn tick<I, C>(
    ctx: TickContext,
    pipeline: &DrivePipeline,
    input: &mut I,
    clock: &C,
) -> Result<(TickContext, Telemetry), InputError>
where
    I: InputSource + ?Sized,
    C: Clock + ?Sized,
{
    let now_ms = clock.now_ms();
    let sample = input.sample(now_ms)?;
    let telemetry = pipeline.step(&sample);

    debug!(
        tick = ctx.ticks,
        heading = telemetry.command.heading_degrees,
        speed = telemetry.command.speed,
        target_rpm = telemetry.target.target_rpm,
        imu = telemetry.imu.angle_radians,
        left_rpm = telemetry.wheels.left_rpm,
        right_rpm = telemetry.wheels.right_rpm,
        "Tick"
    );

    Ok((ctx.advance(now_ms), telemetry))
}
