use std::time::Duration;

use anyhow::{Context, ensure};
use doomba_kinematics::DrivePipeline;
use spin_sleep::SpinSleeper;
use tracing::info;

use crate::clock::Clock;
use crate::input::InputSource;
use crate::settings::HeadlessSettings;
use crate::tick::{TickContext, tick};

/// Tick loop without a window. Returns the final context once the tick
/// limit is reached; an input failure ends the run with an error.
pub fn run<I, C>(
    pipeline: &DrivePipeline,
    input: &mut I,
    clock: &C,
    settings: &HeadlessSettings,
) -> anyhow::Result<TickContext>
where
    I: InputSource + ?Sized,
    C: Clock + ?Sized,
{
    ensure!(
        settings.tick_rate_hz.is_finite() && settings.tick_rate_hz > 0.0,
        "headless tick rate must be positive, got {}",
        settings.tick_rate_hz
    );

    let period = Duration::try_from_secs_f64(1.0 / settings.tick_rate_hz)
        .with_context(|| format!("headless tick rate {} Hz is too slow", settings.tick_rate_hz))?;
    let sleeper = SpinSleeper::new(1_000);
    let mut ctx = TickContext::new(clock.now_ms());

    info!(
        rate_hz = settings.tick_rate_hz,
        max_ticks = ?settings.max_ticks,
        "Headless loop started"
    );

    loop {
        if settings.max_ticks.is_some_and(|max| ctx.ticks >= max) {
            info!(ticks = ctx.ticks, "Tick limit reached, stopping");
            break;
        }

        let (next, telemetry) = tick(ctx, pipeline, input, clock)?;
        ctx = next;

        if settings.log_every > 0 && ctx.ticks % settings.log_every == 0 {
            info!(tick = ctx.ticks, fps = ctx.fps, "{}", telemetry);
        }

        sleeper.sleep(period);
    }

    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::input::{InputError, ScriptedInput};
    use doomba_kinematics::DriveConfig;

    fn settings(max_ticks: Option<u64>) -> HeadlessSettings {
        HeadlessSettings {
            enabled: true,
            tick_rate_hz: 1_000.0,
            log_every: 2,
            max_ticks,
        }
    }

    #[test]
    fn test_stops_at_tick_limit() {
        let pipeline = DrivePipeline::new(DriveConfig::default()).unwrap();
        let clock = ManualClock::at(0.0);
        let mut input = ScriptedInput::new(vec![(0.0, 0.0, 0.0); 10]);

        let ctx = run(&pipeline, &mut input, &clock, &settings(Some(3))).unwrap();
        assert_eq!(ctx.ticks, 3);
    }

    #[test]
    fn test_lost_device_ends_run() {
        let pipeline = DrivePipeline::new(DriveConfig::default()).unwrap();
        let clock = ManualClock::at(0.0);
        let mut input = ScriptedInput::new(vec![(0.5, 0.5, 0.0); 2]);

        let err = run(&pipeline, &mut input, &clock, &settings(None)).unwrap_err();
        assert!(matches!(err.downcast_ref::<InputError>(), Some(InputError::NoDevice)));
    }

    #[test]
    fn test_rejects_bad_tick_rate() {
        let pipeline = DrivePipeline::new(DriveConfig::default()).unwrap();
        let clock = ManualClock::at(0.0);
        let mut input = ScriptedInput::new(Vec::<(f64, f64, f64)>::new());
        for rate in [0.0, -60.0, f64::NAN, f64::INFINITY, 1e-300] {
            let bad = HeadlessSettings { tick_rate_hz: rate, ..settings(Some(1)) };
            assert!(run(&pipeline, &mut input, &clock, &bad).is_err(), "rate {rate}");
        }
    }
}
