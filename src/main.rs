mod clock;
mod graphics;
mod headless;
mod input;
mod settings;
mod tick;

use anyhow::Context;
use clock::MonotonicClock;
use doomba_kinematics::DrivePipeline;
use input::GamepadInput;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Doomba Dashboard starting...");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings::DEFAULT_CONFIG_PATH.to_string());
    let settings = settings::load_settings(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path))?;

    let pipeline = DrivePipeline::new(settings.drive).context("invalid drive configuration")?;
    info!(config = %pipeline.config(), "Drive pipeline ready.");

    let mut input = GamepadInput::connect(&settings.input).context("joystick required at startup")?;
    let clock = MonotonicClock::start();

    if settings.headless.enabled {
        let ctx = headless::run(&pipeline, &mut input, &clock, &settings.headless)?;
        info!(ticks = ctx.ticks, fps = ctx.fps, "Headless run finished.");
        return Ok(());
    }

    let window = settings.window.clone();
    macroquad::Window::from_config(graphics::window_conf(&window), async move {
        match graphics::run_dashboard(pipeline, input, clock, window).await {
            Ok(ctx) => info!(ticks = ctx.ticks, fps = ctx.fps, "Dashboard closed."),
            Err(e) => {
                error!("Dashboard stopped: {}", e);
                std::process::exit(1);
            }
        }
    });

    Ok(())
}
