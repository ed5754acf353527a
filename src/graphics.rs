use doomba_kinematics::{DrivePipeline, RotationTransform, Telemetry};
use macroquad::prelude::*;
use tracing::info;

use crate::clock::Clock;
use crate::input::{InputError, InputSource};
use crate::settings::WindowSettings;
use crate::tick::{TickContext, tick};

// Function to configure the macroquad window
pub fn window_conf(settings: &WindowSettings) -> Conf {
    Conf {
        window_title: settings.title.clone(),
        window_width: settings.width,
        window_height: settings.height,
        high_dpi: settings.high_dpi,
        ..Default::default()
    }
}

// Robot glyph layout, in glyph-local pixels
const GLYPH_SIZE: f64 = 500.0;
const BASE_RADIUS: f32 = 250.0;
const SCREEN_LEFT_WHEEL: (f64, f64, f64, f64) = (50.0, 200.0, 50.0, 100.0);
const SCREEN_RIGHT_WHEEL: (f64, f64, f64, f64) = (400.0, 200.0, 50.0, 100.0);
const OSCILLATION_SCALE: f64 = 20.0; // bar height at |rpm| == max_rpm
const SPEED_BAR_WIDTH: f64 = 10.0;
const SPEED_BAR_SCALE: f64 = 100.0;

const HUD_RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);

/// Run the windowed dashboard until the window is closed or the input fails.
pub async fn run_dashboard<I, C>(
    pipeline: DrivePipeline,
    mut input: I,
    clock: C,
    settings: WindowSettings,
) -> Result<TickContext, InputError>
where
    I: InputSource,
    C: Clock,
{
    prevent_quit();
    let mut ctx = TickContext::new(clock.now_ms());

    info!("Dashboard loop starting...");

    loop {
        if is_quit_requested() {
            info!(ticks = ctx.ticks, "Window close requested, stopping.");
            break;
        }

        let (next, telemetry) = tick(ctx, &pipeline, &mut input, &clock)?;
        ctx = next;

        draw_overlay(&telemetry, &ctx, pipeline.config().max_rpm, settings.font_size);

        next_frame().await
    }

    Ok(ctx)
}

fn draw_overlay(telemetry: &Telemetry, ctx: &TickContext, max_rpm: f64, font_size: f32) {
    clear_background(BLACK);

    let anchor = (screen_width() as f64 / 2.0, screen_height() as f64 / 2.0);
    let glyph = RotationTransform::new(
        GLYPH_SIZE,
        GLYPH_SIZE,
        telemetry.command.heading_degrees,
        anchor,
    );

    let (cx, cy) = glyph.map_point(GLYPH_SIZE / 2.0, GLYPH_SIZE / 2.0);
    draw_circle(cx as f32, cy as f32, BASE_RADIUS, WHITE);
    fill_glyph_rect(&glyph, SCREEN_LEFT_WHEEL, BLACK);
    fill_glyph_rect(&glyph, SCREEN_RIGHT_WHEEL, BLACK);

    // Right RPM is drawn on the screen-left block and vice versa.
    let right_bar = telemetry.wheels.right_rpm.abs() / max_rpm * OSCILLATION_SCALE;
    let left_bar = telemetry.wheels.left_rpm.abs() / max_rpm * OSCILLATION_SCALE;
    let (x, y, w, _) = SCREEN_LEFT_WHEEL;
    fill_glyph_rect(&glyph, (x, y, w, right_bar), HUD_RED);
    let (x, y, w, _) = SCREEN_RIGHT_WHEEL;
    fill_glyph_rect(&glyph, (x, y, w, left_bar), HUD_RED);

    let speed_bar = telemetry.command.speed * SPEED_BAR_SCALE;
    fill_glyph_rect(
        &glyph,
        (GLYPH_SIZE / 2.0, GLYPH_SIZE / 2.0, SPEED_BAR_WIDTH, speed_bar),
        HUD_RED,
    );

    draw_label(&format!("{}", ctx.fps), 650.0, 550.0, font_size, HUD_RED);
    draw_label("Doomba Dashboard V1.0", 200.0, 5.0, font_size, WHITE);
    draw_label(
        &format!("{}", telemetry.command.heading_degrees as i64),
        screen_width() / 2.0,
        screen_height() / 2.0,
        font_size,
        HUD_RED,
    );
    let right_rpm = telemetry.wheels.right_rpm.round() as i64;
    let left_rpm = telemetry.wheels.left_rpm.round() as i64;
    draw_label(&format!("{}", right_rpm), 10.0, 450.0, font_size, HUD_RED);
    draw_label(&format!("{}", left_rpm), 10.0, 550.0, font_size, HUD_RED);
    draw_label(&format!("{:.2}", telemetry.imu.angle_radians), 10.0, 350.0, font_size, HUD_RED);
}

fn fill_glyph_rect(glyph: &RotationTransform, rect: (f64, f64, f64, f64), color: Color) {
    let (x, y, w, h) = rect;
    let [a, b, c, d] = glyph
        .map_rect(x, y, w, h)
        .map(|(px, py)| Vec2::new(px as f32, py as f32));
    draw_triangle(a, b, c, color);
    draw_triangle(a, c, d, color);
}

// draw_text positions by baseline; (x, y) here is the top-left of the text.
fn draw_label(text: &str, x: f32, y: f32, font_size: f32, color: Color) {
    draw_text(text, x, y + font_size * 0.75, font_size, color);
}
