use doomba_kinematics::*;

fn main() {
    let config = DriveConfig::default();
    let pipeline_result = DrivePipeline::new(config);

    let throttle = 0.0; // half of max_rpm
    let tick_ms = 16.0; // ~60 fps
    let num_steps = 24;

    match pipeline_result {
        Ok(pipeline) => {
            println!("Initializing sweep...");
            println!("  {}", pipeline.config());
            println!("  Max Speed:    {}", pipeline.wheels().max_speed());
            println!("  Wheel Factor: {}", pipeline.wheels().conversion_factor());
            println!("  IMU Constant: {:e}", pipeline.imu().constant());
            println!("  Throttle:     {}", throttle);
            println!("  Tick:         {} ms", tick_ms);
            println!("  Num Steps:    {}", num_steps);
            println!("\nSweeping the stick once around the circle...");

            for i in 0..num_steps {
                let angle = (i as f64 / num_steps as f64) * std::f64::consts::TAU;
                let timestamp_ms = i as f64 * tick_ms;
                let sample = InputSample::new(angle.cos(), angle.sin(), throttle, timestamp_ms);
                let telemetry = pipeline.step(&sample);
                println!("Step {:>2}: {}", i + 1, telemetry);
            }

            println!("\nSweep complete.");
        }
        Err(e) => {
            eprintln!("Failed to initialize pipeline: {:?}", e);
            eprintln!("Please check the drive configuration: {}", config);
        }
    }
}
