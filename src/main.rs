//! Dotfield entry point
//!
//! Wires the producer thread (simulation + rasterization) to the control
//! thread's presentation loop and handles fatal setup failures.

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use dotfield::config::Config;
use dotfield::pipeline::{self, FrameBuffer};
use dotfield::platform::{self, DotfieldApp, ProxySink};
use dotfield::renderer::{PixmapCanvas, SceneRenderer};
use dotfield::sim::Simulation;

fn main() -> ExitCode {
    env_logger::init();
    let config = Config::from_env();
    log::info!(
        "dotfield starting: mode={} canvas={}px interval={}ms",
        config.mode.as_str(),
        config.canvas_size,
        config.frame_interval_ms
    );

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let sim = Simulation::setup(config)?;
    let canvas = PixmapCanvas::new(config.canvas_size, config.canvas_size)?;
    let frames = Arc::new(FrameBuffer::new(config.canvas_size, config.canvas_size));
    let stop = Arc::new(AtomicBool::new(false));

    let event_loop = platform::create_event_loop()?;
    let sink = ProxySink::new(&event_loop);

    let interval = Duration::from_millis(config.frame_interval_ms);
    let worker = {
        let frames = Arc::clone(&frames);
        let stop = Arc::clone(&stop);
        std::thread::Builder::new()
            .name("frame-pipeline".into())
            .spawn(move || {
                pipeline::run_pipeline(
                    sim,
                    SceneRenderer::default(),
                    canvas,
                    frames,
                    sink,
                    stop,
                    interval,
                )
            })?
    };

    let title = format!("dotfield - {}", config.mode.as_str());
    let mut app = DotfieldApp::new(title, config.canvas_size, Arc::clone(&frames));
    let loop_result = event_loop.run_app(&mut app);

    // The worker wakes from its sleep within one interval; no abandoned thread.
    stop.store(true, Ordering::Relaxed);
    if worker.join().is_err() {
        log::warn!("frame pipeline worker panicked");
    }

    if let Some(err) = app.take_setup_error() {
        return Err(err.into());
    }
    loop_result?;
    Ok(())
}
