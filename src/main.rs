use sensor_pipeline::{
    cli::CliArgs,
    config::Config,
    initialize, input,
    input::InputEvent,
    logging,
    present::{LogPresenter, Presenter},
    Simulation,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::thread;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    // Parse command-line arguments
    let cli_args = CliArgs::parse();

    // Setup logging
    initialize(cli_args.debug, cli_args.log_file.as_deref())?;

    // Load configuration
    let config = Config::load(&cli_args)?;
    logging::log_app_config(&config);

    // Sensor workers run here, the frame loop stays on the main thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(3)
        .thread_name("sensor-worker")
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;

    let fps = config.frame.fps;
    let mut simulation = Simulation::new(config, runtime.handle().clone())?;
    let mut presenter = LogPresenter::new(u64::from(fps));

    let input = input::spawn_stdin_reader().context("Failed to start input thread")?;
    info!("{}", input::HELP);

    if cli_args.auto_start {
        simulation.start_run();
    }

    let frame_duration = Duration::from_secs_f64(1.0 / f64::from(fps));
    let mut next_frame = Instant::now() + frame_duration;

    info!("Entering frame loop at {} FPS", fps);
    'frames: loop {
        for event in input.try_iter() {
            if event == InputEvent::Start && simulation.state().lock().simulation_running {
                info!("Run in progress, start ignored");
            }
            if !simulation.handle_input(event) {
                break 'frames;
            }
        }

        let summary = simulation.update();
        presenter.present(simulation.frame(), &simulation.state().snapshot());

        if summary.run_finished && cli_args.exit_when_idle {
            info!("Run complete, exiting");
            break;
        }
        if cli_args
            .max_frames
            .is_some_and(|max| simulation.frame() >= max)
        {
            info!("Reached frame limit {}", simulation.frame());
            break;
        }

        let now = Instant::now();
        if next_frame > now {
            thread::sleep(next_frame - now);
            next_frame += frame_duration;
        } else {
            // Running behind: drop the missed slots instead of bursting frames
            next_frame = now + frame_duration;
        }
    }

    let pending = simulation.pending_workers();
    if pending > 0 {
        warn!("Cancelling {} sensor call(s) still in flight", pending);
    }
    simulation.abort_workers();
    runtime.shutdown_timeout(Duration::from_secs(1));
    info!("Simulation stopped, application shutting down");

    Ok(())
}
