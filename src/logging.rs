use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use log::{debug, info, LevelFilter};
use std::io;

use crate::error::Result;

pub fn setup_logging(verbosity: u8, log_file: Option<&str>) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    let mut base_config = fern::Dispatch::new();

    base_config = match verbosity {
        0 => base_config.level(LevelFilter::Info),
        1 => base_config.level(LevelFilter::Debug),
        _ => base_config.level(LevelFilter::Trace),
    };

    // reqwest and hyper are chatty at debug level
    base_config = base_config
        .level_for("hyper", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Info);

    // Separate file config so we can include year, month and day in file logs
    let file_config = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}[{}][{}] {}",
            Local::now().format("[%Y-%m-%d][%H:%M:%S%.3f]"),
            record.target(),
            record.level(),
            message
        ))
    });

    let stdout_config = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                Local::now().format("[%H:%M:%S%.3f]"),
                record.target(),
                colors.color(record.level()),
                message
            ))
        })
        .chain(io::stdout());

    base_config = base_config.chain(stdout_config);

    if let Some(log_file) = log_file {
        base_config = base_config.chain(file_config.chain(fern::log_file(log_file)?));
    }

    base_config.apply()?;

    info!("Logging system initialized");
    debug!("Debug logging enabled");

    Ok(())
}

pub fn log_app_start(version: &str) {
    info!("Starting sensor pipeline simulation v{}", version);
}

pub fn log_app_config(config: &crate::config::Config) {
    info!("Application configured with:");
    info!("  Server:");
    info!("    Base URL: {}", config.server.base_url);
    info!("  Sensors:");
    for (kind, sensor) in config.sensors.iter() {
        info!(
            "    {}: endpoint={} start_x={} color={:?}",
            kind, sensor.endpoint, sensor.start_x, sensor.color
        );
    }
    info!("  Frame:");
    info!("    FPS: {}", config.frame.fps);
    info!("    Packet speed: {} px/frame", config.frame.packet_speed);
    info!("    Icon timer: {} frames", config.frame.icon_timer_frames);
    info!("  Tilt:");
    info!("    Step: {}°, limit: ±{}°", config.tilt.step, config.tilt.limit);
    info!("  Layout:");
    info!("    Origin row: y={}", config.layout.origin_y);
    info!(
        "    API {:?}, queue {:?}, websocket {:?}, monitor {:?}",
        config.layout.api, config.layout.queue, config.layout.websocket, config.layout.monitor
    );
}
