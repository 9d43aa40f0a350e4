//! Core of an animated sensor pipeline visualization.
//!
//! This library provides:
//! - A lock-guarded visual state shared by the frame loop and the sensor workers
//! - Sensor workers that POST generated readings to a mock server
//! - The per-frame packet state machine that walks each reading through
//!   API, queue, websocket and frontend, and fills the results dashboard
//! - Configuration, logging, input and presentation plumbing for the binary

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod fsm;
pub mod helpers;
pub mod input;
pub mod layout;
pub mod logging;
pub mod present;
pub mod sensor;
pub mod state;

pub use app::Simulation;
pub use config::Config;
pub use error::{AppError, Result, SensorError};
pub use fsm::{FrameSummary, PacketDriver};
pub use sensor::{SensorKind, SensorReading, SensorWorker};
pub use state::{Packet, PacketStatus, SharedState, Snapshot, VisualState};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
///
/// Sets up logging and announces the application version. Call this once,
/// before creating a [`Simulation`].
///
/// # Arguments
///
/// * `verbosity` - 0 for info, 1 for debug, 2 or more for trace
/// * `log_file` - Optional path to a log file. If None, logs will only be output to stdout.
pub fn initialize(verbosity: u8, log_file: Option<&str>) -> Result<()> {
    logging::setup_logging(verbosity, log_file)?;
    logging::log_app_start(VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty(), "Version should not be empty");
    }
}
