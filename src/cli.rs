use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated sensor pipeline simulation", long_about = None)]
pub struct CliArgs {
    /// Path to a TOML config file (defaults to config/default.toml when present)
    #[arg(long)]
    pub config: Option<String>,

    /// Increase log verbosity (-d debug, -dd trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<String>,

    /// Base URL of the mock sensor server
    #[arg(long)]
    pub server_url: Option<String>,

    #[arg(long)]
    pub fps: Option<u32>,

    /// Pixels a packet moves per frame
    #[arg(long)]
    pub packet_speed: Option<f64>,

    /// Start a run on the first frame without waiting for input
    #[arg(long)]
    pub auto_start: bool,

    /// Exit once a run has finished and no new run is pending
    #[arg(long)]
    pub exit_when_idle: bool,

    /// Stop after this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,
}
