use clap::{AppSettings, Clap};
use std::path::PathBuf;

#[derive(Debug, Clap, Clone)]
#[clap(
    version = "0.1.0",
    name = "DS-PF",
    about = "A path-following drive simulator and scorer written in Rust"
)]
#[clap(setting = AppSettings::ColoredHelp)]
pub struct RunOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug printing (not usable in case real-time simulation is activated)
    #[clap(short, long, conflicts_with = "realtime")]
    pub debug: bool,

    /// Activate real-time simulation (run states are then streamed with the inserted real-time
    /// factor)
    #[clap(short, long, conflicts_with = "debug")]
    pub realtime: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to the run parameter file
    #[clap(parse(from_os_str), short, long)]
    pub parfile_path: PathBuf,

    /// Set real-time factor (only relevant in case real-time simulation is activated)
    #[clap(short = 'f', long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Override the smoothing window from the parameter file (1 disables smoothing)
    #[clap(short, long)]
    pub smoothing_window: Option<usize>,
}
