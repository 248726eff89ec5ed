// Emission cadence, endpoint defaults, CLI options
use std::time::Duration;

use clap::{Parser, ValueEnum};

// The drive unit treats silence longer than ~100ms as link loss,
// so one frame per period is the minimum transmission rate.
pub const EMIT_PERIOD: Duration = Duration::from_millis(100);

// Drive unit endpoint (the robot's access point address)
pub const DEFAULT_HOST: &str = "192.168.4.1";
pub const DEFAULT_PORT: u16 = 9003;

/// Where tilt samples and start/stop signals come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputMode {
    /// Interactive keyboard teleop (simulated tilt)
    Keyboard,
    /// JSON samples and start/stop words, one per line on stdin
    Stdin,
}

/// Command-line options for the teleop runtime
#[derive(Debug, Parser)]
#[command(about = "Tilt-driven differential-drive teleop over UDP")]
pub struct Opts {
    /// Drive unit address (numeric IPv4, no DNS lookup)
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Drive unit UDP port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Local bind port (defaults to the same number as --port)
    #[arg(long)]
    pub local_port: Option<u16>,

    /// Input source
    #[arg(long, value_enum, default_value_t = InputMode::Keyboard)]
    pub input: InputMode,
}

impl Opts {
    pub fn local_port(&self) -> u16 {
        self.local_port.unwrap_or(self.port)
    }
}
