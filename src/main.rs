use clap::Parser;
use tracing_subscriber::EnvFilter;

use tiltdrive_udp_teleop::config::Opts;

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let opts = Opts::parse();

    if let Err(e) = tiltdrive_udp_teleop::runtime::run(opts).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
