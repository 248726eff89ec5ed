// 100ms emission loop
//
// The loop's only job is a steady minimum transmission rate of the current
// command: the drive unit treats silence beyond ~100ms as link loss. It
// never recomputes the command itself; samples arrive asynchronously from
// the input source task.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{info, warn};

// local imports
use crate::config::{EMIT_PERIOD, InputMode, Opts};
use crate::drive::DriveController;
use crate::input;
use crate::status::{LogStatus, StatusSink};
use crate::transport::UdpLink;

pub async fn run(opts: Opts) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let status: Box<dyn StatusSink> = Box::new(LogStatus);

    info!(
        "Opening UDP link to {}:{} (local port {})...",
        opts.host,
        opts.port,
        opts.local_port()
    );
    let link = match UdpLink::open(opts.local_port(), &opts.host, opts.port) {
        Ok(link) => link,
        Err(e) => {
            // Session is dead but the process is not: report once and
            // carry on with a link that drops every frame.
            status.report(&format!("transport setup failed: {e}"));
            UdpLink::disabled()
        }
    };

    let controller = Arc::new(DriveController::new(link, status));

    // Make sure the drive unit starts from an explicit stop
    controller.stop();

    let mut input_task = spawn_input(opts.input, controller.clone());

    let mut tick = interval(EMIT_PERIOD);
    info!(
        "Runtime started: one frame per {}ms while running",
        EMIT_PERIOD.as_millis()
    );

    loop {
        tokio::select! {
            _ = tick.tick() => controller.tick(),
            joined = &mut input_task => {
                match joined {
                    Ok(Ok(())) => info!("Input source closed, shutting down"),
                    Ok(Err(e)) => warn!("Input source failed: {}", e),
                    Err(e) => warn!("Input task aborted: {}", e),
                }
                break;
            }
        }
    }

    // Final stop frame; the socket is released when the controller drops
    controller.stop();
    Ok(())
}

fn spawn_input(mode: InputMode, controller: Arc<DriveController>) -> JoinHandle<std::io::Result<()>> {
    match mode {
        InputMode::Keyboard => {
            tokio::task::spawn_blocking(move || input::run_keyboard(&controller))
        }
        InputMode::Stdin => tokio::spawn(async move { input::run_stdin(&controller).await }),
    }
}
