// Input sources: where tilt samples and start/stop signals come from
//
// The controller has no opinion about the signal source; these two are
// the ones the binary ships with. Keyboard is a raw-mode stand-in for a
// real tilt sensor, stdin lets scripts drive the controller.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::drive::DriveController;
use crate::messages::{DriveState, TiltSample};

// Simulated tilt moves in steps of a tenth of a g per keypress
const TILT_STEP: f64 = 0.1;
const TILT_RANGE: f64 = 1.0;

const KEY_POLL_PERIOD: Duration = Duration::from_millis(20);

/// Keyboard teleop: W/S pitch, A/D roll, C recenter, Space start/stop, Q quit
///
/// Blocking; run it on a dedicated thread. Raw mode is restored before
/// returning, even when the loop errors out.
pub fn run_keyboard(controller: &DriveController) -> io::Result<()> {
    enable_raw_mode()?;
    let result = keyboard_loop(controller);
    disable_raw_mode()?;
    result
}

fn keyboard_loop(controller: &DriveController) -> io::Result<()> {
    let mut x = 0.0f64;
    let mut y = 0.0f64;

    info!("Controls: W/S=pitch, A/D=roll, C=center, Space=start/stop, Q=quit");

    loop {
        if !event::poll(KEY_POLL_PERIOD)? {
            continue;
        }
        let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
            continue;
        };
        if kind != KeyEventKind::Press && kind != KeyEventKind::Repeat {
            continue;
        }

        match code {
            // Simulated tilt
            KeyCode::Char('w') => x = (x + TILT_STEP).min(TILT_RANGE),
            KeyCode::Char('s') => x = (x - TILT_STEP).max(-TILT_RANGE),
            KeyCode::Char('a') => y = (y + TILT_STEP).min(TILT_RANGE),
            KeyCode::Char('d') => y = (y - TILT_STEP).max(-TILT_RANGE),
            KeyCode::Char('c') => {
                x = 0.0;
                y = 0.0;
            }

            KeyCode::Char(' ') => {
                if controller.state() == DriveState::Running {
                    controller.stop();
                } else {
                    controller.start();
                }
                continue;
            }

            KeyCode::Char('q') | KeyCode::Esc => break,

            _ => continue,
        }

        controller.on_sample(TiltSample { x, y });
    }

    Ok(())
}

/// Line-oriented feed on stdin: one JSON sample per line, plus bare
/// "start" / "stop" words. Ends at EOF.
pub async fn run_stdin(controller: &DriveController) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!("Reading samples from stdin (JSON {{\"x\":..,\"y\":..}}, or start/stop)");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {}
            "start" => controller.start(),
            "stop" => controller.stop(),
            _ => match serde_json::from_str::<TiltSample>(line) {
                Ok(sample) => controller.on_sample(sample),
                Err(e) => warn!("Failed to parse sample line: {}", e),
            },
        }
    }

    Ok(())
}
