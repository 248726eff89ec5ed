// Run/stop state machine and the shared motor command
//
// A single mutex covers the command, the run flag and the UDP link: the
// periodic sender can never read a half-updated command pair, and the
// one-shot stop send can never interleave with a tick on the socket.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::drive::{frame, mixer};
use crate::messages::{DriveState, MotorCommand, TiltSample};
use crate::status::StatusSink;
use crate::transport::UdpLink;

pub struct DriveController {
    inner: Mutex<Inner>,
    status: Box<dyn StatusSink>,
}

struct Inner {
    command: MotorCommand,
    state: DriveState,
    link: UdpLink,
}

impl DriveController {
    /// New controller, initially stopped with a zero command
    pub fn new(link: UdpLink, status: Box<dyn StatusSink>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                command: MotorCommand::zero(),
                state: DriveState::Stopped,
                link,
            }),
            status,
        }
    }

    /// Feed one tilt sample through the control law, replacing the
    /// current command. Called at whatever rate the sensor delivers.
    pub fn on_sample(&self, sample: TiltSample) {
        let command = mixer::mix(sample.x, sample.y);
        let mut inner = self.lock();
        inner.command = command;
        debug!(
            "command updated: left={}, right={}",
            command.left, command.right
        );
    }

    /// Allow the emission loop to transmit
    pub fn start(&self) {
        let mut inner = self.lock();
        if inner.state != DriveState::Running {
            info!("drive running");
        }
        inner.state = DriveState::Running;
    }

    /// Halt: zero the command and push one explicit stop frame out
    /// immediately rather than waiting for the next tick. The loop goes
    /// quiet afterwards, so this frame is the unit's only stop signal.
    pub fn stop(&self) {
        let mut inner = self.lock();
        if inner.state != DriveState::Stopped {
            info!("drive stopped");
        }
        inner.state = DriveState::Stopped;
        inner.command = MotorCommand::zero();
        self.send_current(&mut inner);
    }

    /// One emission tick: while running, re-send the current command so
    /// the unit keeps hearing from us at the full tick rate. While
    /// stopped, stay silent.
    pub fn tick(&self) {
        let mut inner = self.lock();
        if inner.state != DriveState::Running {
            return;
        }
        self.send_current(&mut inner);
    }

    pub fn state(&self) -> DriveState {
        self.lock().state
    }

    pub fn command(&self) -> MotorCommand {
        self.lock().command
    }

    fn send_current(&self, inner: &mut Inner) {
        let buf = frame::encode(inner.command);
        if let Err(e) = inner.link.send(&buf) {
            self.status.report(&format!("send failed: {e}"));
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means another thread panicked mid-update;
        // the data is a plain command pair, still safe to use.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for DriveController {
    fn drop(&mut self) {
        // Last-ditch stop frame on teardown
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::UdpSocket;
    use std::sync::Arc;
    use std::time::Duration;

    struct CaptureStatus {
        reports: Arc<Mutex<Vec<String>>>,
    }

    impl StatusSink for CaptureStatus {
        fn report(&self, message: &str) {
            self.reports.lock().unwrap().push(message.to_string());
        }
    }

    fn capture() -> (Box<dyn StatusSink>, Arc<Mutex<Vec<String>>>) {
        let reports = Arc::new(Mutex::new(Vec::new()));
        (
            Box::new(CaptureStatus {
                reports: reports.clone(),
            }),
            reports,
        )
    }

    fn rig() -> (DriveController, UdpSocket) {
        let rx = UdpSocket::bind("127.0.0.1:0").unwrap();
        rx.set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();
        let port = rx.local_addr().unwrap().port();
        let link = UdpLink::open(0, "127.0.0.1", port).unwrap();
        let (status, _) = capture();
        (DriveController::new(link, status), rx)
    }

    fn recv_frame(rx: &UdpSocket) -> [u8; 5] {
        let mut buf = [0u8; 16];
        let (n, _) = rx.recv_from(&mut buf).unwrap();
        assert_eq!(n, 5, "frame must be exactly 5 bytes");
        [buf[0], buf[1], buf[2], buf[3], buf[4]]
    }

    fn assert_silent(rx: &UdpSocket) {
        rx.set_read_timeout(Some(Duration::from_millis(50)))
            .unwrap();
        let mut buf = [0u8; 16];
        assert!(
            rx.recv_from(&mut buf).is_err(),
            "unexpected datagram received"
        );
        rx.set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();
    }

    #[test]
    fn test_initial_state_is_stopped() {
        let (controller, _rx) = rig();
        assert_eq!(controller.state(), DriveState::Stopped);
        assert_eq!(controller.command(), MotorCommand::zero());
    }

    #[test]
    fn test_stop_sends_exactly_one_zero_frame() {
        let (controller, rx) = rig();
        controller.start();
        controller.on_sample(TiltSample { x: 0.5, y: 0.0 });

        controller.stop();
        assert_eq!(recv_frame(&rx), [1, 0, 0, 5, 0]);
        assert_silent(&rx);
        assert_eq!(controller.command(), MotorCommand::zero());
    }

    #[test]
    fn test_stop_from_stopped_still_sends_stop_frame() {
        let (controller, rx) = rig();
        controller.stop();
        assert_eq!(recv_frame(&rx), [1, 0, 0, 5, 0]);
    }

    #[test]
    fn test_stopped_ticks_send_nothing() {
        let (controller, rx) = rig();
        for _ in 0..5 {
            controller.tick();
        }
        assert_silent(&rx);
    }

    #[test]
    fn test_running_sends_current_command_each_tick() {
        let (controller, rx) = rig();
        controller.start();
        controller.on_sample(TiltSample { x: 0.5, y: 0.0 });

        controller.tick();
        assert_eq!(recv_frame(&rx), [1, 1, 127, 4, 127]);

        // Command changes between ticks are picked up
        controller.on_sample(TiltSample { x: -0.5, y: 0.0 });
        controller.tick();
        assert_eq!(recv_frame(&rx), [1, 0, 127, 5, 127]);

        assert_silent(&rx);
    }

    #[test]
    fn test_sample_while_stopped_does_not_transmit() {
        let (controller, rx) = rig();
        controller.on_sample(TiltSample { x: 0.5, y: 0.0 });
        controller.tick();
        assert_silent(&rx);
        // The command still updates, ready for the next start
        assert_eq!(controller.command(), MotorCommand::new(127, 127));
    }

    #[test]
    fn test_start_is_idempotent() {
        let (controller, rx) = rig();
        controller.start();
        controller.start();
        assert_eq!(controller.state(), DriveState::Running);
        controller.tick();
        assert_eq!(recv_frame(&rx), [1, 0, 0, 5, 0]);
    }

    #[test]
    fn test_disabled_link_reports_nothing_and_never_panics() {
        let (status, reports) = capture();
        let controller = DriveController::new(UdpLink::disabled(), status);
        controller.start();
        controller.on_sample(TiltSample { x: 1.0, y: 1.0 });
        controller.tick();
        controller.stop();
        assert!(reports.lock().unwrap().is_empty());
    }

    #[test]
    fn test_send_failure_surfaces_one_report() {
        // Destination port 0 makes sendto fail with EINVAL on Linux
        let link = UdpLink::open(0, "127.0.0.1", 0).unwrap();
        let (status, reports) = capture();
        let controller = DriveController::new(link, status);

        controller.start();
        controller.tick();

        assert_eq!(reports.lock().unwrap().len(), 1);
        assert!(reports.lock().unwrap()[0].starts_with("send failed"));
    }
}
