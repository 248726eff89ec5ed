// UDP session to the drive unit
//
// One connectionless socket, bound to the wildcard address and aimed at a
// fixed destination resolved once at setup. Sends are fire-and-forget; the
// 100ms resend cadence is the only retry mechanism anywhere.

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use tracing::{debug, info};

/// Errors while setting up the session. Fatal to the session, never to
/// the process: callers fall back to a disabled link.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("cannot parse drive unit address {host:?} as numeric IPv4")]
    AddressResolution { host: String },

    #[error("socket setup failed: {0}")]
    Socket(#[from] io::Error),
}

/// Per-send errors. Reported and dropped; the next tick sends again.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("short write: sent {sent} of {expected} bytes")]
    ShortWrite { sent: usize, expected: usize },

    #[error("send failed: {0}")]
    Io(#[from] io::Error),
}

/// Datagram link to the drive unit
pub struct UdpLink {
    socket: Option<UdpSocket>,
    dest: SocketAddrV4,
}

impl UdpLink {
    /// Open a session: bind the wildcard address on `local_port` and fix
    /// the destination to `remote_host:remote_port`.
    ///
    /// `remote_host` must be a numeric IPv4 address; no DNS lookup is
    /// performed.
    pub fn open(local_port: u16, remote_host: &str, remote_port: u16) -> Result<Self, SetupError> {
        let addr: Ipv4Addr = remote_host
            .parse()
            .map_err(|_| SetupError::AddressResolution {
                host: remote_host.to_string(),
            })?;
        let dest = SocketAddrV4::new(addr, remote_port);

        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, local_port))?;
        // The sender must never stall the emission timer on a full
        // OS buffer; a dropped frame is re-sent next tick anyway.
        socket.set_nonblocking(true)?;

        info!("UDP link ready: {} -> {}", socket.local_addr()?, dest);
        Ok(Self {
            socket: Some(socket),
            dest,
        })
    }

    /// Link with no socket. Every `send` is a safe no-op. Used after a
    /// reported setup failure so the rest of the runtime keeps going.
    pub fn disabled() -> Self {
        Self {
            socket: None,
            dest: SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0),
        }
    }

    /// Re-point the session at a new endpoint. The previous socket is
    /// released first so descriptors never leak; on failure the link is
    /// left disabled.
    pub fn reopen(
        &mut self,
        local_port: u16,
        remote_host: &str,
        remote_port: u16,
    ) -> Result<(), SetupError> {
        self.close();
        *self = Self::open(local_port, remote_host, remote_port)?;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    /// Send one frame to the fixed destination. No retries.
    pub fn send(&self, frame: &[u8]) -> Result<(), SendError> {
        let Some(socket) = &self.socket else {
            return Ok(());
        };

        let sent = socket.send_to(frame, self.dest)?;
        if sent != frame.len() {
            return Err(SendError::ShortWrite {
                sent,
                expected: frame.len(),
            });
        }
        Ok(())
    }

    /// Release the socket. Idempotent, safe on never-opened links.
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            debug!("UDP link closed");
        }
    }
}
