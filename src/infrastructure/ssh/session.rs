//! SSH session backed by libssh2
//!
//! Implements the RemoteConnector/RemoteSession ports: password, key file
//! or agent authentication, SFTP for file transfer, exec channels for
//! commands. Command output is drained with periodic keepalives.

use std::io::{self, Read};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use ssh2::{Channel, Session, Sftp};

use crate::config::{Auth, DeployConfig};
use crate::domain::ports::{RawOutput, RemoteConnector, RemoteSession};
use crate::error::{DeployError, DeployResult};

use super::channel::{drain, CommandStreams};
use super::keepalive::KeepalivePolicy;

/// Default bound on TCP connect, handshake and authentication
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

const IDLE_POLL: Duration = Duration::from_millis(20);

/// Opens SSH sessions with a bounded connect timeout and keepalive policy
#[derive(Debug, Clone, Copy)]
pub struct Ssh2Connector {
    connect_timeout: Duration,
    keepalive: KeepalivePolicy,
}

impl Default for Ssh2Connector {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            keepalive: KeepalivePolicy::default(),
        }
    }
}

impl Ssh2Connector {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(config: &DeployConfig) -> DeployResult<Vec<SocketAddr>> {
        if config.remote_host.trim().is_empty() {
            return Err(DeployError::ConnectFailed {
                reason: "no remote host configured (REMOTE_HOST)".to_string(),
            });
        }
        let addrs: Vec<SocketAddr> = (config.remote_host.as_str(), config.remote_port)
            .to_socket_addrs()
            .map_err(|e| DeployError::ConnectFailed {
                reason: format!("cannot resolve {}: {}", config.socket_addr(), e),
            })?
            .collect();
        if addrs.is_empty() {
            return Err(DeployError::ConnectFailed {
                reason: format!("no address found for {}", config.socket_addr()),
            });
        }
        Ok(addrs)
    }

    fn open_tcp(&self, config: &DeployConfig) -> DeployResult<TcpStream> {
        let mut last_error = None;
        for addr in Self::resolve(config)? {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }
        Err(DeployError::ConnectFailed {
            reason: format!(
                "{}: {}",
                config.socket_addr(),
                last_error.map(|e| e.to_string()).unwrap_or_default()
            ),
        })
    }

    fn authenticate(session: &Session, config: &DeployConfig) -> DeployResult<()> {
        let user = config.remote_user.as_str();
        let mut failures = Vec::new();

        for method in config.auth_methods() {
            let (name, result) = match &method {
                Auth::KeyFile { path, passphrase } => (
                    "private key",
                    session.userauth_pubkey_file(user, None, path, passphrase.as_deref()),
                ),
                Auth::Password(password) => ("password", session.userauth_password(user, password)),
                Auth::Agent => ("ssh-agent", session.userauth_agent(user)),
            };
            match result {
                Ok(()) if session.authenticated() => return Ok(()),
                Ok(()) => failures.push(format!("{name}: rejected")),
                Err(e) => failures.push(format!("{name}: {e}")),
            }
        }

        Err(DeployError::ConnectFailed {
            reason: format!(
                "authentication failed for user '{}' ({})",
                user,
                failures.join("; ")
            ),
        })
    }
}

impl RemoteConnector for Ssh2Connector {
    type Session = Ssh2Session;

    fn connect(&self, config: &DeployConfig) -> DeployResult<Ssh2Session> {
        let connect_failed = |stage: &str, e: ssh2::Error| DeployError::ConnectFailed {
            reason: format!("{stage}: {e}"),
        };

        let tcp = self.open_tcp(config)?;
        let socket = tcp
            .try_clone()
            .map_err(|e| DeployError::ConnectFailed {
                reason: format!("socket setup: {e}"),
            })?;
        let mut session = Session::new().map_err(|e| connect_failed("session setup", e))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(duration_ms(self.connect_timeout));
        session
            .handshake()
            .map_err(|e| connect_failed("handshake", e))?;
        Self::authenticate(&session, config)?;

        // Only connection setup is bounded; remote commands may run as long as they need.
        session.set_timeout(0);
        // Cadence is driven by the drain loop; libssh2 must not skip a send.
        session.set_keepalive(true, 1);
        socket
            .set_nonblocking(true)
            .map_err(|e| DeployError::ConnectFailed {
                reason: format!("socket setup: {e}"),
            })?;

        Ok(Ssh2Session {
            session: Some(session),
            sftp: None,
            socket,
            keepalive: self.keepalive,
        })
    }
}

/// One authenticated SSH connection
pub struct Ssh2Session {
    session: Option<Session>,
    sftp: Option<Sftp>,
    /// Second handle on the session's socket, used only to peek
    socket: TcpStream,
    keepalive: KeepalivePolicy,
}

impl Ssh2Session {
    fn session(&self) -> DeployResult<&Session> {
        self.session.as_ref().ok_or_else(|| DeployError::ConnectionLost {
            reason: "session already released".to_string(),
        })
    }

    /// Fail fast when the transport is already closed or broken
    fn ensure_open(&self) -> DeployResult<()> {
        let lost = |reason: String| DeployError::ConnectionLost { reason };
        self.session()?
            .keepalive_send()
            .map_err(|e| lost(e.to_string()))?;
        peer_traffic(&self.socket).map_err(|e| lost(e.to_string()))?;
        Ok(())
    }

    fn sftp(&mut self) -> Result<&Sftp, String> {
        let session = self.session.as_ref().ok_or("session already released")?;
        match &mut self.sftp {
            Some(sftp) => Ok(sftp),
            slot => {
                let sftp = session.sftp().map_err(|e| e.to_string())?;
                Ok(slot.insert(sftp))
            }
        }
    }
}

impl RemoteSession for Ssh2Session {
    fn execute(&mut self, command_line: &str) -> DeployResult<RawOutput> {
        self.ensure_open()?;
        let lost = |e: &dyn std::fmt::Display| DeployError::ConnectionLost {
            reason: e.to_string(),
        };

        let session = self.session()?;
        let mut channel = session.channel_session().map_err(|e| lost(&e))?;
        channel.exec(command_line).map_err(|e| lost(&e))?;

        session.set_blocking(false);
        let drained = drain(
            &mut ExecStreams {
                session,
                channel: &mut channel,
                socket: &self.socket,
            },
            self.keepalive,
            IDLE_POLL,
        );
        session.set_blocking(true);
        let (stdout, stderr) = drained?;

        channel.wait_close().map_err(|e| lost(&e))?;
        let exit_status = channel.exit_status().ok();

        Ok(RawOutput {
            stdout,
            stderr,
            exit_status,
        })
    }

    fn upload(&mut self, local: &Path, remote: &str) -> DeployResult<()> {
        self.ensure_open()?;
        let failed = |reason: String| DeployError::TransferFailed {
            path: remote.to_string(),
            reason,
        };

        let mut source = std::fs::File::open(local)
            .map_err(|e| failed(format!("{}: {}", local.display(), e)))?;
        let sftp = self.sftp().map_err(failed)?;
        let mut target = sftp
            .create(Path::new(&sftp_path(remote)))
            .map_err(|e| failed(e.to_string()))?;
        io::copy(&mut source, &mut target).map_err(|e| failed(e.to_string()))?;
        Ok(())
    }

    fn fetch(&mut self, remote: &str) -> Option<Vec<u8>> {
        self.ensure_open().ok()?;
        let sftp = self.sftp().ok()?;
        let mut file = sftp.open(Path::new(&sftp_path(remote))).ok()?;
        let mut content = Vec::new();
        file.read_to_end(&mut content).ok()?;
        Some(content)
    }

    fn release(&mut self) {
        self.sftp = None;
        if let Some(session) = self.session.take() {
            let _ = session.disconnect(None, "deploy finished", None);
        }
    }
}

impl Drop for Ssh2Session {
    fn drop(&mut self) {
        self.release();
    }
}

/// A running exec channel plus the transport it rides on
struct ExecStreams<'a> {
    session: &'a Session,
    channel: &'a mut Channel,
    socket: &'a TcpStream,
}

impl CommandStreams for ExecStreams<'_> {
    fn read_stdout(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.channel.read(buf)
    }

    fn read_stderr(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.channel.stderr().read(buf)
    }

    fn eof(&self) -> bool {
        self.channel.eof()
    }

    fn send_keepalive(&mut self) -> io::Result<()> {
        self.session
            .keepalive_send()
            .map(|_| ())
            .map_err(io::Error::from)
    }

    fn peer_traffic(&mut self) -> io::Result<bool> {
        peer_traffic(self.socket)
    }
}

/// Peek the raw socket: bytes waiting means the peer is talking to us.
///
/// libssh2 only reads the socket inside our calls, so a keepalive reply
/// is visible here before the next channel read consumes it.
fn peer_traffic(socket: &TcpStream) -> io::Result<bool> {
    let mut byte = [0u8; 1];
    match socket.peek(&mut byte) {
        Ok(0) => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed by remote host",
        )),
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
        Err(e) => Err(e),
    }
}

/// SFTP servers on Windows expect forward slashes in drive paths
fn sftp_path(remote: &str) -> String {
    let bytes = remote.as_bytes();
    let is_drive_path = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    if is_drive_path {
        remote.replace('\\', "/")
    } else {
        remote.to_string()
    }
}

fn duration_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}
