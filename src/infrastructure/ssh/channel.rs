//! Output draining for a running remote command
//!
//! Both streams are read in one non-blocking loop. While the command is
//! silent the loop sends a keepalive every `KeepalivePolicy::interval` and
//! counts an interval without any bytes from the peer as a missed reply.

use std::io;
use std::time::{Duration, Instant};

use crate::error::{DeployError, DeployResult};

use super::keepalive::{KeepalivePolicy, Liveness};

const READ_CHUNK: usize = 16 * 1024;

/// I/O of one running remote command as the drain loop sees it
pub trait CommandStreams {
    fn read_stdout(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn read_stderr(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// True once the remote side closed its output
    fn eof(&self) -> bool;

    /// Ask the peer for a reply (`keepalive@openssh.com`)
    fn send_keepalive(&mut self) -> io::Result<()>;

    /// Whether bytes from the peer are waiting on the transport.
    ///
    /// Fails when the transport is closed or broken.
    fn peer_traffic(&mut self) -> io::Result<bool>;
}

/// Read stdout and stderr until EOF, pinging a silent peer.
///
/// Fails with [`DeployError::ConnectionLost`] after `policy.max_missed`
/// consecutive keepalives went without any inbound traffic.
pub fn drain<S: CommandStreams>(
    streams: &mut S,
    policy: KeepalivePolicy,
    poll: Duration,
) -> DeployResult<(Vec<u8>, Vec<u8>)> {
    let mut liveness = Liveness::new(policy);
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut buf = vec![0u8; READ_CHUNK];

    let mut heard = false;
    let mut awaiting_reply = false;
    let mut last_keepalive = Instant::now();

    loop {
        heard |= streams.peer_traffic().map_err(lost)?;

        let mut progressed =
            read_available(|b| streams.read_stdout(b), &mut buf, &mut stdout).map_err(lost)?;
        progressed |=
            read_available(|b| streams.read_stderr(b), &mut buf, &mut stderr).map_err(lost)?;
        heard |= progressed;

        if progressed {
            continue;
        }
        if streams.eof() {
            break;
        }

        if last_keepalive.elapsed() >= policy.interval {
            if awaiting_reply && !liveness.record(heard) {
                return Err(DeployError::ConnectionLost {
                    reason: format!(
                        "{} keepalives unanswered during remote command",
                        liveness.missed()
                    ),
                });
            }
            match streams.send_keepalive() {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                Err(e) => return Err(lost(e)),
            }
            awaiting_reply = true;
            heard = false;
            last_keepalive = Instant::now();
        }
        std::thread::sleep(poll);
    }

    Ok((stdout, stderr))
}

/// Append whatever `read` returns; `false` when nothing was available
pub(crate) fn read_available(
    read: impl FnOnce(&mut [u8]) -> io::Result<usize>,
    buf: &mut [u8],
    out: &mut Vec<u8>,
) -> io::Result<bool> {
    match read(buf) {
        Ok(0) => Ok(false),
        Ok(n) => {
            out.extend_from_slice(&buf[..n]);
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
        Err(e) => Err(e),
    }
}

fn lost(e: io::Error) -> DeployError {
    DeployError::ConnectionLost {
        reason: e.to_string(),
    }
}
