//! SSH transport
//!
//! - `session`: libssh2-backed connector and session
//! - `channel`: output draining with periodic keepalives
//! - `keepalive`: consecutive-miss tracking for keepalives

mod channel;
mod keepalive;
mod session;

pub use channel::{drain, CommandStreams};
pub use keepalive::{KeepalivePolicy, Liveness};
pub use session::{Ssh2Connector, Ssh2Session, DEFAULT_CONNECT_TIMEOUT};
