//! Keepalive liveness tracking for the SSH session

use std::time::Duration;

/// Keepalive interval and the number of consecutive misses that mark the
/// connection as dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepalivePolicy {
    pub interval: Duration,
    pub max_missed: u32,
}

impl Default for KeepalivePolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_missed: 3,
        }
    }
}

/// Counts consecutive unanswered keepalives
#[derive(Debug, Clone)]
pub struct Liveness {
    policy: KeepalivePolicy,
    missed: u32,
}

impl Liveness {
    pub fn new(policy: KeepalivePolicy) -> Self {
        Self { policy, missed: 0 }
    }

    /// Record whether the peer answered; returns false once the connection counts as dead
    pub fn record(&mut self, answered: bool) -> bool {
        if answered {
            self.missed = 0;
        } else {
            self.missed = self.missed.saturating_add(1);
        }
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.missed < self.policy.max_missed
    }

    pub fn missed(&self) -> u32 {
        self.missed
    }
}
