//! Deploy timestamp passed to the remote script for backup naming

use std::fmt;

use chrono::{DateTime, Local, TimeZone};

/// Run-scoped timestamp, `YYYY-MM-DD_HH-MM-SS` in local time.
///
/// Advisory only: it is handed to the remote script and never parsed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTimestamp(String);

impl DeployTimestamp {
    pub const FORMAT: &'static str = "%Y-%m-%d_%H-%M-%S";

    /// Timestamp for the current wall-clock time
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz>(at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self(at.format(Self::FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeployTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
