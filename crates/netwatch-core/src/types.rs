//! Core domain types for the netwatch inventory.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a device answered the most recent scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Up,
    Down,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown device status: {0}")]
pub struct UnknownStatus(pub String);

/// One row of the persistent inventory table.
///
/// A record is created the first time an IP is observed and is never
/// deleted afterwards; subsequent scan cycles only transition it between
/// up and down and refresh its fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Textual IPv4/IPv6 address. Unique key of the table.
    pub ip: String,
    pub status: DeviceStatus,
    /// Serialized fingerprint document. Opaque to the reconciler: change
    /// detection is a byte-for-byte comparison, never a parse.
    pub fingerprint: String,
    /// Reverse-DNS name, `None` when resolution failed.
    pub domain: Option<String>,
    /// Timestamp of the last fingerprint-bearing write.
    pub last_seen: DateTime<Utc>,
}

/// A single host as observed in one scan cycle, ready for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub ip: String,
    pub status: DeviceStatus,
    /// Serialized fingerprint document for this cycle.
    pub fingerprint: String,
    pub domain: Option<String>,
}
