//! Reverse-DNS resolution for scanned hosts.
//!
//! Resolution failure is strictly per-host and non-fatal: any parse
//! error, lookup failure, or timeout yields `None` and the cycle
//! carries on.

use std::net::IpAddr;

use dns_lookup::lookup_addr;
use tokio::time::{timeout, Duration};

/// Upper bound for one blocking lookup.
const LOOKUP_TIMEOUT_MS: u64 = 2000;

/// Resolve the reverse-DNS name for a textual IP address.
///
/// The system resolver call is synchronous, so it runs on the blocking
/// pool with a timeout around it. A result that merely echoes the IP
/// back is treated as no name.
///
/// A timed-out lookup is abandoned, not cancelled: the blocking task
/// keeps its thread until the OS resolver gives up. Lookups are issued
/// one at a time per cycle, so at most a handful of abandoned tasks
/// overlap before the resolver's own timeout reaps them.
pub async fn reverse_lookup(ip: &str) -> Option<String> {
    let addr: IpAddr = ip.parse().ok()?;

    let lookup = tokio::task::spawn_blocking(move || lookup_addr(&addr));
    let name = match timeout(Duration::from_millis(LOOKUP_TIMEOUT_MS), lookup).await {
        Ok(Ok(Ok(name))) => name,
        Ok(Ok(Err(e))) => {
            tracing::debug!(ip = %ip, error = %e, "No domain name found");
            return None;
        }
        Ok(Err(e)) => {
            tracing::warn!(ip = %ip, error = %e, "Reverse lookup task failed");
            return None;
        }
        Err(_) => {
            tracing::debug!(ip = %ip, "Reverse lookup timed out");
            return None;
        }
    };

    if name == ip {
        return None;
    }

    tracing::debug!(ip = %ip, domain = %name, "Resolved domain name");
    Some(name)
}
