//! Nmap process wrapper.
//!
//! Executes nmap as a child process via `tokio::process::Command` and
//! parses the XML output into typed Rust structs. Version detection and
//! port probing are entirely nmap's job; this wrapper only shuttles
//! arguments in and XML out.

use std::time::Instant;

use tokio::process::Command;
use tokio::time::{timeout, Duration};
use uuid::Uuid;

use crate::error::{MonitorError, Result};
use crate::nmap_xml::{self, NmapRun};

/// Result of a single nmap scan execution.
pub struct ScanResult {
    /// Unique ID for this scan run, used for log correlation.
    pub scan_id: Uuid,
    /// The target network expression.
    pub network: String,
    /// The port list scanned.
    pub ports: String,
    /// Parsed nmap XML output.
    pub nmap_run: NmapRun,
    /// Wall-clock duration of the scan.
    pub duration: std::time::Duration,
}

/// Wrapper around the nmap binary.
pub struct NmapScanner {
    nmap_path: String,
}

impl NmapScanner {
    pub fn new(nmap_path: &str) -> Self {
        Self {
            nmap_path: nmap_path.to_string(),
        }
    }

    /// Verify nmap is installed and accessible.
    ///
    /// The version banner is informational only, so undecodable bytes in
    /// it are replaced rather than treated as a failure.
    pub async fn verify_installation(&self) -> Result<String> {
        let output = Command::new(&self.nmap_path)
            .arg("--version")
            .output()
            .await
            .map_err(|_| MonitorError::NmapNotFound {
                path: self.nmap_path.clone(),
            })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Execute a service-detection scan of the given network and port list.
    ///
    /// Nmap runs with `-sV -T5 --unprivileged` and writes XML to stdout via
    /// `-oX -`. The whole run is bounded by `timeout_secs` of wall-clock
    /// time; a scan that exceeds it is killed and reported as a timeout.
    pub async fn scan(&self, network: &str, ports: &str, timeout_secs: u64) -> Result<ScanResult> {
        let scan_id = Uuid::new_v4();
        let start = Instant::now();

        tracing::info!(
            scan_id = %scan_id,
            network = %network,
            ports = %ports,
            "Starting nmap scan"
        );

        let mut command = Command::new(&self.nmap_path);
        command
            .args(["-sV", "-p", ports, "-T5", "--unprivileged"])
            .arg("-oX")
            .arg("-")
            .arg(network)
            .kill_on_drop(true);

        let output = match timeout(Duration::from_secs(timeout_secs), command.output()).await {
            Ok(result) => result.map_err(|e| MonitorError::NmapNotFound {
                path: format!("{}: {e}", self.nmap_path),
            })?,
            Err(_) => {
                return Err(MonitorError::ScanTimeout { secs: timeout_secs });
            }
        };

        let duration = start.elapsed();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(MonitorError::NmapFailed {
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        let nmap_run = nmap_xml::parse_nmap_xml(&output.stdout)?;
        let hosts_up = nmap_run.hosts.iter().filter(|h| h.is_up()).count();

        tracing::info!(
            scan_id = %scan_id,
            network = %network,
            hosts_up,
            duration_ms = duration.as_millis(),
            "Nmap scan complete"
        );

        Ok(ScanResult {
            scan_id,
            network: network.to_string(),
            ports: ports.to_string(),
            nmap_run,
            duration,
        })
    }
}
