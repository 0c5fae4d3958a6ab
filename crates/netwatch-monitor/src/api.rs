//! Helper API process management.
//!
//! The inventory is served over HTTP by a separate, opaque helper
//! process. The monitor launches it once at startup and terminates it on
//! shutdown; there is no other coordination between the two. The handle
//! is owned by the main control loop and passed by reference, so there
//! is no global process state.

use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::config::ApiConfig;
use crate::error::Result;

/// Handle on the detached helper process.
pub struct ApiProcess {
    config: ApiConfig,
    database_url: String,
    child: Option<Child>,
}

impl ApiProcess {
    pub fn new(config: ApiConfig, database_url: &str) -> Self {
        Self {
            config,
            database_url: database_url.to_string(),
            child: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    /// Spawn the helper process with its bind parameters on the command
    /// line, output discarded. Starting an already-running helper is a
    /// no-op.
    pub fn start(&mut self) -> Result<()> {
        if self.child.is_some() {
            tracing::debug!("API process already running");
            return Ok(());
        }

        let mut command = Command::new(&self.config.command);
        command
            .arg("--host")
            .arg(&self.config.host)
            .arg("--port")
            .arg(self.config.port.to_string())
            .arg("--database")
            .arg(&self.database_url)
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if self.config.debug {
            command.arg("--debug");
        }

        let child = command.spawn()?;

        tracing::info!(
            command = %self.config.command,
            url = %format!("http://{}:{}/api/scans", self.config.host, self.config.port),
            "API process started"
        );
        self.child = Some(child);
        Ok(())
    }

    /// Terminate the helper process and reap it. Stopping a helper that
    /// is not running is a no-op.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        // The child may already have exited on its own; kill errors are
        // irrelevant as long as the wait reaps it.
        let _ = child.start_kill();
        let status = child.wait().await?;

        tracing::info!(status = %status, "API process terminated");
        Ok(())
    }
}
