//! Docker container management for Db2 testing

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use db2_cdc_harness_capture::{ControlChannel, DockerChannel};
use tracing::{debug, info};

/// Configuration for a test Db2 container with the ASN capture scripts.
pub struct Db2Container {
    /// Container name
    pub container_name: String,
    /// Host port to bind to
    pub host_port: u16,
    /// Image name (needs Db2 plus the asncdc support scripts)
    pub image_name: String,
    /// Database the capture service runs against
    pub database: String,
    /// Instance user
    pub user: String,
    /// Instance password
    pub password: String,
    /// Whether this instance started the container (and may remove it)
    owned: bool,
}

impl Db2Container {
    /// Creates a new Db2 container configuration
    pub fn new(container_name: &str, host_port: u16) -> Self {
        Self {
            container_name: container_name.to_string(),
            host_port,
            image_name: "icr.io/db2_community/db2:11.5.9.0".to_string(),
            database: "testdb".to_string(),
            user: "db2inst1".to_string(),
            password: "admin".to_string(),
            owned: true,
        }
    }

    /// Attach to an already-running container instead of starting one.
    /// Dropping an attached configuration leaves the container alone.
    pub fn attach(container_name: &str) -> Self {
        let mut container = Self::new(container_name, 50000);
        container.owned = false;
        container
    }

    /// Starts the Db2 container
    pub fn start(&self) -> Result<()> {
        info!("Starting Db2 container: {}", self.container_name);

        // First, try to stop and remove any existing container with the same name
        let _ = Command::new("docker")
            .args(["stop", &self.container_name])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        let _ = Command::new("docker")
            .args(["rm", &self.container_name])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        // Db2 needs --privileged for its kernel tuning at instance start
        let output = Command::new("docker")
            .args([
                "run",
                "--name",
                &self.container_name,
                "--privileged",
                "-e",
                "LICENSE=accept",
                "-e",
                &format!("DB2INST1_PASSWORD={}", self.password),
                "-e",
                &format!("DBNAME={}", self.database),
                "-p",
                &format!("{}:50000", self.host_port),
                "-d",
                &self.image_name,
            ])
            .output()
            .context("Failed to start Docker container")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Failed to start container: {stderr}");
        }

        let container_id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        info!("Started container: {}", container_id);

        Ok(())
    }

    /// Waits for the database inside the container to accept connections
    pub async fn wait_until_ready(&self, timeout_secs: u64) -> Result<()> {
        info!("Waiting for Db2 to be ready...");

        let start = Instant::now();
        let timeout = Duration::from_secs(timeout_secs);
        let channel = self.channel();

        while start.elapsed() < timeout {
            match channel.query("VALUES 1").await {
                Ok(_) => {
                    info!("Db2 is ready!");
                    return Ok(());
                }
                Err(e) => {
                    debug!("Connection attempt failed: {}", e);
                    tokio::time::sleep(Duration::from_millis(1000)).await;
                }
            }
        }

        anyhow::bail!("Db2 did not become ready within {timeout_secs} seconds")
    }

    /// Control channel into the container
    pub fn channel(&self) -> DockerChannel {
        DockerChannel::new(&self.container_name, &self.database, &self.user)
    }

    /// Stops and removes the container
    pub fn stop(&self) -> Result<()> {
        info!("Stopping container: {}", self.container_name);

        let output = Command::new("docker")
            .args(["stop", &self.container_name])
            .output()
            .context("Failed to stop container")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("Failed to stop container (may not exist): {}", stderr);
        }

        let output = Command::new("docker")
            .args(["rm", &self.container_name])
            .output()
            .context("Failed to remove container")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("Failed to remove container (may not exist): {}", stderr);
        }

        info!("Container stopped and removed");
        Ok(())
    }

    /// Gets logs from the container
    pub fn get_logs(&self) -> Result<String> {
        let output = Command::new("docker")
            .args(["logs", &self.container_name])
            .output()
            .context("Failed to get container logs")?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        Ok(format!("STDOUT:\n{stdout}\n\nSTDERR:\n{stderr}"))
    }
}

impl Drop for Db2Container {
    fn drop(&mut self) {
        // Best effort cleanup of containers we started ourselves
        if self.owned {
            let _ = self.stop();
        }
    }
}
