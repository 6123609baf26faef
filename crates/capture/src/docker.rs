//! Control channel over `docker exec` into a Db2 container.
//!
//! Integration environments run Db2 and its ASN scripts inside a container
//! without exposing a native driver to the host, so the channel shells into
//! the container and drives the db2 CLI. Each statement is one short-lived
//! process; nothing is held open across a poll loop's sleep, and an aborted
//! wait cannot leak a session.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::{CommandError, ControlChannel};

/// Runs statements through `docker exec <container> su - <user> -c "db2 ..."`.
#[derive(Clone, Debug)]
pub struct DockerChannel {
    container: String,
    database: String,
    user: String,
}

impl DockerChannel {
    pub fn new(container: &str, database: &str, user: &str) -> Self {
        Self {
            container: container.to_string(),
            database: database.to_string(),
            user: user.to_string(),
        }
    }

    async fn run_db2(&self, statement: &str) -> Result<String, CommandError> {
        let script = format!(
            "db2 connect to {} > /dev/null && db2 -x \"{}\"",
            self.database,
            statement.replace('"', "\\\"")
        );
        trace!("docker exec {}: {script}", self.container);

        let output = Command::new("docker")
            .args(["exec", &self.container, "su", "-", &self.user, "-c", &script])
            .output()
            .await
            .map_err(|e| {
                CommandError::new(statement, format!("failed to spawn docker exec: {e}"))
            })?;

        // The db2 CLI exits 1 for an empty result set, which is not a failure.
        let empty_result = output.status.code() == Some(1);
        if !output.status.success() && !empty_result {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(CommandError::new(
                statement,
                format!("db2 exited with {}: {detail}", output.status),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl ControlChannel for DockerChannel {
    async fn execute(&self, statement: &str) -> Result<(), CommandError> {
        self.run_db2(statement).await.map(|_| ())
    }

    async fn query(&self, statement: &str) -> Result<Vec<String>, CommandError> {
        let stdout = self.run_db2(statement).await?;
        let rows: Vec<String> = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        debug!("query returned {} rows", rows.len());
        Ok(rows)
    }
}
