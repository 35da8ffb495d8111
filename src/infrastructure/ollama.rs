// src/infrastructure/ollama.rs
use crate::application::TextGenerator;
use crate::constants::{SPAWN_BUSY_BACKOFF_MS, SPAWN_BUSY_RETRIES};
use crate::domain::DomainError;
use crate::infrastructure::config::GeneratorConfig;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, instrument, warn};

/// Runs `<command> run <model> <prompt>` as a child process, one per call.
#[derive(Debug, Clone)]
pub struct OllamaCli {
    command: String,
    model: String,
    timeout: Option<Duration>,
}

impl OllamaCli {
    pub fn new(command: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            model: model.into(),
            timeout: None,
        }
    }

    /// Kill the child and fail the call if it runs longer than `timeout`.
    /// `None` waits for as long as the tool takes.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(&config.command, &config.model).with_timeout(config.timeout())
    }

    /// Spawn the child, retrying while the executable is still open for
    /// writing somewhere (ETXTBSY), e.g. mid-upgrade.
    async fn spawn(&self, prompt: &str) -> Result<Child, DomainError> {
        let mut backoff = Duration::from_millis(SPAWN_BUSY_BACKOFF_MS);
        let mut attempt = 1;
        loop {
            // kill_on_drop: a timeout or a dropped request future takes the child down with it
            let spawned = Command::new(&self.command)
                .arg("run")
                .arg(&self.model)
                .arg(prompt)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn();

            match spawned {
                Ok(child) => return Ok(child),
                Err(e) if is_text_file_busy(&e) && attempt < SPAWN_BUSY_RETRIES => {
                    debug!(attempt, ?backoff, "Executable busy, retrying spawn");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(DomainError::Unexpected(format!(
                        "Failed to launch `{}`: {}",
                        self.command, e
                    )))
                }
            }
        }
    }
}

#[cfg(unix)]
fn is_text_file_busy(e: &std::io::Error) -> bool {
    // ETXTBSY is 26 on Linux, macOS and the BSDs
    e.raw_os_error() == Some(26)
}

#[cfg(not(unix))]
fn is_text_file_busy(_e: &std::io::Error) -> bool {
    false
}

#[async_trait]
impl TextGenerator for OllamaCli {
    #[instrument(level = "debug", skip_all, fields(command = %self.command, model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        let child = self.spawn(prompt).await?;
        debug!(pid = child.id(), "Spawned model process");

        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    warn!(?limit, "Model process timed out, killing it");
                    DomainError::ExternalTool(format!(
                        "timed out after {} seconds",
                        limit.as_secs()
                    ))
                })?,
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|e| {
            DomainError::Unexpected(format!("Failed to wait for `{}`: {}", self.command, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            warn!(status = %output.status, %stderr, "Model process failed");
            return Err(DomainError::ExternalTool(if stderr.is_empty() {
                output.status.to_string()
            } else {
                format!("{}: {}", output.status, stderr)
            }));
        }

        String::from_utf8(output.stdout).map_err(|e| {
            DomainError::Unexpected(format!("Model output is not valid UTF-8: {}", e))
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
