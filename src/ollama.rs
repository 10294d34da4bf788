//! Local model execution through the `ollama` CLI.
//!
//! Each request spawns `ollama run <model>`, feeds the prompt on stdin and
//! collects stdout. The [`ModelRunner`] trait is the seam handlers depend on,
//! so tests can substitute canned model output.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, warn};

/// Errors produced while running a model.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The executable could not be found.
    #[error("`{0}` not found; install Ollama first")]
    NotInstalled(String),

    /// The process exited unsuccessfully.
    #[error("model `{model}` exited with {status}: {stderr}")]
    Failed {
        model: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The run exceeded its time budget and was killed.
    #[error("model `{model}` timed out after {after:?}")]
    TimedOut { model: String, after: Duration },

    /// Any other I/O failure talking to the process.
    #[error("model I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs a prompt against a named model and returns its trimmed output.
#[async_trait]
pub trait ModelRunner: Send + Sync {
    async fn run(&self, model: &str, prompt: &str) -> Result<String, RunnerError>;
}

/// [`ModelRunner`] backed by the `ollama` command line.
#[derive(Debug, Clone)]
pub struct OllamaCli {
    binary: String,
    timeout: Duration,
}

impl OllamaCli {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    async fn run_inner(&self, model: &str, prompt: &str) -> Result<String, RunnerError> {
        let mut child = Command::new(&self.binary)
            .args(["run", model])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RunnerError::NotInstalled(self.binary.clone()),
                _ => RunnerError::Io(e),
            })?;

        let stdin = child.stdin.take();
        // Writing the prompt and waiting for the answer share one deadline.
        let exchange = async move {
            if let Some(mut stdin) = stdin {
                let written = async {
                    stdin.write_all(prompt.as_bytes()).await?;
                    stdin.shutdown().await
                }
                .await;
                // A child that exits without reading its input is judged by
                // its exit status, not by the closed pipe.
                if let Err(e) = written {
                    if e.kind() != ErrorKind::BrokenPipe {
                        return Err(RunnerError::Io(e));
                    }
                }
            }
            Ok::<_, RunnerError>(child.wait_with_output().await?)
        };

        let output = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(output) => output?,
            // Dropping the future drops the child, which kills it.
            Err(_) => {
                return Err(RunnerError::TimedOut {
                    model: model.to_string(),
                    after: self.timeout,
                });
            }
        };

        if !output.status.success() {
            return Err(RunnerError::Failed {
                model: model.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl ModelRunner for OllamaCli {
    async fn run(&self, model: &str, prompt: &str) -> Result<String, RunnerError> {
        debug!(
            name: "ollama.run.started",
            model = %model,
            prompt_len = prompt.len(),
            "Running model"
        );

        match self.run_inner(model, prompt).await {
            Ok(out) => {
                debug!(
                    name: "ollama.run.finished",
                    model = %model,
                    output_len = out.len(),
                    "Model finished"
                );
                Ok(out)
            }
            Err(e @ RunnerError::TimedOut { .. }) => {
                warn!(name: "ollama.run.timeout", model = %model, "{e}");
                Err(e)
            }
            Err(e) => {
                error!(name: "ollama.run.failed", model = %model, error = %e, "Model run failed");
                Err(e)
            }
        }
    }
}
