use super::scratch::Scratch;
use super::{blocking, pdf};
use crate::config::DocumentToolConfig;
use crate::error::{ConvertError, ConvertResult};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// External word-processing converter that prints a document as plain text.
#[derive(Debug, Clone)]
pub struct DocumentTool {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl DocumentTool {
    pub fn new(config: &DocumentToolConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs the tool over `input` and returns its standard output.
    ///
    /// The child is killed if it outlives the timeout.
    pub async fn extract_text(&self, input: Vec<u8>, scratch: &Scratch) -> ConvertResult<String> {
        let scratch = scratch.clone();
        let staged = blocking(move || Ok(scratch.write(".docx", &input)?)).await?;

        debug!("Running {} on {}", self.command, staged.path().display());

        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args);
        cmd.arg(staged.path());
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            ConvertError::ExternalTool(format!("failed to start {}: {}", self.command, e))
        })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                warn!("{} timed out after {:?}", self.command, self.timeout);
                ConvertError::ExternalTool(format!(
                    "{} timed out after {}s",
                    self.command,
                    self.timeout.as_secs_f32()
                ))
            })?
            .map_err(|e| {
                ConvertError::ExternalTool(format!("failed to wait for {}: {}", self.command, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::ExternalTool(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    pub async fn document_to_pdf(
        &self,
        input: Vec<u8>,
        scratch: &Scratch,
    ) -> ConvertResult<Vec<u8>> {
        let text = self.extract_text(input, scratch).await?;
        blocking(move || pdf::text_to_pdf(&text)).await
    }
}
