//! Detector backed by an external program
//!
//! The program receives one JSON request on stdin:
//!
//! ```json
//! { "host": "example.com", "url": "https://example.com/", "signals": { "headers": {}, "html": "", "env": [], "scripts": [] } }
//! ```
//!
//! and answers on stdout with a `DetectionBatch`:
//!
//! ```json
//! { "applications": [{ "name": "Nginx", "confidence": 100, "categories": [22] }], "meta": {} }
//! ```

use crate::detector::{DetectionBatch, Detector, DetectorError};
use crate::signals::PageSignals;
use async_trait::async_trait;
use serde::Serialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Cap on stderr kept for error messages
const MAX_STDERR_BYTES: usize = 2048;

#[derive(Serialize)]
struct DetectRequest<'a> {
    host: &'a str,
    url: &'a str,
    signals: &'a PageSignals,
}

/// Runs a fingerprinting engine as a subprocess per page
#[derive(Debug, Clone)]
pub struct CommandDetector {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandDetector {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    async fn run(&self, input: &[u8]) -> Result<Vec<u8>, DetectorError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // Stdin is fed while stdout drains; the program may answer before it
        // has read the whole page
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input).await?;
                // Dropping stdin signals EOF
            }
            Ok::<(), std::io::Error>(())
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        match fed {
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::debug!(source = "detector", "{} stopped reading its input", self.program);
            }
            other => other?,
        }

        if !output.status.success() {
            let end = output.stderr.len().min(MAX_STDERR_BYTES);
            return Err(DetectorError::Exit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr[..end])
                    .trim()
                    .to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl Detector for CommandDetector {
    async fn detect(
        &self,
        host: &str,
        url: &str,
        signals: &PageSignals,
    ) -> Result<DetectionBatch, DetectorError> {
        let request = serde_json::to_vec(&DetectRequest { host, url, signals })?;

        let stdout = tokio::time::timeout(self.timeout, self.run(&request))
            .await
            .map_err(|_elapsed| DetectorError::Timeout(self.timeout.as_millis() as u64))??;

        Ok(serde_json::from_slice(&stdout)?)
    }
}
