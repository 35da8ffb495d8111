use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

/// Stand-in for the `ollama` executable: a shell script in a temporary directory
#[allow(dead_code)]
pub struct FakeOllama {
    temp_dir: TempDir,
    pub command: PathBuf,
}

#[allow(dead_code)]
impl FakeOllama {
    /// Write `body` as an executable `/bin/sh` script.
    ///
    /// The script is called as `<script> run <model> <prompt>`, so `$1`, `$2`
    /// and `$3` are available to it.
    #[cfg(unix)]
    pub fn new(body: &str) -> Result<Self> {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        let command = temp_dir.path().join("fake-ollama");

        std::fs::write(&command, format!("#!/bin/sh\n{body}\n"))
            .context("Failed to write fake ollama script")?;
        std::fs::set_permissions(&command, std::fs::Permissions::from_mode(0o755))
            .context("Failed to make fake ollama script executable")?;

        Ok(Self { temp_dir, command })
    }

    pub fn command_str(&self) -> &str {
        self.command.to_str().expect("Temp path should be UTF-8")
    }

    /// Scratch directory the script may write into
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// POST a raw JSON body to `/generate_flashcards` and decode the reply
#[allow(dead_code)]
pub async fn post_generate(app: Router, body: &str) -> Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method("POST")
        .uri("/generate_flashcards")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .context("Failed to build request")?;

    send(app, request).await
}

#[allow(dead_code)]
pub async fn send(app: Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.oneshot(request).await.context("Router failed")?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .context("Failed to read response body")?;
    let json = serde_json::from_slice(&bytes).context("Response body is not JSON")?;

    Ok((status, json))
}
