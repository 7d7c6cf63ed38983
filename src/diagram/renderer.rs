//! Remote Diagram Renderer
//!
//! Turns a diagram description into a PNG on disk. The only implementation
//! talks to the yUML web service; tests substitute their own.
//!
//! Single-shot: failures are returned to the caller, never retried here.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

use super::DiagramDescription;
use crate::config::RenderConfig;
use crate::types::{GherkifyError, Result};

/// Renders diagram descriptions to image files
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Render `description` and write the image to `output`
    async fn render(&self, description: &DiagramDescription, output: &Path) -> Result<()>;

    /// Renderer name for logging
    fn name(&self) -> &str;
}

pub type SharedRenderer = Arc<dyn DiagramRenderer>;

/// yUML web service renderer
pub struct YumlRenderer {
    endpoint: Url,
    style: String,
    client: reqwest::Client,
}

impl YumlRenderer {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        let endpoint = Self::validate_endpoint(&config.endpoint)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GherkifyError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            style: config.style.clone(),
            client,
        })
    }

    /// Only http/https endpoints that can carry path segments are accepted
    fn validate_endpoint(endpoint: &str) -> Result<Url> {
        let url = Url::parse(endpoint).map_err(|e| {
            GherkifyError::Config(format!("Invalid render endpoint '{}': {}", endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(GherkifyError::Config(format!(
                "Render endpoint must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        if url.cannot_be_a_base() {
            return Err(GherkifyError::Config(format!(
                "Render endpoint cannot be used as a base URL: {}",
                endpoint
            )));
        }

        Ok(url)
    }

    /// `{endpoint}/diagram/{style}/{kind}/{text}.png`, text percent-encoded
    pub fn diagram_url(&self, description: &DiagramDescription) -> Result<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                GherkifyError::Config(format!("Invalid render endpoint: {}", self.endpoint))
            })?;
            segments
                .pop_if_empty()
                .push("diagram")
                .push(&self.style)
                .push(description.kind().as_str())
                .push(&format!("{}.png", description.text()));
        }
        Ok(url)
    }
}

#[async_trait]
impl DiagramRenderer for YumlRenderer {
    async fn render(&self, description: &DiagramDescription, output: &Path) -> Result<()> {
        let identity = description.identity();
        let url = self.diagram_url(description)?;
        let start_time = Instant::now();

        debug!("Requesting {} diagram {} from {}", description.kind(), identity, url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                GherkifyError::render(identity.as_str(), format!("request timed out: {}", e))
            } else if e.is_connect() {
                GherkifyError::render(
                    identity.as_str(),
                    format!("failed to connect to {}: {}", self.endpoint, e),
                )
            } else {
                GherkifyError::render(identity.as_str(), format!("request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("yUML returned {} for diagram {}", status, identity);
            return Err(GherkifyError::render(
                identity.as_str(),
                format!("yUML error ({}): {}", status, body.trim()),
            ));
        }

        let bytes = response.bytes().await.map_err(|e| {
            GherkifyError::render(identity.as_str(), format!("failed to read image: {}", e))
        })?;

        write_atomic(output, &bytes).await?;

        debug!(
            "Wrote {} bytes to {} in {:?}",
            bytes.len(),
            output.display(),
            start_time.elapsed()
        );

        Ok(())
    }

    fn name(&self) -> &str {
        "yuml"
    }
}

/// Write through a sibling temp file so a partial image never carries the final name
async fn write_atomic(output: &Path, bytes: &[u8]) -> Result<()> {
    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    tokio::fs::create_dir_all(parent).await?;

    let file_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = parent.join(format!(".{}.{}.part", file_name, std::process::id()));

    if let Err(e) = tokio::fs::write(&temp, bytes).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&temp, output).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e.into());
    }
    Ok(())
}
