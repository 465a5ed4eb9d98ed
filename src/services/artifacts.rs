//! Page snapshots for manual review.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use tracing::info;

use crate::error::AgentError;
use crate::infrastructure::PageDriver;

/// Saves a screenshot and HTML snapshot of a page.
pub struct ArtifactService {
    dir: PathBuf,
}

impl ArtifactService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Capture `<prefix>.png` and `<prefix>.html` under the artifacts
    /// directory, where the prefix is the current local time. Returns the
    /// prefix.
    pub async fn capture(&self, driver: &PageDriver) -> Result<String> {
        std::fs::create_dir_all(&self.dir).map_err(|e| AgentError::Artifact {
            path: self.dir.display().to_string(),
            source: e,
        })?;
        let prefix = Local::now().format("%Y%m%d_%H%M%S").to_string();

        let png_path = self.dir.join(format!("{}.png", prefix));
        let bytes = driver.screenshot_png().await?;
        std::fs::write(&png_path, bytes).map_err(|e| AgentError::Artifact {
            path: png_path.display().to_string(),
            source: e,
        })?;

        let html_path = self.dir.join(format!("{}.html", prefix));
        let html = driver.content().await?;
        std::fs::write(&html_path, html).map_err(|e| AgentError::Artifact {
            path: html_path.display().to_string(),
            source: e,
        })?;

        info!("  📸 artifacts saved: {}", png_path.display());
        Ok(prefix)
    }
}
