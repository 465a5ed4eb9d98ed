//! Page driver, infrastructure layer.
//!
//! Owns one browser tab and exposes navigation, script evaluation and
//! capture capabilities. Knows nothing about contests or ledgers.

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::AgentError;

/// Driver for a single page.
///
/// Responsibilities:
/// - hold the Page resource
/// - expose goto / eval / capture
/// - no contest logic, no ledger access
pub struct PageDriver {
    page: Page,
}

impl PageDriver {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Reference to the underlying page, for capabilities not wrapped here.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate to a URL with a hard timeout.
    pub async fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
        let navigation = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(timeout, navigation).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(AgentError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }
            .into()),
            Err(_) => Err(AgentError::Navigation {
                url: url.to_string(),
                message: format!("timed out after {:?}", timeout),
            }
            .into()),
        }
    }

    /// Evaluate JS and return the raw JSON result.
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self
            .page
            .evaluate(js_code.into())
            .await
            .map_err(|e| AgentError::Script {
                message: e.to_string(),
            })?;
        let json_value = result.into_value().map_err(|e| AgentError::Script {
            message: e.to_string(),
        })?;
        Ok(json_value)
    }

    /// Evaluate JS and deserialize the result into a concrete type.
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// Visible text of the whole document body. Empty string when the body
    /// is missing.
    pub async fn body_text(&self) -> Result<String> {
        self.eval_as::<String>(
            "(function() { return document.body ? (document.body.innerText || '') : ''; })()",
        )
        .await
    }

    /// Current URL, empty when the target reports none.
    pub async fn url(&self) -> String {
        self.page.url().await.ok().flatten().unwrap_or_default()
    }

    /// Full HTML of the current document.
    pub async fn content(&self) -> Result<String> {
        let html = self.page.content().await.map_err(|e| AgentError::Script {
            message: e.to_string(),
        })?;
        Ok(html)
    }

    /// Full-page PNG screenshot.
    pub async fn screenshot_png(&self) -> Result<Vec<u8>> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        let bytes = self
            .page
            .screenshot(params)
            .await
            .map_err(|e| AgentError::Script {
                message: e.to_string(),
            })?;
        Ok(bytes)
    }

    /// Close the tab. Close failures only matter as log noise.
    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            tracing::debug!("page close failed: {}", e);
        }
    }
}
