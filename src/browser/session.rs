//! Browser lifecycle.
//!
//! Launches Chrome over a persistent profile directory so cookies and the
//! logged-in session survive between runs, and keeps the CDP event drain
//! alive for the whole session.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AgentError;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const SYSTEM_CHROME: &str = "/usr/bin/google-chrome";

const WINDOW_WIDTH: u32 = 1380;
const WINDOW_HEIGHT: u32 = 840;

/// A launched browser plus its event drain task.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch the browser.
    ///
    /// Tries the system Chrome first and falls back to the executable
    /// chromiumoxide detects on its own.
    pub async fn launch(config: &Config) -> Result<Self> {
        info!("🚀 launching browser (headless: {})", config.headless);

        let (browser, mut handler) =
            match launch_with(config, Some(Path::new(SYSTEM_CHROME))).await {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("system chrome launch failed, trying auto-detection: {}", e);
                    launch_with(config, None).await?
                }
            };
        debug!("browser process up, profile: {}", config.user_data_dir);

        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // give the browser a moment to settle before the first command
        sleep(Duration::from_millis(300)).await;

        Ok(Self {
            browser,
            handler_task,
        })
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Open a fresh blank tab.
    pub async fn new_page(&self) -> Result<Page> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| AgentError::BrowserLaunch {
                message: format!("page creation failed: {}", e),
            })?;
        Ok(page)
    }

    /// Close the browser and stop the event drain.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("browser close failed: {}", e);
        }
        self.handler_task.abort();
    }
}

async fn launch_with(
    config: &Config,
    executable: Option<&Path>,
) -> Result<(Browser, chromiumoxide::Handler)> {
    let mut builder = BrowserConfig::builder()
        .user_data_dir(&config.user_data_dir)
        .window_size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .viewport(Viewport {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            ..Viewport::default()
        })
        .args(launch_args());
    if let Some(path) = executable {
        builder = builder.chrome_executable(path);
    }
    builder = if config.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    let browser_config = builder.build().map_err(|e| AgentError::BrowserLaunch {
        message: e,
    })?;

    let pair = Browser::launch(browser_config)
        .await
        .map_err(|e| AgentError::BrowserLaunch {
            message: e.to_string(),
        })?;
    Ok(pair)
}

fn launch_args() -> Vec<String> {
    vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--no-default-browser-check".to_string(),
        "--no-first-run".to_string(),
        format!("--user-agent={}", USER_AGENT),
    ]
}
