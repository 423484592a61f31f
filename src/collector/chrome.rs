use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;

use crate::app::{AdlensError, Result};
use crate::collector::{CollectorConfig, Page};

/// Chromium-backed rendering collaborator, via chromiumoxide.
///
/// Owns the browser for the duration of a run; the results feed renders
/// lazily, so the page is kept open and scrolled between extractions.
pub struct ChromePage {
    browser: Browser,
    page: chromiumoxide::Page,
}

impl ChromePage {
    /// Launch a browser, navigate to the library URL and wait for the feed
    /// to settle.
    pub async fn open(url: &str, config: &CollectorConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .window_size(config.viewport.0, config.viewport.1)
            .request_timeout(config.timeout());

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| AdlensError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            AdlensError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // Drive browser events for the lifetime of the run
        tokio::spawn(async move {
            while let Some(_event) = handler.next().await {
                // Handle browser events
            }
        });

        let page = browser
            .new_page(url)
            .await
            .map_err(|e| AdlensError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| AdlensError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        page.wait_for_navigation()
            .await
            .map_err(|e| AdlensError::Browser(format!("Navigation failed: {}", e)))?;

        // The feed loads results after the navigation completes
        tokio::time::sleep(config.settle_after_load()).await;

        Ok(Self { browser, page })
    }

    pub async fn close(mut self) -> Result<()> {
        let _ = self.page.close().await;
        self.browser
            .close()
            .await
            .map_err(|e| AdlensError::Browser(format!("Failed to close browser: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl Page for ChromePage {
    async fn inner_text(&self) -> Result<String> {
        let text: String = self
            .page
            .evaluate("document.body ? document.body.innerText : ''")
            .await
            .map_err(|e| AdlensError::Browser(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| AdlensError::Browser(format!("Failed to parse result: {:?}", e)))?;
        Ok(text)
    }

    async fn scroll_by_viewport(&self) -> Result<()> {
        self.page
            .evaluate("window.scrollBy(0, window.innerHeight * 2)")
            .await
            .map_err(|e| AdlensError::Browser(format!("Scroll failed: {}", e)))?;
        Ok(())
    }
}
