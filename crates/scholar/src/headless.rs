//! Headless Chromium rendering, for pages that only fill in client-side.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use common::{FetchConfig, PageSource, ScholarError, ScholarResult};
use futures::StreamExt;
use tracing::{debug, info};

/// Launches a fresh browser per fetch, waits for the page to settle, then
/// dumps the rendered markup. No retries.
pub struct HeadlessSource {
    settle_time: Duration,
}

impl HeadlessSource {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            settle_time: config.settle_time,
        }
    }

    async fn render(&self, browser: &Browser, url: &str) -> ScholarResult<String> {
        let page = browser
            .new_page(url)
            .await
            .map_err(|e| ScholarError::Render(format!("failed to open {}: {}", url, e)))?;

        debug!("Waiting {:?} for {} to settle", self.settle_time, url);
        tokio::time::sleep(self.settle_time).await;

        page.content()
            .await
            .map_err(|e| ScholarError::Render(format!("failed to read rendered page: {}", e)))
    }
}

#[async_trait]
impl PageSource for HeadlessSource {
    async fn fetch(&self, url: &str) -> ScholarResult<String> {
        let config = BrowserConfig::builder()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(|e| ScholarError::Render(format!("failed to build browser config: {}", e)))?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScholarError::Render(format!("failed to launch Chromium: {}", e)))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        info!("Rendering {} in headless Chromium", url);
        let result = self.render(&browser, url).await;

        let _ = browser.close().await;
        let _ = browser.wait().await;
        events.abort();

        result
    }

    fn name(&self) -> &'static str {
        "headless"
    }
}
