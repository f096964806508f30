//! Chromium DevTools backend for the browser capability.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use log::{debug, info};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::browser::{Browser, BrowserContext, BrowserLauncher, Viewport};
use crate::config::{DESKTOP_VIEWPORT, PAGE_LOAD_TIMEOUT};
use crate::error_handling::BrowserError;

/// Status of the main document from the Navigation Timing API; 0 when unknown.
const NAVIGATION_STATUS_SCRIPT: &str = "(() => { \
    const entry = performance.getEntriesByType('navigation')[0]; \
    return entry && entry.responseStatus ? entry.responseStatus : 0; })()";

/// Launches a headless Chromium.
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    executable: Option<PathBuf>,
}

impl ChromiumLauncher {
    /// `executable` overrides Chrome auto-detection.
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn Browser>, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(PAGE_LOAD_TIMEOUT)
            .window_size(DESKTOP_VIEWPORT.0, DESKTOP_VIEWPORT.1)
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--hide-scrollbars")
            .arg("--mute-audio");
        if let Some(executable) = &self.executable {
            builder = builder.chrome_executable(executable);
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = CdpBrowser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {e:?}");
                }
            }
            debug!("Browser event handler task completed");
        });

        info!("Launched headless Chromium");
        Ok(Box::new(ChromiumBrowser {
            browser: Mutex::new(Some(browser)),
            handler,
        }))
    }
}

struct ChromiumBrowser {
    browser: Mutex<Option<CdpBrowser>>,
    handler: JoinHandle<()>,
}

#[async_trait]
impl Browser for ChromiumBrowser {
    async fn new_context(&self, viewport: &Viewport) -> Result<Box<dyn BrowserContext>, BrowserError> {
        let guard = self.browser.lock().await;
        let browser = guard.as_ref().ok_or(BrowserError::Closed)?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Context(e.to_string()))?;

        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(viewport.width))
            .height(i64::from(viewport.height))
            .device_scale_factor(1.0)
            .mobile(viewport.mobile)
            .build()
            .map_err(BrowserError::Context)?;
        page.execute(metrics)
            .await
            .map_err(|e| BrowserError::Context(e.to_string()))?;
        page.execute(SetUserAgentOverrideParams::new(viewport.user_agent.clone()))
            .await
            .map_err(|e| BrowserError::Context(e.to_string()))?;

        Ok(Box::new(ChromiumContext { page }))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let mut guard = self.browser.lock().await;
        let Some(mut browser) = guard.take() else {
            return Err(BrowserError::Closed);
        };
        let closed = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Context(e.to_string()));
        if let Err(e) = browser.wait().await {
            debug!("Chromium process did not exit cleanly: {e}");
        }
        self.handler.abort();
        info!("Closed headless Chromium");
        closed
    }
}

impl Drop for ChromiumBrowser {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

struct ChromiumContext {
    page: Page,
}

#[async_trait]
impl BrowserContext for ChromiumContext {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<Option<u16>, BrowserError> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(BrowserError::Navigation(e.to_string())),
            Err(_) => {
                return Err(BrowserError::Navigation(format!(
                    "load event not reached within {}s",
                    timeout.as_secs()
                )))
            }
        }

        let status = self
            .evaluate(NAVIGATION_STATUS_SCRIPT)
            .await?
            .as_u64()
            .and_then(|s| u16::try_from(s).ok())
            .filter(|s| *s != 0);
        Ok(status)
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, BrowserError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        let params = CaptureScreenshotParams {
            format: Some(CaptureScreenshotFormat::Png),
            capture_beyond_viewport: Some(true),
            ..Default::default()
        };
        self.page
            .screenshot(params)
            .await
            .map_err(|e| BrowserError::Screenshot(e.to_string()))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| BrowserError::Context(e.to_string()))
    }
}
