//! Browser-automation capability.
//!
//! The crawler talks to a headless browser only through these traits, so the
//! pipeline can be driven by Chromium in production and by in-memory fakes in
//! tests.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::{DESKTOP_USER_AGENT, DESKTOP_VIEWPORT, MOBILE_USER_AGENT, MOBILE_VIEWPORT};
use crate::error_handling::BrowserError;

/// Rendering parameters for one context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub user_agent: String,
    /// Emulate a touch device
    pub mobile: bool,
}

impl Viewport {
    pub fn desktop() -> Self {
        Self {
            width: DESKTOP_VIEWPORT.0,
            height: DESKTOP_VIEWPORT.1,
            user_agent: DESKTOP_USER_AGENT.to_string(),
            mobile: false,
        }
    }

    pub fn mobile() -> Self {
        Self {
            width: MOBILE_VIEWPORT.0,
            height: MOBILE_VIEWPORT.1,
            user_agent: MOBILE_USER_AGENT.to_string(),
            mobile: true,
        }
    }
}

/// Starts a browser. Called once per audit job.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn Browser>, BrowserError>;
}

/// A running browser shared by every URL of one job.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Opens an isolated rendering context with the given viewport and user agent.
    async fn new_context(&self, viewport: &Viewport) -> Result<Box<dyn BrowserContext>, BrowserError>;

    /// Shuts the browser down. Further calls fail with `BrowserError::Closed`.
    async fn close(&self) -> Result<(), BrowserError>;
}

/// One rendering context (a page with its own viewport).
#[async_trait]
pub trait BrowserContext: Send + Sync {
    /// Navigates and waits for the load event, bounded by `timeout`.
    ///
    /// Returns the main document's HTTP status when the backend can observe it.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<Option<u16>, BrowserError>;

    /// Serialized DOM of whatever is currently loaded.
    async fn content(&self) -> Result<String, BrowserError>;

    /// Evaluates a script against the loaded DOM and returns its JSON value.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, BrowserError>;

    /// Full-page PNG capture.
    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError>;

    async fn close(&self) -> Result<(), BrowserError>;
}
