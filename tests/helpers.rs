// Shared fakes for the pipeline's collaborators.
//
// Test files pull this in with `mod helpers;`.

use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use seo_audit::crawl::{Browser, BrowserContext, BrowserLauncher, Viewport};
use seo_audit::dns::HostResolver;
use seo_audit::error_handling::BrowserError;

/// A healthy page that only trips the advisory rules.
#[allow(dead_code)]
pub const GOOD_PAGE: &str = r#"<html><head>
<title>Handmade oak furniture from a small Vermont workshop</title>
<meta name="description" content="Tables, chairs and shelving built by hand from locally sourced oak, finished with natural oils and made to last for generations of daily use.">
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="canonical" href="/">
</head><body><h1>Oak furniture</h1><h2>Tables</h2><p>Short copy.</p><a href="/about">About</a></body></html>"#;

/// A page missing almost everything.
#[allow(dead_code)]
pub const BARE_PAGE: &str = "<html><body><p>hello</p></body></html>";

/// Serves `GOOD_PAGE` or `BARE_PAGE` depending on the URL. URLs containing
/// `broken` have no readable DOM; URLs containing `slow` never finish loading
/// their DOM.
#[derive(Default)]
pub struct FakeLauncher {
    pub launches: AtomicUsize,
    pub browsers_closed: Arc<AtomicUsize>,
    pub fail_launch: bool,
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn Browser>, BrowserError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_launch {
            return Err(BrowserError::Launch("chrome not found".to_string()));
        }
        Ok(Box::new(FakeBrowser {
            closed: Arc::clone(&self.browsers_closed),
        }))
    }
}

struct FakeBrowser {
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn new_context(
        &self,
        _viewport: &Viewport,
    ) -> Result<Box<dyn BrowserContext>, BrowserError> {
        Ok(Box::new(FakeContext {
            url: Mutex::new(String::new()),
        }))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakeContext {
    url: Mutex<String>,
}

impl FakeContext {
    fn current(&self) -> String {
        self.url.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl BrowserContext for FakeContext {
    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<Option<u16>, BrowserError> {
        if let Ok(mut current) = self.url.lock() {
            *current = url.to_string();
        }
        Ok(Some(200))
    }

    async fn content(&self) -> Result<String, BrowserError> {
        let url = self.current();
        if url.contains("broken") {
            return Err(BrowserError::Script("target crashed".to_string()));
        }
        if url.contains("slow") {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        if url.contains("bare") {
            Ok(BARE_PAGE.to_string())
        } else {
            Ok(GOOD_PAGE.to_string())
        }
    }

    async fn evaluate(&self, _script: &str) -> Result<serde_json::Value, BrowserError> {
        Err(BrowserError::Script("evaluate not supported".to_string()))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    async fn close(&self) -> Result<(), BrowserError> {
        Ok(())
    }
}

/// Resolves every hostname from a fixed table; unknown names fail.
#[allow(dead_code)]
pub struct TableResolver(pub Vec<(&'static str, Vec<IpAddr>)>);

#[async_trait]
impl HostResolver for TableResolver {
    async fn lookup_ips(&self, host: &str) -> anyhow::Result<Vec<IpAddr>> {
        self.0
            .iter()
            .find(|(name, _)| *name == host)
            .map(|(_, ips)| ips.clone())
            .ok_or_else(|| anyhow::anyhow!("no record for {host}"))
    }
}
