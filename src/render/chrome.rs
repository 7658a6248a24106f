//! Live renderer backed by a headless Chromium over the DevTools protocol.
//!
//! Every session launches its own browser process and tears it down on
//! close. The page's `<body>` is serialized in-page, with computed styles,
//! into the [`DomSnapshot`] shape and collected on the Rust side.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use super::{BrowsingSession, PageRenderer};
use crate::content::dom::DomSnapshot;
use crate::error::{ExtractError, Result};

/// Serializes `document.body` into `{ title, body: [node] }`, where a node
/// is either a string (text node) or
/// `{ tag, classes, style: { display, visibility, opacity }, inLayout, children }`.
const SNAPSHOT_SCRIPT: &str = r"
(() => {
    const serialize = (el) => {
        const style = window.getComputedStyle(el);
        const children = [];
        for (const node of el.childNodes) {
            if (node.nodeType === Node.TEXT_NODE) {
                children.push(node.textContent);
            } else if (node.nodeType === Node.ELEMENT_NODE) {
                children.push(serialize(node));
            }
        }
        return {
            tag: el.tagName.toLowerCase(),
            classes: Array.from(el.classList),
            style: {
                display: style.display,
                visibility: style.visibility,
                opacity: style.opacity,
            },
            inLayout: el.offsetParent !== null,
            children,
        };
    };
    const body = [];
    for (const node of document.body ? document.body.childNodes : []) {
        if (node.nodeType === Node.TEXT_NODE) {
            body.push(node.textContent);
        } else if (node.nodeType === Node.ELEMENT_NODE) {
            body.push(serialize(node));
        }
    }
    return { title: document.title, body };
})()
";

/// Launches a fresh headless Chromium per session.
#[derive(Debug, Default)]
pub struct ChromeRenderer;

impl ChromeRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn render_error(context: &str, err: impl std::fmt::Display) -> ExtractError {
    ExtractError::TransientRender(format!("{context}: {err}"))
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    fn name(&self) -> &'static str {
        "chrome"
    }

    async fn open_session(&self) -> Result<Box<dyn BrowsingSession>> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(|e| render_error("invalid browser config", e))?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| render_error("failed to launch browser", e))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("Browser launched");
        Ok(Box::new(ChromeSession {
            browser: Some(browser),
            events: Some(events),
            page: None,
        }))
    }
}

struct ChromeSession {
    browser: Option<Browser>,
    events: Option<JoinHandle<()>>,
    page: Option<Page>,
}

impl ChromeSession {
    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| ExtractError::TransientRender("no page loaded".into()))
    }
}

#[async_trait]
impl BrowsingSession for ChromeSession {
    async fn navigate(&mut self, url: &Url) -> Result<()> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ExtractError::TransientRender("session already closed".into()))?;
        let page = browser
            .new_page(url.as_str())
            .await
            .map_err(|e| render_error("navigation failed", e))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| render_error("navigation failed", e))?;
        self.page = Some(page);
        Ok(())
    }

    async fn title(&mut self) -> Result<String> {
        let title = self
            .page()?
            .get_title()
            .await
            .map_err(|e| render_error("failed to read title", e))?;
        Ok(title.unwrap_or_default())
    }

    async fn snapshot(&mut self) -> Result<DomSnapshot> {
        self.page()?
            .evaluate(SNAPSHOT_SCRIPT)
            .await
            .map_err(|e| render_error("snapshot script failed", e))?
            .into_value::<DomSnapshot>()
            .map_err(|e| render_error("malformed snapshot", e))
    }

    async fn close(&mut self) -> Result<()> {
        self.page = None;
        let closed = match self.browser.take() {
            Some(mut browser) => {
                let result = browser.close().await.map(|_| ());
                if let Err(e) = browser.wait().await {
                    warn!(error = %e, "Browser process did not exit cleanly");
                }
                result.map_err(|e| render_error("failed to close browser", e))
            }
            None => Ok(()),
        };
        if let Some(events) = self.events.take() {
            events.abort();
        }
        closed
    }
}
