//! Rendered-page sources.
//!
//! A [`PageRenderer`] opens independent [`BrowsingSession`]s. One session
//! serves exactly one web attempt: navigate, read the title, snapshot the
//! DOM, close. Sessions are never pooled or reused.
//!
//! # Implementations
//!
//! | Renderer | Backend | Feature Flag |
//! |----------|---------|-------------|
//! | [`HttpRenderer`] | HTTP fetch + static DOM | always |
//! | [`chrome::ChromeRenderer`] | headless Chromium over CDP | `chrome` |

#[cfg(feature = "chrome")]
pub mod chrome;
pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::config::{ExtractConfig, RendererKind};
use crate::content::dom::DomSnapshot;
use crate::error::Result;

pub use http::HttpRenderer;

/// Factory for browsing sessions.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Renderer name for logs (e.g., "http", "chrome").
    fn name(&self) -> &'static str;

    /// Acquire a fresh session. The caller must [`close`](BrowsingSession::close) it.
    async fn open_session(&self) -> Result<Box<dyn BrowsingSession>>;
}

/// One live page. All methods may suspend on I/O.
#[async_trait]
pub trait BrowsingSession: Send {
    /// Load `url`. Failures map to [`ExtractError::TransientRender`].
    /// The retry controller bounds this call with the navigation timeout.
    async fn navigate(&mut self, url: &Url) -> Result<()>;

    /// The loaded page's title, verbatim.
    async fn title(&mut self) -> Result<String>;

    /// Snapshot of the loaded page's `<body>` with visibility state.
    async fn snapshot(&mut self) -> Result<DomSnapshot>;

    /// Release the session's resources. Called once on every exit path.
    async fn close(&mut self) -> Result<()>;
}

/// Build the renderer selected by `config.renderer`.
///
/// Fails when the selected renderer was not compiled in.
pub fn renderer_for(config: &ExtractConfig) -> anyhow::Result<Arc<dyn PageRenderer>> {
    match config.renderer {
        RendererKind::Http => Ok(Arc::new(HttpRenderer::new(config.user_agent.clone()))),
        #[cfg(feature = "chrome")]
        RendererKind::Chrome => Ok(Arc::new(chrome::ChromeRenderer::new())),
        #[cfg(not(feature = "chrome"))]
        RendererKind::Chrome => {
            anyhow::bail!("the chrome renderer requires building with `--features chrome`")
        }
    }
}
