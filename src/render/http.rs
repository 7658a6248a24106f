//! Static renderer: fetch the page over HTTP and build the DOM without
//! running scripts.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{BrowsingSession, PageRenderer};
use crate::content::dom::DomSnapshot;
use crate::content::html::parse_snapshot;
use crate::error::{ExtractError, Result};
use crate::http_client::{PageClient, DEFAULT_USER_AGENT};

/// Renders pages by fetching their HTML. Each session gets its own client
/// and cookie jar.
pub struct HttpRenderer {
    user_agent: String,
}

impl HttpRenderer {
    pub fn new(user_agent: Option<String>) -> Self {
        Self {
            user_agent: user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }
}

impl Default for HttpRenderer {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn open_session(&self) -> Result<Box<dyn BrowsingSession>> {
        let client = PageClient::with_user_agent(&self.user_agent).map_err(|e| {
            ExtractError::TransientRender(format!("failed to start HTTP client: {e}"))
        })?;
        Ok(Box::new(HttpSession {
            client: Some(client),
            page: None,
        }))
    }
}

struct HttpSession {
    client: Option<PageClient>,
    page: Option<DomSnapshot>,
}

impl HttpSession {
    fn loaded(&self) -> Result<&DomSnapshot> {
        self.page
            .as_ref()
            .ok_or_else(|| ExtractError::TransientRender("no page loaded".into()))
    }
}

#[async_trait]
impl BrowsingSession for HttpSession {
    async fn navigate(&mut self, url: &Url) -> Result<()> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ExtractError::TransientRender("session already closed".into()))?;

        let response = client
            .fetch(url.as_str())
            .await
            .map_err(|e| ExtractError::TransientRender(format!("{e:#}")))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ExtractError::TransientRender(format!(
                "server responded with {status}"
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ExtractError::TransientRender(format!("failed to read body: {e}")))?;
        debug!(bytes = html.len(), %status, "Page loaded");

        self.page = Some(parse_snapshot(&html));
        Ok(())
    }

    async fn title(&mut self) -> Result<String> {
        Ok(self.loaded()?.title.clone())
    }

    async fn snapshot(&mut self) -> Result<DomSnapshot> {
        self.loaded().cloned()
    }

    async fn close(&mut self) -> Result<()> {
        self.page = None;
        self.client = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::dom::TextCollector;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single HTTP response on a local port and return its URL.
    async fn serve_once(status: &'static str, body: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        Url::parse(&format!("http://{addr}/article")).unwrap()
    }

    #[tokio::test]
    async fn loaded_page_yields_title_and_snapshot() {
        let url = serve_once(
            "200 OK",
            "<html><head><title>Local Page</title></head>\
             <body><nav>Menu</nav><p>Served text</p></body></html>",
        )
        .await;

        let mut session = HttpRenderer::default().open_session().await.unwrap();
        session.navigate(&url).await.unwrap();
        assert_eq!(session.title().await.unwrap(), "Local Page");
        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(TextCollector::default().collect(&snapshot), "Served text");
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn server_error_is_transient() {
        let url = serve_once("500 Internal Server Error", "<p>oops</p>").await;

        let mut session = HttpRenderer::default().open_session().await.unwrap();
        let err = session.navigate(&url).await.unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("500"));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn client_error_page_is_still_collected() {
        let url = serve_once(
            "404 Not Found",
            "<html><head><title>Missing</title></head><body><h1>Page not found</h1></body></html>",
        )
        .await;

        let mut session = HttpRenderer::default().open_session().await.unwrap();
        session.navigate(&url).await.unwrap();
        assert_eq!(session.title().await.unwrap(), "Missing");
        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(TextCollector::default().collect(&snapshot), "Page not found");
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn snapshot_before_navigation_fails() {
        let mut session = HttpRenderer::default().open_session().await.unwrap();
        assert!(matches!(
            session.snapshot().await,
            Err(ExtractError::TransientRender(_))
        ));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn navigate_after_close_fails() {
        let mut session = HttpRenderer::default().open_session().await.unwrap();
        session.close().await.unwrap();
        let url = Url::parse("https://example.com").unwrap();
        assert!(session.navigate(&url).await.is_err());
    }

    #[tokio::test]
    async fn unreachable_host_is_transient() {
        let mut session = HttpRenderer::default().open_session().await.unwrap();
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = session.navigate(&url).await.unwrap_err();
        assert!(err.is_transient());
        session.close().await.unwrap();
    }
}
