//! Bounded retry around web extraction.
//!
//! One attempt = open session → navigate (bounded by the navigation
//! timeout) → read title → snapshot → collect text → close session. The
//! session is closed exactly once per attempt whatever the outcome.
//! Transient failures are retried immediately, with no backoff, until
//! `max_retries + 1` attempts have run. Any other failure ends the run.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::ExtractConfig;
use crate::content::dom::TextCollector;
use crate::content::types::WebExtraction;
use crate::error::{ExtractError, Result};
use crate::render::{BrowsingSession, PageRenderer};

/// Runs web extraction attempts against a [`PageRenderer`].
pub struct RetryController {
    renderer: Arc<dyn PageRenderer>,
    collector: TextCollector,
    max_attempts: u32,
    navigation_timeout: Duration,
}

impl RetryController {
    pub fn new(renderer: Arc<dyn PageRenderer>, config: &ExtractConfig) -> Self {
        Self {
            renderer,
            collector: TextCollector::new(&config.noise_selectors),
            max_attempts: config.max_attempts(),
            navigation_timeout: config.navigation_timeout(),
        }
    }

    /// Total attempts this controller will make before giving up.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Extract `url`, retrying transient failures.
    ///
    /// The URL must already be validated. A failure that is not
    /// [transient](ExtractError::is_transient) is returned as-is.
    #[instrument(skip(self), fields(url = %url, renderer = self.renderer.name()))]
    pub async fn extract(&self, url: &Url) -> Result<WebExtraction> {
        let attempts = self.max_attempts();
        let mut last_error = None;

        for attempt in 1..=attempts {
            debug!(attempt, attempts, "Starting attempt");
            match self.attempt(url).await {
                Ok(result) => {
                    info!(
                        attempt,
                        chars = result.text_content.len(),
                        "Extraction succeeded"
                    );
                    return Ok(result);
                }
                Err(err) if err.is_transient() => {
                    warn!(attempt, attempts, error = %err, "Attempt failed");
                    last_error = Some(err);
                }
                Err(err) => {
                    warn!(attempt, error = %err, "Attempt failed permanently");
                    return Err(err);
                }
            }
        }

        Err(ExtractError::ExtractionFailed {
            attempts,
            last: Box::new(last_error.unwrap_or(ExtractError::EmptyContent)),
        })
    }

    /// One acquire → collect → release cycle.
    async fn attempt(&self, url: &Url) -> Result<WebExtraction> {
        let mut session = self.renderer.open_session().await?;
        let outcome = self.collect(session.as_mut(), url).await;
        if let Err(err) = session.close().await {
            warn!(error = %err, "Failed to close browsing session");
        }
        outcome
    }

    async fn collect(
        &self,
        session: &mut dyn BrowsingSession,
        url: &Url,
    ) -> Result<WebExtraction> {
        tokio::time::timeout(self.navigation_timeout, session.navigate(url))
            .await
            .map_err(|_| {
                ExtractError::TransientRender(format!(
                    "navigation timed out after {}s",
                    self.navigation_timeout.as_secs()
                ))
            })??;

        let title = session.title().await?;
        let snapshot = session.snapshot().await?;
        let text_content = self.collector.collect(&snapshot);
        if text_content.is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        Ok(WebExtraction {
            title,
            text_content,
        })
    }
}
