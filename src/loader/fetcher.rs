use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use reqwest::{header, Client, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// HTTP fetcher for the catalog document, with retries and a size cap
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    initial_backoff: Duration,
    max_size: usize,
}

impl Fetcher {
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            initial_backoff: Duration::from_secs(1),
            max_size: config.max_catalog_size,
        })
    }

    #[cfg(test)]
    fn with_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Fetch a URL with retry logic and exponential backoff
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            match self.fetch_once(url).await {
                Ok(content) => return Ok(content),
                Err(e) if retries < self.max_retries && Self::is_retryable(&e) => {
                    retries += 1;
                    warn!(
                        "Catalog fetch failed (attempt {}/{}): {}. Retrying in {:?}",
                        retries,
                        self.max_retries,
                        e.log_safe(),
                        backoff
                    );
                    sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        debug!("Fetching catalog: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::CatalogLoad(format!("HTTP {}", response.status())));
        }

        if let Some(ct) = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            let ct_lower = ct.to_lowercase();
            let valid_types = ["application/json", "text/json", "text/plain"];
            if !valid_types.iter().any(|t| ct_lower.starts_with(t)) {
                // Static hosts often mislabel JSON, so only warn
                warn!("Unexpected content type: {} for {}", ct, url);
            }
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_size as u64 {
                return Err(Error::CatalogLoad(format!(
                    "Catalog size {} exceeds maximum {}",
                    content_length, self.max_size
                )));
            }
        }

        self.read_with_limit(response).await
    }

    /// Read the body chunk by chunk, stopping as soon as it passes the size cap
    async fn read_with_limit(&self, mut response: Response) -> Result<String> {
        let mut body = Vec::new();

        while let Some(chunk) = response.chunk().await? {
            check_size(body.len() + chunk.len(), self.max_size)?;
            body.extend_from_slice(&chunk);
        }

        String::from_utf8(body)
            .map_err(|e| Error::CatalogLoad(format!("Invalid UTF-8 in response: {e}")))
    }

    fn is_retryable(error: &Error) -> bool {
        match error {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Error::CatalogLoad(msg) => msg.starts_with("HTTP 5"),
            _ => false,
        }
    }
}

pub(crate) fn check_size(len: usize, max: usize) -> Result<()> {
    if len > max {
        return Err(Error::CatalogLoad(format!(
            "Catalog size {len} exceeds maximum {max}"
        )));
    }
    Ok(())
}
