//! HTTP connector for provider JSON search APIs.
//!
//! Every provider behind this connector exposes
//! `GET {base_url}/airports/{code}/parking?start=..&end=..` returning
//! `{"listings": [...]}`. A 404 means the provider does not serve the
//! airport and yields no records.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use parkmatch_core::{LocationRecord, Provider};
use reqwest::{Client, StatusCode, Url};

use crate::connector::{HttpOptions, ProviderConnector};
use crate::error::ProviderError;
use crate::normalize::normalize_listings;
use crate::retry::retry_with_backoff;
use crate::types::{ListingsResponse, ProviderListing, SearchParams};

/// Retry-After fallback when a 429 carries no usable header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

pub struct JsonApiConnector {
    provider: Provider,
    base_url: String,
    client: Client,
    api_token: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl JsonApiConnector {
    /// Creates a connector with the configured timeout, `User-Agent`, and
    /// retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidUrl`] if `base_url` is not an
    /// absolute http(s) URL, or [`ProviderError::Http`] if the client cannot
    /// be built.
    pub fn new(
        provider: Provider,
        base_url: &str,
        options: &HttpOptions,
    ) -> Result<Self, ProviderError> {
        let parsed = Url::parse(base_url).map_err(|e| ProviderError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProviderError::InvalidUrl {
                url: base_url.to_owned(),
                reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.as_str())
            .build()?;

        Ok(Self {
            provider,
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
            api_token: options.api_token.clone(),
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
        })
    }

    fn search_url(&self, params: &SearchParams) -> Result<Url, ProviderError> {
        let raw = format!(
            "{}/airports/{}/parking",
            self.base_url, params.airport_code
        );
        let mut url = Url::parse(&raw).map_err(|e| ProviderError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("start", &params.start_param())
            .append_pair("end", &params.end_param());
        Ok(url)
    }

    /// Fetches raw listings for one search, retrying transient failures.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ProviderError::UnexpectedStatus`]: other non-2xx (5xx retried).
    /// - [`ProviderError::Http`]: network failure after all retries.
    /// - [`ProviderError::Deserialize`]: body is not a listings document.
    pub async fn fetch_listings(
        &self,
        params: &SearchParams,
    ) -> Result<Vec<ProviderListing>, ProviderError> {
        let url = self.search_url(params)?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let mut request = self
                    .client
                    .get(url.clone())
                    .header(reqwest::header::ACCEPT, "application/json");
                if let Some(token) = &self.api_token {
                    request = request.bearer_auth(token);
                }

                let response = request.send().await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    return Err(ProviderError::RateLimited {
                        provider: self.provider.to_string(),
                        retry_after_secs,
                    });
                }

                if status == StatusCode::NOT_FOUND {
                    tracing::debug!(
                        provider = %self.provider,
                        airport = %params.airport_code,
                        "provider does not serve airport"
                    );
                    return Ok(Vec::new());
                }

                if !status.is_success() {
                    return Err(ProviderError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                let parsed = serde_json::from_str::<ListingsResponse>(&body).map_err(|e| {
                    ProviderError::Deserialize {
                        context: format!("{} listings for {}", self.provider, params.airport_code),
                        source: e,
                    }
                })?;
                Ok(parsed.listings)
            }
        })
        .await
    }
}

impl ProviderConnector for JsonApiConnector {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn search_locations<'a>(
        &'a self,
        params: &'a SearchParams,
    ) -> BoxFuture<'a, Result<Vec<LocationRecord>, ProviderError>> {
        async move {
            let listings = self.fetch_listings(params).await?;
            Ok(normalize_listings(self.provider, listings))
        }
        .boxed()
    }
}
