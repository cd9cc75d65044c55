//! The connector seam between provider transports and the matcher.

use futures::future::BoxFuture;
use parkmatch_core::{AppConfig, ConnectorKind, LocationRecord, Provider, ProvidersFile};

use crate::error::ProviderError;
use crate::fixture::FixtureConnector;
use crate::json_api::JsonApiConnector;
use crate::types::SearchParams;

/// A source of normalized parking listings for one provider.
///
/// Implementations return only records that passed normalization; a
/// provider with no inventory for the airport returns an empty list.
pub trait ProviderConnector: Send + Sync {
    fn provider(&self) -> Provider;

    fn search_locations<'a>(
        &'a self,
        params: &'a SearchParams,
    ) -> BoxFuture<'a, Result<Vec<LocationRecord>, ProviderError>>;
}

/// Transport settings shared by every HTTP connector.
#[derive(Clone)]
pub struct HttpOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    /// Sent as a bearer token when set.
    pub api_token: Option<String>,
}

impl std::fmt::Debug for HttpOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpOptions")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl From<&AppConfig> for HttpOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
            api_token: config.provider_api_token.clone(),
        }
    }
}

/// Builds one connector per enabled provider, in file order.
///
/// # Errors
///
/// Returns [`ProviderError::Misconfigured`] when an entry lacks the field its
/// kind needs, or [`ProviderError::Http`] if an HTTP client cannot be built.
pub fn build_connectors(
    providers: &ProvidersFile,
    options: &HttpOptions,
) -> Result<Vec<Box<dyn ProviderConnector>>, ProviderError> {
    let mut connectors: Vec<Box<dyn ProviderConnector>> = Vec::new();

    for entry in providers.enabled() {
        let connector: Box<dyn ProviderConnector> = match entry.kind {
            ConnectorKind::JsonApi => {
                let base_url = entry.base_url.as_deref().ok_or_else(|| {
                    ProviderError::Misconfigured(format!("{} has no base_url", entry.provider))
                })?;
                Box::new(JsonApiConnector::new(entry.provider, base_url, options)?)
            }
            ConnectorKind::Fixture => {
                let path = entry.path.clone().ok_or_else(|| {
                    ProviderError::Misconfigured(format!("{} has no fixture path", entry.provider))
                })?;
                Box::new(FixtureConnector::new(entry.provider, path))
            }
        };
        tracing::debug!(provider = %entry.provider, kind = ?entry.kind, "connector configured");
        connectors.push(connector);
    }

    Ok(connectors)
}
