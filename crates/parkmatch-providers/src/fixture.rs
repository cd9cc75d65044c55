//! Connector backed by captured listings on disk.
//!
//! The file maps airport codes to raw listings:
//! `{"LAX": [{...}, {...}], "SFO": [...]}`. Keys match case-insensitively
//! and an airport missing from the file has no listings.

use std::collections::HashMap;
use std::path::PathBuf;

use futures::future::{BoxFuture, FutureExt};
use parkmatch_core::{LocationRecord, Provider};

use crate::connector::ProviderConnector;
use crate::error::ProviderError;
use crate::normalize::normalize_listings;
use crate::types::{ProviderListing, SearchParams};

pub struct FixtureConnector {
    provider: Provider,
    path: PathBuf,
}

impl FixtureConnector {
    #[must_use]
    pub fn new(provider: Provider, path: PathBuf) -> Self {
        Self { provider, path }
    }

    /// Reads the raw listings recorded for the searched airport.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::FixtureIo`] if the file cannot be read, or
    /// [`ProviderError::Deserialize`] if it is not an airport-to-listings map.
    pub async fn fetch_listings(
        &self,
        params: &SearchParams,
    ) -> Result<Vec<ProviderListing>, ProviderError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProviderError::FixtureIo {
                path: self.path.clone(),
                source: e,
            })?;

        let by_airport: HashMap<String, Vec<ProviderListing>> = serde_json::from_str(&content)
            .map_err(|e| ProviderError::Deserialize {
                context: format!("fixture {}", self.path.display()),
                source: e,
            })?;

        let listings = by_airport
            .into_iter()
            .find(|(code, _)| code.trim().eq_ignore_ascii_case(&params.airport_code))
            .map(|(_, listings)| listings)
            .unwrap_or_default();

        tracing::debug!(
            provider = %self.provider,
            airport = %params.airport_code,
            listings = listings.len(),
            "loaded fixture listings"
        );
        Ok(listings)
    }
}

impl ProviderConnector for FixtureConnector {
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
