//! Fan-out over provider connectors and fan-in of their records.

use futures::stream::{self, StreamExt};
use parkmatch_core::{LocationRecord, Provider};

use crate::connector::ProviderConnector;
use crate::types::SearchParams;

/// Result of querying one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOutcome {
    pub provider: Provider,
    pub records: usize,
    /// Set when the provider failed; its records then count as zero.
    pub error: Option<String>,
}

/// Records from every provider, concatenated in connector order.
#[derive(Debug, Default)]
pub struct CollectedLocations {
    pub records: Vec<LocationRecord>,
    pub outcomes: Vec<ProviderOutcome>,
}

impl CollectedLocations {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }
}

/// Query every connector with at most `max_concurrent` requests in flight.
///
/// Output keeps connector order regardless of completion order, so the
/// clustering input is reproducible for a given provider configuration.
/// A failing provider is logged and contributes nothing.
pub async fn collect_locations(
    connectors: &[Box<dyn ProviderConnector>],
    params: &SearchParams,
    max_concurrent: usize,
) -> CollectedLocations {
    let results: Vec<_> = stream::iter(connectors)
        .map(|connector| async move {
            let provider = connector.provider();
            (provider, connector.search_locations(params).await)
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    let mut collected = CollectedLocations::default();
    for (provider, result) in results {
        match result {
            Ok(records) => {
                tracing::info!(%provider, records = records.len(), "provider search complete");
                collected.outcomes.push(ProviderOutcome {
                    provider,
                    records: records.len(),
                    error: None,
                });
                collected.records.extend(records);
            }
            Err(e) => {
                tracing::warn!(%provider, error = %e, "provider search failed");
                collected.outcomes.push(ProviderOutcome {
                    provider,
                    records: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    tracing::info!(
        airport = %params.airport_code,
        providers = connectors.len(),
        failed = collected.failed(),
        records = collected.records.len(),
        "location collection complete"
    );
    collected
}
