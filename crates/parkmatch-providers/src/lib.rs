pub mod aggregate;
pub mod connector;
pub mod error;
pub mod fixture;
pub mod json_api;
pub mod normalize;
pub(crate) mod retry;
pub mod types;

pub use aggregate::{collect_locations, CollectedLocations, ProviderOutcome};
pub use connector::{build_connectors, HttpOptions, ProviderConnector};
pub use error::ProviderError;
pub use fixture::FixtureConnector;
pub use json_api::JsonApiConnector;
pub use normalize::{normalize_listing, normalize_listings};
pub use types::{ListingsResponse, ProviderListing, SearchParams};
