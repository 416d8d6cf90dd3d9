//! Geolocation enrichment of candidate addresses.
//!
//! Candidates are looked up one at a time against an ip-api.com compatible
//! service (`GET <base>/json/<ip>`), with a fixed pacing delay before every
//! request and bounded retries for transient failures.

mod lookup;
mod types;

pub use lookup::{EnricherConfig, GeoEnricher};
pub use types::GeoInfo;
