//! Geolocation data structures.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::config::GEO_STATUS_SUCCESS;
use crate::error_handling::EnrichmentError;
use crate::models::{CandidateAddress, NodeRecord};

/// Response of the geolocation service (`/json/<ip>`).
///
/// Only `lat`/`lon` end up in the node table; the rest is kept for logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeoInfo {
    pub status: String,
    /// Failure reason, only present when `status` is not `success`
    pub message: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    /// Autonomous system, e.g. `AS15169 Google LLC`
    #[serde(rename = "as")]
    pub asn: Option<String>,
    /// The address the service looked up
    pub query: Option<String>,
}

impl GeoInfo {
    /// Latitude and longitude, if both are present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    /// Rejects answers that must not become a node record.
    pub fn validate(&self, ip: IpAddr) -> Result<(), EnrichmentError> {
        if self.status != GEO_STATUS_SUCCESS {
            let message = self
                .message
                .clone()
                .unwrap_or_else(|| format!("status '{}'", self.status));
            return Err(EnrichmentError::Rejected { ip, message });
        }
        if self.coordinates().is_none() {
            return Err(EnrichmentError::MissingCoordinates { ip });
        }
        Ok(())
    }

    /// Builds the stored record for `candidate` from this answer.
    pub fn node_record(&self, candidate: &CandidateAddress) -> Result<NodeRecord, EnrichmentError> {
        let (lat, lon) = self
            .coordinates()
            .ok_or(EnrichmentError::MissingCoordinates { ip: candidate.ip })?;
        Ok(NodeRecord::new(candidate, lat, lon))
    }
}
