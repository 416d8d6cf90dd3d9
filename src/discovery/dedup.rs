//! Collapsing resolved addresses into unique candidates.

use std::collections::HashSet;
use std::net::IpAddr;

use crate::models::CandidateAddress;

/// Turns resolver output into one candidate per distinct address.
///
/// Every candidate gets `port`, since seeds only publish addresses. Order of
/// the result is unspecified.
pub fn deduplicate<I>(addresses: I, port: u16) -> Vec<CandidateAddress>
where
    I: IntoIterator<Item = IpAddr>,
{
    let unique: HashSet<IpAddr> = addresses.into_iter().collect();
    unique
        .into_iter()
        .map(|ip| CandidateAddress { ip, port })
        .collect()
}
