//! Seed discovery: hostname resolution and address deduplication.
//!
//! - `resolve_seeds` fans out one lookup per seed and joins them all
//! - `deduplicate` reduces the result to unique `CandidateAddress` values
//!
//! Lookups go through the `HostLookup` trait, implemented for the
//! `trust-dns` tokio resolver and for `StaticHosts`.

mod dedup;
mod resolve;

pub use dedup::deduplicate;
pub use resolve::{resolve_seeds, HostLookup, StaticHosts};
