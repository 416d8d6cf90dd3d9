//! DNS resolver initialization.

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

use crate::config::{DNS_ATTEMPTS, DNS_TIMEOUT_SECS};

/// Initializes the DNS resolver used to expand the seed hostnames.
///
/// Uses the system configuration (`/etc/resolv.conf` or the platform
/// equivalent) and falls back to the default upstream servers when it cannot be
/// read. Timeouts are tightened either way so that one dead seed does not hold
/// up the join barrier for long.
pub fn init_resolver() -> Arc<TokioAsyncResolver> {
    let (config, mut opts) = match trust_dns_resolver::system_conf::read_system_conf() {
        Ok(system) => system,
        Err(e) => {
            warn!("Failed to read system DNS configuration, using defaults: {e}");
            (ResolverConfig::default(), ResolverOpts::default())
        }
    };

    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = DNS_ATTEMPTS;
    // Seeds are fully qualified; never append search domains
    opts.ndots = 0;

    Arc::new(TokioAsyncResolver::tokio(config, opts))
}
