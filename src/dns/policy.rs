//! Pluggable resolution policy: which names are in scope, what they resolve to, and which
//! resolutions are recorded for callback correlation.

use crate::config::{Config, KeyNormalization};
use std::net::IpAddr;
use trust_dns_client::rr::{LowerName, Name};

/// Whether a queried name belongs to the probe domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    InScope,
    OutOfScope,
}

/// Decides how the [DNS handler][crate::dns::handlers::Handler] treats each queried name.
#[allow(clippy::module_name_repetitions)]
pub trait ResolutionPolicy: Send + Sync {
    /// Classify a queried name, as it appeared on the wire.
    fn scope(&self, domain: &str) -> Scope;

    /// The address to answer with, or `None` to drop the query without a response.
    fn answer(&self, scope: Scope) -> Option<IpAddr>;

    /// Whether a resolution in this scope creates a correlation entry.
    fn records(&self, scope: Scope) -> bool {
        scope == Scope::InScope
    }

    /// The correlation store key for a queried name.
    fn correlation_key(&self, domain: &str) -> String {
        domain.to_string()
    }
}

/// Scopes queries to a configured domain and its subdomains.
#[derive(Debug, Clone)]
pub struct SuffixPolicy {
    domain: LowerName,
    probe_addr: IpAddr,
    sinkhole_addr: Option<IpAddr>,
    record_out_of_scope: bool,
    keys: KeyNormalization,
}

impl SuffixPolicy {
    #[must_use]
    pub fn new(domain: LowerName, probe_addr: IpAddr) -> Self {
        SuffixPolicy {
            domain,
            probe_addr,
            sinkhole_addr: None,
            record_out_of_scope: false,
            keys: KeyNormalization::default(),
        }
    }

    #[must_use]
    pub fn with_sinkhole(mut self, sinkhole_addr: Option<IpAddr>) -> Self {
        self.sinkhole_addr = sinkhole_addr;
        self
    }

    #[must_use]
    pub fn with_record_out_of_scope(mut self, record_out_of_scope: bool) -> Self {
        self.record_out_of_scope = record_out_of_scope;
        self
    }

    #[must_use]
    pub fn with_keys(mut self, keys: KeyNormalization) -> Self {
        self.keys = keys;
        self
    }
}

impl From<&Config> for SuffixPolicy {
    fn from(config: &Config) -> Self {
        SuffixPolicy::new(config.domain.clone(), config.probe_addr)
            .with_sinkhole(config.sinkhole_addr)
            .with_record_out_of_scope(config.record_out_of_scope)
            .with_keys(config.key_normalization)
    }
}

impl ResolutionPolicy for SuffixPolicy {
    fn scope(&self, domain: &str) -> Scope {
        // Names that aren't valid DNS names can't be inside the probe domain.
        match Name::from_ascii(domain) {
            Ok(name) if self.domain.zone_of(&LowerName::from(&name)) => Scope::InScope,
            _ => Scope::OutOfScope,
        }
    }

    fn answer(&self, scope: Scope) -> Option<IpAddr> {
        match scope {
            Scope::InScope => Some(self.probe_addr),
            Scope::OutOfScope => self.sinkhole_addr,
        }
    }

    fn records(&self, scope: Scope) -> bool {
        scope == Scope::InScope || self.record_out_of_scope
    }

    fn correlation_key(&self, domain: &str) -> String {
        self.keys.dns_key(domain)
    }
}
