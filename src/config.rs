use crate::dns::response::require_ipv4;
use crate::error::Error;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::fs::File;
use std::io::BufReader;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use trust_dns_client::rr::LowerName;

pub type SharedConfig = Arc<Config>;

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// The probe domain. Queries for this name and any subdomain are in scope.
    pub domain: LowerName,
    /// Answer for in-scope `A` queries, normally the public address of this host.
    pub probe_addr: IpAddr,
    /// Answer for out-of-scope queries. When unset, out-of-scope queries are dropped.
    #[serde(default)]
    pub sinkhole_addr: Option<IpAddr>,
    #[serde(default)]
    pub record_out_of_scope: bool,
    #[serde(default)]
    pub key_normalization: KeyNormalization,
    pub dns_udp_bind_addr: SocketAddr,
    pub http_bind_addr: SocketAddr,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub http_timeout: Duration,
}

/// How correlation keys are derived from the queried DNS name and from the callback `Host`
/// header. Both sides must agree for a callback to find its DNS query.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KeyNormalization {
    /// Keys are used exactly as received: the question name as it appeared on the wire, and
    /// the `Host` header verbatim (including any `:port`).
    #[default]
    Exact,
    /// Keys are lowercased and a trailing root dot is dropped. `Host` headers additionally have
    /// their `:port` suffix removed.
    Normalized,
}

impl KeyNormalization {
    #[must_use]
    pub fn dns_key(self, domain: &str) -> String {
        match self {
            Self::Exact => domain.to_string(),
            Self::Normalized => Self::fold(domain),
        }
    }

    #[must_use]
    pub fn host_key(self, host: &str) -> String {
        match self {
            Self::Exact => host.to_string(),
            Self::Normalized => Self::fold(Self::strip_port(host)),
        }
    }

    fn fold(name: &str) -> String {
        let name = name.strip_suffix('.').unwrap_or(name);
        name.to_ascii_lowercase()
    }

    fn strip_port(host: &str) -> &str {
        // Bracketed IPv6 literal, e.g. "[::1]:8080".
        if host.starts_with('[') {
            return match host.find(']') {
                Some(end) => &host[..=end],
                None => host,
            };
        }
        match host.split_once(':') {
            Some((name, _)) => name,
            None => host,
        }
    }
}

impl Config {
    /// Load and validate a [`Config`] from the JSON file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] if the file can't be read, [`Error::InvalidJSON`] if it can't be
    /// parsed, and [`Error::InvalidAddress`] if an answer address isn't IPv4.
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        conf.answer_addrs_are_ipv4()?;
        Ok(conf)
    }

    fn answer_addrs_are_ipv4(&self) -> Result<(), Error> {
        require_ipv4(self.probe_addr)?;
        if let Some(sinkhole) = self.sinkhole_addr {
            require_ipv4(sinkhole)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use trust_dns_client::rr::Name;

    fn parse(json: &str) -> Config {
        serde_json::from_str(json).unwrap()
    }

    const MINIMAL: &str = r#"{
        "domain": "example.com",
        "probe_addr": "43.156.28.183",
        "dns_udp_bind_addr": "0.0.0.0:53",
        "http_bind_addr": "0.0.0.0:80",
        "http_timeout": 10
    }"#;

    #[test]
    fn test_minimal_config_defaults() {
        let config = parse(MINIMAL);
        assert_eq!(
            config.domain,
            LowerName::from(Name::from_str("example.com").unwrap())
        );
        assert_eq!(config.sinkhole_addr, None);
        assert!(!config.record_out_of_scope);
        assert_eq!(config.key_normalization, KeyNormalization::Exact);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert!(config.answer_addrs_are_ipv4().is_ok());
    }

    #[test]
    fn test_ipv6_answer_addr_rejected() {
        let mut config = parse(MINIMAL);
        config.sinkhole_addr = Some("::1".parse().unwrap());
        assert!(matches!(
            config.answer_addrs_are_ipv4(),
            Err(Error::InvalidAddress(addr)) if addr == "::1"
        ));
    }

    #[test]
    fn test_example_config_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json");
        let config = Config::try_from_file(path).unwrap();
        assert_eq!(config.sinkhole_addr, Some("127.0.0.1".parse().unwrap()));
        assert_eq!(config.key_normalization, KeyNormalization::Normalized);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::try_from_file("/nonexistent/oobcrab.json").unwrap_err();
        assert!(matches!(err, Error::IO(_)));
    }

    #[test]
    fn test_exact_keys_are_verbatim() {
        let keys = KeyNormalization::Exact;
        assert_eq!(keys.dns_key("Probe.Example.com"), "Probe.Example.com");
        assert_eq!(keys.host_key("probe.example.com:8080"), "probe.example.com:8080");
    }

    #[test]
    fn test_normalized_keys() {
        let keys = KeyNormalization::Normalized;
        assert_eq!(keys.dns_key("Probe.Example.COM"), "probe.example.com");
        assert_eq!(keys.dns_key("probe.example.com."), "probe.example.com");
        assert_eq!(keys.host_key("PROBE.example.com:8080"), "probe.example.com");
        assert_eq!(keys.host_key("probe.example.com"), "probe.example.com");
        assert_eq!(keys.host_key("[::1]:8080"), "[::1]");
    }
}
