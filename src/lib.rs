//! OOB Crab
//!
//! An out-of-band interaction probe: a minimal authoritative DNS responder paired with an HTTP
//! callback endpoint. Together they show whether a remote system makes a full network round
//! trip against a probe domain, resolving a name and then fetching it over HTTP. Useful for
//! confirming blind server-side request forgery, or targets that can be DNS rebound.
//!
//! A target that only resolves the name proves DNS-level interaction. The [DNS server][dns]
//! records which resolver asked for each in-scope name. When the target then connects to the
//! answered address, the [HTTP callback][api] reports that resolver for the name in the `Host`
//! header, exactly once.
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 5353 +noedns +short x1.probe.example.com A
//! 43.156.28.183
//! ❯ curl -H 'Host: x1.probe.example.com' http://localhost:8080/
//! 127.0.0.1
//! ```
//!
#![warn(clippy::pedantic)]

pub mod api;
pub mod config;
pub mod correlation_store;
#[doc(hidden)]
pub mod crab;
pub mod dns;
pub mod error;

pub use api::new as new_http;
pub use config::{Config, SharedConfig};
pub use correlation_store::{DynCorrelationStore, InMemoryCorrelationStore};
pub use dns::new as new_dns;
