//! Minimal authoritative DNS responder.
//!
//! OOB Crab answers `A` queries arriving over UDP. It is not a general purpose DNS server: only
//! the first question's name is read, the query type is not inspected, and every answer is a
//! single `A` record with a TTL of 3600 seconds.
//!
//! # Scope
//!
//! Queries for [`Config::domain`][`crate::config::Config::domain`] or any of its subdomains are
//! in scope. They are answered with [`Config::probe_addr`][`crate::config::Config::probe_addr`]
//! and the address of the querying resolver is recorded in the
//! [correlation store][crate::correlation_store] for the [HTTP callback][crate::api].
//!
//! E.g. with config:
//! ```json
//! {
//!   "domain": "probe.example.com",
//!   "probe_addr": "43.156.28.183",
//!   ...
//! }
//! ```
//!
//! An `A` query for `x1.probe.example.com` would return:
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 5353 +noedns +short x1.probe.example.com A
//! 43.156.28.183
//! ```
//!
//! Every other name is out of scope. Out-of-scope queries are answered with
//! [`Config::sinkhole_addr`][`crate::config::Config::sinkhole_addr`] when it is set, and
//! dropped otherwise. They are only recorded when
//! [`Config::record_out_of_scope`][`crate::config::Config::record_out_of_scope`] is set.
//!
//! # Dropped queries
//!
//! There is no error response. Datagrams that are too short, aren't standard queries, or carry
//! a malformed question name get no reply at all, and the requester times out. The reason is
//! logged at `debug`.
//!
//! # EDNS
//!
//! The response is the request with an answer appended, so a request carrying an `OPT` record
//! produces a response with those bytes ahead of the answer and `ARCOUNT` zeroed. Query with
//! EDNS disabled (`dig +noedns`).

pub mod codec;
pub mod handlers;
pub mod policy;
pub mod response;
pub mod server;

pub use server::{new, DnsServer};
