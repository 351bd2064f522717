//! HTTP callback endpoint.
//!
//! # API Endpoints
//!
//! ## `/` (GET)
//!
//!   The callback. Looks up the request's `Host` header in the
//!   [correlation store][crate::correlation_store] and returns HTTP 200 (OK) with a
//!   `text/plain` body holding the address of the resolver that queried that name, or the
//!   literal `undefined` when there is no entry. A successful lookup consumes the entry, so a
//!   repeated callback for the same name answers `undefined` until the name is queried again.
//!
//!   ```bash
//!   ❯ dig @127.0.0.1 -p 5353 +noedns +short x1.probe.example.com A
//!   43.156.28.183
//!   ❯ curl -H 'Host: x1.probe.example.com' http://localhost:8080/
//!   127.0.0.1
//!   ❯ curl -H 'Host: x1.probe.example.com' http://localhost:8080/
//!   undefined
//!   ```
//!
//!   The `Host` header is matched against the queried name according to
//!   [`Config::key_normalization`][`crate::config::Config::key_normalization`]. With the default
//!   `exact` normalization the header must equal the queried name byte for byte, so a `Host`
//!   carrying a port never matches.
//!
//!   Requests without a `Host` header get HTTP 400 (Bad Request).
//!
//! ## `/healthcheck` (GET)
//!
//!   Returns HTTP 200 (OK) and the JSON body `{"ok":"healthy"}` when the service is operational.
//!
//! Every other path or method returns HTTP 404 (Not Found). All responses allow any origin,
//! method and header for CORS.

mod api_error;
mod routes;
pub mod server;

pub use server::{new, router};
