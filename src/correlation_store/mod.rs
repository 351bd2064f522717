//! Correlation of DNS queries with later HTTP callbacks.
//!
//! When the [DNS server][crate::dns] answers an in-scope query it records the address of the
//! resolver that asked, keyed by the queried name. When the [HTTP callback][crate::api] later
//! receives a request for that name it consumes the entry, proving the target made the full
//! DNS then HTTP round trip. Each entry is returned at most once.
//!
//! A later query for the same name overwrites the earlier entry. Entries never expire: one
//! that is never consumed lives as long as the process.

use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod memory;

#[allow(clippy::module_name_repetitions)]
pub use memory::InMemoryCorrelationStore;

/// `DynCorrelationStore` is a type alias for a [`CorrelationStore`] shared by the DNS and HTTP
/// servers through an [`Arc`] and a [`RwLock`]. Both [`CorrelationStore::record`] and
/// [`CorrelationStore::consume`] need the write lock, which makes consume's read-then-delete
/// atomic with respect to concurrent records.
#[allow(clippy::module_name_repetitions)]
pub type DynCorrelationStore = Arc<RwLock<dyn CorrelationStore + Send + Sync>>;

/// Returns a new, empty, shareable in-memory store.
#[must_use]
pub fn shared() -> DynCorrelationStore {
    Arc::new(RwLock::new(InMemoryCorrelationStore::default()))
}

/// An async trait describing storage of the resolver address that queried each name.
#[async_trait::async_trait]
pub trait CorrelationStore {
    /// Record `resolver` as the latest querier of `key`, replacing any previous entry.
    async fn record(&mut self, key: String, resolver: IpAddr);

    /// Remove and return the entry for `key`, if any.
    async fn consume(&mut self, key: &str) -> Option<IpAddr>;

    /// Number of entries waiting to be consumed.
    async fn len(&self) -> usize;
}
