use crate::config::SharedConfig;
use crate::correlation_store::DynCorrelationStore;
use crate::dns::codec;
use crate::dns::policy::{ResolutionPolicy, Scope, SuffixPolicy};
use crate::dns::response::{self, ResolvedAnswer};
use crate::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Clone)]
pub struct Handler {
    policy: Arc<dyn ResolutionPolicy>,
    store: DynCorrelationStore,
}

impl Handler {
    pub(super) fn new(config: &SharedConfig, store: DynCorrelationStore) -> Self {
        Self::with_policy(Arc::new(SuffixPolicy::from(config.as_ref())), store)
    }

    pub fn with_policy(policy: Arc<dyn ResolutionPolicy>, store: DynCorrelationStore) -> Self {
        Handler { policy, store }
    }

    /// Handle one datagram from `src`, returning the response to send back, or `None` when
    /// the policy drops the query.
    ///
    /// # Errors
    ///
    /// Returns the reason the datagram was dropped: [`Error::MalformedMessage`],
    /// [`Error::NotAStandardQuery`], [`Error::TruncatedName`], [`Error::LabelTooLong`],
    /// [`Error::DottedLabel`] or [`Error::InvalidAddress`]. None of these warrant a response to
    /// the peer.
    pub async fn handle_datagram(
        &self,
        request: &[u8],
        src: SocketAddr,
    ) -> Result<Option<Vec<u8>>, Error> {
        let flags = codec::flags(request)?;
        if !codec::is_standard_query(request) {
            return Err(Error::NotAStandardQuery(flags));
        }
        let domain = codec::parse_domain(request)?;

        let scope = self.policy.scope(&domain);
        let Some(addr) = self.policy.answer(scope) else {
            tracing::debug!("no answer for out-of-scope \"{domain}\" from {src}");
            return Ok(None);
        };
        let answer = ResolvedAnswer::for_ip(domain, addr)?;

        if self.policy.records(scope) {
            let key = self.policy.correlation_key(&answer.domain);
            let resolver = src.ip().to_canonical();
            let mut store = self.store.write().await;
            store.record(key, resolver).await;
            tracing::debug!("{} correlation(s) pending", store.len().await);
        }

        match scope {
            Scope::InScope => {
                tracing::info!("resolved \"{}\" => {} for {src}", answer.domain, answer.addr);
            }
            Scope::OutOfScope => {
                tracing::debug!(
                    "sinkholed \"{}\" => {} for {src}",
                    answer.domain,
                    answer.addr
                );
            }
        }
        response::build_response(request, &answer).map(Some)
    }
}
