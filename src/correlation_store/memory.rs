use crate::correlation_store::CorrelationStore;
use std::collections::HashMap;
use std::net::IpAddr;

#[derive(Default, Debug, Clone)]
pub struct InMemoryCorrelationStore {
    entries: HashMap<String, IpAddr>,
}

#[async_trait::async_trait]
impl CorrelationStore for InMemoryCorrelationStore {
    async fn record(&mut self, key: String, resolver: IpAddr) {
        self.entries.insert(key, resolver);
    }

    async fn consume(&mut self, key: &str) -> Option<IpAddr> {
        self.entries.remove(key)
    }

    async fn len(&self) -> usize {
        self.entries.len()
    }
}
