use crate::api::routes;
use crate::config::SharedConfig;
use crate::correlation_store::DynCorrelationStore;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;

#[derive(Clone)]
pub(super) struct AppState {
    pub config: SharedConfig,
    pub store: DynCorrelationStore,
}

/// The callback [`Router`], without a listener.
pub fn router(config: SharedConfig, store: DynCorrelationStore) -> Router {
    routes::new(AppState { config, store })
}

pub fn new(
    config: SharedConfig,
    store: DynCorrelationStore,
) -> impl Future<Output = hyper::Result<()>> {
    let bind_addr = config.http_bind_addr;
    axum::Server::bind(&bind_addr)
        .serve(router(config, store).into_make_service_with_connect_info::<SocketAddr>())
}
