//! Trace ID middleware.
//! Runs the trust decision and header injection in front of every handler.

use std::net::SocketAddr;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::trace::TraceIdInjector;

/// Injector shared by all requests; swapped whole on config reload.
pub type SharedInjector = Arc<ArcSwap<TraceIdInjector>>;

pub fn shared_injector(injector: TraceIdInjector) -> SharedInjector {
    Arc::new(ArcSwap::from_pointee(injector))
}

pub async fn trace_id_middleware(
    State(injector): State<SharedInjector>,
    mut req: Request,
    next: Next,
) -> Response {
    // Pin one injector for the whole request, even across a reload. Handlers
    // read it back as `Extension<Arc<TraceIdInjector>>`.
    let injector = injector.load_full();

    let origin = remote_origin(&req);
    injector.process(&origin, req.headers_mut());
    req.extensions_mut().insert(injector.clone());

    let mirrored = if injector.adds_to_response() {
        req.headers().get(injector.header_name()).cloned()
    } else {
        None
    };

    let mut response = next.run(req).await;

    if let Some(value) = mirrored {
        response
            .headers_mut()
            .insert(injector.header_name().clone(), value);
    }
    response
}

/// `ip:port` of the peer, or empty when the host supplied no connect info.
fn remote_origin(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default()
}
