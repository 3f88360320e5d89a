//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the trace ID middleware in front of every route
//! - Wire up tracing and timeout layers
//! - Forward requests to the configured upstream, or answer locally
//! - Apply configuration reloads by swapping the injector
//! - Stop gracefully on the shutdown broadcast

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        HeaderMap, StatusCode, Uri, Version,
    },
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::any,
    Extension, Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::http::middleware::trace_id::{shared_injector, trace_id_middleware, SharedInjector};
use crate::observability::metrics;
use crate::trace::{InjectorError, TraceIdInjector};

/// Reasons the server cannot be built from a configuration.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Injector(#[from] InjectorError),

    #[error("invalid upstream address {address:?}: {reason}")]
    Upstream { address: String, reason: String },
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub injector: SharedInjector,
    pub client: Client<HttpConnector, Body>,
    pub upstream: Option<Authority>,
}

/// HTTP server hosting the trace ID middleware.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    injector: SharedInjector,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, StartupError> {
        let injector = shared_injector(TraceIdInjector::from_proxy_config(&config)?);

        let upstream = match &config.upstream.address {
            Some(address) => Some(address.parse::<Authority>().map_err(|e| {
                StartupError::Upstream {
                    address: address.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            injector: injector.clone(),
            client,
            upstream,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            injector,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let handler = if state.upstream.is_some() {
            any(forward_handler)
        } else {
            any(inspect_handler)
        };

        Router::new()
            .route("/{*path}", handler.clone())
            .route("/", handler)
            .with_state(state.clone())
            .layer(from_fn_with_state(state.injector, trace_id_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The injector currently serving requests.
    pub fn injector(&self) -> SharedInjector {
        self.injector.clone()
    }

    /// A copy of the router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ProxyConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            header = %self.injector.load().header_name(),
            upstream = ?self.config.upstream.address,
            "HTTP server starting"
        );

        let injector = self.injector.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                apply_reload(&injector, &config);
            }
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Rebuild the injector from a new configuration and swap it in.
///
/// Returns false, keeping the current injector, when the configuration is
/// not usable.
pub fn apply_reload(injector: &SharedInjector, config: &ProxyConfig) -> bool {
    match TraceIdInjector::from_proxy_config(config) {
        Ok(next) => {
            tracing::info!(header = %next.header_name(), "Trace ID configuration reloaded");
            injector.store(next.into());
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Rejected trace ID configuration, keeping current one");
            false
        }
    }
}

/// Forward the request to the upstream with the trace header in place.
async fn forward_handler(State(state): State<AppState>, request: Request) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();

    let Some(upstream) = state.upstream.clone() else {
        return (StatusCode::BAD_GATEWAY, "No upstream configured").into_response();
    };

    let (mut parts, body) = request.into_parts();
    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(upstream.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot build upstream URI");
            return (StatusCode::BAD_REQUEST, "Invalid request URI").into_response();
        }
    };
    parts.version = Version::HTTP_11;

    tracing::debug!(
        method = %method,
        uri = %parts.uri,
        "Forwarding request"
    );

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            metrics::record_upstream(&method, response.status().as_u16(), start_time);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(upstream = %upstream, error = %e, "Upstream error");
            metrics::record_upstream(&method, StatusCode::BAD_GATEWAY.as_u16(), start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Report the trace header as the handler received it.
///
/// Uses the injector the middleware pinned for this request so the reported
/// name matches the header that was written, even across a reload.
async fn inspect_handler(
    State(state): State<AppState>,
    pinned: Option<Extension<Arc<TraceIdInjector>>>,
    headers: HeaderMap,
) -> Json<Value> {
    let injector = match pinned {
        Some(Extension(injector)) => injector,
        None => state.injector.load_full(),
    };
    let name = injector.header_name();
    let value = headers.get(name).and_then(|v| v.to_str().ok());

    Json(json!({
        "header": name.as_str(),
        "value": value,
    }))
}
