//! Trace ID injection for HTTP proxies.
//!
//! Decides whether a request's origin is trusted to carry its own trace
//! identifier and, when it is not, writes a freshly generated one into the
//! configured header before handing the request on.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod trace;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use trace::{TraceIdInjector, DEFAULT_HEADER_NAME};
