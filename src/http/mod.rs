//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (with ConnectInfo<SocketAddr>)
//!     → server.rs (Axum setup, tracing and timeout layers)
//!     → middleware/trace_id.rs (trust decision, header injection)
//!     → server.rs handler (forward upstream, or inspect locally)
//!     → middleware/trace_id.rs (optional response mirroring)
//!     → Send to client
//! ```

pub mod middleware;
pub mod server;

pub use middleware::trace_id::{shared_injector, trace_id_middleware, SharedInjector};
pub use server::{HttpServer, StartupError};
