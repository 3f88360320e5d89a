//! Trace identifier subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (remote origin, headers)
//!     → security::remote_addr (origin string → IP)
//!     → security::trust (trusted?)
//!     → generator.rs (fresh token when untrusted)
//!     → injector.rs (write header, decide response mirroring)
//!     → next handler
//! ```
//!
//! # Design Decisions
//! - Everything is resolved once at construction; the request path cannot fail
//! - Trusted origins keep their upstream-assigned trace ID
//! - The injector is immutable; reloads swap in a whole new instance

pub mod error;
pub mod generator;
pub mod injector;

pub use error::InjectorError;
pub use generator::{IdGenerator, IdScheme};
pub use injector::{Decision, TraceIdInjector, DEFAULT_HEADER_NAME};
