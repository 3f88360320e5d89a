//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → remote_addr.rs (connection origin → IP address)
//!     → trust.rs (does this origin keep its trace ID?)
//!     → trace::injector acts on the verdict
//! ```
//!
//! # Design Decisions
//! - Fail closed: anything unparseable is untrusted
//! - Trust rules are resolved once, never per request

pub mod remote_addr;
pub mod trust;

pub use remote_addr::extract_remote_ip;
pub use trust::TrustPolicy;
