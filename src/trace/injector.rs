//! Trace ID injection.
//!
//! # Responsibilities
//! - Validate the trace_id configuration once
//! - Decide per request whether the origin keeps its trace ID
//! - Overwrite the trace header for untrusted origins
//!
//! # Design Decisions
//! - `process` is synchronous and infallible; it never rejects a request
//! - Overwriting drops every previous value of the header
//! - Response mirroring copies whatever value the request ends up with

use std::net::IpAddr;

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::config::schema::{ProxyConfig, TraceIdConfig};
use crate::observability::metrics;
use crate::security::remote_addr::extract_remote_ip;
use crate::security::trust::TrustPolicy;
use crate::trace::error::InjectorError;
use crate::trace::generator::{IdGenerator, IdScheme};

/// Header used when none is configured.
pub const DEFAULT_HEADER_NAME: &str = "X-Trace-Id";

/// Outcome of processing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Origin is trusted; headers were left untouched.
    Trusted,
    /// Origin is untrusted; the header now holds this value.
    Injected(HeaderValue),
}

/// Validated, immutable trace ID injector.
#[derive(Debug, Clone)]
pub struct TraceIdInjector {
    header_name: HeaderName,
    verbose: bool,
    add_to_response: bool,
    trust: TrustPolicy,
    generator: IdGenerator,
}

impl TraceIdInjector {
    /// Build an injector from its configuration section.
    pub fn new(config: &TraceIdConfig) -> Result<Self, InjectorError> {
        let scheme: IdScheme = config.scheme.parse()?;

        let header_name = if config.header_name.is_empty() {
            DEFAULT_HEADER_NAME
        } else {
            config.header_name.as_str()
        };
        let header_name = HeaderName::try_from(header_name).map_err(|_| {
            InjectorError::InvalidConfig(format!("invalid header name {:?}", config.header_name))
        })?;

        let trust = TrustPolicy::new(
            config.trust_all_networks,
            config.trust_private_networks,
            config.trust_localhost_only,
            &config.trust_networks,
        )?;

        let generator = IdGenerator::new(scheme, &config.value_prefix, &config.value_suffix);
        for (label, text) in [("prefix", generator.prefix()), ("suffix", generator.suffix())] {
            if HeaderValue::from_str(text).is_err() {
                return Err(InjectorError::InvalidConfig(format!(
                    "value {label} {text:?} cannot be sent in a header"
                )));
            }
        }

        Ok(Self {
            header_name,
            verbose: config.verbose,
            add_to_response: config.add_to_response,
            trust,
            generator,
        })
    }

    /// Build an injector from the root configuration.
    pub fn from_proxy_config(config: &ProxyConfig) -> Result<Self, InjectorError> {
        let section = config.trace_id.as_ref().ok_or(InjectorError::MissingConfig)?;
        Self::new(section)
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    pub fn adds_to_response(&self) -> bool {
        self.add_to_response
    }

    /// Whether an origin address keeps its existing trace ID.
    pub fn is_trusted(&self, ip: Option<IpAddr>) -> bool {
        self.trust.admits(ip)
    }

    /// Apply the trust decision for one request.
    ///
    /// `remote_origin` is the connection origin, usually `ip:port`; an empty
    /// string means the origin is unknown.
    pub fn process(&self, remote_origin: &str, headers: &mut HeaderMap) -> Decision {
        let remote_ip = extract_remote_ip(remote_origin);

        if self.trust.admits(remote_ip) {
            tracing::trace!(
                remote = %remote_origin,
                header = %self.header_name,
                "Trusted origin, keeping trace header"
            );
            metrics::record_decision(false);
            return Decision::Trusted;
        }

        let value = self.fresh_value();
        headers.insert(self.header_name.clone(), value.clone());

        if self.verbose {
            tracing::info!(
                header = %self.header_name,
                value = value.to_str().unwrap_or_default(),
                remote = %remote_origin,
                "Injected trace ID"
            );
        }
        metrics::record_decision(true);
        Decision::Injected(value)
    }

    fn fresh_value(&self) -> HeaderValue {
        match HeaderValue::try_from(self.generator.generate()) {
            Ok(value) => value,
            Err(e) => {
                // Prefix and suffix were checked at construction, so this
                // only guards against generator changes.
                tracing::warn!(error = %e, "Generated trace ID is not a valid header value");
                HeaderValue::from_static("")
            }
        }
    }
}
