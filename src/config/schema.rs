//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Keys are snake_case; the `[trace_id]` table also accepts the camelCase
//! names used by existing reverse-proxy plugin configurations.

use serde::{Deserialize, Serialize};

use crate::trace::DEFAULT_HEADER_NAME;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where requests go after the trace ID has been handled.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Trace ID injection settings. A file without this table is rejected.
    #[serde(default)]
    pub trace_id: Option<TraceIdConfig>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            upstream: UpstreamConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            trace_id: Some(TraceIdConfig::default()),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream authority (e.g., "127.0.0.1:3000").
    ///
    /// When unset, requests are answered locally with an inspection body.
    pub address: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Trace ID injection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TraceIdConfig {
    /// Header to inject or overwrite. Empty means `X-Trace-Id`.
    #[serde(alias = "headerName")]
    pub header_name: String,

    /// Literal text placed before the generated identifier.
    #[serde(alias = "valuePrefix")]
    pub value_prefix: String,

    /// Literal text placed after the generated identifier.
    #[serde(alias = "valueSuffix")]
    pub value_suffix: String,

    /// Identifier scheme: "4" (UUIDv4), "7" (UUIDv7) or "L" (ULID).
    #[serde(alias = "uuidGen")]
    pub scheme: String,

    /// Log every injected value.
    pub verbose: bool,

    /// Trust every origin.
    #[serde(alias = "trustAllIPs", alias = "trustAllNetworks")]
    pub trust_all_networks: bool,

    /// Trust private ranges and loopback.
    #[serde(alias = "trustPrivateIPs", alias = "trustPrivateNetworks")]
    pub trust_private_networks: bool,

    /// Trust loopback only.
    #[serde(alias = "trustLocalhost", alias = "trustLocalhostOnly")]
    pub trust_localhost_only: bool,

    /// Comma-separated CIDR blocks, or "*" for all.
    #[serde(alias = "trustNetworks")]
    pub trust_networks: String,

    /// Also set the header on the response.
    #[serde(alias = "addToResponse")]
    pub add_to_response: bool,
}

impl Default for TraceIdConfig {
    fn default() -> Self {
        Self {
            header_name: DEFAULT_HEADER_NAME.to_string(),
            value_prefix: String::new(),
            value_suffix: String::new(),
            scheme: "4".to_string(),
            verbose: false,
            trust_all_networks: false,
            trust_private_networks: false,
            trust_localhost_only: false,
            trust_networks: String::new(),
            add_to_response: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_file_uses_defaults() {
        let config: ProxyConfig = toml::from_str("[trace_id]\n").unwrap();
        let trace = config.trace_id.unwrap();
        assert_eq!(trace.header_name, "X-Trace-Id");
        assert_eq!(trace.scheme, "4");
        assert!(!trace.add_to_response);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.upstream.address.is_none());
    }

    #[test]
    fn test_missing_trace_id_table() {
        let config: ProxyConfig = toml::from_str("[listener]\nbind_address = \"127.0.0.1:9000\"\n").unwrap();
        assert!(config.trace_id.is_none());
        assert!(ProxyConfig::default().trace_id.is_some());
    }

    #[test]
    fn test_plugin_spellings_are_accepted() {
        let raw = r#"
            [trace_id]
            headerName = "Other-Name"
            valuePrefix = "myorg"
            valueSuffix = '""'
            uuidGen = "L"
            trustAllIPs = false
            trustPrivateIPs = true
            trustLocalhost = true
            trustNetworks = "10.0.0.0/8"
            addToResponse = true
        "#;
        let trace = toml::from_str::<ProxyConfig>(raw).unwrap().trace_id.unwrap();
        assert_eq!(trace.header_name, "Other-Name");
        assert_eq!(trace.value_prefix, "myorg");
        assert_eq!(trace.value_suffix, "\"\"");
        assert_eq!(trace.scheme, "L");
        assert!(trace.trust_private_networks);
        assert!(trace.trust_localhost_only);
        assert_eq!(trace.trust_networks, "10.0.0.0/8");
        assert!(trace.add_to_response);
    }

    #[test]
    fn test_snake_case_keys() {
        let raw = r#"
            [trace_id]
            header_name = "X-Request-Trace"
            scheme = "7"
            trust_all_networks = true
            verbose = true
        "#;
        let trace = toml::from_str::<ProxyConfig>(raw).unwrap().trace_id.unwrap();
        assert_eq!(trace.header_name, "X-Request-Trace");
        assert_eq!(trace.scheme, "7");
        assert!(trace.trust_all_networks);
        assert!(trace.verbose);
    }
}
