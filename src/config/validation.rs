//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Network identifier belongs to the supported table
//! - URLs parse; addresses and levels are well-formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::BridgeConfig;
use crate::network::NetworkId;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("app.app_name must not be empty")]
    EmptyAppName,

    #[error("app.network '{0}' is not supported (expected 'base' or 'basesepolia')")]
    UnknownNetwork(String),

    #[error("{field} '{value}' is not a valid URL: {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("provider.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let app = &config.app;

    if app.app_name.trim().is_empty() {
        errors.push(ValidationError::EmptyAppName);
    }
    if app.network.parse::<NetworkId>().is_err() {
        errors.push(ValidationError::UnknownNetwork(app.network.clone()));
    }
    if let Some(url) = app.custom_rpc_url() {
        check_url("app.custom_rpc_url", url, &mut errors);
    }
    if !app.paymaster_url.trim().is_empty() {
        check_url("app.paymaster_url", app.paymaster_url.trim(), &mut errors);
    }
    if !app.origin.trim().is_empty() {
        check_url("app.origin", app.origin.trim(), &mut errors);
    }

    if let Some(endpoint) = config.provider.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
        check_url("provider.endpoint", endpoint.trim(), &mut errors);
    }
    if config.provider.request_timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::InvalidLogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
