//! Factory producing HTTP JSON-RPC providers.
//!
//! The effective SDK configuration travels with every request as
//! `x-base-*` headers, so the relay sees the app identity, sub-account
//! policy and paymaster the session was created with.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;

use crate::network::NetworkDescriptor;
use crate::provider::{HttpProvider, Provider};
use crate::sdk::{SdkConfig, SdkError, SdkFactory, SdkResult};

pub const APP_NAME_HEADER: &str = "x-base-app-name";
pub const APP_LOGO_URL_HEADER: &str = "x-base-app-logo-url";
pub const SUB_ACCOUNT_CREATION_HEADER: &str = "x-base-sub-account-creation";
pub const DEFAULT_ACCOUNT_HEADER: &str = "x-base-default-account";
pub const PAYMASTER_URL_HEADER: &str = "x-base-paymaster-url";
pub const PAYMASTER_POLICY_HEADER: &str = "x-base-paymaster-policy";

/// Builds [`HttpProvider`]s against a wallet endpoint.
///
/// Without an explicit endpoint the network's RPC URL is used.
#[derive(Debug, Clone, Default)]
pub struct HttpSdkFactory {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpSdkFactory {
    pub fn new(endpoint: Option<String>, timeout: Option<Duration>) -> Self {
        Self {
            endpoint: endpoint.filter(|e| !e.trim().is_empty()),
            timeout,
        }
    }
}

#[async_trait]
impl SdkFactory for HttpSdkFactory {
    fn create_provider(
        &self,
        config: &SdkConfig,
        network: &NetworkDescriptor,
    ) -> SdkResult<Arc<dyn Provider>> {
        let endpoint = self.endpoint.as_deref().unwrap_or(&network.rpc_url);
        let headers = config_headers(config)?;
        let provider = HttpProvider::with_headers(endpoint, self.timeout, headers)?;

        tracing::info!(
            endpoint = %provider.endpoint(),
            chain_id = %network.chain_id,
            app_name = config.app_name.as_deref().unwrap_or(""),
            paymaster = config.paymaster.url.as_deref().unwrap_or(""),
            "Wallet provider created"
        );

        Ok(Arc::new(provider))
    }
}

/// Headers carrying the non-blank fields of `config`.
pub fn config_headers(config: &SdkConfig) -> SdkResult<HeaderMap> {
    let fields = [
        (APP_NAME_HEADER, &config.app_name),
        (APP_LOGO_URL_HEADER, &config.app_logo_url),
        (SUB_ACCOUNT_CREATION_HEADER, &config.sub_accounts.creation),
        (DEFAULT_ACCOUNT_HEADER, &config.sub_accounts.default_account),
        (PAYMASTER_URL_HEADER, &config.paymaster.url),
        (PAYMASTER_POLICY_HEADER, &config.paymaster.policy),
    ];

    let mut headers = HeaderMap::new();
    for (name, value) in fields {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            let value = HeaderValue::from_bytes(value.as_bytes()).map_err(|_| {
                SdkError::Create(format!("{} contains characters not allowed in a header", name))
            })?;
            headers.insert(HeaderName::from_static(name), value);
        }
    }
    Ok(headers)
}
