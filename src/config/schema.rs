//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::bridge::HostPlatform;
use crate::sdk::config::{
    PaymasterOptions, SdkConfig, SubAccountOptions, DEFAULT_ACCOUNT, DEFAULT_PAYMASTER_POLICY,
    DEFAULT_SUB_ACCOUNT_CREATION,
};
use crate::session::DEFAULT_ORIGIN;

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Application and wallet settings.
    pub app: AppConfig,

    /// Wallet provider transport.
    pub provider: ProviderConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Settings game code would normally set in the editor.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Name shown in the wallet's connect prompt.
    pub app_name: String,

    /// "base" or "basesepolia" (case-insensitive).
    pub network: String,

    /// Replaces the preset RPC URL when non-empty.
    pub custom_rpc_url: Option<String>,

    /// Paymaster service URL (empty = no sponsorship).
    pub paymaster_url: String,

    /// Paymaster policy, e.g. "VERIFYING_PAYMASTER".
    pub paymaster_policy: String,

    /// Origin reported when looking up sub-accounts.
    pub origin: String,

    /// Host platform; detected when unset.
    pub platform: Option<HostPlatform>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Base Account App".to_string(),
            network: "basesepolia".to_string(),
            custom_rpc_url: None,
            paymaster_url: String::new(),
            paymaster_policy: DEFAULT_PAYMASTER_POLICY.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            platform: None,
        }
    }
}

impl AppConfig {
    pub fn platform(&self) -> HostPlatform {
        self.platform.unwrap_or_else(HostPlatform::current)
    }

    /// Non-blank RPC override.
    pub fn custom_rpc_url(&self) -> Option<&str> {
        self.custom_rpc_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// SDK configuration record for this app.
    pub fn sdk_config(&self) -> SdkConfig {
        let non_blank = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        SdkConfig {
            app_name: non_blank(&self.app_name),
            app_logo_url: None,
            sub_accounts: SubAccountOptions {
                creation: Some(DEFAULT_SUB_ACCOUNT_CREATION.to_string()),
                default_account: Some(DEFAULT_ACCOUNT.to_string()),
            },
            paymaster: PaymasterOptions {
                url: non_blank(&self.paymaster_url),
                policy: non_blank(&self.paymaster_policy),
            },
        }
    }
}

/// Wallet provider transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProviderConfig {
    /// JSON-RPC endpoint of the wallet or relay. Falls back to the network RPC URL.
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds. Unset means wait indefinitely.
    pub request_timeout_secs: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable output.
    pub json_logs: bool,

    /// Enable Prometheus metrics endpoint.
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
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.app.network, "basesepolia");
        assert_eq!(config.app.paymaster_policy, "VERIFYING_PAYMASTER");
        assert!(config.provider.endpoint.is_none());
        assert!(config.provider.request_timeout_secs.is_none());
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_sdk_config_from_app() {
        let app = AppConfig {
            app_name: "Dungeon Run".into(),
            paymaster_url: "https://paymaster.example.org".into(),
            ..Default::default()
        };
        let sdk = app.sdk_config();
        assert_eq!(sdk.app_name.as_deref(), Some("Dungeon Run"));
        assert_eq!(sdk.sub_accounts.creation.as_deref(), Some("on-connect"));
        assert_eq!(sdk.sub_accounts.default_account.as_deref(), Some("sub"));
        assert_eq!(sdk.paymaster.url.as_deref(), Some("https://paymaster.example.org"));
        assert_eq!(sdk.paymaster.policy.as_deref(), Some("VERIFYING_PAYMASTER"));
    }

    #[test]
    fn test_blank_rpc_override_is_ignored() {
        let mut app = AppConfig {
            custom_rpc_url: Some("   ".into()),
            ..Default::default()
        };
        assert!(app.custom_rpc_url().is_none());
        app.custom_rpc_url = Some(" https://rpc.example.org ".into());
        assert_eq!(app.custom_rpc_url(), Some("https://rpc.example.org"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BridgeConfig = toml::from_str(
            r#"
            [app]
            network = "BASE"
            platform = "web"
            "#,
        )
        .unwrap();
        assert_eq!(config.app.network, "BASE");
        assert_eq!(config.app.platform, Some(HostPlatform::Web));
        assert_eq!(config.app.app_name, "Base Account App");
        assert_eq!(config.observability.log_level, "info");
    }
}
