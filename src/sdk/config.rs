//! SDK configuration record.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SUB_ACCOUNT_CREATION: &str = "on-connect";
pub const DEFAULT_ACCOUNT: &str = "sub";
pub const DEFAULT_PAYMASTER_POLICY: &str = "VERIFYING_PAYMASTER";

/// Sub-account behaviour requested from the wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountOptions {
    /// When the wallet creates the sub-account (`on-connect` or `manual`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation: Option<String>,
    /// Which account the wallet reports first (`sub` or `universal`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_account: Option<String>,
}

/// Gas sponsorship settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymasterOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
}

/// Configuration passed to the SDK when the provider is created.
///
/// Unset fields fall back to [`SdkConfig::defaults`] via [`SdkConfig::merged_over_defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_logo_url: Option<String>,
    #[serde(default)]
    pub sub_accounts: SubAccountOptions,
    #[serde(default)]
    pub paymaster: PaymasterOptions,
}

impl SdkConfig {
    /// Settings applied when the caller leaves a field unset.
    pub fn defaults() -> Self {
        Self {
            app_name: None,
            app_logo_url: None,
            sub_accounts: SubAccountOptions {
                creation: Some(DEFAULT_SUB_ACCOUNT_CREATION.to_string()),
                default_account: Some(DEFAULT_ACCOUNT.to_string()),
            },
            paymaster: PaymasterOptions {
                url: None,
                policy: Some(DEFAULT_PAYMASTER_POLICY.to_string()),
            },
        }
    }

    /// Merge this (caller) config over the defaults. Caller values win.
    pub fn merged_over_defaults(&self) -> Self {
        let defaults = Self::defaults();
        Self {
            app_name: non_blank(&self.app_name).or(defaults.app_name),
            app_logo_url: non_blank(&self.app_logo_url).or(defaults.app_logo_url),
            sub_accounts: SubAccountOptions {
                creation: non_blank(&self.sub_accounts.creation)
                    .or(defaults.sub_accounts.creation),
                default_account: non_blank(&self.sub_accounts.default_account)
                    .or(defaults.sub_accounts.default_account),
            },
            paymaster: PaymasterOptions {
                url: non_blank(&self.paymaster.url).or(defaults.paymaster.url),
                policy: non_blank(&self.paymaster.policy).or(defaults.paymaster.policy),
            },
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}
