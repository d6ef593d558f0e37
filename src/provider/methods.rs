//! Provider method names used by the session.

pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
pub const ETH_CHAIN_ID: &str = "eth_chainId";
pub const WALLET_GET_SUB_ACCOUNTS: &str = "wallet_getSubAccounts";
pub const WALLET_ADD_SUB_ACCOUNT: &str = "wallet_addSubAccount";
pub const WALLET_SEND_CALLS: &str = "wallet_sendCalls";

/// Provider event names.
pub const ACCOUNTS_CHANGED: &str = "accountsChanged";
pub const CHAIN_CHANGED: &str = "chainChanged";
