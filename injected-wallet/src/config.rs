//! Connector configuration.

use serde::{Deserialize, Serialize};

use crate::detect::METAMASK_NAME;
use crate::injected::{ETH_ACCOUNTS, ETH_REQUEST_ACCOUNTS};

/// Which RPC method is used to read accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountsMethod {
    /// `eth_requestAccounts`, opens the wallet approval UI when needed.
    #[default]
    #[serde(rename = "eth_requestAccounts")]
    RequestAccounts,
    /// `eth_accounts`, never prompts.
    #[serde(rename = "eth_accounts")]
    Accounts,
}

impl AccountsMethod {
    /// The RPC method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestAccounts => ETH_REQUEST_ACCOUNTS,
            Self::Accounts => ETH_ACCOUNTS,
        }
    }
}

/// Configuration for a [`WalletConnector`](crate::WalletConnector).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Method used by `connect()`.
    pub connect_method: AccountsMethod,
    /// Method used to re-read the address when the cache is empty.
    pub refresh_method: AccountsMethod,
    /// Fixed name reported by the API provider.
    pub api_name: String,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            connect_method: AccountsMethod::RequestAccounts,
            refresh_method: AccountsMethod::Accounts,
            api_name: METAMASK_NAME.to_string(),
        }
    }
}

impl ConnectorConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the method used by `connect()`.
    #[must_use]
    pub const fn connect_method(mut self, method: AccountsMethod) -> Self {
        self.connect_method = method;
        self
    }

    /// Set the method used to refresh the cached address.
    #[must_use]
    pub const fn refresh_method(mut self, method: AccountsMethod) -> Self {
        self.refresh_method = method;
        self
    }

    /// Set the name reported by the API provider.
    #[must_use]
    pub fn api_name(mut self, name: impl Into<String>) -> Self {
        self.api_name = name.into();
        self
    }
}
