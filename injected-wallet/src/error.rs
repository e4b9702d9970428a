//! Error types for wallet connector operations.
//!
//! Errors raised by the connector itself are tagged with the wallet name
//! that was resolved at the time of the failure. Errors returned by the
//! injected provider pass through unchanged as [`ProviderError`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result type alias for wallet operations.
pub type Result<T, E = WalletError> = std::result::Result<T, E>;

/// The main error type for wallet connector operations.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum WalletError {
    /// No injected wallet was found in the scope.
    #[error("[{wallet}] no {wallet}")]
    NoWallet {
        /// Wallet name resolved when the error was raised.
        wallet: String,
    },

    /// The operation requires an active session.
    #[error("[{wallet}] {wallet} not connected")]
    NotConnected {
        /// Wallet name resolved when the error was raised.
        wallet: String,
    },

    /// The injected provider rejected or failed the request.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The injected provider answered with a payload that cannot be interpreted.
    #[error("[{wallet}] invalid response to {method}: {reason}")]
    InvalidResponse {
        /// Wallet name resolved when the error was raised.
        wallet: String,
        /// The RPC method whose result was rejected.
        method: String,
        /// What was wrong with the payload.
        reason: String,
    },
}

impl WalletError {
    /// Create a missing wallet error.
    #[must_use]
    pub fn no_wallet(wallet: impl Into<String>) -> Self {
        Self::NoWallet {
            wallet: wallet.into(),
        }
    }

    /// Create a not connected error.
    #[must_use]
    pub fn not_connected(wallet: impl Into<String>) -> Self {
        Self::NotConnected {
            wallet: wallet.into(),
        }
    }

    /// Create an invalid response error.
    #[must_use]
    pub fn invalid_response(
        wallet: impl Into<String>,
        method: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidResponse {
            wallet: wallet.into(),
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Check whether this error means no wallet is installed.
    #[must_use]
    pub const fn is_no_wallet(&self) -> bool {
        matches!(self, Self::NoWallet { .. })
    }

    /// Check whether this error means the session is not connected.
    #[must_use]
    pub const fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected { .. })
    }

    /// Get the provider error, if the failure came from the injected provider.
    #[must_use]
    pub const fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Provider(err) => Some(err),
            _ => None,
        }
    }
}

/// An EIP-1193 provider RPC error.
///
/// Hosts map the error object thrown by the injected provider into this
/// type. The standard codes are available as associated constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderError {
    /// Numeric error code.
    pub code: i64,
    /// Human-readable message from the provider.
    pub message: String,
    /// Optional provider-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ProviderError {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// The requested method or account has not been authorized by the user.
    pub const UNAUTHORIZED: i64 = 4100;
    /// The provider does not support the requested method.
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    /// The provider is disconnected from all chains.
    pub const DISCONNECTED: i64 = 4900;
    /// The provider is not connected to the requested chain.
    pub const CHAIN_DISCONNECTED: i64 = 4901;
    /// Generic internal JSON-RPC error.
    pub const INTERNAL: i64 = -32603;

    /// Create a provider error with a code and message.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a user rejection error.
    #[must_use]
    pub fn user_rejected() -> Self {
        Self::new(Self::USER_REJECTED, "User rejected the request.")
    }

    /// Create an internal error, typically for transport failures.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Self::INTERNAL, message)
    }

    /// Attach provider-specific data.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Check if the user dismissed or rejected the request in the wallet UI.
    #[must_use]
    pub const fn is_user_rejected(&self) -> bool {
        self.code == Self::USER_REJECTED
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)
    }
}

impl std::error::Error for ProviderError {}
