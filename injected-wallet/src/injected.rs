//! The injected EIP-1193 surface.
//!
//! A browser wallet extension patches an `ethereum` object into the page's
//! global scope. This module models that object as the [`InjectedProvider`]
//! trait and the global scope itself as [`InjectedScope`], so the detector
//! and connector never read ambient state.
//!
//! [`InjectedWindow`] is an in-memory scope for hosts that mirror the
//! browser globals into Rust, and for tests.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProviderError;

/// `eth_requestAccounts`: ask the user to expose accounts. May open the wallet UI.
pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
/// `eth_accounts`: currently exposed accounts, never prompts.
pub const ETH_ACCOUNTS: &str = "eth_accounts";
/// `eth_chainId`: hex chain id of the active network.
pub const ETH_CHAIN_ID: &str = "eth_chainId";

/// Arguments of an EIP-1193 `request` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestArguments {
    /// RPC method name.
    pub method: String,
    /// Optional positional or named parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RequestArguments {
    /// Create a parameterless request.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: None,
        }
    }

    /// Attach parameters.
    #[must_use]
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }
}

/// Wallet-originated events the connector subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEvent {
    /// `accountsChanged`, payload is an array of address strings.
    AccountsChanged,
    /// `chainChanged`, payload is a hex chain id string.
    ChainChanged,
}

impl ProviderEvent {
    /// The EIP-1193 event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccountsChanged => "accountsChanged",
            Self::ChainChanged => "chainChanged",
        }
    }
}

impl fmt::Display for ProviderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handler attached to an injected provider event.
pub type ProviderEventHandler = Box<dyn Fn(Value) + Send + Sync>;

/// Capability flags advertised by an injected provider.
///
/// Extensions signal their identity through loosely specified boolean
/// properties. Several may be set at once when extensions patch each
/// other's object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFlags {
    /// `isMetaMask`.
    #[serde(default)]
    pub is_meta_mask: bool,
    /// `isTrustWallet`.
    #[serde(default)]
    pub is_trust_wallet: bool,
    /// `isTrust`, the older Trust Wallet flag.
    #[serde(default)]
    pub is_trust: bool,
    /// Non-standard `providers` array kept by some extensions when several
    /// of them are installed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<ProviderFlags>>,
}

impl ProviderFlags {
    /// Flags of a plain MetaMask provider.
    #[must_use]
    pub fn metamask() -> Self {
        Self {
            is_meta_mask: true,
            ..Self::default()
        }
    }

    /// Flags of a plain Trust Wallet provider.
    #[must_use]
    pub fn trust_wallet() -> Self {
        Self {
            is_trust_wallet: true,
            ..Self::default()
        }
    }

    /// Set the alternate providers list.
    #[must_use]
    pub fn with_providers(mut self, providers: Vec<Self>) -> Self {
        self.providers = Some(providers);
        self
    }

    /// Whether either Trust Wallet flag is set.
    #[must_use]
    pub const fn is_trust_any(&self) -> bool {
        self.is_trust_wallet || self.is_trust
    }

    /// Number of entries in the `providers` array, zero if absent.
    #[must_use]
    pub fn providers_len(&self) -> usize {
        self.providers.as_ref().map_or(0, Vec::len)
    }
}

/// The injected EIP-1193 provider object.
///
/// The connector never constructs or tears down a provider, it only calls
/// these methods.
#[async_trait]
pub trait InjectedProvider: Send + Sync {
    /// Capability flags currently advertised by the provider.
    fn flags(&self) -> ProviderFlags;

    /// Submit an RPC request.
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError>;

    /// Attach an event handler. Handlers are never removed.
    fn on(&self, event: ProviderEvent, handler: ProviderEventHandler);
}

/// The global scope a wallet extension injects into.
pub trait InjectedScope: Send + Sync {
    /// The injected `ethereum` object, if any.
    fn ethereum(&self) -> Option<Arc<dyn InjectedProvider>>;

    /// Whether the separate `trustwallet` global is present.
    fn has_trust_wallet_global(&self) -> bool;

    /// Number of providers registered in the EIP-5749 `evmproviders` map.
    fn evm_providers_count(&self) -> usize;
}

/// An in-memory [`InjectedScope`].
///
/// Every field can change at runtime, mirroring extensions being enabled
/// or removed while the page is open.
#[derive(Default)]
pub struct InjectedWindow {
    ethereum: RwLock<Option<Arc<dyn InjectedProvider>>>,
    trust_wallet: RwLock<bool>,
    evm_providers: RwLock<BTreeSet<String>>,
}

impl fmt::Debug for InjectedWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectedWindow")
            .field("ethereum", &self.ethereum.read().as_ref().map(|p| p.flags()))
            .field("trust_wallet", &*self.trust_wallet.read())
            .field("evm_providers", &*self.evm_providers.read())
            .finish()
    }
}

impl InjectedWindow {
    /// Create an empty scope with no wallet injected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope with `ethereum` set to the given provider.
    #[must_use]
    pub fn with_ethereum(provider: Arc<dyn InjectedProvider>) -> Self {
        let window = Self::new();
        window.set_ethereum(Some(provider));
        window
    }

    /// Replace or clear the injected `ethereum` object.
    pub fn set_ethereum(&self, provider: Option<Arc<dyn InjectedProvider>>) {
        *self.ethereum.write() = provider;
    }

    /// Set or clear the `trustwallet` global.
    pub fn set_trust_wallet_global(&self, present: bool) {
        *self.trust_wallet.write() = present;
    }

    /// Register a provider id in the EIP-5749 map.
    pub fn register_evm_provider(&self, id: impl Into<String>) {
        self.evm_providers.write().insert(id.into());
    }

    /// Remove a provider id from the EIP-5749 map.
    pub fn unregister_evm_provider(&self, id: &str) -> bool {
        self.evm_providers.write().remove(id)
    }
}

impl InjectedScope for InjectedWindow {
    fn ethereum(&self) -> Option<Arc<dyn InjectedProvider>> {
        self.ethereum.read().clone()
    }

    fn has_trust_wallet_global(&self) -> bool {
        *self.trust_wallet.read()
    }

    fn evm_providers_count(&self) -> usize {
        self.evm_providers.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_from_injected_json() {
        let flags: ProviderFlags = serde_json::from_value(serde_json::json!({
            "isMetaMask": true,
            "isTrust": true,
            "providers": [{"isMetaMask": true}, {"isTrustWallet": true}]
        }))
        .unwrap();

        assert!(flags.is_meta_mask);
        assert!(flags.is_trust_any());
        assert!(!flags.is_trust_wallet);
        assert_eq!(flags.providers_len(), 2);
    }

    #[test]
    fn test_missing_flags_default_to_false() {
        let flags: ProviderFlags = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(flags, ProviderFlags::default());
        assert_eq!(flags.providers_len(), 0);
    }

    #[test]
    fn test_request_arguments_shape() {
        let args = RequestArguments::new(ETH_CHAIN_ID);
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            serde_json::json!({"method": "eth_chainId"})
        );

        let args = RequestArguments::new("wallet_switchEthereumChain")
            .with_params(serde_json::json!([{"chainId": "0x89"}]));
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            serde_json::json!({
                "method": "wallet_switchEthereumChain",
                "params": [{"chainId": "0x89"}]
            })
        );
    }

    #[test]
    fn test_window_evm_providers() {
        let window = InjectedWindow::new();
        assert!(window.ethereum().is_none());
        assert_eq!(window.evm_providers_count(), 0);

        window.register_evm_provider("io.metamask");
        window.register_evm_provider("com.trustwallet.app");
        window.register_evm_provider("io.metamask");
        assert_eq!(window.evm_providers_count(), 2);

        assert!(window.unregister_evm_provider("io.metamask"));
        assert!(!window.unregister_evm_provider("io.metamask"));
        assert_eq!(window.evm_providers_count(), 1);
    }
}
